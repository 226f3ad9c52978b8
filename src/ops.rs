use chrono::Local;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    errors::Error,
    types::{
        Category, CategoryTotal, ChartPoint, ChartSeries, Ledger, MemoryTransactionLog, Summary,
        Transaction, TransactionId, TransactionInput, TransactionLog, TransactionType,
    },
};

impl TransactionInput {
    /// Returns the amount to record if the input is complete.
    /// # Errors
    /// [`Error::InvalidInput`] if the name is empty, or the amount is missing or zero
    fn validated_amount(&self) -> Result<Decimal, Error> {
        match self.amount {
            Some(amount) if !self.name.is_empty() && !amount.is_zero() => Ok(amount),
            _ => Err(Error::InvalidInput),
        }
    }
}

/// Sums the income and expense amounts of every transaction in the log.
pub(crate) fn summarize<L>(log: &L) -> Summary
where
    for<'a> &'a L: IntoIterator<Item = &'a Transaction>,
{
    log.into_iter()
        .fold(Summary::default(), |mut summary, transaction| {
            match transaction.transaction_type {
                TransactionType::Income => summary.income += transaction.amount,
                TransactionType::Expense => summary.expenses += transaction.amount,
            }
            summary
        })
}

/// Sums expense amounts per category. Every category is reported, in table order,
/// whether or not any transaction uses it.
pub(crate) fn category_totals<L>(log: &L) -> Vec<CategoryTotal>
where
    for<'a> &'a L: IntoIterator<Item = &'a Transaction>,
{
    Category::all()
        .map(|category| CategoryTotal {
            category,
            total: log
                .into_iter()
                .filter(|transaction| {
                    transaction.transaction_type == TransactionType::Expense
                        && transaction.category == category
                })
                .map(|transaction| transaction.amount)
                .sum(),
        })
        .collect()
}

impl<L> Ledger<L>
where
    L: TransactionLog,
    for<'a> &'a L: IntoIterator<Item = &'a Transaction>,
{
    /// Records a new transaction at the end of the ledger, stamped with the current time.
    /// # Errors
    /// [`Error::InvalidInput`] if the name is empty or the amount is missing or zero.
    /// [`Error::IdsExhausted`] if no identifier is left to assign.
    /// The ledger is unchanged in either case.
    pub fn add(&mut self, input: TransactionInput) -> Result<TransactionId, Error> {
        let amount = match input.validated_amount() {
            Ok(amount) => amount,
            Err(err) => {
                warn!(name = %input.name, amount = ?input.amount, "rejected transaction");
                return Err(err);
            }
        };
        let transaction_id = TransactionId(self.next_id);
        let next_id = self.next_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        let transaction = Transaction {
            id: transaction_id,
            name: input.name,
            amount,
            transaction_type: input.transaction_type,
            category: input.category,
            timestamp: Local::now(),
        };
        self.log.register(transaction)?;
        self.next_id = next_id;
        self.recompute();
        debug!(
            %transaction_id,
            %amount,
            kind = %input.transaction_type,
            category = %input.category,
            "added transaction"
        );
        Ok(transaction_id)
    }

    /// Adds the pending form input as a new transaction.
    ///
    /// On success the pending name and amount are cleared; the type and category
    /// keep their values for the next entry. On failure the pending input is untouched.
    /// # Errors
    /// [`Error::InvalidInput`] as for [`Ledger::add`]
    pub fn submit(&mut self) -> Result<TransactionId, Error> {
        let transaction_id = self.add(self.pending.clone())?;
        self.pending.name.clear();
        self.pending.amount = None;
        Ok(transaction_id)
    }

    /// Removes a transaction and recomputes the totals.
    /// # Errors
    /// [`Error::NotFound`] if no transaction has that ID
    pub fn delete(&mut self, transaction_id: TransactionId) -> Result<Transaction, Error> {
        let removed = self.log.remove(transaction_id)?;
        self.recompute();
        debug!(%transaction_id, "deleted transaction");
        Ok(removed)
    }

    /// Removes the transaction at a display position. Later transactions move up one place.
    /// # Errors
    /// [`Error::IndexOutOfRange`] if there is no transaction at `index`
    pub fn delete_at(&mut self, index: usize) -> Result<Transaction, Error> {
        let transaction_id = self.id_at(index)?;
        self.delete(transaction_id)
    }

    /// Copies a transaction into the pending form input and removes it from the ledger.
    ///
    /// The transaction is not updated in place: submitting the form afterwards records
    /// a new transaction, with a new ID and timestamp, at the end of the ledger.
    /// # Errors
    /// [`Error::NotFound`] if no transaction has that ID; the pending input is untouched
    pub fn edit(&mut self, transaction_id: TransactionId) -> Result<(), Error> {
        let removed = self.delete(transaction_id)?;
        self.pending = removed.into();
        Ok(())
    }

    /// As [`Ledger::edit`], addressing the transaction by display position.
    /// # Errors
    /// [`Error::IndexOutOfRange`] if there is no transaction at `index`
    pub fn edit_at(&mut self, index: usize) -> Result<(), Error> {
        let transaction_id = self.id_at(index)?;
        self.edit(transaction_id)
    }

    /// Returns the expense total of every category, in table order
    #[must_use]
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        category_totals(&self.log)
    }

    /// Returns the expense breakdown as pie chart data, one slice per category
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        let points = self
            .category_totals()
            .into_iter()
            .map(|category_total| ChartPoint {
                style: category_total.category.style(),
                value: category_total.total,
            })
            .collect();
        ChartSeries { points }
    }

    /// Resolves a display position to the ID of the transaction shown there
    fn id_at(&self, index: usize) -> Result<TransactionId, Error> {
        self.log.id_at(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.log.len(),
        })
    }

    /// Rebuilds the totals from the full transaction sequence
    fn recompute(&mut self) {
        self.summary = summarize(&self.log);
    }
}

impl TransactionLog for MemoryTransactionLog {
    fn transaction(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.positions
            .get(&transaction_id)
            .and_then(|&position| self.transactions.get(position))
    }

    fn id_at(&self, index: usize) -> Option<TransactionId> {
        self.transactions.get(index).map(|transaction| transaction.id)
    }

    fn register(&mut self, transaction: Transaction) -> Result<(), Error> {
        if self.positions.contains_key(&transaction.id) {
            return Err(Error::Duplicate(transaction.id));
        }
        self.positions
            .insert(transaction.id, self.transactions.len());
        self.transactions.push(transaction);
        Ok(())
    }

    fn remove(&mut self, transaction_id: TransactionId) -> Result<Transaction, Error> {
        let position = self
            .positions
            .remove(&transaction_id)
            .ok_or(Error::NotFound(transaction_id))?;
        let removed = self.transactions.remove(position);
        for (offset, shifted) in self.transactions[position..].iter().enumerate() {
            self.positions.insert(shifted.id, position + offset);
        }
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.transactions.len()
    }
}

impl<'a> IntoIterator for &'a MemoryTransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
