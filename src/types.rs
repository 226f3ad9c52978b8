//! Common datatypes supporting functions throughout the tracker

use std::{collections::HashMap, fmt::Display};

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::Error, ops};

/// `chrono` format used when displaying a transaction's timestamp, e.g. `10/16/2026, 9:34:00 AM`
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Renders an amount as a currency-like string: a `$` followed by the plain decimal value.
///
/// No locale formatting is applied, so a negative balance renders as `$-200`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${}", amount.normalize())
}

/// Unique identifier for a transaction.
///
/// Identifiers are handed out by the [`Ledger`] in increasing order and are never reused,
/// so they stay valid while other transactions are deleted around them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub(crate) u64);

impl From<u64> for TransactionId {
    fn from(transaction_id: u64) -> Self {
        Self(transaction_id)
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id[{}]", self.0)
    }
}

/// Whether money came in or went out
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received; counts towards the income total
    Income,
    /// Money spent; counts towards the expense total and the category breakdown
    #[default]
    Expense,
}

impl TransactionType {
    /// The sign shown in front of the amount in the transaction list
    #[must_use]
    pub fn sign(self) -> char {
        match self {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// The fixed set of expense classifications used for the chart breakdown.
///
/// The declaration order here must match [`CATEGORY_TABLE`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    /// Groceries, restaurants and takeaway
    #[default]
    Food,
    /// Entertainment and hobbies
    Fun,
    /// Housing
    Rent,
    /// Power, water, internet and phone
    Utilities,
    /// Fuel, fares and parking
    Transport,
    /// Medical and fitness
    Health,
    /// Anything else
    Misc,
}

/// Presentation data for a [`Category`]: its label and the pair of chart colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    /// The category this row describes
    pub category: Category,
    /// Label shown in forms, lists and chart legends
    pub label: &'static str,
    /// Pie slice fill color
    pub fill: &'static str,
    /// Pie slice color while hovered
    pub hover: &'static str,
}

/// Every category in display order, with its paired fill and hover colors.
pub const CATEGORY_TABLE: [CategoryStyle; 7] = [
    CategoryStyle {
        category: Category::Food,
        label: "Food",
        fill: "#FF6384",
        hover: "#FF4D6A",
    },
    CategoryStyle {
        category: Category::Fun,
        label: "Fun",
        fill: "#36A2EB",
        hover: "#33A1D3",
    },
    CategoryStyle {
        category: Category::Rent,
        label: "Rent",
        fill: "#FFCE56",
        hover: "#FFB547",
    },
    CategoryStyle {
        category: Category::Utilities,
        label: "Utilities",
        fill: "#4BC0C0",
        hover: "#48B8B2",
    },
    CategoryStyle {
        category: Category::Transport,
        label: "Transport",
        fill: "#F7464A",
        hover: "#F83C57",
    },
    CategoryStyle {
        category: Category::Health,
        label: "Health",
        fill: "#8E44AD",
        hover: "#9B59B6",
    },
    CategoryStyle {
        category: Category::Misc,
        label: "Misc",
        fill: "#E74C3C",
        hover: "#C0392B",
    },
];

impl Category {
    /// Iterates over every category in table order
    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORY_TABLE.iter().map(|style| style.category)
    }

    /// Returns this category's row in [`CATEGORY_TABLE`]
    #[must_use]
    #[inline]
    pub fn style(self) -> &'static CategoryStyle {
        &CATEGORY_TABLE[self as usize]
    }

    /// Returns the display label
    #[must_use]
    #[inline]
    pub fn label(self) -> &'static str {
        self.style().label
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A recorded transaction. Once added to a [`Ledger`] it is never modified.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub(crate) id: TransactionId,
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    pub(crate) transaction_type: TransactionType,
    pub(crate) category: Category,
    /// Creation time, captured when the transaction was added
    pub(crate) timestamp: DateTime<Local>,
}

impl Transaction {
    /// Returns the unique identifier of the transaction
    #[must_use]
    #[inline]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the name entered for the transaction
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the amount
    #[must_use]
    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns whether this is income or an expense
    #[must_use]
    #[inline]
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Returns the category
    #[must_use]
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the creation time
    #[must_use]
    #[inline]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Returns the creation time formatted with [`TIMESTAMP_FORMAT`]
    #[must_use]
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Returns the amount as shown in the transaction list, e.g. `+$1000` or `-$200`
    #[must_use]
    pub fn display_amount(&self) -> String {
        format!(
            "{}{}",
            self.transaction_type.sign(),
            format_money(self.amount)
        )
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({}): {}",
            self.display_timestamp(),
            self.name,
            self.category,
            self.display_amount()
        )
    }
}

/// The pending state of the input form: what the next submitted transaction will contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    /// Name of the transaction; must not be empty
    pub name: String,
    /// Amount of the transaction; must be present and non-zero
    pub amount: Option<Decimal>,
    /// Income or expense
    pub transaction_type: TransactionType,
    /// Category of the transaction
    pub category: Category,
}

impl TransactionInput {
    /// Creates a fully populated input
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        transaction_type: TransactionType,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            amount: Some(amount),
            transaction_type,
            category,
        }
    }
}

impl From<Transaction> for TransactionInput {
    fn from(transaction: Transaction) -> Self {
        Self {
            name: transaction.name,
            amount: Some(transaction.amount),
            transaction_type: transaction.transaction_type,
            category: transaction.category,
        }
    }
}

/// Totals derived from the ledger's transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
}

impl Summary {
    /// Returns the sum of all income amounts
    #[must_use]
    #[inline]
    pub fn income(&self) -> Decimal {
        self.income
    }

    /// Returns the sum of all expense amounts
    #[must_use]
    #[inline]
    pub fn expenses(&self) -> Decimal {
        self.expenses
    }

    /// Returns income minus expenses
    #[must_use]
    #[inline]
    pub fn balance(&self) -> Decimal {
        self.income - self.expenses
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Balance: {}  Income: {}  Expenses: {}",
            format_money(self.balance()),
            format_money(self.income),
            format_money(self.expenses)
        )
    }
}

/// Sum of expense amounts for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The category being summed
    pub category: Category,
    /// Sum of expense amounts in that category; zero if there are none
    pub total: Decimal,
}

/// A single pie slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    /// Category and colors of the slice
    pub style: &'static CategoryStyle,
    /// Size of the slice
    pub value: Decimal,
}

/// Chart-ready breakdown of expenses, one point per category in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub(crate) points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Returns the slices in table order
    #[must_use]
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// Returns the slice labels
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.points.iter().map(|point| point.style.label).collect()
    }

    /// Returns the slice values
    #[must_use]
    pub fn data(&self) -> Vec<Decimal> {
        self.points.iter().map(|point| point.value).collect()
    }

    /// Returns the fill colors, order-matched with [`ChartSeries::data`]
    #[must_use]
    pub fn background_colors(&self) -> Vec<&'static str> {
        self.points.iter().map(|point| point.style.fill).collect()
    }

    /// Returns the hover colors, order-matched with [`ChartSeries::data`]
    #[must_use]
    pub fn hover_background_colors(&self) -> Vec<&'static str> {
        self.points.iter().map(|point| point.style.hover).collect()
    }
}

/// An interface to the ordered store of transactions
pub trait TransactionLog
where
    for<'a> &'a Self: IntoIterator<Item = &'a Transaction>,
{
    /// Fetches a transaction by ID, if one exists
    fn transaction(&self, transaction_id: TransactionId) -> Option<&Transaction>;

    /// Returns the ID of the transaction at a display position
    fn id_at(&self, index: usize) -> Option<TransactionId>;

    /// Appends a transaction to the end of the log
    fn register(&mut self, transaction: Transaction) -> Result<(), Error>;

    /// Removes a transaction, shifting later transactions up one position
    fn remove(&mut self, transaction_id: TransactionId) -> Result<Transaction, Error>;

    /// Returns the number of transactions in the log
    fn len(&self) -> usize;

    /// Returns whether the log holds no transactions
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds all transactions in an in-memory structure.
///
/// # Limitations
/// No persistence.
///
/// Only a single operation is allowed on the entire log
/// at any given time.
#[derive(Default, Debug, Clone)]
pub struct MemoryTransactionLog {
    /// Transactions in display order
    pub(crate) transactions: Vec<Transaction>,
    /// Position of each transaction in `transactions`
    pub(crate) positions: HashMap<TransactionId, usize>,
}

impl MemoryTransactionLog {
    /// Creates a new, empty [`MemoryTransactionLog`]
    #[must_use]
    pub fn new() -> Self {
        MemoryTransactionLog::default()
    }
}

/// The transaction ledger: the stored transactions, the totals derived from them,
/// and the pending form input.
///
/// Totals are recomputed from the full transaction sequence after every mutation.
#[derive(Debug, Clone)]
pub struct Ledger<L = MemoryTransactionLog> {
    pub(crate) log: L,
    pub(crate) pending: TransactionInput,
    pub(crate) summary: Summary,
    pub(crate) next_id: u64,
}

impl Ledger<MemoryTransactionLog> {
    /// Creates a new, empty ledger backed by a [`MemoryTransactionLog`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_log(MemoryTransactionLog::new())
    }
}

impl Default for Ledger<MemoryTransactionLog> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Ledger<L>
where
    L: TransactionLog,
    for<'a> &'a L: IntoIterator<Item = &'a Transaction>,
{
    /// Creates a ledger over an existing log. Totals are computed from its contents and
    /// new identifiers continue after the highest one already present.
    ///
    /// A log already holding `u64::MAX` as an ID leaves no identifiers to hand out, and
    /// every later [`Ledger::add`] fails with [`Error::IdsExhausted`].
    pub fn with_log(log: L) -> Self {
        let summary = ops::summarize(&log);
        let next_id = (&log)
            .into_iter()
            .map(|transaction| transaction.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            log,
            pending: TransactionInput::default(),
            summary,
            next_id,
        }
    }

    /// Returns the current totals
    #[must_use]
    #[inline]
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Iterates over the transactions in display order
    pub fn transactions<'a>(&'a self) -> <&'a L as IntoIterator>::IntoIter {
        (&self.log).into_iter()
    }

    /// Fetches a transaction by ID
    #[must_use]
    pub fn transaction(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.log.transaction(transaction_id)
    }

    /// Returns the number of transactions
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns whether the ledger holds no transactions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Returns the pending form input
    #[must_use]
    #[inline]
    pub fn pending(&self) -> &TransactionInput {
        &self.pending
    }

    /// Returns the pending form input for modification
    #[inline]
    pub fn pending_mut(&mut self) -> &mut TransactionInput {
        &mut self.pending
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_category_table_matches_declaration_order() {
        for (index, style) in CATEGORY_TABLE.iter().enumerate() {
            assert_eq!(style.category as usize, index);
            assert_eq!(style.category.style(), style);
        }
        let labels: Vec<_> = Category::all().map(Category::label).collect();
        assert_eq!(
            labels,
            ["Food", "Fun", "Rent", "Utilities", "Transport", "Health", "Misc"]
        );
    }

    #[test]
    fn test_form_defaults() {
        let input = TransactionInput::default();
        assert_eq!(input.name, "");
        assert_eq!(input.amount, None);
        assert_eq!(input.transaction_type, TransactionType::Expense);
        assert_eq!(input.category, Category::Food);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(800)), "$800");
        assert_eq!(format_money(dec!(-200)), "$-200");
        assert_eq!(format_money(dec!(12.50)), "$12.5");
    }

    #[test]
    fn test_summary_balance() {
        let summary = Summary {
            income: dec!(1000),
            expenses: dec!(1200),
        };
        assert_eq!(summary.balance(), dec!(-200));
        assert_eq!(
            summary.to_string(),
            "Balance: $-200  Income: $1000  Expenses: $1200"
        );
    }

    #[test]
    fn test_transaction_display_amount() {
        let transaction = Transaction {
            id: 3.into(),
            name: "Salary".into(),
            amount: dec!(1000),
            transaction_type: TransactionType::Income,
            category: Category::Misc,
            timestamp: Local::now(),
        };
        assert_eq!(transaction.display_amount(), "+$1000");
        assert!(transaction
            .to_string()
            .ends_with(" - Salary (Misc): +$1000"));
        let input = TransactionInput::from(transaction);
        assert_eq!(
            input,
            TransactionInput::new("Salary", dec!(1000), TransactionType::Income, Category::Misc)
        );
    }

    #[test]
    fn test_display_timestamp() {
        let mut transaction = Transaction {
            id: 0.into(),
            name: "Groceries".into(),
            amount: dec!(200),
            transaction_type: TransactionType::Expense,
            category: Category::Food,
            timestamp: Local.with_ymd_and_hms(2026, 10, 16, 9, 34, 0).unwrap(),
        };
        assert_eq!(transaction.display_timestamp(), "10/16/2026, 9:34:00 AM");
        assert_eq!(
            transaction.to_string(),
            "10/16/2026, 9:34:00 AM - Groceries (Food): -$200"
        );
        transaction.timestamp = Local.with_ymd_and_hms(2026, 3, 5, 21, 5, 7).unwrap();
        assert_eq!(transaction.display_timestamp(), "3/5/2026, 9:05:07 PM");
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.summary(), Summary::default());
        assert_eq!(ledger.transactions().count(), 0);
    }
}
