//! Helpers for loading form submissions and outputting reports

use std::io::{Read, Write};

use csv::Trim;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    errors::Error,
    types::{
        format_money, Category, ChartPoint, ChartSeries, Ledger, Summary, Transaction,
        TransactionId, TransactionInput, TransactionLog, TransactionType,
    },
};

/// Type used for deserializing a form submission.
///
/// Every column is optional so that short rows and empty cells fall back to the form
/// defaults instead of failing the load.
#[derive(Deserialize, Debug)]
struct SubmissionRow {
    name: Option<String>,
    #[serde(deserialize_with = "rust_decimal::serde::str_option::deserialize")]
    amount: Option<Decimal>,
    #[serde(rename = "type")]
    transaction_type: Option<TransactionType>,
    category: Option<Category>,
}

impl From<SubmissionRow> for TransactionInput {
    fn from(row: SubmissionRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            amount: row.amount,
            transaction_type: row.transaction_type.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
        }
    }
}

/// Loads form submissions from a CSV-formatted stream and submits each one to the ledger.
///
/// Each row replaces the ledger's pending input and is then submitted. Rows missing a name
/// or amount are logged and skipped, the way a dismissed alert leaves the form as it was.
/// Returns the number of transactions that were added.
///
/// Expects input data in this format (including header); trailing columns may be omitted,
/// in which case the form defaults (`expense`, `Food`) apply:
/// ```csv
/// name,       amount,  type,     category
/// Salary,       1000,  income,   Misc
/// Groceries,     200,  expense,  Food
/// Coffee,       4.50
/// ```
pub fn load_transactions_from_csv<R, L>(
    reader: &mut R,
    ledger: &mut Ledger<L>,
) -> Result<usize, Error>
where
    R: Read,
    L: TransactionLog,
    for<'a> &'a L: IntoIterator<Item = &'a Transaction>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut added = 0;
    for (line, record) in csv_reader.deserialize().enumerate() {
        let row: SubmissionRow = record?;
        *ledger.pending_mut() = row.into();
        match ledger.submit() {
            Ok(_) => added += 1,
            Err(Error::InvalidInput) => warn!(row = line + 1, "skipping incomplete submission"),
            Err(err) => return Err(err),
        }
    }
    info!(added, total = ledger.len(), "loaded transactions");
    Ok(added)
}

/// Type used for serializing a [`Summary`], including the derived balance.
#[derive(Serialize, Debug)]
struct SummaryRow {
    /// Income minus expenses
    balance: String,
    /// Sum of income amounts
    income: String,
    /// Sum of expense amounts
    expenses: String,
}

impl From<&Summary> for SummaryRow {
    fn from(summary: &Summary) -> Self {
        Self {
            balance: format_money(summary.balance()),
            income: format_money(summary.income()),
            expenses: format_money(summary.expenses()),
        }
    }
}

/// Outputs the summary panel to CSV.
///
/// Output data will be in the form:
/// ```csv
/// balance,income,expenses
/// $800,$1000,$200
/// ```
pub fn write_summary_csv<W>(writer: &mut W, summary: &Summary) -> Result<(), Error>
where
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.serialize(SummaryRow::from(summary))?;
    csv_writer.flush()?;
    Ok(())
}

/// Type used for serializing a row of the transaction list
#[derive(Serialize, Debug)]
struct TransactionRow<'a> {
    id: TransactionId,
    date: String,
    name: &'a str,
    category: Category,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    /// Signed amount, e.g. `+$1000`
    amount: String,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            id: transaction.id(),
            date: transaction.display_timestamp(),
            name: transaction.name(),
            category: transaction.category(),
            transaction_type: transaction.transaction_type(),
            amount: transaction.display_amount(),
        }
    }
}

/// Outputs the transaction list to CSV, in display order.
///
/// Output data will be in the form:
/// ```csv
/// id,date,name,category,type,amount
/// 0,"10/16/2026, 9:34:00 AM",Salary,Misc,income,+$1000
/// 1,"10/16/2026, 9:35:12 AM",Groceries,Food,expense,-$200
/// ```
pub fn write_transactions_csv<'a, W, I>(writer: &mut W, transactions: I) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for transaction in transactions {
        csv_writer.serialize(TransactionRow::from(transaction))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Type used for serializing a single pie slice
#[derive(Serialize, Debug)]
struct ChartRow {
    category: &'static str,
    value: Decimal,
    fill: &'static str,
    hover: &'static str,
}

impl From<&ChartPoint> for ChartRow {
    fn from(point: &ChartPoint) -> Self {
        Self {
            category: point.style.label,
            value: point.value.normalize(),
            fill: point.style.fill,
            hover: point.style.hover,
        }
    }
}

/// Outputs the expense chart series to CSV, one row per category in table order.
///
/// Output data will be in the form:
/// ```csv
/// category,value,fill,hover
/// Food,200,#FF6384,#FF4D6A
/// Fun,0,#36A2EB,#33A1D3
/// ```
pub fn write_chart_csv<W>(writer: &mut W, series: &ChartSeries) -> Result<(), Error>
where
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in series.points() {
        csv_writer.serialize(ChartRow::from(point))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use csv::StringRecord;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_INPUT_CSV: &[u8] = b"name,       amount,  type,     category
Salary,       1000,  income,   Misc
Groceries,     200,  expense,  Food
Coffee,       4.50
,               30,  expense,  Fun
Nothing,         0,  expense,  Fun
No amount,        ,  expense,  Fun
Bus,            60,  expense,  Transport
";

    fn loaded_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let mut cursor = Cursor::new(TEST_INPUT_CSV);
        let added = load_transactions_from_csv(&mut cursor, &mut ledger).unwrap();
        assert_eq!(added, 4);
        ledger
    }

    #[test]
    fn test_read_with_whitespace_and_missing_columns() {
        let ledger = loaded_ledger();
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.summary().income(), dec!(1000));
        assert_eq!(ledger.summary().expenses(), dec!(264.50));
        let coffee = ledger.transactions().nth(2).unwrap();
        assert_eq!(coffee.name(), "Coffee");
        assert_eq!(coffee.transaction_type(), TransactionType::Expense);
        assert_eq!(coffee.category(), Category::Food);
        assert_eq!(ledger.category_totals()[0].total, dec!(204.50));
    }

    #[test]
    fn test_empty_cells_fall_back_to_form_defaults() {
        let mut ledger = Ledger::new();
        let mut cursor = Cursor::new(
            b"name,amount,type,category\nCoffee,4.50,,\nTaxi,18\nRefund,12,income,\n",
        );
        let added = load_transactions_from_csv(&mut cursor, &mut ledger).unwrap();
        assert_eq!(added, 3);
        let rows: Vec<_> = ledger
            .transactions()
            .map(|transaction| {
                (
                    transaction.name(),
                    transaction.transaction_type(),
                    transaction.category(),
                )
            })
            .collect();
        assert_eq!(
            rows,
            [
                ("Coffee", TransactionType::Expense, Category::Food),
                ("Taxi", TransactionType::Expense, Category::Food),
                ("Refund", TransactionType::Income, Category::Food),
            ]
        );
        assert_eq!(ledger.summary().expenses(), dec!(22.50));
        assert_eq!(ledger.summary().income(), dec!(12));
    }

    #[test]
    fn test_unparseable_row_aborts_load() {
        let mut ledger = Ledger::new();
        let mut cursor = Cursor::new(b"name,amount,type,category\nRent,lots,expense,Rent\n");
        assert!(matches!(
            load_transactions_from_csv(&mut cursor, &mut ledger),
            Err(Error::Load(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_write_summary() {
        let ledger = loaded_ledger();
        let mut output = vec![];
        write_summary_csv(&mut output, &ledger.summary()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "balance,income,expenses\n$735.5,$1000,$264.5\n"
        );
    }

    #[test]
    fn test_write_transactions() {
        let ledger = loaded_ledger();
        let mut output = vec![];
        write_transactions_csv(&mut output, ledger.transactions()).unwrap();

        // Timestamps depend on the clock, so only the other columns are compared.
        let mut csv_reader = csv::Reader::from_reader(Cursor::new(&output));
        let mut record = StringRecord::new();
        let mut rows = vec![];
        while csv_reader.read_record(&mut record).unwrap() {
            rows.push(
                [0, 2, 3, 4, 5]
                    .iter()
                    .map(|&column| record.get(column).unwrap().to_owned())
                    .collect::<Vec<_>>(),
            );
        }
        assert_eq!(
            rows,
            [
                ["0", "Salary", "Misc", "income", "+$1000"],
                ["1", "Groceries", "Food", "expense", "-$200"],
                ["2", "Coffee", "Food", "expense", "-$4.5"],
                ["3", "Bus", "Transport", "expense", "-$60"],
            ]
        );
    }

    #[test]
    fn test_write_chart() {
        let ledger = loaded_ledger();
        let mut output = vec![];
        write_chart_csv(&mut output, &ledger.chart_series()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "category,value,fill,hover
Food,204.5,#FF6384,#FF4D6A
Fun,0,#36A2EB,#33A1D3
Rent,0,#FFCE56,#FFB547
Utilities,0,#4BC0C0,#48B8B2
Transport,60,#F7464A,#F83C57
Health,0,#8E44AD,#9B59B6
Misc,0,#E74C3C,#C0392B
"
        );
    }
}
