use crate::types::TransactionId;

/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reading or writing CSV files; could wrap IO or parsing errors
    #[error("Error processing CSV")]
    Load(#[from] csv::Error),
    /// Error flushing output
    #[error("Error writing output")]
    Io(#[from] std::io::Error),
    /// A transaction was submitted without a name, or with an absent or zero amount.
    /// The ledger is left unchanged.
    #[error("Please provide a name and amount for the transaction.")]
    InvalidInput,
    /// A positional edit or delete referred to a row past the end of the ledger
    #[error("No transaction at position {index} (ledger holds {len})")]
    IndexOutOfRange {
        /// The position that was requested
        index: usize,
        /// The number of transactions in the ledger at the time
        len: usize,
    },
    /// An edit or delete referred to a [`TransactionId`] that is not in the ledger
    #[error("Transaction {0} not found")]
    NotFound(TransactionId),
    /// Every [`TransactionId`] up to `u64::MAX` has been handed out
    #[error("No transaction IDs left to assign")]
    IdsExhausted,
    /// Each [`TransactionId`] may only be registered once in a
    /// [`TransactionLog`](crate::types::TransactionLog).
    #[error("Attempt to re-register already registered transaction id {0}")]
    Duplicate(TransactionId),
}
