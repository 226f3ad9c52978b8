#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Functions for loading form submissions and writing summary, list and chart reports
pub mod io;
/// Business logic for adding, editing and deleting transactions and deriving totals
mod ops;
/// Data types used throughout the tracker
pub mod types;
