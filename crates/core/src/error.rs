use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by pure domain logic.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid answer option: {0}")]
    InvalidOption(String),

    #[error("invalid transaction type: {0}")]
    InvalidTransactionType(String),

    #[error("invalid transaction status: {0}")]
    InvalidTransactionStatus(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, CoreError>;
