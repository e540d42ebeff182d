use thiserror::Error;

use crate::domain::{Cents, LoanId, MAX_CENTS, ParseCentsError, format_cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors caused by bad input, which never change ledger state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidAmount(_) | AppError::EmptyField(_) | AppError::LoanNotFound(_)
        )
    }

    pub(crate) fn amount_too_large(amount: Cents) -> Self {
        AppError::InvalidAmount(format!(
            "{} exceeds the maximum of {}",
            format_cents(amount),
            format_cents(MAX_CENTS)
        ))
    }
}

impl From<ParseCentsError> for AppError {
    fn from(err: ParseCentsError) -> Self {
        AppError::InvalidAmount(err.to_string())
    }
}
