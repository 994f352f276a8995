//! The module contains the errors the engine can throw.
//!
//! Validation errors are raised before anything reaches the database:
//!
//! - [`InvalidAmount`] for negative or unparseable amounts.
//! - [`InvalidCategory`] when a category does not belong to the record kind.
//! - [`InvalidDate`] for malformed months and Sunday attendance.
//! - [`InvalidField`] for blank required text.
//!
//! Store errors are [`KeyNotFound`] and [`Database`].
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidCategory`]: EngineError::InvalidCategory
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// `true` for failures caught before touching the store.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidCategory(_)
                | Self::InvalidDate(_)
                | Self::InvalidField(_)
                | Self::InvalidId(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
