//! Error types for the fee portal.
//!
//! [`PortalError`] is the one error type crossing the crate boundary;
//! domain validation errors convert into it so services can use `?`
//! throughout. Lookups that simply find nothing are not errors; they
//! return `Ok(None)` or `Ok(false)`.

use std::path::PathBuf;

use crate::domain::models::fee_schedule::ScheduleValidationError;
use crate::domain::models::ledger::EntryValidationError;
use crate::domain::models::parent::ParentValidationError;
use crate::domain::models::payment_request::RequestValidationError;
use crate::domain::models::student::StudentValidationError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PortalError>;

/// Anything that can go wrong inside the portal.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// A store file exists but cannot be parsed. Distinct from a missing
    /// file, which reads as an empty store.
    #[error("corrupt store file {}: {detail}", path.display())]
    CorruptStore { path: PathBuf, detail: String },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fee ledger error: {0}")]
    Ledger(#[from] csv::Error),

    #[error("invalid student: {0}")]
    InvalidStudent(#[from] StudentValidationError),

    #[error("invalid fee schedule: {0}")]
    InvalidSchedule(#[from] ScheduleValidationError),

    #[error("invalid ledger entry: {0}")]
    InvalidEntry(#[from] EntryValidationError),

    #[error("invalid payment request: {0}")]
    InvalidRequest(#[from] RequestValidationError),

    #[error("invalid parent account: {0}")]
    InvalidParent(#[from] ParentValidationError),
}

impl PortalError {
    /// Build a [`PortalError::CorruptStore`] from any displayable cause.
    pub fn corrupt(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        PortalError::CorruptStore {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}
