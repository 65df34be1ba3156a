//! Domain model for parent portal accounts.
//!
//! The portal stores the account record and its student links; producing
//! and checking the password credential is the caller's concern, so the
//! hash is carried as an opaque string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a parent account can sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl AccountStatus {
    /// Convert to string for file storage
    pub fn to_string(&self) -> String {
        match self {
            AccountStatus::Active => "active".to_string(),
            AccountStatus::Disabled => "disabled".to_string(),
        }
    }

    /// Parse from stored string
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "disabled" => Ok(AccountStatus::Disabled),
            _ => Err(format!("Invalid account status: {}", s)),
        }
    }
}

/// A parent account and the students it is allowed to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentAccount {
    /// Account key, stored lowercase
    pub email: String,

    /// Parent's display name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Opaque password credential
    pub password_hash: String,

    /// Students this account is linked to
    pub student_ids: Vec<String>,

    /// Whether the account can sign in
    pub status: AccountStatus,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Validation errors that can occur when registering a parent account.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParentValidationError {
    #[error("A valid email address is required")]
    InvalidEmail,

    #[error("Parent name cannot be empty")]
    EmptyName,

    #[error("Email is already registered")]
    EmailAlreadyRegistered,
}
