//! Domain model for a student enrolled at the school.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student as the portal knows them. Every other store keys off the ID
/// minted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier
    pub id: String,

    /// Full name as it appears on the admission record
    pub name: String,

    /// Class or grade label, e.g. "Class 5"
    pub class: String,

    /// Guardian responsible for fee payments
    pub guardian_name: String,

    /// Contact phone number
    pub phone: String,

    /// When this record was created
    pub created_at: DateTime<Utc>,

    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Generate a unique student ID.
    /// Format: std-{timestamp_millis}-{suffix}, e.g. "std-1755950400123-9f2a"
    pub fn generate_id(timestamp_millis: i64) -> String {
        format!("std-{}-{}", timestamp_millis, super::id_suffix(4))
    }
}

/// Validation errors that can occur when registering a student.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StudentValidationError {
    #[error("Student name cannot be empty")]
    EmptyName,

    #[error("Student name cannot exceed 100 characters")]
    NameTooLong,

    #[error("Class cannot be empty")]
    EmptyClass,
}
