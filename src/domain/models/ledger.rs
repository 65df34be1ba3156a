//! Domain model for fee ledger rows.
//!
//! The ledger is the system of record for money: every admin counter entry
//! and every verified parent payment lands here as one or more rows, and
//! summaries, month status, and history are all read back out of it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::AcademicMonth;

/// How a payment was made.
///
/// Stored and displayed as its label; anything the portal does not
/// recognize round-trips through [`PaymentMethod::Other`] untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    JazzCash,
    EasyPaisa,
    Card,
    Other(String),
}

impl PaymentMethod {
    /// Display label, also the stored form.
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::JazzCash => "JazzCash",
            PaymentMethod::EasyPaisa => "EasyPaisa",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Other(name) => name,
        }
    }

    /// Parse a stored or user-supplied method name. Unknown names are kept
    /// as-is rather than rejected; an empty name means cash at the counter.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "cash" => PaymentMethod::Cash,
            "bank transfer" | "bank" => PaymentMethod::BankTransfer,
            "jazzcash" | "jazz cash" => PaymentMethod::JazzCash,
            "easypaisa" | "easy paisa" => PaymentMethod::EasyPaisa,
            "credit/debit card" | "card" => PaymentMethod::Card,
            _ => PaymentMethod::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        PaymentMethod::parse(&value)
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.label().to_string()
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the fee ledger.
///
/// A row can carry dues (the fee columns), money received, or both. A row
/// only counts as a payment when `received_amount` is above zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Student the row belongs to
    pub student_id: String,

    /// Academic month the monthly-fee portion applies to, if any
    pub month: Option<AcademicMonth>,

    /// Monthly fee amount charged on this row
    pub monthly_fee: f64,

    /// Annual charges amount on this row
    pub annual_charges: f64,

    /// Admission fee amount on this row
    pub admission_fee: f64,

    /// Money actually received with this row
    pub received_amount: f64,

    /// How the money arrived
    pub payment_method: PaymentMethod,

    /// Value date of the row
    pub date: NaiveDate,

    /// Academic year label the row belongs to, e.g. "2025-2026"
    pub academic_year: String,

    /// Receipt number or gateway transaction reference
    pub reference: String,

    /// Free-text remarks
    pub remarks: String,

    /// When the row was entered into the ledger
    pub entered_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// True when the row records money actually arriving, as opposed to a
    /// dues-only line.
    pub fn is_payment(&self) -> bool {
        self.received_amount > 0.0
    }
}

/// One line of a student's payment history, derived from ledger rows where
/// money changed hands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub month: Option<AcademicMonth>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub reference: String,
    pub remarks: String,
}

/// Validation errors for hand-entered ledger rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryValidationError {
    #[error("Student ID cannot be empty")]
    EmptyStudentId,

    #[error("Fee amounts cannot be negative")]
    NegativeFeeAmount,

    #[error("Received amount cannot be negative")]
    NegativeReceivedAmount,

    #[error("Unknown month: {0}")]
    UnknownMonth(String),
}
