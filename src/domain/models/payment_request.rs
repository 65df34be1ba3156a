//! Domain model for parent payment requests.
//!
//! A parent reports a payment they have already made; the request sits
//! pending until an admin verifies or rejects it. Verification is what
//! actually posts money into the fee ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::AcademicMonth;
use crate::domain::models::ledger::PaymentMethod;

/// Lifecycle state of a payment request. `Pending` moves to exactly one of
/// the other two states; both are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Verified,
    Rejected,
}

impl RequestStatus {
    /// Convert to string for file storage
    pub fn to_string(&self) -> String {
        match self {
            RequestStatus::Pending => "pending".to_string(),
            RequestStatus::Verified => "verified".to_string(),
            RequestStatus::Rejected => "rejected".to_string(),
        }
    }

    /// Parse from stored string
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "verified" => Ok(RequestStatus::Verified),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

/// What kind of fee the payment was for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeCategory {
    Monthly,
    Annual,
    Admission,
    Other,
}

impl FeeCategory {
    /// Convert to string for file storage
    pub fn to_string(&self) -> String {
        match self {
            FeeCategory::Monthly => "monthly".to_string(),
            FeeCategory::Annual => "annual".to_string(),
            FeeCategory::Admission => "admission".to_string(),
            FeeCategory::Other => "other".to_string(),
        }
    }

    /// Parse from stored string
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(FeeCategory::Monthly),
            "annual" => Ok(FeeCategory::Annual),
            "admission" => Ok(FeeCategory::Admission),
            "other" => Ok(FeeCategory::Other),
            _ => Err(format!("Invalid fee category: {}", s)),
        }
    }
}

/// A payment a parent reports having made, awaiting admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Unique request identifier
    pub id: String,

    /// Student the payment is for
    pub student_id: String,

    /// Account email of the parent who filed the request
    pub parent_email: String,

    /// Parent's display name at filing time
    pub parent_name: String,

    /// Amount the parent says they paid
    pub amount: f64,

    /// Fee category the amount covers
    pub category: FeeCategory,

    /// Human-readable line, e.g. "Monthly Fee - JUNE, JULY"
    pub description: String,

    /// Months covered, for monthly requests; empty otherwise
    pub months: Vec<AcademicMonth>,

    /// How the parent paid
    pub payment_method: PaymentMethod,

    /// Gateway or bank transaction reference the parent supplied
    pub transaction_ref: String,

    /// Where the request is in its lifecycle
    pub status: RequestStatus,

    /// When the request was filed
    pub requested_at: DateTime<Utc>,

    /// Admin who settled the request, once settled
    pub reviewed_by: Option<String>,

    /// When the request was settled
    pub reviewed_at: Option<DateTime<Utc>>,

    /// Why the request was rejected, when it was
    pub rejection_reason: Option<String>,
}

impl PaymentRequest {
    /// Generate a unique request ID.
    /// Format: req-{timestamp_millis}-{suffix}, e.g. "req-1755950400123-af3c"
    pub fn generate_id(timestamp_millis: i64) -> String {
        format!("req-{}-{}", timestamp_millis, super::id_suffix(4))
    }
}

/// Validation errors that can occur when submitting a payment request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestValidationError {
    #[error("Unknown fee category: {0}")]
    UnknownCategory(String),

    #[error("Unknown month: {0}")]
    UnknownMonth(String),

    #[error("A monthly fee request needs at least one month")]
    NoMonthsSelected,

    #[error("{0} is already paid")]
    MonthAlreadyPaid(AcademicMonth),

    #[error("{0} already has a pending payment request")]
    MonthAlreadyRequested(AcademicMonth),

    #[error("Annual charges are already paid for this academic year")]
    AnnualChargesAlreadyPaid,

    #[error("Admission fee is already paid")]
    AdmissionFeeAlreadyPaid,

    #[error("A transaction reference is required")]
    MissingTransactionRef,

    #[error("An amount is required for this fee category")]
    MissingAmount,

    #[error("Amount must be positive")]
    NonPositiveAmount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_roundtrip() {
        for status in [RequestStatus::Pending, RequestStatus::Verified, RequestStatus::Rejected] {
            let stored = status.to_string();
            assert_eq!(RequestStatus::from_string(&stored).unwrap(), status);
        }
        assert!(RequestStatus::from_string("settled").is_err());
    }

    #[test]
    fn test_category_string_roundtrip() {
        for category in [
            FeeCategory::Monthly,
            FeeCategory::Annual,
            FeeCategory::Admission,
            FeeCategory::Other,
        ] {
            let stored = category.to_string();
            assert_eq!(FeeCategory::from_string(&stored).unwrap(), category);
        }
        assert!(FeeCategory::from_string("tuition").is_err());
    }

    #[test]
    fn test_generate_id_format() {
        let id = PaymentRequest::generate_id(1755950400123);
        assert!(id.starts_with("req-1755950400123-"));
    }
}
