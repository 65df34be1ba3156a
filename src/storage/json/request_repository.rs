//! # Payment request repository
//!
//! All payment requests live in a single `payment_requests.json` map of
//! student ID → list of requests, oldest first:
//!
//! ```json
//! {
//!   "std-001": [
//!     {
//!       "id": "req-1755950400123-af3c",
//!       "student_id": "std-001",
//!       "parent_email": "parent@example.com",
//!       "amount": 6000.0,
//!       "category": "monthly",
//!       "months": ["JUNE", "JULY"],
//!       "transaction_ref": "TXN-20250601-001",
//!       "status": "pending",
//!       "requested_at": "2025-06-01T10:00:00+00:00"
//!     }
//!   ]
//! }
//! ```
//!
//! Appends and updates rewrite the whole file atomically. A record that no
//! longer converts to the domain shape is skipped on read but preserved on
//! rewrite, so an odd record never gets dropped by an unrelated update.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::connection::JsonConnection;
use crate::domain::calendar::AcademicMonth;
use crate::domain::models::ledger::PaymentMethod;
use crate::domain::models::payment_request::{FeeCategory, PaymentRequest, RequestStatus};
use crate::error::Result;
use crate::storage::traits::PaymentRequestStorage;

const REQUESTS_FILE: &str = "payment_requests.json";

/// Stored form of a payment request, with string dates and labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RequestRecord {
    id: String,
    student_id: String,
    parent_email: String,
    parent_name: String,
    amount: f64,
    category: String,
    description: String,
    months: Vec<String>,
    payment_method: String,
    transaction_ref: String,
    status: String,
    requested_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reviewed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
}

impl From<&PaymentRequest> for RequestRecord {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            id: request.id.clone(),
            student_id: request.student_id.clone(),
            parent_email: request.parent_email.clone(),
            parent_name: request.parent_name.clone(),
            amount: request.amount,
            category: request.category.to_string(),
            description: request.description.clone(),
            months: request.months.iter().map(|m| m.label().to_string()).collect(),
            payment_method: request.payment_method.label().to_string(),
            transaction_ref: request.transaction_ref.clone(),
            status: request.status.to_string(),
            requested_at: request.requested_at.to_rfc3339(),
            reviewed_by: request.reviewed_by.clone(),
            reviewed_at: request.reviewed_at.map(|at| at.to_rfc3339()),
            rejection_reason: request.rejection_reason.clone(),
        }
    }
}

impl TryFrom<RequestRecord> for PaymentRequest {
    type Error = String;

    fn try_from(record: RequestRecord) -> std::result::Result<Self, Self::Error> {
        let category = FeeCategory::from_string(&record.category)?;
        let status = RequestStatus::from_string(&record.status)?;

        let mut months = Vec::new();
        for label in &record.months {
            match AcademicMonth::parse_label(label) {
                Some(month) => months.push(month),
                None => return Err(format!("Unknown month label: {}", label)),
            }
        }

        let requested_at = DateTime::parse_from_rfc3339(&record.requested_at)
            .map_err(|e| format!("Failed to parse requested_at: {}", e))?
            .with_timezone(&Utc);
        let reviewed_at = match &record.reviewed_at {
            Some(at) => Some(
                DateTime::parse_from_rfc3339(at)
                    .map_err(|e| format!("Failed to parse reviewed_at: {}", e))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(PaymentRequest {
            id: record.id,
            student_id: record.student_id,
            parent_email: record.parent_email,
            parent_name: record.parent_name,
            amount: record.amount,
            category,
            description: record.description,
            months,
            payment_method: PaymentMethod::parse(&record.payment_method),
            transaction_ref: record.transaction_ref,
            status,
            requested_at,
            reviewed_by: record.reviewed_by,
            reviewed_at,
            rejection_reason: record.rejection_reason,
        })
    }
}

/// Flat-file payment request repository over `payment_requests.json`.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    connection: JsonConnection,
}

impl RequestRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<BTreeMap<String, Vec<RequestRecord>>> {
        self.connection.read_map(REQUESTS_FILE)
    }

    fn write_records(&self, records: &BTreeMap<String, Vec<RequestRecord>>) -> Result<()> {
        self.connection.write_map(REQUESTS_FILE, records)
    }
}

impl PaymentRequestStorage for RequestRepository {
    fn append_request(&self, request: &PaymentRequest) -> Result<()> {
        let mut records = self.read_records()?;
        records
            .entry(request.student_id.clone())
            .or_default()
            .push(RequestRecord::from(request));
        self.write_records(&records)?;
        info!(
            "Stored payment request {} for student {}",
            request.id, request.student_id
        );
        Ok(())
    }

    fn list_requests_for_student(&self, student_id: &str) -> Result<Vec<PaymentRequest>> {
        let mut records = self.read_records()?;
        let mut requests = Vec::new();
        for record in records.remove(student_id).unwrap_or_default() {
            let id = record.id.clone();
            match PaymentRequest::try_from(record) {
                Ok(request) => requests.push(request),
                Err(e) => warn!("Skipping malformed payment request {}: {}", id, e),
            }
        }
        Ok(requests)
    }

    fn list_all_requests(&self) -> Result<Vec<PaymentRequest>> {
        let records = self.read_records()?;
        let mut requests = Vec::new();
        for record_list in records.into_values() {
            for record in record_list {
                let id = record.id.clone();
                match PaymentRequest::try_from(record) {
                    Ok(request) => requests.push(request),
                    Err(e) => warn!("Skipping malformed payment request {}: {}", id, e),
                }
            }
        }
        Ok(requests)
    }

    fn update_request(&self, request: &PaymentRequest) -> Result<bool> {
        let mut records = self.read_records()?;
        let mut found = false;

        for record_list in records.values_mut() {
            if let Some(slot) = record_list.iter_mut().find(|r| r.id == request.id) {
                *slot = RequestRecord::from(request);
                found = true;
                break;
            }
        }

        if found {
            self.write_records(&records)?;
            info!("Updated payment request {}", request.id);
        } else {
            warn!("No stored payment request with ID {}", request.id);
        }
        Ok(found)
    }
}
