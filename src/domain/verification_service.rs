//! Verification workflow for parent payment requests.
//!
//! Pending requests either verify (and post into the fee ledger) or
//! reject; both outcomes are terminal. Checks match by request ID or
//! gateway transaction reference and only ever touch the first pending
//! request in store order, so a duplicated reference settles one request
//! at a time.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::calendar::academic_year_label;
use crate::domain::commands::verification::{
    RejectPaymentCommand, VerificationStats, VerifyPaymentCommand,
};
use crate::domain::models::ledger::LedgerEntry;
use crate::domain::models::payment_request::{FeeCategory, PaymentRequest, RequestStatus};
use crate::error::Result;
use crate::storage::{Connection, LedgerStorage, PaymentRequestStorage};

const DEFAULT_REJECTION_REASON: &str = "Manual rejection by admin";

/// Service for settling pending payment requests.
#[derive(Clone)]
pub struct VerificationService<C: Connection> {
    request_repository: C::RequestRepository,
    ledger_repository: C::LedgerRepository,
}

impl<C: Connection> VerificationService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            request_repository: connection.create_request_repository(),
            ledger_repository: connection.create_ledger_repository(),
        }
    }

    /// Verify the first pending request matching `reference` and post its
    /// money into the fee ledger.
    ///
    /// Returns false when nothing matches; verifying an already-settled
    /// reference is a no-op, not an error.
    pub fn verify_payment(&self, command: VerifyPaymentCommand) -> Result<bool> {
        let target = match self.find_pending(&command.reference)? {
            Some(request) => request,
            None => {
                warn!(
                    "No pending payment request matches '{}', nothing to verify",
                    command.reference
                );
                return Ok(false);
            }
        };

        let now = Utc::now();
        let mut verified = target;
        verified.status = RequestStatus::Verified;
        verified.reviewed_by = Some(command.admin);
        verified.reviewed_at = Some(now);
        self.request_repository.update_request(&verified)?;

        self.post_to_ledger(&verified, now)?;
        info!(
            "Verified payment request {} for student {} ({})",
            verified.id, verified.student_id, verified.amount
        );
        Ok(true)
    }

    /// Reject the first pending request matching `reference`. Returns
    /// false when nothing matches.
    pub fn reject_payment(&self, command: RejectPaymentCommand) -> Result<bool> {
        let target = match self.find_pending(&command.reference)? {
            Some(request) => request,
            None => {
                warn!(
                    "No pending payment request matches '{}', nothing to reject",
                    command.reference
                );
                return Ok(false);
            }
        };

        let mut rejected = target;
        rejected.status = RequestStatus::Rejected;
        rejected.reviewed_by = Some(command.admin);
        rejected.reviewed_at = Some(Utc::now());
        rejected.rejection_reason =
            Some(command.reason.unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string()));
        self.request_repository.update_request(&rejected)?;

        info!(
            "Rejected payment request {} for student {}",
            rejected.id, rejected.student_id
        );
        Ok(true)
    }

    /// Workload counters over every request on file.
    pub fn compute_stats(&self) -> Result<VerificationStats> {
        let requests = self.request_repository.list_all_requests()?;
        let mut stats = VerificationStats::default();
        for request in &requests {
            match request.status {
                RequestStatus::Pending => {
                    stats.pending_count += 1;
                    stats.pending_amount += request.amount;
                }
                RequestStatus::Verified => {
                    stats.verified_count += 1;
                    stats.verified_amount += request.amount;
                }
                RequestStatus::Rejected => {
                    stats.rejected_count += 1;
                }
            }
        }
        Ok(stats)
    }

    fn find_pending(&self, reference: &str) -> Result<Option<PaymentRequest>> {
        let requests = self.request_repository.list_all_requests()?;
        Ok(requests.into_iter().find(|r| {
            r.status == RequestStatus::Pending
                && (r.id == reference || r.transaction_ref == reference)
        }))
    }

    /// Post a verified request into the fee ledger. A monthly amount
    /// splits evenly across the selected months, one row each; other
    /// categories land as a single row.
    fn post_to_ledger(&self, request: &PaymentRequest, reviewed_at: DateTime<Utc>) -> Result<()> {
        let date = reviewed_at.date_naive();
        let academic_year = academic_year_label(date);
        let remarks = format!("Parent payment via request {}", request.id);

        let blank_row = LedgerEntry {
            student_id: request.student_id.clone(),
            month: None,
            monthly_fee: 0.0,
            annual_charges: 0.0,
            admission_fee: 0.0,
            received_amount: request.amount,
            payment_method: request.payment_method.clone(),
            date,
            academic_year,
            reference: request.transaction_ref.clone(),
            remarks,
            entered_at: reviewed_at,
        };

        match request.category {
            FeeCategory::Monthly if !request.months.is_empty() => {
                let per_month = request.amount / request.months.len() as f64;
                for month in &request.months {
                    let mut row = blank_row.clone();
                    row.month = Some(*month);
                    row.monthly_fee = per_month;
                    row.received_amount = per_month;
                    self.ledger_repository.append_entry(&row)?;
                }
            }
            FeeCategory::Monthly => {
                warn!(
                    "Monthly request {} names no months, posting a single row",
                    request.id
                );
                self.ledger_repository.append_entry(&blank_row)?;
            }
            FeeCategory::Annual => {
                let mut row = blank_row;
                row.annual_charges = request.amount;
                self.ledger_repository.append_entry(&row)?;
            }
            FeeCategory::Admission => {
                let mut row = blank_row;
                row.admission_fee = request.amount;
                self.ledger_repository.append_entry(&row)?;
            }
            FeeCategory::Other => {
                self.ledger_repository.append_entry(&blank_row)?;
            }
        }
        Ok(())
    }
}
