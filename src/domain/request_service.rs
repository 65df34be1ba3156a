//! Payment request intake: validation, amount derivation, and listings.
//!
//! A request claims fees the ledger does not already show as paid. Amounts
//! for scheduled categories always come from the fee schedule, never from
//! the caller, so a parent cannot under-report what a month costs.

use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::calendar::{academic_year_label, AcademicMonth, CalendarService};
use crate::domain::commands::requests::SubmitRequestCommand;
use crate::domain::models::ledger::PaymentMethod;
use crate::domain::models::payment_request::{
    FeeCategory, PaymentRequest, RequestStatus, RequestValidationError,
};
use crate::domain::schedule_service::ScheduleService;
use crate::error::Result;
use crate::storage::{Connection, PaymentRequestStorage};

/// Service for filing and listing payment requests.
#[derive(Clone)]
pub struct PaymentRequestService<C: Connection> {
    request_repository: C::RequestRepository,
    schedule_service: ScheduleService<C>,
    calendar_service: CalendarService<C>,
}

impl<C: Connection> PaymentRequestService<C> {
    pub fn new(
        connection: Arc<C>,
        schedule_service: ScheduleService<C>,
        calendar_service: CalendarService<C>,
    ) -> Self {
        Self {
            request_repository: connection.create_request_repository(),
            schedule_service,
            calendar_service,
        }
    }

    /// Validate and store a new payment request.
    ///
    /// Monthly requests must name at least one month that is neither paid
    /// nor already claimed by a pending request; their amount is the
    /// scheduled monthly fee times the number of months. Annual and
    /// admission requests take the scheduled amount and are refused once
    /// the ledger shows the fee paid. "Other" requests carry a caller
    /// amount and note.
    pub fn submit_request(&self, command: SubmitRequestCommand) -> Result<PaymentRequest> {
        let category = FeeCategory::from_string(&command.category)
            .map_err(|_| RequestValidationError::UnknownCategory(command.category.clone()))?;
        if command.transaction_ref.trim().is_empty() {
            return Err(RequestValidationError::MissingTransactionRef.into());
        }

        let academic_year = academic_year_label(Utc::now().date_naive());
        let schedule = self.schedule_service.fees_or_default(&command.student_id)?;

        let (amount, months, description) = match category {
            FeeCategory::Monthly => {
                let months = parse_months(&command.months)?;
                if months.is_empty() {
                    return Err(RequestValidationError::NoMonthsSelected.into());
                }
                for month in &months {
                    if self
                        .calendar_service
                        .month_paid(&command.student_id, &academic_year, *month)?
                    {
                        return Err(RequestValidationError::MonthAlreadyPaid(*month).into());
                    }
                }
                self.ensure_months_not_claimed(&command.student_id, &months)?;

                let amount = schedule.monthly_fee * months.len() as f64;
                let labels: Vec<&str> = months.iter().map(|m| m.label()).collect();
                (amount, months, format!("Monthly Fee - {}", labels.join(", ")))
            }
            FeeCategory::Annual => {
                if self
                    .calendar_service
                    .annual_charges_paid(&command.student_id, &academic_year)?
                {
                    return Err(RequestValidationError::AnnualChargesAlreadyPaid.into());
                }
                (schedule.annual_charges, Vec::new(), "Annual Charges".to_string())
            }
            FeeCategory::Admission => {
                if self
                    .calendar_service
                    .admission_fee_paid(&command.student_id, &academic_year)?
                {
                    return Err(RequestValidationError::AdmissionFeeAlreadyPaid.into());
                }
                (schedule.admission_fee, Vec::new(), "Admission Fee".to_string())
            }
            FeeCategory::Other => {
                let amount = command.amount.ok_or(RequestValidationError::MissingAmount)?;
                let description = command
                    .note
                    .clone()
                    .filter(|note| !note.trim().is_empty())
                    .unwrap_or_else(|| "Other Payment".to_string());
                (amount, Vec::new(), description)
            }
        };

        if amount <= 0.0 {
            return Err(RequestValidationError::NonPositiveAmount.into());
        }

        let now = Utc::now();
        let request = PaymentRequest {
            id: PaymentRequest::generate_id(now.timestamp_millis()),
            student_id: command.student_id,
            parent_email: command.parent_email,
            parent_name: command.parent_name,
            amount,
            category,
            description,
            months,
            payment_method: PaymentMethod::parse(&command.payment_method),
            transaction_ref: command.transaction_ref.trim().to_string(),
            status: RequestStatus::Pending,
            requested_at: now,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
        };
        self.request_repository.append_request(&request)?;
        info!(
            "Payment request {} filed for student {}: {} ({})",
            request.id, request.student_id, request.description, request.amount
        );
        Ok(request)
    }

    /// All requests one student has filed, oldest first.
    pub fn list_for_student(&self, student_id: &str) -> Result<Vec<PaymentRequest>> {
        self.request_repository.list_requests_for_student(student_id)
    }

    /// Requests still awaiting review, in store order.
    pub fn list_pending(&self) -> Result<Vec<PaymentRequest>> {
        let requests = self.request_repository.list_all_requests()?;
        Ok(requests
            .into_iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect())
    }

    /// Every request on file, in store order.
    pub fn list_all(&self) -> Result<Vec<PaymentRequest>> {
        self.request_repository.list_all_requests()
    }

    /// A month with a pending request against it cannot be claimed twice.
    fn ensure_months_not_claimed(
        &self,
        student_id: &str,
        months: &[AcademicMonth],
    ) -> Result<()> {
        let existing = self.request_repository.list_requests_for_student(student_id)?;
        for request in existing.iter().filter(|r| r.status == RequestStatus::Pending) {
            for month in months {
                if request.months.contains(month) {
                    return Err(RequestValidationError::MonthAlreadyRequested(*month).into());
                }
            }
        }
        Ok(())
    }
}

/// Parse month labels, dropping duplicate selections and putting the rest
/// in academic order.
fn parse_months(labels: &[String]) -> Result<Vec<AcademicMonth>> {
    let mut months: Vec<AcademicMonth> = Vec::new();
    for label in labels {
        match AcademicMonth::parse_label(label) {
            Some(month) => {
                if !months.contains(&month) {
                    months.push(month);
                }
            }
            None => return Err(RequestValidationError::UnknownMonth(label.clone()).into()),
        }
    }
    months.sort_by_key(|m| m.academic_index());
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::ledger::RecordEntryCommand;
    use crate::domain::ledger_service::LedgerService;
    use crate::error::PortalError;
    use crate::storage::memory::MemoryConnection;

    fn setup() -> (Arc<MemoryConnection>, PaymentRequestService<MemoryConnection>) {
        let connection = Arc::new(MemoryConnection::new());
        let schedule_service = ScheduleService::new(connection.clone());
        let calendar_service = CalendarService::new(connection.clone());
        let service =
            PaymentRequestService::new(connection.clone(), schedule_service, calendar_service);
        (connection, service)
    }

    fn submit_command(category: &str, months: &[&str]) -> SubmitRequestCommand {
        SubmitRequestCommand {
            student_id: "std-1".to_string(),
            parent_email: "parent@example.com".to_string(),
            parent_name: "Imran Khan".to_string(),
            category: category.to_string(),
            months: months.iter().map(|m| m.to_string()).collect(),
            amount: None,
            payment_method: "JazzCash".to_string(),
            transaction_ref: "TXN-001".to_string(),
            note: None,
        }
    }

    fn pay_month(connection: &Arc<MemoryConnection>, month: &str) {
        let ledger_service = LedgerService::new(connection.clone());
        ledger_service
            .record_entry(RecordEntryCommand {
                student_id: "std-1".to_string(),
                month: Some(month.to_string()),
                monthly_fee: 3000.0,
                annual_charges: 0.0,
                admission_fee: 0.0,
                received_amount: 3000.0,
                payment_method: "Cash".to_string(),
                date: Utc::now().date_naive(),
                reference: String::new(),
                remarks: String::new(),
            })
            .unwrap();
    }

    #[test]
    fn test_monthly_request_derives_amount_and_description() {
        let (_connection, service) = setup();
        let request = service
            .submit_request(submit_command("monthly", &["JUNE", "JULY"]))
            .unwrap();

        assert!(request.id.starts_with("req-"));
        assert_eq!(request.amount, 6000.0);
        assert_eq!(request.description, "Monthly Fee - JUNE, JULY");
        assert_eq!(request.months, vec![AcademicMonth::June, AcademicMonth::July]);
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn test_month_selection_is_sorted_and_deduplicated() {
        let (_connection, service) = setup();
        let request = service
            .submit_request(submit_command("monthly", &["JULY", "june", "JULY"]))
            .unwrap();
        assert_eq!(request.months, vec![AcademicMonth::June, AcademicMonth::July]);
        assert_eq!(request.amount, 6000.0);
    }

    #[test]
    fn test_monthly_request_needs_months() {
        let (_connection, service) = setup();
        let result = service.submit_request(submit_command("monthly", &[]));
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::NoMonthsSelected))
        ));
    }

    #[test]
    fn test_unknown_month_is_rejected() {
        let (_connection, service) = setup();
        let result = service.submit_request(submit_command("monthly", &["SMARCH"]));
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::UnknownMonth(_)))
        ));
    }

    #[test]
    fn test_paid_month_cannot_be_requested() {
        let (connection, service) = setup();
        pay_month(&connection, "APRIL");

        let result = service.submit_request(submit_command("monthly", &["APRIL"]));
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::MonthAlreadyPaid(
                AcademicMonth::April
            )))
        ));
    }

    #[test]
    fn test_pending_month_cannot_be_claimed_twice() {
        let (_connection, service) = setup();
        service.submit_request(submit_command("monthly", &["JUNE"])).unwrap();

        let mut second = submit_command("monthly", &["JUNE", "JULY"]);
        second.transaction_ref = "TXN-002".to_string();
        let result = service.submit_request(second);
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::MonthAlreadyRequested(
                AcademicMonth::June
            )))
        ));
    }

    #[test]
    fn test_missing_transaction_ref_is_rejected() {
        let (_connection, service) = setup();
        let mut command = submit_command("monthly", &["JUNE"]);
        command.transaction_ref = "  ".to_string();
        let result = service.submit_request(command);
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::MissingTransactionRef))
        ));
    }

    #[test]
    fn test_duplicate_transaction_refs_are_allowed() {
        let (_connection, service) = setup();
        service.submit_request(submit_command("monthly", &["JUNE"])).unwrap();
        // Same gateway ref, different month: both may sit pending
        service.submit_request(submit_command("monthly", &["JULY"])).unwrap();

        assert_eq!(service.list_pending().unwrap().len(), 2);
    }

    #[test]
    fn test_annual_request_takes_the_scheduled_amount() {
        let (_connection, service) = setup();
        let request = service.submit_request(submit_command("annual", &[])).unwrap();
        assert_eq!(request.amount, 3500.0);
        assert_eq!(request.description, "Annual Charges");
        assert!(request.months.is_empty());
    }

    #[test]
    fn test_other_request_needs_a_caller_amount() {
        let (_connection, service) = setup();
        let result = service.submit_request(submit_command("other", &[]));
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::MissingAmount))
        ));

        let mut command = submit_command("other", &[]);
        command.amount = Some(750.0);
        command.note = Some("Library fine".to_string());
        let request = service.submit_request(command).unwrap();
        assert_eq!(request.amount, 750.0);
        assert_eq!(request.description, "Library fine");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let (_connection, service) = setup();
        let result = service.submit_request(submit_command("tuition", &[]));
        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest(RequestValidationError::UnknownCategory(_)))
        ));
    }
}
