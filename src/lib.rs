//! # Fee Portal Core
//!
//! Domain and storage core for a school fee-management portal: fee
//! schedules and the money ledger on the school side, payment requests and
//! verification on the parent side, and the consolidated fee picture the
//! two meet in.
//!
//! The academic year runs April through March. Money only ever enters the
//! ledger two ways: an admin records an entry at the counter, or an admin
//! verifies a payment request a parent filed. Everything else (summaries,
//! month status, history, reports) is read back out of the ledger.
//!
//! [`Portal`] wires every service over one storage
//! [`Connection`](storage::Connection):
//!
//! ```no_run
//! use fee_portal_core::Portal;
//!
//! fn main() -> fee_portal_core::Result<()> {
//!     let portal = Portal::open("./data")?;
//!     if let Some(details) = portal.reconciliation.fee_details_current("std-001")? {
//!         println!("balance due: {:.2}", details.summary.balance_due);
//!     }
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod error;
pub mod storage;

pub use error::{PortalError, Result};

use std::path::Path;
use std::sync::Arc;

use domain::{
    CalendarService, LedgerService, ParentService, PaymentRequestService, ReconciliationService,
    ReportService, ScheduleService, StudentService, VerificationService,
};
use storage::json::JsonConnection;
use storage::Connection;

/// The assembled portal: every domain service wired over one storage
/// connection.
pub struct Portal<C: Connection = JsonConnection> {
    pub students: StudentService<C>,
    pub schedules: ScheduleService<C>,
    pub ledger: LedgerService<C>,
    pub calendar: CalendarService<C>,
    pub requests: PaymentRequestService<C>,
    pub verification: VerificationService<C>,
    pub reconciliation: ReconciliationService<C>,
    pub reports: ReportService<C>,
    pub parents: ParentService<C>,
}

impl Portal<JsonConnection> {
    /// Open (or initialize) a portal over a flat-file data directory.
    pub fn open<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let connection = Arc::new(JsonConnection::new(data_directory)?);
        Ok(Self::with_connection(connection))
    }
}

impl<C: Connection> Portal<C> {
    /// Wire every service over an existing connection.
    pub fn with_connection(connection: Arc<C>) -> Self {
        let students = StudentService::new(connection.clone());
        let schedules = ScheduleService::new(connection.clone());
        let ledger = LedgerService::new(connection.clone());
        let calendar = CalendarService::new(connection.clone());
        let requests =
            PaymentRequestService::new(connection.clone(), schedules.clone(), calendar.clone());
        let verification = VerificationService::new(connection.clone());
        let reconciliation = ReconciliationService::new(
            students.clone(),
            schedules.clone(),
            ledger.clone(),
            calendar.clone(),
        );
        let reports = ReportService::new(connection.clone(), schedules.clone());
        let parents = ParentService::new(connection);

        Self {
            students,
            schedules,
            ledger,
            calendar,
            requests,
            verification,
            reconciliation,
            reports,
            parents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::domain::calendar::{academic_year_label, AcademicMonth};
    use crate::domain::commands::fees::SetStudentFeesCommand;
    use crate::domain::commands::ledger::RecordEntryCommand;
    use crate::domain::commands::parents::RegisterParentCommand;
    use crate::domain::commands::requests::SubmitRequestCommand;
    use crate::domain::commands::students::RegisterStudentCommand;
    use crate::domain::commands::verification::VerifyPaymentCommand;
    use crate::domain::models::payment_request::RequestStatus;

    fn setup_portal() -> anyhow::Result<(TempDir, Portal)> {
        let temp_dir = TempDir::new()?;
        let portal = Portal::open(temp_dir.path().join("data"))?;
        Ok((temp_dir, portal))
    }

    #[test]
    fn test_full_fee_cycle_for_one_student() -> anyhow::Result<()> {
        let (_temp, portal) = setup_portal()?;
        let today = Utc::now().date_naive();
        let year = academic_year_label(today);

        // Admin sets the student up
        let student = portal.students.register_student(RegisterStudentCommand {
            name: "Ayesha Khan".to_string(),
            class: "Class 5".to_string(),
            guardian_name: "Imran Khan".to_string(),
            phone: "0300-1234567".to_string(),
        })?;
        portal.schedules.set_student_fees(SetStudentFeesCommand {
            student_id: student.id.clone(),
            monthly_fee: 3000.0,
            annual_charges: 3500.0,
            admission_fee: 10_000.0,
        })?;

        // Two months paid at the counter
        for month in ["APRIL", "MAY"] {
            portal.ledger.record_entry(RecordEntryCommand {
                student_id: student.id.clone(),
                month: Some(month.to_string()),
                monthly_fee: 3000.0,
                annual_charges: 0.0,
                admission_fee: 0.0,
                received_amount: 3000.0,
                payment_method: "Cash".to_string(),
                date: today,
                reference: format!("RCPT-{}", month),
                remarks: String::new(),
            })?;
        }

        let details = portal
            .reconciliation
            .fee_details(&student.id, &year)?
            .expect("registered student must have details");
        assert_eq!(details.summary.total_due, 49_500.0);
        assert_eq!(details.summary.total_received, 6000.0);
        assert_eq!(details.summary.balance_due, 43_500.0);
        assert_eq!(details.summary.percent_paid, 12.12);
        assert_eq!(details.months.paid.len(), 2);

        // Parent files a request for the next two months
        let parent = portal.parents.register_parent(RegisterParentCommand {
            email: "parent@example.com".to_string(),
            name: "Imran Khan".to_string(),
            phone: "0300-1234567".to_string(),
            password_hash: "hash".to_string(),
            student_ids: vec![student.id.clone()],
        })?;
        assert_eq!(portal.parents.students_for(&parent.email)?.len(), 1);

        let request = portal.requests.submit_request(SubmitRequestCommand {
            student_id: student.id.clone(),
            parent_email: parent.email.clone(),
            parent_name: parent.name.clone(),
            category: "monthly".to_string(),
            months: vec!["JUNE".to_string(), "JULY".to_string()],
            amount: None,
            payment_method: "JazzCash".to_string(),
            transaction_ref: "TXN-20250601-001".to_string(),
            note: None,
        })?;
        assert_eq!(request.amount, 6000.0);
        assert_eq!(request.description, "Monthly Fee - JUNE, JULY");

        // Admin verifies against the gateway reference
        assert!(portal.verification.verify_payment(VerifyPaymentCommand {
            reference: "TXN-20250601-001".to_string(),
            admin: "admin".to_string(),
        })?);

        let requests = portal.requests.list_for_student(&student.id)?;
        assert_eq!(requests[0].status, RequestStatus::Verified);

        // The verified money shows up everywhere downstream
        let details = portal
            .reconciliation
            .fee_details(&student.id, &year)?
            .expect("details");
        assert_eq!(details.summary.total_received, 12_000.0);
        assert_eq!(details.summary.balance_due, 37_500.0);
        assert_eq!(details.months.paid.len(), 4);
        assert!(details
            .months
            .paid
            .iter()
            .any(|p| p.month == AcademicMonth::June));

        let history = portal.ledger.payment_history(&student.id)?;
        assert_eq!(history.len(), 4);

        let stats = portal.verification.compute_stats()?;
        assert_eq!(stats.verified_count, 1);
        assert_eq!(stats.verified_amount, 6000.0);
        assert_eq!(stats.pending_count, 0);

        Ok(())
    }

    #[test]
    fn test_portal_reads_back_what_an_earlier_portal_wrote() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let data_dir = temp_dir.path().join("data");

        let student_id = {
            let portal = Portal::open(&data_dir)?;
            portal
                .students
                .register_student(RegisterStudentCommand {
                    name: "Bilal Ahmed".to_string(),
                    class: "Class 3".to_string(),
                    guardian_name: String::new(),
                    phone: String::new(),
                })?
                .id
        };

        let portal = Portal::open(&data_dir)?;
        let student = portal.students.get_student(&student_id)?.expect("persisted");
        assert_eq!(student.name, "Bilal Ahmed");
        Ok(())
    }
}
