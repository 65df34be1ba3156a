//! The consolidated per-student fee picture parents and admins see.
//!
//! Pulls identity, schedule, ledger totals, and month status together in
//! one read. The identity record gates everything; the fee schedule falls
//! back to the school default, unlike the ledger service's strict summary.

use chrono::Utc;
use log::debug;

use crate::domain::calendar::{academic_year_label, CalendarService};
use crate::domain::commands::reconciliation::FeeDetails;
use crate::domain::ledger_service::LedgerService;
use crate::domain::models::fee_schedule::FeeSummary;
use crate::domain::schedule_service::ScheduleService;
use crate::domain::student_service::StudentService;
use crate::error::Result;
use crate::storage::Connection;

/// Service assembling the full fee picture for one student.
#[derive(Clone)]
pub struct ReconciliationService<C: Connection> {
    student_service: StudentService<C>,
    schedule_service: ScheduleService<C>,
    ledger_service: LedgerService<C>,
    calendar_service: CalendarService<C>,
}

impl<C: Connection> ReconciliationService<C> {
    pub fn new(
        student_service: StudentService<C>,
        schedule_service: ScheduleService<C>,
        ledger_service: LedgerService<C>,
        calendar_service: CalendarService<C>,
    ) -> Self {
        Self {
            student_service,
            schedule_service,
            ledger_service,
            calendar_service,
        }
    }

    /// Everything the portal shows about one student for one academic
    /// year. `None` when the student has no identity record.
    pub fn fee_details(&self, student_id: &str, academic_year: &str) -> Result<Option<FeeDetails>> {
        let student = match self.student_service.get_student(student_id)? {
            Some(student) => student,
            None => {
                debug!("No identity record for {}, no fee details", student_id);
                return Ok(None);
            }
        };

        let schedule = self.schedule_service.fees_or_default(student_id)?;
        let received = self.ledger_service.total_received(student_id, academic_year)?;
        let summary = FeeSummary::compute(&schedule, received);
        let months = self.calendar_service.resolve_months(student_id, academic_year)?;
        let annual_charges_paid = self
            .calendar_service
            .annual_charges_paid(student_id, academic_year)?;
        let admission_fee_paid = self
            .calendar_service
            .admission_fee_paid(student_id, academic_year)?;

        Ok(Some(FeeDetails {
            student,
            academic_year: academic_year.to_string(),
            schedule,
            summary,
            months,
            annual_charges_paid,
            admission_fee_paid,
        }))
    }

    /// Fee details for the academic year we are in right now.
    pub fn fee_details_current(&self, student_id: &str) -> Result<Option<FeeDetails>> {
        let academic_year = academic_year_label(Utc::now().date_naive());
        self.fee_details(student_id, &academic_year)
    }
}
