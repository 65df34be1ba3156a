//! Fee ledger logic: per-student summaries, payment history, and the admin
//! entry path.

use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use crate::domain::calendar::{academic_year_label, AcademicMonth};
use crate::domain::commands::ledger::RecordEntryCommand;
use crate::domain::models::fee_schedule::FeeSummary;
use crate::domain::models::ledger::{
    EntryValidationError, LedgerEntry, PaymentMethod, PaymentRecord,
};
use crate::error::Result;
use crate::storage::{Connection, LedgerStorage, ScheduleStorage, StudentStorage};

/// Service for reading and writing the fee ledger.
#[derive(Clone)]
pub struct LedgerService<C: Connection> {
    ledger_repository: C::LedgerRepository,
    student_repository: C::StudentRepository,
    schedule_repository: C::ScheduleRepository,
}

impl<C: Connection> LedgerService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            ledger_repository: connection.create_ledger_repository(),
            student_repository: connection.create_student_repository(),
            schedule_repository: connection.create_schedule_repository(),
        }
    }

    /// Fee summary for one student and academic year.
    ///
    /// Requires both an identity record and a per-student fee schedule;
    /// `None` when either is missing. Callers that want the
    /// default-schedule fallback go through the reconciliation service
    /// instead.
    pub fn compute_summary(
        &self,
        student_id: &str,
        academic_year: &str,
    ) -> Result<Option<FeeSummary>> {
        if self.student_repository.get_student(student_id)?.is_none() {
            debug!("No identity record for {}, skipping summary", student_id);
            return Ok(None);
        }
        let schedule = match self.schedule_repository.get_schedule(student_id)? {
            Some(schedule) => schedule,
            None => {
                debug!("No fee schedule for {}, skipping summary", student_id);
                return Ok(None);
            }
        };

        let received = self.total_received(student_id, academic_year)?;
        Ok(Some(FeeSummary::compute(&schedule, received)))
    }

    /// Sum of received amounts over the student's rows for one academic
    /// year.
    pub fn total_received(&self, student_id: &str, academic_year: &str) -> Result<f64> {
        let entries = self.ledger_repository.list_entries_for_student(student_id)?;
        Ok(entries
            .iter()
            .filter(|e| e.academic_year == academic_year)
            .map(|e| e.received_amount)
            .sum())
    }

    /// Rows where money actually changed hands, newest first. Dues-only
    /// rows never show up here.
    pub fn payment_history(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        let entries = self.ledger_repository.list_entries_for_student(student_id)?;
        let mut history: Vec<PaymentRecord> = entries
            .into_iter()
            .filter(|e| e.is_payment())
            .map(|e| PaymentRecord {
                date: e.date,
                month: e.month,
                amount: e.received_amount,
                payment_method: e.payment_method,
                reference: e.reference,
                remarks: e.remarks,
            })
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(history)
    }

    /// Record a fee entry directly (the admin counter path).
    pub fn record_entry(&self, command: RecordEntryCommand) -> Result<LedgerEntry> {
        if command.student_id.trim().is_empty() {
            return Err(EntryValidationError::EmptyStudentId.into());
        }
        if command.monthly_fee < 0.0 || command.annual_charges < 0.0 || command.admission_fee < 0.0
        {
            return Err(EntryValidationError::NegativeFeeAmount.into());
        }
        if command.received_amount < 0.0 {
            return Err(EntryValidationError::NegativeReceivedAmount.into());
        }
        let month = match command.month {
            Some(label) => match AcademicMonth::parse_label(&label) {
                Some(month) => Some(month),
                None => return Err(EntryValidationError::UnknownMonth(label).into()),
            },
            None => None,
        };

        let entry = LedgerEntry {
            student_id: command.student_id.trim().to_string(),
            month,
            monthly_fee: command.monthly_fee,
            annual_charges: command.annual_charges,
            admission_fee: command.admission_fee,
            received_amount: command.received_amount,
            payment_method: PaymentMethod::parse(&command.payment_method),
            date: command.date,
            academic_year: academic_year_label(command.date),
            reference: command.reference,
            remarks: command.remarks,
            entered_at: Utc::now(),
        };
        self.ledger_repository.append_entry(&entry)?;
        info!(
            "Recorded fee entry for {}: received {} on {}",
            entry.student_id, entry.received_amount, entry.date
        );
        Ok(entry)
    }

    /// Payment history as CSV, for download surfaces.
    pub fn export_history_csv(&self, student_id: &str) -> Result<String> {
        let history = self.payment_history(student_id)?;

        let mut csv_content = String::new();
        csv_content.push_str("date,month,amount,payment_method,reference,remarks\n");
        for record in &history {
            csv_content.push_str(&format!(
                "{},{},{:.2},{},{},{}\n",
                record.date.format("%Y-%m-%d"),
                record.month.map(|m| m.label()).unwrap_or(""),
                record.amount,
                escape_csv_field(record.payment_method.label()),
                escape_csv_field(&record.reference),
                escape_csv_field(&record.remarks),
            ));
        }
        Ok(csv_content)
    }
}

/// Quote a field when it contains characters that would break the row.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
