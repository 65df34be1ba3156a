//! Admin-side reports: the school-wide collection overview and the
//! monthly fee reminder list.

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::calendar::{academic_year_label, AcademicMonth};
use crate::domain::commands::reports::{CollectionOverview, ReminderEntry, ReminderReport};
use crate::domain::models::ledger::LedgerEntry;
use crate::domain::schedule_service::ScheduleService;
use crate::error::Result;
use crate::storage::{Connection, LedgerStorage, StudentStorage};

/// Day of the month the reminder window opens.
const REMINDER_DAY: u32 = 8;

/// Service producing school-wide reports.
#[derive(Clone)]
pub struct ReportService<C: Connection> {
    ledger_repository: C::LedgerRepository,
    student_repository: C::StudentRepository,
    schedule_service: ScheduleService<C>,
}

impl<C: Connection> ReportService<C> {
    pub fn new(connection: Arc<C>, schedule_service: ScheduleService<C>) -> Self {
        Self {
            ledger_repository: connection.create_ledger_repository(),
            student_repository: connection.create_student_repository(),
            schedule_service,
        }
    }

    /// School-wide collection picture for one academic year: what the
    /// roster should bring in against what the ledger shows received.
    pub fn collection_overview(&self, academic_year: &str) -> Result<CollectionOverview> {
        let students = self.student_repository.list_students()?;
        let entries = self.ledger_repository.list_entries()?;

        let total_collected: f64 = entries
            .iter()
            .filter(|e| e.academic_year == academic_year)
            .map(|e| e.received_amount)
            .sum();

        let mut expected_total = 0.0;
        let mut classes = BTreeSet::new();
        for student in &students {
            expected_total += self.schedule_service.fees_or_default(&student.id)?.annual_total();
            classes.insert(student.class.clone());
        }

        let collection_rate = if expected_total > 0.0 {
            (total_collected / expected_total * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };

        info!(
            "Collection overview for {}: {} of {} ({}%)",
            academic_year, total_collected, expected_total, collection_rate
        );
        Ok(CollectionOverview {
            academic_year: academic_year.to_string(),
            student_count: students.len(),
            class_count: classes.len(),
            total_collected,
            expected_total,
            collection_rate,
        })
    }

    /// Students still owing for the current month.
    ///
    /// Returns `None` before the window opens on day 8, so early-month
    /// queries stay quiet. A student with ledger rows for the month owes
    /// whatever those rows say is unpaid; a student with no rows at all
    /// owes their scheduled monthly fee.
    pub fn fee_reminders(&self, today: NaiveDate) -> Result<Option<ReminderReport>> {
        if today.day() < REMINDER_DAY {
            debug!(
                "Reminder window opens on day {}, today is day {}",
                REMINDER_DAY,
                today.day()
            );
            return Ok(None);
        }
        let month = match AcademicMonth::from_month_number(today.month()) {
            Some(month) => month,
            None => return Ok(None),
        };
        let academic_year = academic_year_label(today);

        let entries: Vec<LedgerEntry> = self
            .ledger_repository
            .list_entries()?
            .into_iter()
            .filter(|e| e.academic_year == academic_year)
            .collect();

        // Ledger order decides listing order, first appearance wins
        let mut student_ids: Vec<String> = Vec::new();
        for entry in &entries {
            if !student_ids.contains(&entry.student_id) {
                student_ids.push(entry.student_id.clone());
            }
        }

        let mut owing = Vec::new();
        for student_id in student_ids {
            let month_rows: Vec<&LedgerEntry> = entries
                .iter()
                .filter(|e| e.student_id == student_id && e.month == Some(month))
                .collect();

            let (expected, received) = if month_rows.is_empty() {
                let schedule = self.schedule_service.fees_or_default(&student_id)?;
                (schedule.monthly_fee, 0.0)
            } else {
                let expected: f64 = month_rows
                    .iter()
                    .map(|e| e.monthly_fee + e.annual_charges + e.admission_fee)
                    .sum();
                let received: f64 = month_rows.iter().map(|e| e.received_amount).sum();
                (expected, received)
            };

            if expected <= 0.0 || received >= expected {
                continue;
            }

            let student = self.student_repository.get_student(&student_id)?;
            owing.push(ReminderEntry {
                student_id,
                student,
                expected,
                received,
            });
        }

        info!(
            "Fee reminders for {} {}: {} students owing",
            month,
            academic_year,
            owing.len()
        );
        Ok(Some(ReminderReport {
            month,
            academic_year,
            entries: owing,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::fees::SetStudentFeesCommand;
    use crate::domain::commands::ledger::RecordEntryCommand;
    use crate::domain::commands::students::RegisterStudentCommand;
    use crate::domain::ledger_service::LedgerService;
    use crate::domain::student_service::StudentService;
    use crate::storage::memory::MemoryConnection;

    struct Fixture {
        students: StudentService<MemoryConnection>,
        schedules: ScheduleService<MemoryConnection>,
        ledger: LedgerService<MemoryConnection>,
        reports: ReportService<MemoryConnection>,
    }

    fn setup() -> Fixture {
        let connection = Arc::new(MemoryConnection::new());
        let students = StudentService::new(connection.clone());
        let schedules = ScheduleService::new(connection.clone());
        let ledger = LedgerService::new(connection.clone());
        let reports = ReportService::new(connection, schedules.clone());
        Fixture {
            students,
            schedules,
            ledger,
            reports,
        }
    }

    fn register(fixture: &Fixture, name: &str, class: &str) -> String {
        fixture
            .students
            .register_student(RegisterStudentCommand {
                name: name.to_string(),
                class: class.to_string(),
                guardian_name: String::new(),
                phone: String::new(),
            })
            .unwrap()
            .id
    }

    fn pay(fixture: &Fixture, student_id: &str, month: &str, amount: f64, date: NaiveDate) {
        fixture
            .ledger
            .record_entry(RecordEntryCommand {
                student_id: student_id.to_string(),
                month: Some(month.to_string()),
                monthly_fee: amount,
                annual_charges: 0.0,
                admission_fee: 0.0,
                received_amount: amount,
                payment_method: "Cash".to_string(),
                date,
                reference: String::new(),
                remarks: String::new(),
            })
            .unwrap();
    }

    #[test]
    fn test_overview_compares_collected_to_expected() {
        let fixture = setup();
        let a = register(&fixture, "A", "Class 5");
        register(&fixture, "B", "Class 6");

        // Two students on the default schedule: expected 2 x 49,500
        pay(&fixture, &a, "APRIL", 3000.0, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());

        let overview = fixture.reports.collection_overview("2025-2026").unwrap();
        assert_eq!(overview.student_count, 2);
        assert_eq!(overview.class_count, 2);
        assert_eq!(overview.expected_total, 99_000.0);
        assert_eq!(overview.total_collected, 3000.0);
        assert_eq!(overview.collection_rate, 3.03);
    }

    #[test]
    fn test_overview_uses_per_student_schedules_when_set() {
        let fixture = setup();
        let a = register(&fixture, "A", "Class 5");
        fixture
            .schedules
            .set_student_fees(SetStudentFeesCommand {
                student_id: a,
                monthly_fee: 1000.0,
                annual_charges: 0.0,
                admission_fee: 0.0,
            })
            .unwrap();

        let overview = fixture.reports.collection_overview("2025-2026").unwrap();
        assert_eq!(overview.expected_total, 12_000.0);
    }

    #[test]
    fn test_reminders_stay_quiet_before_day_eight() {
        let fixture = setup();
        let early = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        assert!(fixture.reports.fee_reminders(early).unwrap().is_none());

        let open = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        assert!(fixture.reports.fee_reminders(open).unwrap().is_some());
    }

    #[test]
    fn test_reminders_list_students_owing_for_the_month() {
        let fixture = setup();
        let paid_up = register(&fixture, "Paid", "Class 5");
        let owing = register(&fixture, "Owing", "Class 5");

        let april = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let september = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();

        // Both students show up in this year's ledger
        pay(&fixture, &paid_up, "SEPTEMBER", 3000.0, september);
        pay(&fixture, &owing, "APRIL", 3000.0, april);

        let report = fixture.reports.fee_reminders(september).unwrap().unwrap();
        assert_eq!(report.month, AcademicMonth::September);
        assert_eq!(report.academic_year, "2025-2026");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].student_id, owing);
        // No September rows, so the scheduled monthly fee is owed
        assert_eq!(report.entries[0].expected, 3000.0);
        assert_eq!(report.entries[0].received, 0.0);
        assert_eq!(
            report.entries[0].student.as_ref().map(|s| s.name.as_str()),
            Some("Owing")
        );
    }

    #[test]
    fn test_partially_paid_month_is_still_owed() {
        let fixture = setup();
        let student = register(&fixture, "Half", "Class 5");
        let september = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();

        // Dues of 3000 recorded, only 1000 received
        fixture
            .ledger
            .record_entry(RecordEntryCommand {
                student_id: student.clone(),
                month: Some("SEPTEMBER".to_string()),
                monthly_fee: 3000.0,
                annual_charges: 0.0,
                admission_fee: 0.0,
                received_amount: 1000.0,
                payment_method: "Cash".to_string(),
                date: september,
                reference: String::new(),
                remarks: String::new(),
            })
            .unwrap();

        let report = fixture.reports.fee_reminders(september).unwrap().unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].expected, 3000.0);
        assert_eq!(report.entries[0].received, 1000.0);
    }
}
