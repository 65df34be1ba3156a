//! # Fee ledger repository
//!
//! Append-only CSV table of fee entries, one row per entry:
//!
//! ```csv
//! student_id,month,monthly_fee,annual_charges,admission_fee,received_amount,payment_method,date,academic_year,reference,remarks,entered_at
//! std-001,APRIL,3000,0,0,3000,Cash,2025-04-10,2025-2026,RCPT-401,,2025-04-10T09:30:00+00:00
//! ```
//!
//! Rows are only ever appended. Reads tolerate bad cells: an amount that
//! does not parse counts as zero, an unknown month label drops to blank,
//! and a row without a usable date is skipped, each with a warning.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::{Reader, Writer};
use log::{debug, warn};
use std::fs::{self, File, OpenOptions};
use std::io::BufReader;
use std::path::PathBuf;

use super::connection::JsonConnection;
use crate::domain::calendar::AcademicMonth;
use crate::domain::models::ledger::{LedgerEntry, PaymentMethod};
use crate::error::Result;
use crate::storage::traits::LedgerStorage;

const LEDGER_FILE: &str = "fee_ledger.csv";
const LEDGER_HEADER: &str = "student_id,month,monthly_fee,annual_charges,admission_fee,received_amount,payment_method,date,academic_year,reference,remarks,entered_at\n";

/// Flat-file fee ledger repository over `fee_ledger.csv`.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    connection: JsonConnection,
}

impl LedgerRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn ledger_path(&self) -> PathBuf {
        self.connection.store_path(LEDGER_FILE)
    }

    fn ensure_ledger_file_exists(&self) -> Result<()> {
        let path = self.ledger_path();
        if !path.exists() {
            fs::write(&path, LEDGER_HEADER)?;
            debug!("Created fee ledger file: {:?}", path);
        }
        Ok(())
    }

    fn read_entries(&self) -> Result<Vec<LedgerEntry>> {
        let path = self.ledger_path();
        if !path.exists() {
            debug!("Fee ledger does not exist yet, returning no entries");
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut entries = Vec::new();

        for record_result in csv_reader.records() {
            let record = record_result?;

            let student_id = record.get(0).unwrap_or("").trim().to_string();
            if student_id.is_empty() {
                warn!("Skipping ledger row without a student ID");
                continue;
            }

            let month_label = record.get(1).unwrap_or("").trim();
            let month = if month_label.is_empty() {
                None
            } else {
                match AcademicMonth::parse_label(month_label) {
                    Some(month) => Some(month),
                    None => {
                        warn!(
                            "Unknown month label '{}' for {}, keeping row without a month",
                            month_label, student_id
                        );
                        None
                    }
                }
            };

            let date_cell = record.get(7).unwrap_or("").trim();
            let date = match NaiveDate::parse_from_str(date_cell, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    warn!(
                        "Skipping ledger row for {} with unreadable date '{}': {}",
                        student_id, date_cell, e
                    );
                    continue;
                }
            };

            let entered_at = DateTime::parse_from_rfc3339(record.get(11).unwrap_or("").trim())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| date.and_time(NaiveTime::MIN).and_utc());

            entries.push(LedgerEntry {
                student_id,
                month,
                monthly_fee: parse_amount(record.get(2), "monthly_fee"),
                annual_charges: parse_amount(record.get(3), "annual_charges"),
                admission_fee: parse_amount(record.get(4), "admission_fee"),
                received_amount: parse_amount(record.get(5), "received_amount"),
                payment_method: PaymentMethod::parse(record.get(6).unwrap_or("")),
                date,
                academic_year: record.get(8).unwrap_or("").trim().to_string(),
                reference: record.get(9).unwrap_or("").trim().to_string(),
                remarks: record.get(10).unwrap_or("").trim().to_string(),
                entered_at,
            });
        }

        Ok(entries)
    }
}

/// Parse an amount cell, counting anything unreadable as zero.
fn parse_amount(cell: Option<&str>, column: &str) -> f64 {
    let raw = cell.unwrap_or("").trim();
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            warn!("Malformed {} value '{}' in ledger row, counting as 0", column, raw);
            0.0
        }
    }
}

impl LedgerStorage for LedgerRepository {
    fn append_entry(&self, entry: &LedgerEntry) -> Result<()> {
        self.ensure_ledger_file_exists()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.ledger_path())?;
        let mut csv_writer = Writer::from_writer(file);

        let monthly_fee = entry.monthly_fee.to_string();
        let annual_charges = entry.annual_charges.to_string();
        let admission_fee = entry.admission_fee.to_string();
        let received_amount = entry.received_amount.to_string();
        let date = entry.date.format("%Y-%m-%d").to_string();
        let entered_at = entry.entered_at.to_rfc3339();

        csv_writer.write_record([
            entry.student_id.as_str(),
            entry.month.map(|m| m.label()).unwrap_or(""),
            monthly_fee.as_str(),
            annual_charges.as_str(),
            admission_fee.as_str(),
            received_amount.as_str(),
            entry.payment_method.label(),
            date.as_str(),
            entry.academic_year.as_str(),
            entry.reference.as_str(),
            entry.remarks.as_str(),
            entered_at.as_str(),
        ])?;
        csv_writer.flush()?;

        debug!(
            "Appended ledger row for {}: received {} on {}",
            entry.student_id, entry.received_amount, entry.date
        );
        Ok(())
    }

    fn list_entries_for_student(&self, student_id: &str) -> Result<Vec<LedgerEntry>> {
        let entries = self.read_entries()?;
        Ok(entries
            .into_iter()
            .filter(|e| e.student_id == student_id)
            .collect())
    }

    fn list_entries(&self) -> Result<Vec<LedgerEntry>> {
        self.read_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LedgerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (temp_dir, LedgerRepository::new(connection))
    }

    fn sample_entry(student_id: &str, month: Option<AcademicMonth>, received: f64) -> LedgerEntry {
        LedgerEntry {
            student_id: student_id.to_string(),
            month,
            monthly_fee: received,
            annual_charges: 0.0,
            admission_fee: 0.0,
            received_amount: received,
            payment_method: PaymentMethod::Cash,
            date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            academic_year: "2025-2026".to_string(),
            reference: "RCPT-401".to_string(),
            remarks: String::new(),
            entered_at: Utc::now(),
        }
    }

    #[test]
    fn test_append_and_read_roundtrip() {
        let (_temp, repo) = setup();
        let entry = sample_entry("std-1", Some(AcademicMonth::April), 3000.0);
        repo.append_entry(&entry).unwrap();

        let entries = repo.list_entries_for_student("std-1").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].month, Some(AcademicMonth::April));
        assert_eq!(entries[0].monthly_fee, 3000.0);
        assert_eq!(entries[0].received_amount, 3000.0);
        assert_eq!(entries[0].academic_year, "2025-2026");
        assert_eq!(entries[0].reference, "RCPT-401");
    }

    #[test]
    fn test_rows_keep_file_order() {
        let (_temp, repo) = setup();
        repo.append_entry(&sample_entry("std-1", Some(AcademicMonth::April), 1.0))
            .unwrap();
        repo.append_entry(&sample_entry("std-1", Some(AcademicMonth::May), 2.0))
            .unwrap();
        repo.append_entry(&sample_entry("std-2", Some(AcademicMonth::April), 3.0))
            .unwrap();

        let all = repo.list_entries().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].received_amount, 1.0);
        assert_eq!(all[1].received_amount, 2.0);
        assert_eq!(all[2].received_amount, 3.0);

        let std1 = repo.list_entries_for_student("std-1").unwrap();
        assert_eq!(std1.len(), 2);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let (_temp, repo) = setup();
        assert!(repo.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_amount_counts_as_zero() {
        let (_temp, repo) = setup();
        let path = repo.ledger_path();
        let mut content = String::from(LEDGER_HEADER);
        content.push_str(
            "std-1,APRIL,abc,0,0,3000,Cash,2025-04-10,2025-2026,,,2025-04-10T09:30:00+00:00\n",
        );
        fs::write(&path, content).unwrap();

        let entries = repo.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].monthly_fee, 0.0);
        assert_eq!(entries[0].received_amount, 3000.0);
    }

    #[test]
    fn test_unknown_month_label_reads_as_no_month() {
        let (_temp, repo) = setup();
        let path = repo.ledger_path();
        let mut content = String::from(LEDGER_HEADER);
        content.push_str(
            "std-1,SMARCH,3000,0,0,3000,Cash,2025-04-10,2025-2026,,,2025-04-10T09:30:00+00:00\n",
        );
        fs::write(&path, content).unwrap();

        let entries = repo.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].month, None);
    }

    #[test]
    fn test_row_with_bad_date_is_skipped() {
        let (_temp, repo) = setup();
        let path = repo.ledger_path();
        let mut content = String::from(LEDGER_HEADER);
        content.push_str("std-1,APRIL,3000,0,0,3000,Cash,not-a-date,2025-2026,,,\n");
        content.push_str(
            "std-1,MAY,3000,0,0,3000,Cash,2025-05-10,2025-2026,,,2025-05-10T09:30:00+00:00\n",
        );
        fs::write(&path, content).unwrap();

        let entries = repo.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].month, Some(AcademicMonth::May));
    }

    #[test]
    fn test_missing_entered_at_falls_back_to_the_value_date() {
        let (_temp, repo) = setup();
        let path = repo.ledger_path();
        let mut content = String::from(LEDGER_HEADER);
        content.push_str("std-1,APRIL,3000,0,0,3000,Cash,2025-04-10,2025-2026,,,\n");
        fs::write(&path, content).unwrap();

        let entries = repo.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].entered_at.date_naive(),
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
        );
    }

    #[test]
    fn test_remarks_with_commas_survive_the_roundtrip() {
        let (_temp, repo) = setup();
        let mut entry = sample_entry("std-1", Some(AcademicMonth::June), 6000.0);
        entry.remarks = "Covers JUNE, JULY".to_string();
        repo.append_entry(&entry).unwrap();

        let entries = repo.list_entries().unwrap();
        assert_eq!(entries[0].remarks, "Covers JUNE, JULY");
    }
}
