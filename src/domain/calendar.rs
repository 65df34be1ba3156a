//! # Academic calendar
//!
//! The school year runs April through March. The month cycle, the year
//! label derived from a date, and the per-student paid/unpaid month
//! resolution all live here.
//!
//! Month names are stored uppercase in every file ("APRIL" ... "MARCH"),
//! and every list the portal produces walks the cycle in that one order.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::models::ledger::{LedgerEntry, PaymentMethod};
use crate::error::Result;
use crate::storage::{Connection, LedgerStorage};

/// A month of the academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AcademicMonth {
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
    January,
    February,
    March,
}

impl AcademicMonth {
    /// The full cycle in academic order, April first.
    pub const ORDER: [AcademicMonth; 12] = [
        AcademicMonth::April,
        AcademicMonth::May,
        AcademicMonth::June,
        AcademicMonth::July,
        AcademicMonth::August,
        AcademicMonth::September,
        AcademicMonth::October,
        AcademicMonth::November,
        AcademicMonth::December,
        AcademicMonth::January,
        AcademicMonth::February,
        AcademicMonth::March,
    ];

    /// Uppercase label used in the ledger and request stores.
    pub fn label(&self) -> &'static str {
        match self {
            AcademicMonth::April => "APRIL",
            AcademicMonth::May => "MAY",
            AcademicMonth::June => "JUNE",
            AcademicMonth::July => "JULY",
            AcademicMonth::August => "AUGUST",
            AcademicMonth::September => "SEPTEMBER",
            AcademicMonth::October => "OCTOBER",
            AcademicMonth::November => "NOVEMBER",
            AcademicMonth::December => "DECEMBER",
            AcademicMonth::January => "JANUARY",
            AcademicMonth::February => "FEBRUARY",
            AcademicMonth::March => "MARCH",
        }
    }

    /// Parse a stored label. Case-insensitive; surrounding whitespace is
    /// ignored.
    pub fn parse_label(label: &str) -> Option<AcademicMonth> {
        match label.trim().to_uppercase().as_str() {
            "APRIL" => Some(AcademicMonth::April),
            "MAY" => Some(AcademicMonth::May),
            "JUNE" => Some(AcademicMonth::June),
            "JULY" => Some(AcademicMonth::July),
            "AUGUST" => Some(AcademicMonth::August),
            "SEPTEMBER" => Some(AcademicMonth::September),
            "OCTOBER" => Some(AcademicMonth::October),
            "NOVEMBER" => Some(AcademicMonth::November),
            "DECEMBER" => Some(AcademicMonth::December),
            "JANUARY" => Some(AcademicMonth::January),
            "FEBRUARY" => Some(AcademicMonth::February),
            "MARCH" => Some(AcademicMonth::March),
            _ => None,
        }
    }

    /// Calendar month number: April is 4, March is 3.
    pub fn month_number(&self) -> u32 {
        match self {
            AcademicMonth::April => 4,
            AcademicMonth::May => 5,
            AcademicMonth::June => 6,
            AcademicMonth::July => 7,
            AcademicMonth::August => 8,
            AcademicMonth::September => 9,
            AcademicMonth::October => 10,
            AcademicMonth::November => 11,
            AcademicMonth::December => 12,
            AcademicMonth::January => 1,
            AcademicMonth::February => 2,
            AcademicMonth::March => 3,
        }
    }

    /// Academic month for a calendar month number (1-12).
    pub fn from_month_number(month: u32) -> Option<AcademicMonth> {
        AcademicMonth::ORDER
            .iter()
            .copied()
            .find(|m| m.month_number() == month)
    }

    /// Position within the academic year, April = 0 ... March = 11.
    pub fn academic_index(&self) -> usize {
        ((self.month_number() + 8) % 12) as usize
    }
}

impl std::fmt::Display for AcademicMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The "2025-2026" style label for the academic year containing `date`.
/// January through March belong to the year that started the previous
/// April.
pub fn academic_year_label(date: NaiveDate) -> String {
    let start_year = if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{}", start_year, start_year + 1)
}

/// A month with a monthly-fee payment recorded against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidMonth {
    pub month: AcademicMonth,

    /// Monthly fee amount on the first ledger row that paid the month
    pub amount: f64,

    /// Value date of that row
    pub date: NaiveDate,

    pub payment_method: PaymentMethod,
}

/// Paid/unpaid partition of one student's academic year. Both lists are in
/// academic order and together always cover all twelve months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStatus {
    pub academic_year: String,
    pub paid: Vec<PaidMonth>,
    pub unpaid: Vec<AcademicMonth>,
}

/// Calendar-side read model over the fee ledger.
#[derive(Clone)]
pub struct CalendarService<C: Connection> {
    ledger_repository: C::LedgerRepository,
}

impl<C: Connection> CalendarService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            ledger_repository: connection.create_ledger_repository(),
        }
    }

    /// Partition the academic year into paid and unpaid months for one
    /// student.
    ///
    /// A month counts as paid when at least one ledger row for the student
    /// and year carries a monthly-fee amount against it and records money
    /// received; the first such row in file order supplies the reported
    /// amount and date.
    pub fn resolve_months(&self, student_id: &str, academic_year: &str) -> Result<MonthStatus> {
        let entries = self.entries_for_year(student_id, academic_year)?;
        let mut paid = Vec::new();
        let mut unpaid = Vec::new();

        for month in AcademicMonth::ORDER {
            let paying_row = entries
                .iter()
                .find(|e| e.month == Some(month) && e.monthly_fee > 0.0 && e.is_payment());
            match paying_row {
                Some(entry) => paid.push(PaidMonth {
                    month,
                    amount: entry.monthly_fee,
                    date: entry.date,
                    payment_method: entry.payment_method.clone(),
                }),
                None => unpaid.push(month),
            }
        }

        debug!(
            "Month status for {} in {}: {} paid, {} unpaid",
            student_id,
            academic_year,
            paid.len(),
            unpaid.len()
        );
        Ok(MonthStatus {
            academic_year: academic_year.to_string(),
            paid,
            unpaid,
        })
    }

    /// True when the month already has a monthly-fee payment recorded.
    pub fn month_paid(
        &self,
        student_id: &str,
        academic_year: &str,
        month: AcademicMonth,
    ) -> Result<bool> {
        let entries = self.entries_for_year(student_id, academic_year)?;
        Ok(entries
            .iter()
            .any(|e| e.month == Some(month) && e.monthly_fee > 0.0 && e.is_payment()))
    }

    /// True when annual charges have been collected this academic year.
    pub fn annual_charges_paid(&self, student_id: &str, academic_year: &str) -> Result<bool> {
        let entries = self.entries_for_year(student_id, academic_year)?;
        Ok(entries.iter().any(|e| e.annual_charges > 0.0 && e.is_payment()))
    }

    /// True when the one-off admission fee shows in this year's ledger.
    pub fn admission_fee_paid(&self, student_id: &str, academic_year: &str) -> Result<bool> {
        let entries = self.entries_for_year(student_id, academic_year)?;
        Ok(entries.iter().any(|e| e.admission_fee > 0.0 && e.is_payment()))
    }

    fn entries_for_year(&self, student_id: &str, academic_year: &str) -> Result<Vec<LedgerEntry>> {
        let entries = self.ledger_repository.list_entries_for_student(student_id)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.academic_year == academic_year)
            .collect())
    }
}
