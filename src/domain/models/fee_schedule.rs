//! Fee schedule and summary arithmetic.
//!
//! [`FeeSummary::compute`] is the single place the due/received/balance
//! figures are derived; every surface that reports fee totals goes through
//! it, so the numbers always agree.

use serde::{Deserialize, Serialize};

/// Per-student fee amounts for one academic year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee charged for each of the twelve academic months
    pub monthly_fee: f64,

    /// Once-a-year charges (paper fund, activities, and the like)
    pub annual_charges: f64,

    /// One-off fee collected at admission
    pub admission_fee: f64,
}

impl FeeSchedule {
    /// Total payable across the full academic year.
    pub fn annual_total(&self) -> f64 {
        self.monthly_fee * 12.0 + self.admission_fee + self.annual_charges
    }
}

/// School-wide fallback amounts, used until an admin stores different ones.
impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            monthly_fee: 3000.0,
            annual_charges: 3500.0,
            admission_fee: 10_000.0,
        }
    }
}

/// Validation errors for fee schedule amounts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleValidationError {
    #[error("Fee amounts cannot be negative")]
    NegativeAmount,
}

/// Where a student stands against their schedule for one academic year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSummary {
    /// Full-year amount the schedule says is owed
    pub total_due: f64,

    /// Sum of received amounts over the year's ledger rows
    pub total_received: f64,

    /// What is still outstanding, clamped at zero
    pub balance_due: f64,

    /// Received as a percentage of due, rounded to two decimal places
    pub percent_paid: f64,
}

impl FeeSummary {
    /// Derive the summary figures from a schedule and the amount received so
    /// far. The balance clamps at zero but the raw received total is kept,
    /// so an overpaid student reads as more than 100%.
    pub fn compute(schedule: &FeeSchedule, total_received: f64) -> Self {
        let total_due = schedule.annual_total();
        let balance_due = (total_due - total_received).max(0.0);
        let percent_paid = if total_due > 0.0 {
            (total_received / total_due * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            total_due,
            total_received,
            balance_due,
            percent_paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_for_partially_paid_year() {
        let schedule = FeeSchedule {
            monthly_fee: 3000.0,
            annual_charges: 3500.0,
            admission_fee: 10_000.0,
        };
        let summary = FeeSummary::compute(&schedule, 6000.0);

        assert_eq!(summary.total_due, 49_500.0);
        assert_eq!(summary.total_received, 6000.0);
        assert_eq!(summary.balance_due, 43_500.0);
        assert_eq!(summary.percent_paid, 12.12);
    }

    #[test]
    fn test_zero_due_reports_zero_percent() {
        let schedule = FeeSchedule {
            monthly_fee: 0.0,
            annual_charges: 0.0,
            admission_fee: 0.0,
        };
        let summary = FeeSummary::compute(&schedule, 500.0);

        assert_eq!(summary.percent_paid, 0.0);
        assert_eq!(summary.balance_due, 0.0);
        assert_eq!(summary.total_received, 500.0);
    }

    #[test]
    fn test_overpayment_clamps_balance_but_not_percent() {
        let schedule = FeeSchedule {
            monthly_fee: 100.0,
            annual_charges: 0.0,
            admission_fee: 0.0,
        };
        let summary = FeeSummary::compute(&schedule, 1500.0);

        assert_eq!(summary.balance_due, 0.0);
        assert_eq!(summary.percent_paid, 125.0);
        assert_eq!(summary.total_received, 1500.0);
    }

    #[test]
    fn test_percent_rounds_to_two_places() {
        let schedule = FeeSchedule {
            monthly_fee: 250.0,
            annual_charges: 0.0,
            admission_fee: 0.0,
        };
        // 1000 / 3000 = 33.3333...%
        let summary = FeeSummary::compute(&schedule, 1000.0);
        assert_eq!(summary.percent_paid, 33.33);
    }
}
