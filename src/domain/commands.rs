//! Domain-level command and result types.
//!
//! Services take these structs as input and hand the richer ones back as
//! results; any outer layer (CLI, HTTP, UI) is responsible for mapping its
//! own DTOs onto them.

/// Student roster commands.
pub mod students {
    /// Input for registering a student.
    #[derive(Debug, Clone)]
    pub struct RegisterStudentCommand {
        pub name: String,
        pub class: String,
        pub guardian_name: String,
        pub phone: String,
    }
}

/// Fee schedule commands.
pub mod fees {
    /// Input for setting a student's fee schedule.
    #[derive(Debug, Clone)]
    pub struct SetStudentFeesCommand {
        pub student_id: String,
        pub monthly_fee: f64,
        pub annual_charges: f64,
        pub admission_fee: f64,
    }
}

/// Fee ledger commands.
pub mod ledger {
    use chrono::NaiveDate;

    /// Input for recording a fee entry by hand (the admin counter path).
    ///
    /// The academic year is derived from `date`, so backdated entries land
    /// in the year they belong to.
    #[derive(Debug, Clone)]
    pub struct RecordEntryCommand {
        pub student_id: String,

        /// Month label the monthly-fee portion applies to, e.g. "APRIL"
        pub month: Option<String>,

        pub monthly_fee: f64,
        pub annual_charges: f64,
        pub admission_fee: f64,
        pub received_amount: f64,
        pub payment_method: String,
        pub date: NaiveDate,
        pub reference: String,
        pub remarks: String,
    }
}

/// Payment request commands.
pub mod requests {
    /// Input for submitting a payment request.
    ///
    /// Amounts for monthly, annual, and admission requests come from the
    /// student's fee schedule; `amount` is only read for the "other"
    /// category.
    #[derive(Debug, Clone)]
    pub struct SubmitRequestCommand {
        pub student_id: String,
        pub parent_email: String,
        pub parent_name: String,

        /// Fee category name: "monthly", "annual", "admission", or "other"
        pub category: String,

        /// Month labels for a monthly request, e.g. ["JUNE", "JULY"]
        pub months: Vec<String>,

        pub amount: Option<f64>,
        pub payment_method: String,
        pub transaction_ref: String,

        /// Free-text line describing an "other" payment
        pub note: Option<String>,
    }
}

/// Verification commands and results.
pub mod verification {
    /// Input for verifying a pending payment request.
    #[derive(Debug, Clone)]
    pub struct VerifyPaymentCommand {
        /// Request ID or gateway transaction reference
        pub reference: String,

        /// Admin performing the review
        pub admin: String,
    }

    /// Input for rejecting a pending payment request.
    #[derive(Debug, Clone)]
    pub struct RejectPaymentCommand {
        /// Request ID or gateway transaction reference
        pub reference: String,

        /// Admin performing the review
        pub admin: String,

        /// Reason shown to the parent; a stock reason is used when absent
        pub reason: Option<String>,
    }

    /// Workload counters across every payment request on file.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct VerificationStats {
        pub pending_count: usize,
        pub verified_count: usize,
        pub rejected_count: usize,
        pub pending_amount: f64,
        pub verified_amount: f64,
    }
}

/// Reconciliation results.
pub mod reconciliation {
    use crate::domain::calendar::MonthStatus;
    use crate::domain::models::fee_schedule::{FeeSchedule, FeeSummary};
    use crate::domain::models::student::Student;

    /// Consolidated per-student fee picture for one academic year.
    #[derive(Debug, Clone)]
    pub struct FeeDetails {
        pub student: Student,
        pub academic_year: String,

        /// The schedule in force (the student's own, or the school default)
        pub schedule: FeeSchedule,

        pub summary: FeeSummary,
        pub months: MonthStatus,
        pub annual_charges_paid: bool,
        pub admission_fee_paid: bool,
    }
}

/// Report results.
pub mod reports {
    use crate::domain::calendar::AcademicMonth;
    use crate::domain::models::student::Student;

    /// Aggregate collection picture across the school for one year.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CollectionOverview {
        pub academic_year: String,
        pub student_count: usize,
        pub class_count: usize,
        pub total_collected: f64,
        pub expected_total: f64,

        /// Collected as a percentage of expected, two decimal places
        pub collection_rate: f64,
    }

    /// One student still owing for the reminder month.
    #[derive(Debug, Clone)]
    pub struct ReminderEntry {
        pub student_id: String,

        /// Identity record, when one exists for the ledger's student ID
        pub student: Option<Student>,

        pub expected: f64,
        pub received: f64,
    }

    /// Students to chase once the reminder window opens.
    #[derive(Debug, Clone)]
    pub struct ReminderReport {
        pub month: AcademicMonth,
        pub academic_year: String,
        pub entries: Vec<ReminderEntry>,
    }
}

/// Parent account commands.
pub mod parents {
    /// Input for creating a parent account record.
    #[derive(Debug, Clone)]
    pub struct RegisterParentCommand {
        pub email: String,
        pub name: String,
        pub phone: String,

        /// Opaque credential produced by the caller
        pub password_hash: String,

        /// Students to link at creation time
        pub student_ids: Vec<String>,
    }
}
