//! # Storage Traits
//!
//! Abstraction over where portal data lives, so the domain services run
//! unchanged against the flat-file stores in [`crate::storage::json`] or
//! the in-memory backend in [`crate::storage::memory`].

use crate::domain::models::fee_schedule::FeeSchedule;
use crate::domain::models::ledger::LedgerEntry;
use crate::domain::models::parent::ParentAccount;
use crate::domain::models::payment_request::PaymentRequest;
use crate::domain::models::school_config::SchoolConfig;
use crate::domain::models::student::Student;
use crate::error::Result;

/// Interface for student identity storage.
pub trait StudentStorage: Send + Sync {
    /// Store a student record, replacing any existing record with the same ID
    fn store_student(&self, student: &Student) -> Result<()>;

    /// Retrieve a student by ID
    fn get_student(&self, student_id: &str) -> Result<Option<Student>>;

    /// List all students, ordered by ID
    fn list_students(&self) -> Result<Vec<Student>>;
}

/// Interface for per-student fee schedule storage.
pub trait ScheduleStorage: Send + Sync {
    /// Store a student's fee schedule, replacing any existing one
    fn store_schedule(&self, student_id: &str, schedule: &FeeSchedule) -> Result<()>;

    /// Retrieve a student's fee schedule
    fn get_schedule(&self, student_id: &str) -> Result<Option<FeeSchedule>>;
}

/// Interface for the append-only fee ledger.
///
/// Rows are never updated or deleted; readers see them in file order.
pub trait LedgerStorage: Send + Sync {
    /// Append one row to the ledger
    fn append_entry(&self, entry: &LedgerEntry) -> Result<()>;

    /// All rows for one student, in file order
    fn list_entries_for_student(&self, student_id: &str) -> Result<Vec<LedgerEntry>>;

    /// Every row in the ledger, in file order
    fn list_entries(&self) -> Result<Vec<LedgerEntry>>;
}

/// Interface for payment request storage.
pub trait PaymentRequestStorage: Send + Sync {
    /// Append a new request to the student's list
    fn append_request(&self, request: &PaymentRequest) -> Result<()>;

    /// All requests one student has filed, oldest first
    fn list_requests_for_student(&self, student_id: &str) -> Result<Vec<PaymentRequest>>;

    /// Every request across all students, in store order (students by ID,
    /// each student's requests oldest first)
    fn list_all_requests(&self) -> Result<Vec<PaymentRequest>>;

    /// Replace the stored request carrying the same ID.
    /// Returns false when no such request exists
    fn update_request(&self, request: &PaymentRequest) -> Result<bool>;
}

/// Interface for parent account storage.
pub trait ParentStorage: Send + Sync {
    /// Store a parent account, replacing any existing record with the same
    /// email
    fn store_parent(&self, parent: &ParentAccount) -> Result<()>;

    /// Retrieve a parent account by email
    fn get_parent(&self, email: &str) -> Result<Option<ParentAccount>>;

    /// List all parent accounts, ordered by email
    fn list_parents(&self) -> Result<Vec<ParentAccount>>;
}

/// Interface for school-wide configuration storage.
pub trait ConfigStorage: Send + Sync {
    /// Store the school profile
    fn store_school_config(&self, config: &SchoolConfig) -> Result<()>;

    /// Retrieve the school profile, if one has been stored
    fn get_school_config(&self) -> Result<Option<SchoolConfig>>;

    /// Store the fallback fee schedule used when a student has none
    fn store_default_fees(&self, fees: &FeeSchedule) -> Result<()>;

    /// Retrieve the stored fallback fee schedule
    fn get_default_fees(&self) -> Result<Option<FeeSchedule>>;
}

/// Interface for storage connections.
///
/// Abstracts the concrete backend and provides factory methods for its
/// repositories, so services can be generic over where the data lives.
pub trait Connection: Send + Sync + Clone {
    type StudentRepository: StudentStorage + Clone;
    type ScheduleRepository: ScheduleStorage + Clone;
    type LedgerRepository: LedgerStorage + Clone;
    type RequestRepository: PaymentRequestStorage + Clone;
    type ParentRepository: ParentStorage + Clone;
    type ConfigRepository: ConfigStorage + Clone;

    /// Create a student repository backed by this connection
    fn create_student_repository(&self) -> Self::StudentRepository;

    /// Create a fee schedule repository backed by this connection
    fn create_schedule_repository(&self) -> Self::ScheduleRepository;

    /// Create a fee ledger repository backed by this connection
    fn create_ledger_repository(&self) -> Self::LedgerRepository;

    /// Create a payment request repository backed by this connection
    fn create_request_repository(&self) -> Self::RequestRepository;

    /// Create a parent account repository backed by this connection
    fn create_parent_repository(&self) -> Self::ParentRepository;

    /// Create a configuration repository backed by this connection
    fn create_config_repository(&self) -> Self::ConfigRepository;
}
