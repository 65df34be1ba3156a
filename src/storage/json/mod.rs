//! # Flat-file storage backend
//!
//! Stores portal data as human-readable files in a single data directory.
//! Keyed stores are JSON maps; the fee ledger is a CSV table.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── school_config.json     (school profile)
//! ├── default_fees.json      (school-wide fallback fee amounts)
//! ├── students.json          (student ID → identity record)
//! ├── fee_schedules.json     (student ID → fee schedule)
//! ├── parents.json           (email → parent account)
//! ├── payment_requests.json  (student ID → list of requests)
//! └── fee_ledger.csv         (append-only money ledger)
//! ```

pub mod config_repository;
pub mod connection;
pub mod ledger_repository;
pub mod parent_repository;
pub mod request_repository;
pub mod schedule_repository;
pub mod student_repository;

pub use config_repository::ConfigRepository;
pub use connection::JsonConnection;
pub use ledger_repository::LedgerRepository;
pub use parent_repository::ParentRepository;
pub use request_repository::RequestRepository;
pub use schedule_repository::ScheduleRepository;
pub use student_repository::StudentRepository;
