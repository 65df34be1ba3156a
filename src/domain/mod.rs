//! Domain layer: models, the academic calendar, and the services that
//! implement portal behavior over the storage traits.

pub mod calendar;
pub mod commands;
pub mod models;

pub mod ledger_service;
pub mod parent_service;
pub mod reconciliation_service;
pub mod report_service;
pub mod request_service;
pub mod schedule_service;
pub mod student_service;
pub mod verification_service;

pub use calendar::CalendarService;
pub use ledger_service::LedgerService;
pub use parent_service::ParentService;
pub use reconciliation_service::ReconciliationService;
pub use report_service::ReportService;
pub use request_service::PaymentRequestService;
pub use schedule_service::ScheduleService;
pub use student_service::StudentService;
pub use verification_service::VerificationService;
