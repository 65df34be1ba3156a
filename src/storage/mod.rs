//! Storage layer: the trait seams plus the flat-file and in-memory
//! backends that implement them.

pub mod json;
pub mod memory;
pub mod traits;

pub use traits::{
    ConfigStorage, Connection, LedgerStorage, ParentStorage, PaymentRequestStorage,
    ScheduleStorage, StudentStorage,
};
