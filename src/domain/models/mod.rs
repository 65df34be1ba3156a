//! Domain models for the fee portal.

pub mod fee_schedule;
pub mod ledger;
pub mod parent;
pub mod payment_request;
pub mod school_config;
pub mod student;

use chrono::Utc;

/// Short hex suffix for generated IDs so records created within the same
/// millisecond still come out distinct.
pub(crate) fn id_suffix(len: usize) -> String {
    let nanos = Utc::now().timestamp_subsec_nanos() as u128;
    format!("{:x}", nanos % 16_u128.pow(len as u32))
        .chars()
        .take(len)
        .collect()
}
