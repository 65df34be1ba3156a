//! # Fee schedule repository
//!
//! Per-student fee amounts, stored as a single `fee_schedules.json` map
//! keyed by student ID:
//!
//! ```json
//! {
//!   "std-1755950400123-9f2a": {
//!     "monthly_fee": 3000.0,
//!     "annual_charges": 3500.0,
//!     "admission_fee": 10000.0
//!   }
//! }
//! ```

use log::info;
use std::collections::BTreeMap;

use super::connection::JsonConnection;
use crate::domain::models::fee_schedule::FeeSchedule;
use crate::error::Result;
use crate::storage::traits::ScheduleStorage;

const SCHEDULES_FILE: &str = "fee_schedules.json";

/// Flat-file fee schedule repository over `fee_schedules.json`.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    connection: JsonConnection,
}

impl ScheduleRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<BTreeMap<String, FeeSchedule>> {
        self.connection.read_map(SCHEDULES_FILE)
    }
}

impl ScheduleStorage for ScheduleRepository {
    fn store_schedule(&self, student_id: &str, schedule: &FeeSchedule) -> Result<()> {
        let mut records = self.read_records()?;
        records.insert(student_id.to_string(), *schedule);
        self.connection.write_map(SCHEDULES_FILE, &records)?;
        info!("Saved fee schedule for student {}", student_id);
        Ok(())
    }

    fn get_schedule(&self, student_id: &str) -> Result<Option<FeeSchedule>> {
        Ok(self.read_records()?.remove(student_id))
    }
}
