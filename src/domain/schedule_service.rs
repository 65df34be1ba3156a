//! Fee schedule administration: per-student amounts, the school-wide
//! default, and the school profile record.

use log::info;
use std::sync::Arc;

use crate::domain::commands::fees::SetStudentFeesCommand;
use crate::domain::models::fee_schedule::{FeeSchedule, ScheduleValidationError};
use crate::domain::models::school_config::SchoolConfig;
use crate::error::Result;
use crate::storage::{ConfigStorage, Connection, ScheduleStorage};

/// Service for managing fee schedules and school configuration.
#[derive(Clone)]
pub struct ScheduleService<C: Connection> {
    schedule_repository: C::ScheduleRepository,
    config_repository: C::ConfigRepository,
}

impl<C: Connection> ScheduleService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            schedule_repository: connection.create_schedule_repository(),
            config_repository: connection.create_config_repository(),
        }
    }

    /// Set the fee schedule for one student.
    pub fn set_student_fees(&self, command: SetStudentFeesCommand) -> Result<FeeSchedule> {
        let schedule = FeeSchedule {
            monthly_fee: command.monthly_fee,
            annual_charges: command.annual_charges,
            admission_fee: command.admission_fee,
        };
        Self::validate(&schedule)?;
        self.schedule_repository
            .store_schedule(&command.student_id, &schedule)?;
        info!(
            "Set fees for student {}: monthly {}, annual {}, admission {}",
            command.student_id,
            schedule.monthly_fee,
            schedule.annual_charges,
            schedule.admission_fee
        );
        Ok(schedule)
    }

    /// The student's own schedule, if one has been set.
    pub fn get_student_fees(&self, student_id: &str) -> Result<Option<FeeSchedule>> {
        self.schedule_repository.get_schedule(student_id)
    }

    /// The schedule that actually applies to a student: their own if set,
    /// otherwise the school default.
    pub fn fees_or_default(&self, student_id: &str) -> Result<FeeSchedule> {
        if let Some(schedule) = self.schedule_repository.get_schedule(student_id)? {
            return Ok(schedule);
        }
        self.default_fees()
    }

    /// The school-wide default schedule: the stored one, or the built-in
    /// amounts until an admin stores different ones.
    pub fn default_fees(&self) -> Result<FeeSchedule> {
        Ok(self.config_repository.get_default_fees()?.unwrap_or_default())
    }

    /// Replace the school-wide default schedule.
    pub fn set_default_fees(&self, fees: FeeSchedule) -> Result<FeeSchedule> {
        Self::validate(&fees)?;
        self.config_repository.store_default_fees(&fees)?;
        Ok(fees)
    }

    /// The school profile, falling back to a blank default.
    pub fn school_config(&self) -> Result<SchoolConfig> {
        Ok(self.config_repository.get_school_config()?.unwrap_or_default())
    }

    /// Replace the school profile.
    pub fn set_school_config(&self, config: SchoolConfig) -> Result<SchoolConfig> {
        self.config_repository.store_school_config(&config)?;
        Ok(config)
    }

    fn validate(schedule: &FeeSchedule) -> Result<()> {
        if schedule.monthly_fee < 0.0
            || schedule.annual_charges < 0.0
            || schedule.admission_fee < 0.0
        {
            return Err(ScheduleValidationError::NegativeAmount.into());
        }
        Ok(())
    }
}
