//! # Configuration repository
//!
//! Two single-object stores: the school profile in `school_config.json`
//! and the school-wide fallback fee amounts in `default_fees.json`.

use log::info;

use super::connection::JsonConnection;
use crate::domain::models::fee_schedule::FeeSchedule;
use crate::domain::models::school_config::SchoolConfig;
use crate::error::Result;
use crate::storage::traits::ConfigStorage;

const SCHOOL_CONFIG_FILE: &str = "school_config.json";
const DEFAULT_FEES_FILE: &str = "default_fees.json";

/// Flat-file configuration repository.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    connection: JsonConnection,
}

impl ConfigRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

impl ConfigStorage for ConfigRepository {
    fn store_school_config(&self, config: &SchoolConfig) -> Result<()> {
        self.connection.write_object(SCHOOL_CONFIG_FILE, config)?;
        info!("Saved school config for {}", config.school_name);
        Ok(())
    }

    fn get_school_config(&self) -> Result<Option<SchoolConfig>> {
        self.connection.read_object(SCHOOL_CONFIG_FILE)
    }

    fn store_default_fees(&self, fees: &FeeSchedule) -> Result<()> {
        self.connection.write_object(DEFAULT_FEES_FILE, fees)?;
        info!(
            "Saved default fees: monthly {}, annual {}, admission {}",
            fees.monthly_fee, fees.annual_charges, fees.admission_fee
        );
        Ok(())
    }

    fn get_default_fees(&self) -> Result<Option<FeeSchedule>> {
        self.connection.read_object(DEFAULT_FEES_FILE)
    }
}
