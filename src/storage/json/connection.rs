//! # Flat-file connection
//!
//! [`JsonConnection`] owns the data directory every repository reads and
//! writes, and carries the common read/write plumbing for the JSON stores.
//!
//! Writes go through a temp file and rename, so a crash mid-write never
//! leaves a half-written store behind. A missing file reads as an empty
//! store; a file that exists but does not parse is reported as corrupt,
//! never silently emptied.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PortalError, Result};
use crate::storage::traits::Connection;

use super::config_repository::ConfigRepository;
use super::ledger_repository::LedgerRepository;
use super::parent_repository::ParentRepository;
use super::request_repository::RequestRepository;
use super::schedule_repository::ScheduleRepository;
use super::student_repository::StudentRepository;

/// Manages the data directory for the flat-file stores.
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a connection rooted at `base_directory`, creating the
    /// directory if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            debug!("Created data directory: {:?}", base_path);
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    /// The directory all store files live in.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Absolute path of a store file.
    pub(crate) fn store_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Read a JSON map store. Missing and empty files are empty stores.
    pub(crate) fn read_map<T: DeserializeOwned>(
        &self,
        file_name: &str,
    ) -> Result<BTreeMap<String, T>> {
        let path = self.store_path(file_name);
        if !path.exists() {
            debug!("Store file {} does not exist yet, treating as empty", file_name);
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| PortalError::corrupt(&path, e))
    }

    /// Atomically replace a JSON map store.
    pub(crate) fn write_map<T: Serialize>(
        &self,
        file_name: &str,
        map: &BTreeMap<String, T>,
    ) -> Result<()> {
        let path = self.store_path(file_name);
        let content =
            serde_json::to_string_pretty(map).map_err(|e| PortalError::corrupt(&path, e))?;
        self.write_atomic(&path, content.as_bytes())
    }

    /// Read a single-object JSON store. `None` when the file is absent or
    /// empty.
    pub(crate) fn read_object<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>> {
        let path = self.store_path(file_name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PortalError::corrupt(&path, e))
    }

    /// Atomically replace a single-object JSON store.
    pub(crate) fn write_object<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let path = self.store_path(file_name);
        let content =
            serde_json::to_string_pretty(value).map_err(|e| PortalError::corrupt(&path, e))?;
        self.write_atomic(&path, content.as_bytes())
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl Connection for JsonConnection {
    type StudentRepository = StudentRepository;
    type ScheduleRepository = ScheduleRepository;
    type LedgerRepository = LedgerRepository;
    type RequestRepository = RequestRepository;
    type ParentRepository = ParentRepository;
    type ConfigRepository = ConfigRepository;

    fn create_student_repository(&self) -> Self::StudentRepository {
        StudentRepository::new(self.clone())
    }

    fn create_schedule_repository(&self) -> Self::ScheduleRepository {
        ScheduleRepository::new(self.clone())
    }

    fn create_ledger_repository(&self) -> Self::LedgerRepository {
        LedgerRepository::new(self.clone())
    }

    fn create_request_repository(&self) -> Self::RequestRepository {
        RequestRepository::new(self.clone())
    }

    fn create_parent_repository(&self) -> Self::ParentRepository {
        ParentRepository::new(self.clone())
    }

    fn create_config_repository(&self) -> Self::ConfigRepository {
        ConfigRepository::new(self.clone())
    }
}
