//! # Parent account repository
//!
//! Parent portal accounts, stored as a single `parents.json` map keyed by
//! email:
//!
//! ```json
//! {
//!   "parent@example.com": {
//!     "email": "parent@example.com",
//!     "name": "Imran Khan",
//!     "phone": "0300-1234567",
//!     "password_hash": "…",
//!     "student_ids": ["std-001"],
//!     "status": "active",
//!     "created_at": "2025-04-01T09:30:00+00:00"
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::connection::JsonConnection;
use crate::domain::models::parent::{AccountStatus, ParentAccount};
use crate::error::Result;
use crate::storage::traits::ParentStorage;

const PARENTS_FILE: &str = "parents.json";

/// Stored form of a parent account, with string status and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParentRecord {
    email: String,
    name: String,
    phone: String,
    password_hash: String,
    student_ids: Vec<String>,
    status: String,
    created_at: String,
}

impl From<&ParentAccount> for ParentRecord {
    fn from(parent: &ParentAccount) -> Self {
        Self {
            email: parent.email.clone(),
            name: parent.name.clone(),
            phone: parent.phone.clone(),
            password_hash: parent.password_hash.clone(),
            student_ids: parent.student_ids.clone(),
            status: parent.status.to_string(),
            created_at: parent.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ParentRecord> for ParentAccount {
    type Error = String;

    fn try_from(record: ParentRecord) -> std::result::Result<Self, Self::Error> {
        let status = AccountStatus::from_string(&record.status)?;
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .map_err(|e| format!("Failed to parse created_at: {}", e))?
            .with_timezone(&Utc);

        Ok(ParentAccount {
            email: record.email,
            name: record.name,
            phone: record.phone,
            password_hash: record.password_hash,
            student_ids: record.student_ids,
            status,
            created_at,
        })
    }
}

/// Flat-file parent account repository over `parents.json`.
#[derive(Debug, Clone)]
pub struct ParentRepository {
    connection: JsonConnection,
}

impl ParentRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<BTreeMap<String, ParentRecord>> {
        self.connection.read_map(PARENTS_FILE)
    }
}

impl ParentStorage for ParentRepository {
    fn store_parent(&self, parent: &ParentAccount) -> Result<()> {
        let mut records = self.read_records()?;
        records.insert(parent.email.clone(), ParentRecord::from(parent));
        self.connection.write_map(PARENTS_FILE, &records)?;
        info!("Saved parent account {}", parent.email);
        Ok(())
    }

    fn get_parent(&self, email: &str) -> Result<Option<ParentAccount>> {
        let mut records = self.read_records()?;
        match records.remove(email) {
            Some(record) => match ParentAccount::try_from(record) {
                Ok(parent) => Ok(Some(parent)),
                Err(e) => {
                    warn!("Skipping malformed parent record {}: {}", email, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn list_parents(&self) -> Result<Vec<ParentAccount>> {
        let records = self.read_records()?;
        let mut parents = Vec::new();
        for (email, record) in records {
            match ParentAccount::try_from(record) {
                Ok(parent) => parents.push(parent),
                Err(e) => warn!("Skipping malformed parent record {}: {}", email, e),
            }
        }
        Ok(parents)
    }
}
