//! # Student repository
//!
//! All students live in a single `students.json` map keyed by student ID:
//!
//! ```json
//! {
//!   "std-1755950400123-9f2a": {
//!     "id": "std-1755950400123-9f2a",
//!     "name": "Ayesha Khan",
//!     "class": "Class 5",
//!     "guardian_name": "Imran Khan",
//!     "phone": "0300-1234567",
//!     "created_at": "2025-04-01T09:30:00+00:00",
//!     "updated_at": "2025-04-01T09:30:00+00:00"
//!   }
//! }
//! ```
//!
//! A record that no longer parses is skipped with a warning rather than
//! failing the whole listing.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::connection::JsonConnection;
use crate::domain::models::student::Student;
use crate::error::Result;
use crate::storage::traits::StudentStorage;

const STUDENTS_FILE: &str = "students.json";

/// Stored form of a student record, with string timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StudentRecord {
    id: String,
    name: String,
    class: String,
    guardian_name: String,
    phone: String,
    created_at: String,
    updated_at: String,
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            class: student.class.clone(),
            guardian_name: student.guardian_name.clone(),
            phone: student.phone.clone(),
            created_at: student.created_at.to_rfc3339(),
            updated_at: student.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<StudentRecord> for Student {
    type Error = String;

    fn try_from(record: StudentRecord) -> std::result::Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .map_err(|e| format!("Failed to parse created_at: {}", e))?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&record.updated_at)
            .map_err(|e| format!("Failed to parse updated_at: {}", e))?
            .with_timezone(&Utc);

        Ok(Student {
            id: record.id,
            name: record.name,
            class: record.class,
            guardian_name: record.guardian_name,
            phone: record.phone,
            created_at,
            updated_at,
        })
    }
}

/// Flat-file student repository over `students.json`.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    connection: JsonConnection,
}

impl StudentRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<BTreeMap<String, StudentRecord>> {
        self.connection.read_map(STUDENTS_FILE)
    }
}

impl StudentStorage for StudentRepository {
    fn store_student(&self, student: &Student) -> Result<()> {
        let mut records = self.read_records()?;
        records.insert(student.id.clone(), StudentRecord::from(student));
        self.connection.write_map(STUDENTS_FILE, &records)?;
        info!("Saved student {} ({})", student.name, student.id);
        Ok(())
    }

    fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        let mut records = self.read_records()?;
        match records.remove(student_id) {
            Some(record) => match Student::try_from(record) {
                Ok(student) => Ok(Some(student)),
                Err(e) => {
                    warn!("Skipping malformed student record {}: {}", student_id, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        let records = self.read_records()?;
        let mut students = Vec::new();
        for (id, record) in records {
            match Student::try_from(record) {
                Ok(student) => students.push(student),
                Err(e) => warn!("Skipping malformed student record {}: {}", id, e),
            }
        }
        Ok(students)
    }
}
