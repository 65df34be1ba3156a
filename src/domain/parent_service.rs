//! Parent account records and their student links.
//!
//! The portal stores and reads the account records; issuing and checking
//! passwords happens outside this crate.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::parents::RegisterParentCommand;
use crate::domain::models::parent::{AccountStatus, ParentAccount, ParentValidationError};
use crate::domain::models::student::Student;
use crate::error::Result;
use crate::storage::{Connection, ParentStorage, StudentStorage};

/// Service for managing parent accounts.
#[derive(Clone)]
pub struct ParentService<C: Connection> {
    parent_repository: C::ParentRepository,
    student_repository: C::StudentRepository,
}

impl<C: Connection> ParentService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            parent_repository: connection.create_parent_repository(),
            student_repository: connection.create_student_repository(),
        }
    }

    /// Create a parent account record. The email is the account key,
    /// stored lowercase, and must be unused.
    pub fn register_parent(&self, command: RegisterParentCommand) -> Result<ParentAccount> {
        let email = command.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ParentValidationError::InvalidEmail.into());
        }
        if command.name.trim().is_empty() {
            return Err(ParentValidationError::EmptyName.into());
        }
        if self.parent_repository.get_parent(&email)?.is_some() {
            return Err(ParentValidationError::EmailAlreadyRegistered.into());
        }

        let parent = ParentAccount {
            email,
            name: command.name.trim().to_string(),
            phone: command.phone.trim().to_string(),
            password_hash: command.password_hash,
            student_ids: command.student_ids,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        self.parent_repository.store_parent(&parent)?;
        info!("Registered parent account {}", parent.email);
        Ok(parent)
    }

    pub fn get_parent(&self, email: &str) -> Result<Option<ParentAccount>> {
        self.parent_repository.get_parent(&email.trim().to_lowercase())
    }

    pub fn list_parents(&self) -> Result<Vec<ParentAccount>> {
        self.parent_repository.list_parents()
    }

    /// Link another student to an existing parent account. Returns the
    /// updated record, or `None` when the account is missing. Linking the
    /// same student twice is a no-op.
    pub fn link_student(&self, email: &str, student_id: &str) -> Result<Option<ParentAccount>> {
        let mut parent = match self.get_parent(email)? {
            Some(parent) => parent,
            None => return Ok(None),
        };

        if !parent.student_ids.iter().any(|id| id == student_id) {
            parent.student_ids.push(student_id.to_string());
            self.parent_repository.store_parent(&parent)?;
            info!("Linked student {} to parent {}", student_id, parent.email);
        }
        Ok(Some(parent))
    }

    /// The students a parent is linked to, skipping links that no longer
    /// resolve to a roster record.
    pub fn students_for(&self, email: &str) -> Result<Vec<Student>> {
        let parent = match self.get_parent(email)? {
            Some(parent) => parent,
            None => return Ok(Vec::new()),
        };

        let mut students = Vec::new();
        for student_id in &parent.student_ids {
            match self.student_repository.get_student(student_id)? {
                Some(student) => students.push(student),
                None => warn!(
                    "Parent {} links to unknown student {}",
                    parent.email, student_id
                ),
            }
        }
        Ok(students)
    }
}
