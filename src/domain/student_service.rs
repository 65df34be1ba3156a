//! Student roster logic: registration and lookups.

use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::commands::students::RegisterStudentCommand;
use crate::domain::models::student::{Student, StudentValidationError};
use crate::error::Result;
use crate::storage::{Connection, StudentStorage};

const MAX_NAME_LENGTH: usize = 100;

/// Service for managing the student roster.
#[derive(Clone)]
pub struct StudentService<C: Connection> {
    student_repository: C::StudentRepository,
}

impl<C: Connection> StudentService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            student_repository: connection.create_student_repository(),
        }
    }

    /// Register a new student and hand back the stored record.
    pub fn register_student(&self, command: RegisterStudentCommand) -> Result<Student> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(StudentValidationError::EmptyName.into());
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(StudentValidationError::NameTooLong.into());
        }
        if command.class.trim().is_empty() {
            return Err(StudentValidationError::EmptyClass.into());
        }

        let now = Utc::now();
        let student = Student {
            id: Student::generate_id(now.timestamp_millis()),
            name: name.to_string(),
            class: command.class.trim().to_string(),
            guardian_name: command.guardian_name.trim().to_string(),
            phone: command.phone.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.student_repository.store_student(&student)?;
        info!("Registered student {} in {}", student.name, student.class);
        Ok(student)
    }

    pub fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        self.student_repository.get_student(student_id)
    }

    pub fn list_students(&self) -> Result<Vec<Student>> {
        self.student_repository.list_students()
    }

    /// All students in one class, roster order.
    pub fn students_in_class(&self, class: &str) -> Result<Vec<Student>> {
        let students = self.list_students()?;
        Ok(students.into_iter().filter(|s| s.class == class).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortalError;
    use crate::storage::memory::MemoryConnection;

    fn setup() -> StudentService<MemoryConnection> {
        StudentService::new(Arc::new(MemoryConnection::new()))
    }

    fn register_command(name: &str, class: &str) -> RegisterStudentCommand {
        RegisterStudentCommand {
            name: name.to_string(),
            class: class.to_string(),
            guardian_name: "Imran Khan".to_string(),
            phone: "0300-1234567".to_string(),
        }
    }

    #[test]
    fn test_register_and_get_roundtrip() {
        let service = setup();
        let student = service
            .register_student(register_command("Ayesha Khan", "Class 5"))
            .unwrap();
        assert!(student.id.starts_with("std-"));

        let loaded = service.get_student(&student.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Ayesha Khan");
        assert_eq!(loaded.class, "Class 5");
    }

    #[test]
    fn test_register_trims_whitespace() {
        let service = setup();
        let student = service
            .register_student(register_command("  Ayesha Khan  ", " Class 5 "))
            .unwrap();
        assert_eq!(student.name, "Ayesha Khan");
        assert_eq!(student.class, "Class 5");
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let service = setup();
        let result = service.register_student(register_command("   ", "Class 5"));
        assert!(matches!(
            result,
            Err(PortalError::InvalidStudent(StudentValidationError::EmptyName))
        ));
    }

    #[test]
    fn test_register_rejects_empty_class() {
        let service = setup();
        let result = service.register_student(register_command("Ayesha Khan", ""));
        assert!(matches!(
            result,
            Err(PortalError::InvalidStudent(StudentValidationError::EmptyClass))
        ));
    }

    #[test]
    fn test_students_in_class_filters_the_roster() {
        let service = setup();
        service.register_student(register_command("A", "Class 5")).unwrap();
        service.register_student(register_command("B", "Class 6")).unwrap();
        service.register_student(register_command("C", "Class 5")).unwrap();

        let class5 = service.students_in_class("Class 5").unwrap();
        assert_eq!(class5.len(), 2);
        assert!(class5.iter().all(|s| s.class == "Class 5"));
    }
}
