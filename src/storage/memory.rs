//! # In-memory storage backend
//!
//! Backs the same traits as the flat-file stores with plain maps behind a
//! mutex, so service logic can be exercised without touching the
//! filesystem. Every repository created from one [`MemoryConnection`]
//! shares the same state, and listings come back in the same order the
//! flat-file stores would produce.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::domain::models::fee_schedule::FeeSchedule;
use crate::domain::models::ledger::LedgerEntry;
use crate::domain::models::parent::ParentAccount;
use crate::domain::models::payment_request::PaymentRequest;
use crate::domain::models::school_config::SchoolConfig;
use crate::domain::models::student::Student;
use crate::error::Result;
use crate::storage::traits::{
    ConfigStorage, Connection, LedgerStorage, ParentStorage, PaymentRequestStorage,
    ScheduleStorage, StudentStorage,
};

#[derive(Debug, Default)]
struct MemoryState {
    students: BTreeMap<String, Student>,
    schedules: BTreeMap<String, FeeSchedule>,
    ledger: Vec<LedgerEntry>,
    requests: BTreeMap<String, Vec<PaymentRequest>>,
    parents: BTreeMap<String, ParentAccount>,
    school_config: Option<SchoolConfig>,
    default_fees: Option<FeeSchedule>,
}

/// In-memory storage connection.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn repository(&self) -> MemoryRepository {
        MemoryRepository {
            state: self.state.clone(),
        }
    }
}

/// Repository handle over the shared in-memory state. One type implements
/// every storage trait.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl StudentStorage for MemoryRepository {
    fn store_student(&self, student: &Student) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.students.insert(student.id.clone(), student.clone());
        Ok(())
    }

    fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        let state = self.state.lock().unwrap();
        Ok(state.students.get(student_id).cloned())
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        let state = self.state.lock().unwrap();
        Ok(state.students.values().cloned().collect())
    }
}

impl ScheduleStorage for MemoryRepository {
    fn store_schedule(&self, student_id: &str, schedule: &FeeSchedule) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.schedules.insert(student_id.to_string(), *schedule);
        Ok(())
    }

    fn get_schedule(&self, student_id: &str) -> Result<Option<FeeSchedule>> {
        let state = self.state.lock().unwrap();
        Ok(state.schedules.get(student_id).copied())
    }
}

impl LedgerStorage for MemoryRepository {
    fn append_entry(&self, entry: &LedgerEntry) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.ledger.push(entry.clone());
        Ok(())
    }

    fn list_entries_for_student(&self, student_id: &str) -> Result<Vec<LedgerEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .ledger
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    fn list_entries(&self) -> Result<Vec<LedgerEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.ledger.clone())
    }
}

impl PaymentRequestStorage for MemoryRepository {
    fn append_request(&self, request: &PaymentRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .requests
            .entry(request.student_id.clone())
            .or_default()
            .push(request.clone());
        Ok(())
    }

    fn list_requests_for_student(&self, student_id: &str) -> Result<Vec<PaymentRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state.requests.get(student_id).cloned().unwrap_or_default())
    }

    fn list_all_requests(&self) -> Result<Vec<PaymentRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state.requests.values().flatten().cloned().collect())
    }

    fn update_request(&self, request: &PaymentRequest) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        for request_list in state.requests.values_mut() {
            if let Some(slot) = request_list.iter_mut().find(|r| r.id == request.id) {
                *slot = request.clone();
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl ParentStorage for MemoryRepository {
    fn store_parent(&self, parent: &ParentAccount) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.parents.insert(parent.email.clone(), parent.clone());
        Ok(())
    }

    fn get_parent(&self, email: &str) -> Result<Option<ParentAccount>> {
        let state = self.state.lock().unwrap();
        Ok(state.parents.get(email).cloned())
    }

    fn list_parents(&self) -> Result<Vec<ParentAccount>> {
        let state = self.state.lock().unwrap();
        Ok(state.parents.values().cloned().collect())
    }
}

impl ConfigStorage for MemoryRepository {
    fn store_school_config(&self, config: &SchoolConfig) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.school_config = Some(config.clone());
        Ok(())
    }

    fn get_school_config(&self) -> Result<Option<SchoolConfig>> {
        let state = self.state.lock().unwrap();
        Ok(state.school_config.clone())
    }

    fn store_default_fees(&self, fees: &FeeSchedule) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.default_fees = Some(*fees);
        Ok(())
    }

    fn get_default_fees(&self) -> Result<Option<FeeSchedule>> {
        let state = self.state.lock().unwrap();
        Ok(state.default_fees)
    }
}

impl Connection for MemoryConnection {
    type StudentRepository = MemoryRepository;
    type ScheduleRepository = MemoryRepository;
    type LedgerRepository = MemoryRepository;
    type RequestRepository = MemoryRepository;
    type ParentRepository = MemoryRepository;
    type ConfigRepository = MemoryRepository;

    fn create_student_repository(&self) -> Self::StudentRepository {
        self.repository()
    }

    fn create_schedule_repository(&self) -> Self::ScheduleRepository {
        self.repository()
    }

    fn create_ledger_repository(&self) -> Self::LedgerRepository {
        self.repository()
    }

    fn create_request_repository(&self) -> Self::RequestRepository {
        self.repository()
    }

    fn create_parent_repository(&self) -> Self::ParentRepository {
        self.repository()
    }

    fn create_config_repository(&self) -> Self::ConfigRepository {
        self.repository()
    }
}
