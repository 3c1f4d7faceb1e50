//! In-memory adapters for exercising the HTTP surface without PostgreSQL.
//!
//! Compiled for unit tests and behind the `test-support` feature so the
//! integration suites under `tests/` can wire a full [`HttpState`] without a
//! database. The adapters mirror the Diesel implementations' observable
//! behaviour: duplicate students are rejected, labs list by name, choice
//! replacement is all-or-nothing, and unknown labs or students surface as the
//! matching port errors.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::DefaultClock;

use crate::domain::ports::{
    ChoiceRepository, ChoiceRepositoryError, LabRepository, LabRepositoryError, SeedOutcome,
    StudentPersistenceError, StudentRepository,
};
use crate::domain::{
    AccountService, ChoiceService, ChoiceTally, DemandReportService, Lab, LabId, NewLab,
    RankedChoices, Student, StudentId,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::crypto::{MIN_ROUNDS, Pbkdf2Hasher};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Student store keyed by identifier.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    students: Mutex<BTreeMap<StudentId, Student>>,
}

impl InMemoryStudentRepository {
    /// True when `id` has registered.
    pub fn contains(&self, id: &StudentId) -> bool {
        lock(&self.students).contains_key(id)
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn insert(&self, student: &Student) -> Result<(), StudentPersistenceError> {
        let mut students = lock(&self.students);
        if students.contains_key(student.id()) {
            return Err(StudentPersistenceError::duplicate(student.id().as_ref()));
        }
        students.insert(student.id().clone(), student.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &StudentId,
    ) -> Result<Option<Student>, StudentPersistenceError> {
        Ok(lock(&self.students).get(id).cloned())
    }
}

/// Lab catalogue assigning sequential identifiers from 1.
#[derive(Debug, Default)]
pub struct InMemoryLabRepository {
    labs: Mutex<Vec<Lab>>,
}

impl InMemoryLabRepository {
    /// Create a catalogue already holding `names`, numbered in order.
    pub fn with_names(names: &[&str]) -> Self {
        let labs = names
            .iter()
            .zip(1..)
            .filter_map(|(name, id)| {
                let id = LabId::new(id).ok()?;
                Lab::new(id, *name, None, None).ok()
            })
            .collect();
        Self {
            labs: Mutex::new(labs),
        }
    }

    /// Identifier of the lab called `name`.
    pub fn id_of(&self, name: &str) -> Option<LabId> {
        lock(&self.labs)
            .iter()
            .find(|lab| lab.name() == name)
            .map(Lab::id)
    }

    fn contains(&self, id: LabId) -> bool {
        lock(&self.labs).iter().any(|lab| lab.id() == id)
    }
}

#[async_trait]
impl LabRepository for InMemoryLabRepository {
    async fn list_labs(&self) -> Result<Vec<Lab>, LabRepositoryError> {
        let mut labs = lock(&self.labs).clone();
        labs.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(labs)
    }

    async fn seed_if_empty(&self, seeds: &[NewLab]) -> Result<SeedOutcome, LabRepositoryError> {
        let mut labs = lock(&self.labs);
        if !labs.is_empty() {
            return Ok(SeedOutcome::AlreadyPopulated {
                existing: u64::try_from(labs.len()).unwrap_or(u64::MAX),
            });
        }
        let seeded = seeds
            .iter()
            .zip(1..)
            .map(|(seed, id)| {
                let id = LabId::new(id).map_err(|err| LabRepositoryError::query(err.to_string()))?;
                Lab::new(
                    id,
                    seed.name.clone(),
                    seed.staff.clone(),
                    seed.capacity,
                )
                .map_err(|err| LabRepositoryError::query(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = seeded.len();
        *labs = seeded;
        Ok(SeedOutcome::Seeded { inserted })
    }
}

/// Choice ledger enforcing the same references as the database schema.
pub struct InMemoryChoiceRepository {
    students: Arc<InMemoryStudentRepository>,
    labs: Arc<InMemoryLabRepository>,
    choices: Mutex<BTreeMap<StudentId, RankedChoices>>,
}

impl InMemoryChoiceRepository {
    /// Create a ledger validating against the given stores.
    pub fn new(students: Arc<InMemoryStudentRepository>, labs: Arc<InMemoryLabRepository>) -> Self {
        Self {
            students,
            labs,
            choices: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of students with stored choices.
    pub fn submitted_students(&self) -> usize {
        lock(&self.choices).len()
    }
}

#[async_trait]
impl ChoiceRepository for InMemoryChoiceRepository {
    async fn replace_for_student(
        &self,
        student: &StudentId,
        ranked: &RankedChoices,
    ) -> Result<(), ChoiceRepositoryError> {
        if !self.students.contains(student) {
            return Err(ChoiceRepositoryError::unknown_student(student.as_ref()));
        }
        if let Some((_, lab)) = ranked
            .entries()
            .into_iter()
            .find(|(_, lab)| !self.labs.contains(*lab))
        {
            return Err(ChoiceRepositoryError::unknown_lab(format!(
                "lab {} does not exist",
                lab.get()
            )));
        }
        lock(&self.choices).insert(student.clone(), *ranked);
        Ok(())
    }

    async fn find_for_student(
        &self,
        student: &StudentId,
    ) -> Result<Option<RankedChoices>, ChoiceRepositoryError> {
        Ok(lock(&self.choices).get(student).copied())
    }

    async fn tally(&self) -> Result<Vec<ChoiceTally>, ChoiceRepositoryError> {
        let mut counts: BTreeMap<(LabId, crate::domain::Priority), u64> = BTreeMap::new();
        for ranked in lock(&self.choices).values() {
            for (priority, lab) in ranked.entries() {
                *counts.entry((lab, priority)).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|((lab_id, priority), count)| ChoiceTally {
                lab_id,
                priority,
                count,
            })
            .collect())
    }
}

/// In-memory stores plus the services built on them.
pub struct InMemoryBackend {
    /// Registered students.
    pub students: Arc<InMemoryStudentRepository>,
    /// Lab catalogue.
    pub labs: Arc<InMemoryLabRepository>,
    /// Stored rankings.
    pub choices: Arc<InMemoryChoiceRepository>,
}

impl InMemoryBackend {
    /// Create a backend whose catalogue holds `lab_names`.
    pub fn with_labs(lab_names: &[&str]) -> Self {
        let students = Arc::new(InMemoryStudentRepository::default());
        let labs = Arc::new(InMemoryLabRepository::with_names(lab_names));
        let choices = Arc::new(InMemoryChoiceRepository::new(
            Arc::clone(&students),
            Arc::clone(&labs),
        ));
        Self {
            students,
            labs,
            choices,
        }
    }

    /// Wire the real services over these stores.
    ///
    /// Passwords are hashed with the minimum PBKDF2 cost to keep suites fast.
    pub fn http_state(&self) -> HttpState {
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&self.students),
            Arc::new(Pbkdf2Hasher::new(MIN_ROUNDS)),
            Arc::new(DefaultClock),
        ));
        let choice_service = Arc::new(ChoiceService::new(Arc::clone(&self.choices)));
        let report = Arc::new(DemandReportService::new(
            Arc::clone(&self.labs),
            Arc::clone(&self.choices),
        ));
        HttpState::new(HttpStatePorts {
            login: accounts.clone(),
            registration: accounts,
            submission: choice_service.clone(),
            choices: choice_service,
            report,
        })
    }
}
