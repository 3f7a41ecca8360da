//! In-memory store implementation
//!
//! Backs tests and demos. Supports injecting per-family persistence
//! failures so the executor's partial-failure behavior can be exercised
//! without a real store.

use super::{ChildAddition, FamilyStore, apply_additions};
use crate::error::{AssignmentError, Result};
use crate::models::{Family, FamilyCollection, Student};
use rustc_hash::FxHashSet;
use std::sync::Mutex;

/// An in-memory family/student store
#[derive(Debug)]
pub struct MemoryStore {
    families: Mutex<FamilyCollection>,
    students: Vec<Student>,
    failing_families: FxHashSet<String>,
}

impl MemoryStore {
    /// Create a store over the given families and students
    #[must_use]
    pub fn new(families: Vec<Family>, students: Vec<Student>) -> Self {
        Self {
            families: Mutex::new(FamilyCollection::from_families(families)),
            students,
            failing_families: FxHashSet::default(),
        }
    }

    /// Force `persist_family_children` to fail for the given families
    #[must_use]
    pub fn with_failing_families(mut self, family_ids: &[&str]) -> Self {
        self.failing_families = family_ids.iter().map(|id| (*id).to_string()).collect();
        self
    }

    /// Snapshot of the current family documents, in insertion order
    #[must_use]
    pub fn families_snapshot(&self) -> Vec<Family> {
        self.families
            .lock()
            .expect("family store lock poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

impl FamilyStore for MemoryStore {
    async fn fetch_families(&self, _batch: &str) -> Result<Vec<Family>> {
        Ok(self.families_snapshot())
    }

    async fn fetch_students(&self, _batch: &str) -> Result<Vec<Student>> {
        Ok(self.students.clone())
    }

    async fn persist_family_children(
        &self,
        family_id: &str,
        additions: &[ChildAddition],
    ) -> Result<()> {
        if self.failing_families.contains(family_id) {
            return Err(AssignmentError::Store(format!(
                "injected failure for family {family_id}"
            )));
        }

        let mut families = self.families.lock().expect("family store lock poisoned");
        let existing_ids: FxHashSet<String> = families
            .iter()
            .flat_map(Family::child_ids)
            .map(str::to_string)
            .collect();
        let family = families.get_mut(family_id).ok_or_else(|| {
            AssignmentError::Store(format!("unknown family {family_id}"))
        })?;
        apply_additions(family, additions, &existing_ids)
    }
}
