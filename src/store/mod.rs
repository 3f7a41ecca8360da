//! Document-store boundary
//!
//! The engine crosses a store boundary in exactly two places: fetching
//! candidate families/students before planning, and committing an
//! approved plan afterwards. Everything between those two calls is pure
//! computation on a single consistent snapshot. The `FamilyStore` trait
//! captures that boundary; implementations serialize concurrent writers
//! however the underlying store does (last-write-wins is acceptable for
//! the file-backed store).

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{AssignmentError, Result};
use crate::models::{ChildRecord, Family, Student, UnitPath};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// One child to append to a family document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildAddition {
    /// Unit inside the family that receives the child
    pub unit_path: UnitPath,
    /// The child record to append
    pub child: ChildRecord,
}

/// Async boundary to the family/student document store
///
/// Fetches may return supersets of the eligible sets; the engine
/// re-filters internally. Persistence is append-only and per-family: one
/// call carries every new child for one family, so the number of store
/// writes is bounded by the number of families touched.
#[allow(async_fn_in_trait)]
pub trait FamilyStore {
    /// Fetch family documents for a batch (any superset is acceptable)
    async fn fetch_families(&self, batch: &str) -> Result<Vec<Family>>;

    /// Fetch candidate students for a batch (any superset is acceptable)
    async fn fetch_students(&self, batch: &str) -> Result<Vec<Student>>;

    /// Append new children to one family document
    ///
    /// Implementations must re-check the duplicate-child invariant so a
    /// racing writer cannot place the same student twice.
    async fn persist_family_children(
        &self,
        family_id: &str,
        additions: &[ChildAddition],
    ) -> Result<()>;
}

/// Append additions to a family, enforcing the duplicate-child invariant
///
/// `existing_child_ids` must cover every child id in the store, not just
/// this family's, so a student can never become a child in two places.
pub(crate) fn apply_additions(
    family: &mut Family,
    additions: &[ChildAddition],
    existing_child_ids: &FxHashSet<String>,
) -> Result<()> {
    let mut incoming: FxHashSet<&str> = FxHashSet::default();
    for addition in additions {
        let id = addition.child.student_id.as_str();
        if existing_child_ids.contains(id) || !incoming.insert(id) {
            return Err(AssignmentError::Store(format!(
                "student {id} is already assigned as a child"
            )));
        }
        if family.unit_at(addition.unit_path).is_none() {
            return Err(AssignmentError::Store(format!(
                "family {} has no unit at {}",
                family.id, addition.unit_path
            )));
        }
    }
    for addition in additions {
        // Checked above.
        if let Some(unit) = family.unit_at_mut(addition.unit_path) {
            unit.children.push(addition.child.clone());
        }
    }
    Ok(())
}
