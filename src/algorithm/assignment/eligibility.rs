//! Eligibility filtering for families and students
//!
//! This module selects the family units that can receive children (both
//! parents present, spare capacity) and the students that can still be
//! assigned (not already a child anywhere). It runs once per planning
//! invocation, before the planner loop, on data already fetched.

use super::config::AssignmentConfig;
use crate::models::{ChildRecord, Family, ParentLink, Student, UnitPath};
use rustc_hash::FxHashSet;

/// A family unit that can receive assigned children
#[derive(Debug, Clone)]
pub struct EligibleUnit {
    /// Id of the owning family
    pub family_id: String,
    /// Display name of the owning family
    pub family_name: String,
    /// Whether the owning family accepts students from other batches
    pub allow_other_batches: bool,
    /// Position of the unit inside the family
    pub unit_path: UnitPath,
    /// Father snapshot
    pub father: ParentLink,
    /// Mother snapshot
    pub mother: ParentLink,
    /// Children already assigned to the unit
    pub existing_children: Vec<ChildRecord>,
}

/// The eligible inputs for one planning run
#[derive(Debug, Clone, Default)]
pub struct EligiblePool {
    /// Units able to receive children, ordered by ascending current child
    /// count so emptier families fill first
    pub units: Vec<EligibleUnit>,
    /// Unassigned students in the target batch, sorted by (batch, id)
    pub in_batch: Vec<Student>,
    /// Unassigned students outside the target batch, sorted by
    /// (batch, id); offered only to families that allow other batches
    pub out_of_batch: Vec<Student>,
}

impl EligiblePool {
    /// Total number of unassigned eligible students
    #[must_use]
    pub fn student_count(&self) -> usize {
        self.in_batch.len() + self.out_of_batch.len()
    }
}

/// Select eligible family units and students
///
/// Empty inputs produce empty pools, never an error; the planner treats
/// an empty pool as a zero-assignment plan.
#[must_use]
pub fn filter_eligible(
    families: &[Family],
    students: &[Student],
    config: &AssignmentConfig,
) -> EligiblePool {
    // Ids of students who are already a child in any fetched family,
    // eligible or not.
    let assigned_ids: FxHashSet<&str> = families.iter().flat_map(Family::child_ids).collect();

    let mut units = Vec::new();
    for family in families {
        for (unit_path, unit) in family.units_with_paths() {
            let (Some(father), Some(mother)) = (&unit.father, &unit.mother) else {
                continue;
            };
            if unit.children.len() >= config.max_children_per_unit as usize {
                continue;
            }
            units.push(EligibleUnit {
                family_id: family.id.clone(),
                family_name: family.name.clone(),
                allow_other_batches: family.allow_other_batches,
                unit_path,
                father: father.clone(),
                mother: mother.clone(),
                existing_children: unit.children.clone(),
            });
        }
    }
    // Stable: ties keep document order.
    units.sort_by_key(|u| u.existing_children.len());

    let mut in_batch = Vec::new();
    let mut out_of_batch = Vec::new();
    for student in students {
        if assigned_ids.contains(student.id.as_str()) {
            continue;
        }
        if student.batch == config.batch {
            in_batch.push(student.clone());
        } else {
            out_of_batch.push(student.clone());
        }
    }
    in_batch.sort_by(|a, b| a.batch.cmp(&b.batch).then_with(|| a.id.cmp(&b.id)));
    out_of_batch.sort_by(|a, b| a.batch.cmp(&b.batch).then_with(|| a.id.cmp(&b.id)));

    EligiblePool {
        units,
        in_batch,
        out_of_batch,
    }
}
