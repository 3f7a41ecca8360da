//! Pre-execution plan validation
//!
//! A plan is validated against the family collection it will be applied
//! to just before execution: duplicate students, students already placed
//! as children, capacity overruns and broken birth-order numbering all
//! reject the plan. Planning and review happen on in-memory data, so
//! this is the last line of defense before writes are issued.

use super::config::AssignmentConfig;
use super::types::AssignmentPlan;
use crate::error::{AssignmentError, Result};
use crate::models::Family;
use rustc_hash::{FxHashMap, FxHashSet};

/// Check a plan's invariants against the families it targets
pub fn validate_plan(
    plan: &AssignmentPlan,
    families: &[Family],
    config: &AssignmentConfig,
) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for assignment in &plan.assignments {
        if !seen.insert(assignment.student_id.as_str()) {
            return Err(AssignmentError::PlanValidation(format!(
                "student {} appears more than once in the plan",
                assignment.student_id
            )));
        }
    }

    let already_children: FxHashSet<&str> =
        families.iter().flat_map(Family::child_ids).collect();
    for assignment in &plan.assignments {
        if already_children.contains(assignment.student_id.as_str()) {
            return Err(AssignmentError::PlanValidation(format!(
                "student {} is already a child in a family",
                assignment.student_id
            )));
        }
    }

    let family_index: FxHashMap<&str, &Family> =
        families.iter().map(|f| (f.id.as_str(), f)).collect();

    // Per-unit counts and birth-order continuity.
    let mut per_unit: FxHashMap<(&str, usize, usize), u32> = FxHashMap::default();
    for assignment in &plan.assignments {
        let family = family_index.get(assignment.family_id.as_str()).ok_or_else(|| {
            AssignmentError::PlanValidation(format!(
                "plan references unknown family {}",
                assignment.family_id
            ))
        })?;
        let unit = family.unit_at(assignment.unit_path).ok_or_else(|| {
            AssignmentError::PlanValidation(format!(
                "plan references missing unit ({}) in family {}",
                assignment.unit_path, assignment.family_id
            ))
        })?;

        let key = (
            assignment.family_id.as_str(),
            assignment.unit_path.group,
            assignment.unit_path.unit,
        );
        let added = per_unit.entry(key).or_insert(0);
        *added += 1;

        let expected_order = unit.children.len() as u32 + *added;
        if assignment.birth_order != expected_order {
            return Err(AssignmentError::PlanValidation(format!(
                "student {} has birth order {} but unit {} of family {} expects {}",
                assignment.student_id,
                assignment.birth_order,
                assignment.unit_path,
                assignment.family_id,
                expected_order
            )));
        }

        if unit.children.len() as u32 + *added > config.max_children_per_unit {
            return Err(AssignmentError::PlanValidation(format!(
                "unit {} of family {} would exceed the cap of {} children",
                assignment.unit_path, assignment.family_id, config.max_children_per_unit
            )));
        }
    }

    Ok(())
}
