//! Type definitions for the assignment planner
//!
//! This module contains the in-memory plan types produced by the planner
//! and consumed by the statistics aggregator, the UI layer and the plan
//! executor. A plan is never partially persisted; it is either discarded
//! or handed unmodified to the executor.

use crate::models::{Address, AssignmentMode, Gender, Relationship, UnitPath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One proposed placement of a student into a family unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAssignment {
    /// Target family id
    pub family_id: String,
    /// Target family display name
    pub family_name: String,
    /// Position of the receiving unit inside the family
    pub unit_path: UnitPath,
    /// Assigned student id
    pub student_id: String,
    /// Assigned student display name
    pub student_name: String,
    /// Student gender
    pub gender: Gender,
    /// Student batch
    pub batch: String,
    /// Student address snapshot, carried into the persisted child record
    #[serde(default)]
    pub address: Address,
    /// Son or daughter, derived from gender
    pub relationship: Relationship,
    /// 1-based position among the unit's children, continuing after any
    /// pre-existing children
    pub birth_order: u32,
    /// Matched address label (homogeneous mode, full match only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_match: Option<String>,
    /// Diversity score (heterogeneous mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_score: Option<f64>,
}

/// Why a family unit was left with unfilled capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentFailure {
    /// No unassigned eligible students remained
    NoEligibleStudents,
    /// Unassigned students remained, but all were outside the family's
    /// batch and the family does not accept other batches
    BatchRestricted,
}

impl fmt::Display for AssignmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleStudents => write!(f, "insufficient eligible students"),
            Self::BatchRestricted => {
                write!(f, "remaining students are outside the family's batch")
            }
        }
    }
}

/// A family unit the planner could not fill to capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedAssignment {
    /// Family id
    pub family_id: String,
    /// Family display name
    pub family_name: String,
    /// Position of the unit inside the family
    pub unit_path: UnitPath,
    /// Number of slots the planner could not fill
    pub unfilled_slots: u32,
    /// Human-readable cause
    pub reason: AssignmentFailure,
}

/// The ordered output of one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPlan {
    /// Objective the plan was computed under
    pub mode: AssignmentMode,
    /// Proposed assignments, in planner emission order
    pub assignments: Vec<ProposedAssignment>,
    /// Units left with unfilled capacity
    pub failed: Vec<FailedAssignment>,
}

impl AssignmentPlan {
    /// Whether the plan proposes no assignments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
