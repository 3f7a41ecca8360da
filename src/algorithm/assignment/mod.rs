//! Auto-assignment engine
//!
//! This module implements the assignment pipeline for placing students
//! into family units:
//!
//! 1. Eligibility filtering of family units and students
//! 2. Location signature extraction at a configurable granularity
//! 3. Candidate scoring under a homogeneity or diversity objective
//! 4. The greedy, deterministic assignment planner
//! 5. Plan statistics with threshold-based quality labels
//!
//! Everything here is pure computation over already-fetched data; the
//! store boundary and the plan executor live in `crate::store` and
//! `crate::workflow`.

pub mod config;
pub mod eligibility;
pub mod engine;
pub mod location;
pub mod planner;
pub mod scoring;
pub mod statistics;
pub mod types;
pub mod validation;

// Re-export key types
pub use config::{AssignmentConfig, AssignmentConfigBuilder, MAX_CHILDREN_PER_UNIT, MIN_CHILDREN_PER_UNIT};
pub use eligibility::{EligiblePool, EligibleUnit, filter_eligible};
pub use engine::{AssignmentEngine, PreviewOutcome};
pub use location::{Granularity, LocationSignature, unit_signature};
pub use planner::AssignmentPlanner;
pub use scoring::{MatchOutcome, address_match, diversity_score};
pub use statistics::{AssignmentStatistics, QualityLabel, QualityMeasure, QualityThresholds, summarize};
pub use types::{AssignmentFailure, AssignmentPlan, FailedAssignment, ProposedAssignment};
pub use validation::validate_plan;
