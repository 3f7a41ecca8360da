//! Engine facade over the assignment pipeline
//!
//! This module implements the `AssignmentEngine`, which orchestrates one
//! planning pass: configuration validation, eligibility filtering, the
//! greedy planner, and statistics aggregation. The engine is pure with
//! respect to persistence; previews can be recomputed at will.

use super::config::AssignmentConfig;
use super::eligibility::filter_eligible;
use super::planner::AssignmentPlanner;
use super::statistics::{AssignmentStatistics, summarize};
use super::types::AssignmentPlan;
use crate::error::Result;
use crate::models::{Family, Student};
use log::info;
use std::time::Instant;

/// A computed preview: the plan plus its summary
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOutcome {
    /// The proposed plan
    pub plan: AssignmentPlan,
    /// Summary statistics over the plan
    pub statistics: AssignmentStatistics,
}

/// Engine for computing assignment previews
#[derive(Debug)]
pub struct AssignmentEngine {
    config: AssignmentConfig,
}

impl AssignmentEngine {
    /// Create a new engine with the given configuration
    #[must_use]
    pub const fn new(config: AssignmentConfig) -> Self {
        Self { config }
    }

    /// The configuration the engine plans under
    #[must_use]
    pub const fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    /// Compute a preview over already-fetched data
    ///
    /// # Arguments
    ///
    /// * `families` - Family documents; any superset of the eligible set
    ///   is accepted and re-filtered internally
    /// * `students` - Student records for the candidate pool
    ///
    /// # Returns
    ///
    /// The proposed plan and its statistics. Empty inputs produce an
    /// empty plan with zeroed statistics, not an error.
    pub fn preview(&self, families: &[Family], students: &[Student]) -> Result<PreviewOutcome> {
        self.config.validate()?;
        let start = Instant::now();

        let pool = filter_eligible(families, students, &self.config);
        info!(
            "Planning {} mode assignment: {} eligible units, {} eligible students ({} in batch {})",
            self.config.mode,
            pool.units.len(),
            pool.student_count(),
            pool.in_batch.len(),
            self.config.batch
        );

        let plan = AssignmentPlanner::new(self.config.clone()).plan(&pool);
        let statistics = summarize(&plan, &self.config.thresholds);

        info!(
            "Planned {} assignments across {} families ({} units unfilled) in {:.2?}",
            statistics.total_assignments,
            statistics.families_affected,
            plan.failed.len(),
            start.elapsed()
        );

        Ok(PreviewOutcome { plan, statistics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::utils::test_support::{family_with_unit, student, unit};

    #[test]
    fn test_preview_rejects_invalid_config() {
        let engine = AssignmentEngine::new(AssignmentConfig::default());
        assert!(engine.preview(&[], &[]).is_err());
    }

    #[test]
    fn test_preview_of_empty_inputs_is_empty_plan() {
        let config = AssignmentConfig::builder().batch("2015").build();
        let engine = AssignmentEngine::new(config);
        let outcome = engine.preview(&[], &[]).unwrap();
        assert!(outcome.plan.is_empty());
        assert_eq!(outcome.statistics.total_assignments, 0);
    }

    #[test]
    fn test_preview_is_repeatable() {
        let families = vec![family_with_unit("FAM1", "2015", unit("F1", "M1"))];
        let students = vec![
            student("S1", Gender::Male, "2015"),
            student("S2", Gender::Female, "2015"),
        ];
        let config = AssignmentConfig::builder().batch("2015").build();
        let engine = AssignmentEngine::new(config);
        let first = engine.preview(&families, &students).unwrap();
        let second = engine.preview(&families, &students).unwrap();
        assert_eq!(first, second);
    }
}
