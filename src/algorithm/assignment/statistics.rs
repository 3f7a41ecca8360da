//! Plan statistics and quality assessment
//!
//! This module summarizes a proposed plan: totals, per-gender counts,
//! families touched, and a mode-specific quality measure with a
//! threshold-based qualitative label. Thresholds are policy, not
//! mechanism, so they live in named constants that a configuration can
//! override.

use super::types::{AssignmentPlan, ProposedAssignment};
use crate::models::{AssignmentMode, Relationship};
use itertools::Itertools;
use std::fmt;

/// Default address-match fraction for an "excellent" homogeneous plan
pub const DEFAULT_MATCH_EXCELLENT: f64 = 0.8;
/// Default address-match fraction for a "good" homogeneous plan
pub const DEFAULT_MATCH_GOOD: f64 = 0.5;
/// Default average diversity for an "excellent" heterogeneous plan
pub const DEFAULT_DIVERSITY_EXCELLENT: f64 = 3.0;
/// Default average diversity for a "good" heterogeneous plan
pub const DEFAULT_DIVERSITY_GOOD: f64 = 2.0;

/// Cutoffs for the qualitative quality labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Address-match fraction at or above which a plan is excellent
    pub match_excellent: f64,
    /// Address-match fraction at or above which a plan is good
    pub match_good: f64,
    /// Average diversity at or above which a plan is excellent
    pub diversity_excellent: f64,
    /// Average diversity at or above which a plan is good
    pub diversity_good: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            match_excellent: DEFAULT_MATCH_EXCELLENT,
            match_good: DEFAULT_MATCH_GOOD,
            diversity_excellent: DEFAULT_DIVERSITY_EXCELLENT,
            diversity_good: DEFAULT_DIVERSITY_GOOD,
        }
    }
}

/// Qualitative label for a plan's quality measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLabel {
    /// The plan meets the excellent threshold
    Excellent,
    /// The plan meets the good threshold
    Good,
    /// The plan falls below both thresholds
    NeedsReview,
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::NeedsReview => write!(f, "needs review"),
        }
    }
}

/// Mode-specific quality measure
#[derive(Debug, Clone, PartialEq)]
pub enum QualityMeasure {
    /// Homogeneous mode: fraction of assignments with an address match
    AddressMatch {
        /// Assignments whose address matched the family's
        matched: usize,
        /// Matched fraction of all assignments (0 when the plan is empty)
        fraction: f64,
        /// Qualitative label
        label: QualityLabel,
    },
    /// Heterogeneous mode: average diversity score
    Diversity {
        /// Mean diversity score (0 when the plan is empty)
        average: f64,
        /// Qualitative label
        label: QualityLabel,
    },
}

/// Summary of one proposed plan
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatistics {
    /// Total assignments proposed
    pub total_assignments: usize,
    /// Distinct families receiving at least one child
    pub families_affected: usize,
    /// Distinct students assigned
    pub students_assigned: usize,
    /// Assignments with relationship son
    pub sons: usize,
    /// Assignments with relationship daughter
    pub daughters: usize,
    /// Mode-specific quality measure
    pub quality: QualityMeasure,
}

/// Summarize a plan
#[must_use]
pub fn summarize(plan: &AssignmentPlan, thresholds: &QualityThresholds) -> AssignmentStatistics {
    let assignments = &plan.assignments;
    let total = assignments.len();
    let sons = assignments
        .iter()
        .filter(|a| a.relationship == Relationship::Son)
        .count();

    let quality = match plan.mode {
        AssignmentMode::Homogeneous => {
            let matched = assignments.iter().filter(|a| a.address_match.is_some()).count();
            let fraction = if total > 0 {
                matched as f64 / total as f64
            } else {
                0.0
            };
            let label = if total > 0 && fraction >= thresholds.match_excellent {
                QualityLabel::Excellent
            } else if total > 0 && fraction >= thresholds.match_good {
                QualityLabel::Good
            } else {
                QualityLabel::NeedsReview
            };
            QualityMeasure::AddressMatch {
                matched,
                fraction,
                label,
            }
        }
        AssignmentMode::Heterogeneous => {
            let average = if total > 0 {
                assignments
                    .iter()
                    .filter_map(|a| a.diversity_score)
                    .sum::<f64>()
                    / total as f64
            } else {
                0.0
            };
            let label = if total > 0 && average >= thresholds.diversity_excellent {
                QualityLabel::Excellent
            } else if total > 0 && average >= thresholds.diversity_good {
                QualityLabel::Good
            } else {
                QualityLabel::NeedsReview
            };
            QualityMeasure::Diversity { average, label }
        }
    };

    AssignmentStatistics {
        total_assignments: total,
        families_affected: assignments.iter().map(|a| a.family_id.as_str()).unique().count(),
        students_assigned: assignments.iter().map(|a| a.student_id.as_str()).unique().count(),
        sons,
        daughters: total - sons,
        quality,
    }
}

impl AssignmentStatistics {
    /// Render a plain-text summary for preview display
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Assignment Summary:\n\
             - Total assignments: {}\n\
             - Families affected: {}\n\
             - Students assigned: {}\n\
             - Sons: {}\n\
             - Daughters: {}\n",
            self.total_assignments,
            self.families_affected,
            self.students_assigned,
            self.sons,
            self.daughters
        ));
        match &self.quality {
            QualityMeasure::AddressMatch {
                matched,
                fraction,
                label,
            } => {
                output.push_str(&format!(
                    "- Address matches: {} ({:.1}%)\n- Quality: {}\n",
                    matched,
                    fraction * 100.0,
                    label
                ));
            }
            QualityMeasure::Diversity { average, label } => {
                output.push_str(&format!(
                    "- Average diversity: {average:.2}\n- Quality: {label}\n"
                ));
            }
        }
        output
    }
}

/// Render a per-assignment table for preview display
#[must_use]
pub fn render_assignments(assignments: &[ProposedAssignment]) -> String {
    let mut output = String::new();
    output.push_str(
        "Student                        | Family               | Unit            | Rel      | Order\n\
         -------------------------------|----------------------|-----------------|----------|------\n",
    );
    for assignment in assignments {
        output.push_str(&format!(
            "{:<30} | {:<20} | {:<15} | {:<8} | {:>5}\n",
            truncate(&assignment.student_name, 30),
            truncate(&assignment.family_name, 20),
            assignment.unit_path.to_string(),
            assignment.relationship.to_string(),
            assignment.birth_order
        ));
    }
    output
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
