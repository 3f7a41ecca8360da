//! Assignment configuration
//!
//! This module provides the configuration describing one planning run:
//! the target batch, objective mode, capacity bound and the soft
//! preferences (gender balance, age consideration).

use super::location::Granularity;
use super::statistics::QualityThresholds;
use crate::error::{AssignmentError, Result};
use crate::models::AssignmentMode;
use std::fmt;

/// Smallest accepted value for the per-unit children cap
pub const MIN_CHILDREN_PER_UNIT: u32 = 1;

/// Largest accepted value for the per-unit children cap
pub const MAX_CHILDREN_PER_UNIT: u32 = 30;

/// Configuration for one assignment planning run
#[derive(Debug, Clone)]
pub struct AssignmentConfig {
    /// Objective used when scoring candidates
    pub mode: AssignmentMode,
    /// Target batch; students outside it qualify only for families that
    /// allow other batches
    pub batch: String,
    /// Maximum number of children per family unit
    pub max_children_per_unit: u32,
    /// Whether to prefer candidates of the under-represented gender
    pub balance_gender: bool,
    /// Whether to exclude candidates older than both parents
    pub consider_age: bool,
    /// Address granularity used by homogeneous matching
    pub granularity: Granularity,
    /// Thresholds for the qualitative quality labels
    pub thresholds: QualityThresholds,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            mode: AssignmentMode::Homogeneous,
            batch: String::new(),
            max_children_per_unit: 6,
            balance_gender: true,
            consider_age: false,
            granularity: Granularity::Wereda,
            thresholds: QualityThresholds::default(),
        }
    }
}

impl AssignmentConfig {
    /// Create a new builder for constructing a configuration
    #[must_use]
    pub fn builder() -> AssignmentConfigBuilder {
        AssignmentConfigBuilder::new()
    }

    /// Check the configuration before any data is fetched
    ///
    /// # Returns
    ///
    /// `Ok(())` when the configuration is usable, otherwise a
    /// [`AssignmentError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.batch.trim().is_empty() {
            return Err(AssignmentError::Config(
                "no target batch selected".to_string(),
            ));
        }
        if self.max_children_per_unit < MIN_CHILDREN_PER_UNIT
            || self.max_children_per_unit > MAX_CHILDREN_PER_UNIT
        {
            return Err(AssignmentError::Config(format!(
                "max children per unit must be between {MIN_CHILDREN_PER_UNIT} and {MAX_CHILDREN_PER_UNIT}, got {}",
                self.max_children_per_unit
            )));
        }
        Ok(())
    }
}

impl fmt::Display for AssignmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assignment Configuration:")?;
        writeln!(f, "  Mode: {}", self.mode)?;
        writeln!(f, "  Target Batch: {}", self.batch)?;
        writeln!(f, "  Max Children Per Unit: {}", self.max_children_per_unit)?;
        writeln!(f, "  Balance Gender: {}", self.balance_gender)?;
        writeln!(f, "  Consider Age: {}", self.consider_age)?;
        if self.mode == AssignmentMode::Homogeneous {
            writeln!(f, "  Address Granularity: {}", self.granularity)?;
        }
        Ok(())
    }
}

/// Builder for constructing an assignment configuration
#[derive(Debug, Clone, Default)]
pub struct AssignmentConfigBuilder {
    config: AssignmentConfig,
}

impl AssignmentConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the objective mode
    #[must_use]
    pub const fn mode(mut self, mode: AssignmentMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the target batch
    #[must_use]
    pub fn batch(mut self, batch: impl Into<String>) -> Self {
        self.config.batch = batch.into();
        self
    }

    /// Set the maximum number of children per family unit
    #[must_use]
    pub const fn max_children_per_unit(mut self, max: u32) -> Self {
        self.config.max_children_per_unit = max;
        self
    }

    /// Set whether gender balance is preferred
    #[must_use]
    pub const fn balance_gender(mut self, balance: bool) -> Self {
        self.config.balance_gender = balance;
        self
    }

    /// Set whether candidates older than both parents are excluded
    #[must_use]
    pub const fn consider_age(mut self, consider: bool) -> Self {
        self.config.consider_age = consider;
        self
    }

    /// Set the address granularity for homogeneous matching
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.config.granularity = granularity;
        self
    }

    /// Override the quality-label thresholds
    #[must_use]
    pub const fn thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> AssignmentConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_missing_batch() {
        let config = AssignmentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_capacity() {
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(0)
            .build();
        assert!(config.validate().is_err());

        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(31)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_bounds() {
        for max in [MIN_CHILDREN_PER_UNIT, 6, MAX_CHILDREN_PER_UNIT] {
            let config = AssignmentConfig::builder()
                .batch("2015")
                .max_children_per_unit(max)
                .build();
            assert!(config.validate().is_ok());
        }
    }
}
