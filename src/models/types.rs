//! Shared value types for the assignment domain

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male student
    Male,
    /// Female student
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Relationship of a child to its family unit, derived from gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Male child
    Son,
    /// Female child
    Daughter,
}

impl From<Gender> for Relationship {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => Self::Son,
            Gender::Female => Self::Daughter,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Son => write!(f, "son"),
            Self::Daughter => write!(f, "daughter"),
        }
    }
}

/// Objective used when scoring candidate placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    /// Maximize address agreement between a family unit and its children
    #[default]
    Homogeneous,
    /// Maximize geographic diversity among a family unit's children
    Heterogeneous,
}

impl fmt::Display for AssignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Homogeneous => write!(f, "homogeneous"),
            Self::Heterogeneous => write!(f, "heterogeneous"),
        }
    }
}

impl FromStr for AssignmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "homogeneous" => Ok(Self::Homogeneous),
            "heterogeneous" => Ok(Self::Heterogeneous),
            other => Err(format!("unknown assignment mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_from_gender() {
        assert_eq!(Relationship::from(Gender::Male), Relationship::Son);
        assert_eq!(Relationship::from(Gender::Female), Relationship::Daughter);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "heterogeneous".parse::<AssignmentMode>().unwrap(),
            AssignmentMode::Heterogeneous
        );
        assert!("optimal".parse::<AssignmentMode>().is_err());
    }
}
