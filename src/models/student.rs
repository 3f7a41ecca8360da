//! Student entity model
//!
//! Students are the pool from which children are assigned to family
//! units. The engine treats student records as read-only; only family
//! documents are ever written back.

use super::address::Address;
use super::types::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A student eligible for placement as a child in a family unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Father's name (patronymic), when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    /// Gender of the student
    pub gender: Gender,
    /// Batch (intake cohort) designation
    pub batch: String,
    /// Address at all four administrative levels
    #[serde(default)]
    pub address: Address,
    /// Date of birth, when recorded (used only by the age filter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl Student {
    /// Full display name: given name followed by the father's name
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.father_name {
            Some(father) => format!("{} {}", self.first_name, father),
            None => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_with_and_without_patronymic() {
        let mut student = Student {
            id: "S1".to_string(),
            first_name: "Abel".to_string(),
            father_name: Some("Tesfaye".to_string()),
            gender: Gender::Male,
            batch: "2015".to_string(),
            address: Address::default(),
            birth_date: None,
        };
        assert_eq!(student.full_name(), "Abel Tesfaye");

        student.father_name = None;
        assert_eq!(student.full_name(), "Abel");
    }
}
