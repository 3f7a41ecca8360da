//! Family record representation
//!
//! A family document holds one or more grandparent groups, each of which
//! contains family units. A family unit is a father+mother pairing and is
//! the atomic object that receives assigned children. Parent and child
//! entries carry denormalized snapshots (name, address, birth date) next
//! to the student id so that planning never has to join across documents.

use super::address::Address;
use super::types::Relationship;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Position of a family unit inside its family document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitPath {
    /// Index of the grandparent group within the family
    pub group: usize,
    /// Index of the unit within the grandparent group
    pub unit: usize,
}

impl fmt::Display for UnitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {} unit {}", self.group, self.unit)
    }
}

/// Reference to a student acting as a parent, with a denormalized snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Identifier of the student record backing this parent
    pub student_id: String,
    /// Display name at the time of linking
    pub full_name: String,
    /// Address snapshot
    #[serde(default)]
    pub address: Address,
    /// Birth date snapshot, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

/// A child already assigned to a family unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    /// Identifier of the student record backing this child
    pub student_id: String,
    /// Display name at assignment time
    pub full_name: String,
    /// Son or daughter
    pub relationship: Relationship,
    /// 1-based position among the unit's children, in arrival order
    pub birth_order: u32,
    /// Address snapshot, used by diversity scoring
    #[serde(default)]
    pub address: Address,
}

/// One father+mother pairing and its children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyUnit {
    /// Father, when linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<ParentLink>,
    /// Mother, when linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<ParentLink>,
    /// Children assigned to this unit
    #[serde(default)]
    pub children: Vec<ChildRecord>,
}

impl FamilyUnit {
    /// Whether both parent links are present
    #[must_use]
    pub fn has_both_parents(&self) -> bool {
        self.father.is_some() && self.mother.is_some()
    }

    /// Count of children by relationship
    #[must_use]
    pub fn count_relationship(&self, relationship: Relationship) -> usize {
        self.children
            .iter()
            .filter(|c| c.relationship == relationship)
            .count()
    }
}

/// A named group of family units under one pair of grandparents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrandparentGroup {
    /// Optional display label for the group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Family units in the group
    #[serde(default)]
    pub units: Vec<FamilyUnit>,
}

/// A family document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    /// Unique family identifier
    pub id: String,
    /// Family display name
    pub name: String,
    /// Batch the family belongs to
    pub batch: String,
    /// Whether the family accepts children from other batches
    #[serde(default)]
    pub allow_other_batches: bool,
    /// Grandparent groups making up the family
    #[serde(default)]
    pub groups: Vec<GrandparentGroup>,
}

impl Family {
    /// Get the unit at the given path, if it exists
    #[must_use]
    pub fn unit_at(&self, path: UnitPath) -> Option<&FamilyUnit> {
        self.groups.get(path.group).and_then(|g| g.units.get(path.unit))
    }

    /// Get a mutable reference to the unit at the given path
    pub fn unit_at_mut(&mut self, path: UnitPath) -> Option<&mut FamilyUnit> {
        self.groups
            .get_mut(path.group)
            .and_then(|g| g.units.get_mut(path.unit))
    }

    /// Iterate over all units with their paths, in document order
    pub fn units_with_paths(&self) -> impl Iterator<Item = (UnitPath, &FamilyUnit)> {
        self.groups.iter().enumerate().flat_map(|(group, g)| {
            g.units
                .iter()
                .enumerate()
                .map(move |(unit, u)| (UnitPath { group, unit }, u))
        })
    }

    /// Iterate over the ids of every child in the family
    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.units.iter())
            .flat_map(|u| u.children.iter())
            .map(|c| c.student_id.as_str())
    }
}

/// A collection of families that can be efficiently queried by id
#[derive(Debug, Default)]
pub struct FamilyCollection {
    families: HashMap<String, Family>,
    order: Vec<String>,
}

impl FamilyCollection {
    /// Create a new empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a list of families, preserving input order
    #[must_use]
    pub fn from_families(families: Vec<Family>) -> Self {
        let mut collection = Self::new();
        for family in families {
            collection.add_family(family);
        }
        collection
    }

    /// Add a family to the collection, replacing any existing entry
    pub fn add_family(&mut self, family: Family) {
        if !self.families.contains_key(&family.id) {
            self.order.push(family.id.clone());
        }
        self.families.insert(family.id.clone(), family);
    }

    /// Get a family by its id
    #[must_use]
    pub fn get(&self, family_id: &str) -> Option<&Family> {
        self.families.get(family_id)
    }

    /// Get a mutable reference to a family by its id
    pub fn get_mut(&mut self, family_id: &str) -> Option<&mut Family> {
        self.families.get_mut(family_id)
    }

    /// Iterate over families in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Family> {
        self.order.iter().filter_map(|id| self.families.get(id))
    }

    /// Number of families in the collection
    #[must_use]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Whether the collection holds no families
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Consume the collection, returning families in insertion order
    #[must_use]
    pub fn into_families(mut self) -> Vec<Family> {
        self.order
            .iter()
            .filter_map(|id| self.families.remove(id))
            .collect()
    }
}
