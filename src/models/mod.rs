//! Domain models for the family assignment engine
//!
//! This module contains the core entity models: students awaiting
//! placement, family records with their grandparent groups and family
//! units, and the shared value types (gender, relationship, addresses).

pub mod address;
pub mod family;
pub mod student;
pub mod types;

// Re-export commonly used types
pub use address::Address;
pub use family::{ChildRecord, Family, FamilyCollection, FamilyUnit, GrandparentGroup, ParentLink, UnitPath};
pub use student::Student;
pub use types::{AssignmentMode, Gender, Relationship};
