//! Fixture builders shared by unit and integration tests
//!
//! Compiled into the library so `tests/` can reuse the same builders as
//! the inline test modules.

use crate::models::{
    Address, ChildRecord, Family, FamilyUnit, Gender, GrandparentGroup, ParentLink, Relationship,
    Student,
};
use chrono::NaiveDate;

/// A student with a default (unknown) address and no birth date
#[must_use]
pub fn student(id: &str, gender: Gender, batch: &str) -> Student {
    Student {
        id: id.to_string(),
        first_name: id.to_string(),
        father_name: None,
        gender,
        batch: batch.to_string(),
        address: Address::default(),
        birth_date: None,
    }
}

/// A student at a specific address
#[must_use]
pub fn student_at(id: &str, gender: Gender, batch: &str, address: Address) -> Student {
    Student {
        address,
        ..student(id, gender, batch)
    }
}

/// A parent link with a default address and no birth date
#[must_use]
pub fn parent(id: &str) -> ParentLink {
    ParentLink {
        student_id: id.to_string(),
        full_name: id.to_string(),
        address: Address::default(),
        birth_date: None,
    }
}

/// A parent link with an address and birth date
#[must_use]
pub fn parent_at(id: &str, address: Address, birth_date: Option<NaiveDate>) -> ParentLink {
    ParentLink {
        address,
        birth_date,
        ..parent(id)
    }
}

/// A childless unit with both parents present
#[must_use]
pub fn unit(father_id: &str, mother_id: &str) -> FamilyUnit {
    FamilyUnit {
        father: Some(parent(father_id)),
        mother: Some(parent(mother_id)),
        children: Vec::new(),
    }
}

/// Add children to a unit, numbering birth orders from one
#[must_use]
pub fn with_children(mut unit: FamilyUnit, children: &[(&str, Relationship)]) -> FamilyUnit {
    let offset = unit.children.len() as u32;
    for (i, (id, relationship)) in children.iter().enumerate() {
        unit.children.push(ChildRecord {
            student_id: (*id).to_string(),
            full_name: (*id).to_string(),
            relationship: *relationship,
            birth_order: offset + i as u32 + 1,
            address: Address::default(),
        });
    }
    unit
}

/// A family with a single grandparent group holding one unit
#[must_use]
pub fn family_with_unit(id: &str, batch: &str, unit: FamilyUnit) -> Family {
    family_with_units(id, batch, vec![unit])
}

/// A family with a single grandparent group holding several units
#[must_use]
pub fn family_with_units(id: &str, batch: &str, units: Vec<FamilyUnit>) -> Family {
    Family {
        id: id.to_string(),
        name: format!("{id} Family"),
        batch: batch.to_string(),
        allow_other_batches: false,
        groups: vec![GrandparentGroup { label: None, units }],
    }
}
