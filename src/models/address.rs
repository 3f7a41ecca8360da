//! Address representation at four administrative levels
//!
//! Addresses are recorded smallest-to-largest: kebele (local unit),
//! wereda (district), zone, and region. Any component may be absent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A four-level administrative address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Kebele (smallest local unit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kebele: Option<String>,
    /// Wereda (district)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wereda: Option<String>,
    /// Zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Address {
    /// Create an address with all four components present
    #[must_use]
    pub fn new(kebele: &str, wereda: &str, zone: &str, region: &str) -> Self {
        Self {
            kebele: Some(kebele.to_string()),
            wereda: Some(wereda.to_string()),
            zone: Some(zone.to_string()),
            region: Some(region.to_string()),
        }
    }

    /// Whether no component of the address is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kebele.is_none() && self.wereda.is_none() && self.zone.is_none() && self.region.is_none()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknown = "?";
        write!(
            f,
            "{}/{}/{}/{}",
            self.region.as_deref().unwrap_or(unknown),
            self.zone.as_deref().unwrap_or(unknown),
            self.wereda.as_deref().unwrap_or(unknown),
            self.kebele.as_deref().unwrap_or(unknown)
        )
    }
}
