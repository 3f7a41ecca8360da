//! Location signature extraction
//!
//! A location signature is an address truncated to a configurable
//! granularity, built coarsest-to-finest (region down to kebele). Missing
//! components stay unknown, and an unknown component never matches
//! another unknown component; absent data must not manufacture matches.

use crate::models::{Address, ParentLink};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Address granularity, from coarsest to finest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Granularity {
    /// Region only
    Region,
    /// Region + zone
    Zone,
    /// Region + zone + wereda
    Wereda,
    /// Region + zone + wereda + kebele
    Kebele,
}

impl Granularity {
    /// Number of address components the granularity spans
    #[must_use]
    pub const fn depth(self) -> usize {
        match self {
            Self::Region => 1,
            Self::Zone => 2,
            Self::Wereda => 3,
            Self::Kebele => 4,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region => write!(f, "region"),
            Self::Zone => write!(f, "zone"),
            Self::Wereda => write!(f, "wereda"),
            Self::Kebele => write!(f, "kebele"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "region" => Ok(Self::Region),
            "zone" => Ok(Self::Zone),
            "wereda" => Ok(Self::Wereda),
            "kebele" => Ok(Self::Kebele),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// An address truncated to a granularity, coarsest component first
///
/// Components that are absent in the source address are `None` and are
/// treated as unmatchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSignature {
    levels: SmallVec<[Option<String>; 4]>,
}

impl LocationSignature {
    /// Derive the signature of an address at the given granularity
    #[must_use]
    pub fn of(address: &Address, granularity: Granularity) -> Self {
        let components = [
            address.region.as_ref(),
            address.zone.as_ref(),
            address.wereda.as_ref(),
            address.kebele.as_ref(),
        ];
        let levels = components
            .into_iter()
            .take(granularity.depth())
            .map(|c| c.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .collect();
        Self { levels }
    }

    /// Number of levels in the signature
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Whether every level of the signature is unknown
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.levels.iter().all(Option::is_none)
    }

    /// Count of consecutive matching components, starting from the
    /// coarsest level
    ///
    /// A level matches only when both sides are known and equal.
    #[must_use]
    pub fn match_depth(&self, other: &Self) -> usize {
        self.levels
            .iter()
            .zip(other.levels.iter())
            .take_while(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            })
            .count()
    }

    /// Whether every level matches, down to the full depth of both
    /// signatures
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        let depth = self.depth().min(other.depth());
        depth > 0 && self.match_depth(other) == depth
    }

    /// The known component at the given level, coarsest first
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&str> {
        self.levels.get(index).and_then(|l| l.as_deref())
    }
}

impl fmt::Display for LocationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", level.as_deref().unwrap_or("?"))?;
        }
        Ok(())
    }
}

/// Derive a family unit's signature from its parents
///
/// The father's address is authoritative; the mother's is used when the
/// father's address is entirely unknown at the requested granularity.
#[must_use]
pub fn unit_signature(
    father: &ParentLink,
    mother: &ParentLink,
    granularity: Granularity,
) -> LocationSignature {
    let signature = LocationSignature::of(&father.address, granularity);
    if signature.is_unknown() {
        LocationSignature::of(&mother.address, granularity)
    } else {
        signature
    }
}
