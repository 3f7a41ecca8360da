//! Candidate scoring for both objective modes
//!
//! Homogeneous mode scores a candidate by how deeply their address
//! agrees with the family unit's address at the configured granularity.
//! Heterogeneous mode scores a candidate by how many distinct locations
//! the unit's children would span if the candidate joined them.

use super::location::LocationSignature;

/// Diversity score of a unit with no children: the candidate alone
/// represents one location
pub const DIVERSITY_BASELINE: f64 = 1.0;

/// Result of comparing a candidate's signature against a unit's
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Consecutive matching components, from the coarsest level
    pub depth: usize,
    /// Whether every component matched down to the configured granularity
    pub full: bool,
    /// The finest matched component, present only on a full match so the
    /// match-rate metric stays honest
    pub label: Option<String>,
}

/// Compare a candidate student's signature against a family unit's
///
/// Both signatures must have been derived at the same granularity.
#[must_use]
pub fn address_match(unit: &LocationSignature, candidate: &LocationSignature) -> MatchOutcome {
    let depth = unit.match_depth(candidate);
    let full = depth > 0 && depth == unit.depth().min(candidate.depth());
    let label = if full {
        candidate.level(depth - 1).map(str::to_string)
    } else {
        None
    };
    MatchOutcome { depth, full, label }
}

/// Number of mutually non-matching signatures in the given set
///
/// Signatures with unknown components never match anything, so they each
/// count as their own location.
fn distinct_locations(signatures: &[&LocationSignature]) -> usize {
    let mut representatives: Vec<&LocationSignature> = Vec::new();
    for signature in signatures {
        if !representatives.iter().any(|r| r.matches(signature)) {
            representatives.push(signature);
        }
    }
    representatives.len()
}

/// Diversity score for adding a candidate to a unit
///
/// The score is the number of distinct locations represented among the
/// unit's children plus the candidate; higher means the candidate adds
/// more geographic spread. A unit with no children scores
/// [`DIVERSITY_BASELINE`].
#[must_use]
pub fn diversity_score(siblings: &[LocationSignature], candidate: &LocationSignature) -> f64 {
    if siblings.is_empty() {
        return DIVERSITY_BASELINE;
    }
    let mut all: Vec<&LocationSignature> = siblings.iter().collect();
    all.push(candidate);
    distinct_locations(&all) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::assignment::location::Granularity;
    use crate::models::Address;

    fn sig(region: &str, zone: &str, wereda: &str, kebele: &str, granularity: Granularity) -> LocationSignature {
        LocationSignature::of(&Address::new(kebele, wereda, zone, region), granularity)
    }

    #[test]
    fn test_full_match_carries_label() {
        let unit = sig("Amhara", "North Gondar", "Debark", "03", Granularity::Wereda);
        let candidate = sig("Amhara", "North Gondar", "Debark", "09", Granularity::Wereda);
        let outcome = address_match(&unit, &candidate);
        assert!(outcome.full);
        assert_eq!(outcome.depth, 3);
        assert_eq!(outcome.label.as_deref(), Some("Debark"));
    }

    #[test]
    fn test_partial_match_has_no_label() {
        let unit = sig("Amhara", "North Gondar", "Debark", "03", Granularity::Wereda);
        let candidate = sig("Amhara", "South Wollo", "Dessie", "01", Granularity::Wereda);
        let outcome = address_match(&unit, &candidate);
        assert!(!outcome.full);
        assert_eq!(outcome.depth, 1);
        assert_eq!(outcome.label, None);
    }

    #[test]
    fn test_unknown_addresses_never_match() {
        let unit = LocationSignature::of(&Address::default(), Granularity::Region);
        let candidate = LocationSignature::of(&Address::default(), Granularity::Region);
        let outcome = address_match(&unit, &candidate);
        assert!(!outcome.full);
        assert_eq!(outcome.depth, 0);
    }

    #[test]
    fn test_diversity_baseline_for_childless_unit() {
        let candidate = sig("Oromia", "Arsi", "Asella", "01", Granularity::Kebele);
        assert_eq!(diversity_score(&[], &candidate), DIVERSITY_BASELINE);
    }

    #[test]
    fn test_diversity_rewards_new_location() {
        let siblings = vec![sig("Oromia", "Arsi", "Asella", "01", Granularity::Kebele)];
        let same = sig("Oromia", "Arsi", "Asella", "01", Granularity::Kebele);
        let different = sig("Sidama", "Hawassa", "Tabor", "05", Granularity::Kebele);
        assert_eq!(diversity_score(&siblings, &same), 1.0);
        assert_eq!(diversity_score(&siblings, &different), 2.0);
    }

    #[test]
    fn test_diversity_counts_unknowns_separately() {
        let siblings = vec![
            LocationSignature::of(&Address::default(), Granularity::Kebele),
            LocationSignature::of(&Address::default(), Granularity::Kebele),
        ];
        let candidate = sig("Afar", "Awsi", "Asaita", "02", Granularity::Kebele);
        // Two unknown siblings cannot collapse into one location.
        assert_eq!(diversity_score(&siblings, &candidate), 3.0);
    }
}
