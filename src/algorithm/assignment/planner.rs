//! Greedy assignment planner
//!
//! The planner walks eligible family units in order and fills each unit
//! from the unassigned student pool, applying the hard constraints
//! (batch, duplication, capacity) and the soft preferences (gender
//! balance, age). Soft preferences degrade gracefully: the gender
//! preference is relaxed first, the age filter second, and the hard
//! constraints never. Given identical inputs the planner emits an
//! identical plan; there is no randomization and no unordered iteration.

use super::config::AssignmentConfig;
use super::eligibility::{EligiblePool, EligibleUnit};
use super::location::{Granularity, LocationSignature, unit_signature};
use super::scoring::{address_match, diversity_score};
use super::types::{AssignmentFailure, AssignmentPlan, FailedAssignment, ProposedAssignment};
use crate::models::{AssignmentMode, Gender, Relationship, Student};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Planner for one assignment run
#[derive(Debug)]
pub struct AssignmentPlanner {
    config: AssignmentConfig,
}

/// A candidate chosen for one slot
struct Selection {
    index: usize,
    address_match: Option<String>,
    diversity_score: Option<f64>,
}

impl AssignmentPlanner {
    /// Create a new planner with the given configuration
    #[must_use]
    pub const fn new(config: AssignmentConfig) -> Self {
        Self { config }
    }

    /// Compute a plan over the eligible pool
    ///
    /// Pure: the planner only reads its inputs and returns an in-memory
    /// plan. Units that cannot be filled are recorded in the plan's
    /// failure list; a partial plan is a valid outcome.
    #[must_use]
    pub fn plan(&self, pool: &EligiblePool) -> AssignmentPlan {
        // Heterogeneous scoring always compares full signatures;
        // homogeneous scoring honors the configured granularity.
        let granularity = match self.config.mode {
            AssignmentMode::Homogeneous => self.config.granularity,
            AssignmentMode::Heterogeneous => Granularity::Kebele,
        };

        // In-batch students come first so index order preserves the
        // (batch, id) candidate ordering.
        let students: Vec<&Student> = pool
            .in_batch
            .iter()
            .chain(pool.out_of_batch.iter())
            .collect();
        let in_batch_count = pool.in_batch.len();
        let signatures: Vec<LocationSignature> = students
            .iter()
            .map(|s| LocationSignature::of(&s.address, granularity))
            .collect();

        let mut used: FxHashSet<usize> = FxHashSet::default();
        let mut assignments = Vec::new();
        let mut failed = Vec::new();

        for unit in &pool.units {
            self.fill_unit(
                unit,
                &students,
                &signatures,
                in_batch_count,
                granularity,
                &mut used,
                &mut assignments,
                &mut failed,
            );
        }

        AssignmentPlan {
            mode: self.config.mode,
            assignments,
            failed,
        }
    }

    /// Assign students to one unit until capacity or the pool runs out
    #[allow(clippy::too_many_arguments)]
    fn fill_unit(
        &self,
        unit: &EligibleUnit,
        students: &[&Student],
        signatures: &[LocationSignature],
        in_batch_count: usize,
        granularity: Granularity,
        used: &mut FxHashSet<usize>,
        assignments: &mut Vec<ProposedAssignment>,
        failed: &mut Vec<FailedAssignment>,
    ) {
        let unit_sig = unit_signature(&unit.father, &unit.mother, granularity);
        let mut sibling_sigs: Vec<LocationSignature> = unit
            .existing_children
            .iter()
            .map(|c| LocationSignature::of(&c.address, granularity))
            .collect();

        let mut sons = unit.existing_children.iter().filter(|c| c.relationship == Relationship::Son).count();
        let mut daughters = unit.existing_children.len() - sons;

        let existing = unit.existing_children.len() as u32;
        let mut capacity = self.config.max_children_per_unit.saturating_sub(existing);
        let mut added: u32 = 0;

        while capacity > 0 {
            let candidates: SmallVec<[usize; 32]> = (0..students.len())
                .filter(|i| !used.contains(i) && (*i < in_batch_count || unit.allow_other_batches))
                .collect();

            if candidates.is_empty() {
                let any_unused = (0..students.len()).any(|i| !used.contains(&i));
                failed.push(FailedAssignment {
                    family_id: unit.family_id.clone(),
                    family_name: unit.family_name.clone(),
                    unit_path: unit.unit_path,
                    unfilled_slots: capacity,
                    reason: if any_unused {
                        AssignmentFailure::BatchRestricted
                    } else {
                        AssignmentFailure::NoEligibleStudents
                    },
                });
                break;
            }

            let preferred = if self.config.balance_gender {
                match sons.cmp(&daughters) {
                    std::cmp::Ordering::Less => Some(Gender::Male),
                    std::cmp::Ordering::Greater => Some(Gender::Female),
                    std::cmp::Ordering::Equal => None,
                }
            } else {
                None
            };

            // Relaxation ladder: gender preference goes first, the age
            // filter second. Hard constraints are already baked into the
            // candidate list and are never relaxed.
            let mut stages: SmallVec<[(Option<Gender>, bool); 3]> =
                SmallVec::from_slice(&[(preferred, self.config.consider_age)]);
            if preferred.is_some() {
                stages.push((None, self.config.consider_age));
            }
            if self.config.consider_age {
                stages.push((None, false));
            }

            let selection = stages.iter().find_map(|&(gender, age)| {
                self.select(&candidates, students, signatures, &unit_sig, &sibling_sigs, unit, gender, age)
            });

            // The last stage has no soft filters, so a non-empty candidate
            // list always yields a selection.
            let Some(selection) = selection else { break };

            let student = students[selection.index];
            let relationship = Relationship::from(student.gender);
            match relationship {
                Relationship::Son => sons += 1,
                Relationship::Daughter => daughters += 1,
            }

            assignments.push(ProposedAssignment {
                family_id: unit.family_id.clone(),
                family_name: unit.family_name.clone(),
                unit_path: unit.unit_path,
                student_id: student.id.clone(),
                student_name: student.full_name(),
                gender: student.gender,
                batch: student.batch.clone(),
                address: student.address.clone(),
                relationship,
                birth_order: existing + added + 1,
                address_match: selection.address_match,
                diversity_score: selection.diversity_score,
            });

            sibling_sigs.push(signatures[selection.index].clone());
            used.insert(selection.index);
            added += 1;
            capacity -= 1;
        }
    }

    /// Pick the highest-scoring candidate that passes the given filters
    ///
    /// Ties are broken by candidate order, which follows the student
    /// input ordering.
    #[allow(clippy::too_many_arguments)]
    fn select(
        &self,
        candidates: &[usize],
        students: &[&Student],
        signatures: &[LocationSignature],
        unit_sig: &LocationSignature,
        sibling_sigs: &[LocationSignature],
        unit: &EligibleUnit,
        gender_filter: Option<Gender>,
        age_filter: bool,
    ) -> Option<Selection> {
        let mut best: Option<(f64, Selection)> = None;

        for &index in candidates {
            let student = students[index];
            if let Some(gender) = gender_filter {
                if student.gender != gender {
                    continue;
                }
            }
            if age_filter && is_older_than_both_parents(student, unit) {
                continue;
            }

            let (score, address_label, diversity) = match self.config.mode {
                AssignmentMode::Homogeneous => {
                    let outcome = address_match(unit_sig, &signatures[index]);
                    (outcome.depth as f64, outcome.label, None)
                }
                AssignmentMode::Heterogeneous => {
                    let score = diversity_score(sibling_sigs, &signatures[index]);
                    (score, None, Some(score))
                }
            };

            // Strictly-greater keeps the earliest candidate on ties.
            if best.as_ref().is_none_or(|(b, _)| score > *b) {
                best = Some((
                    score,
                    Selection {
                        index,
                        address_match: address_label,
                        diversity_score: diversity,
                    },
                ));
            }
        }

        best.map(|(_, selection)| selection)
    }
}

/// Whether a student is older than both parents of a unit
///
/// Any unknown birth date passes: missing data never excludes a
/// candidate.
fn is_older_than_both_parents(student: &Student, unit: &EligibleUnit) -> bool {
    match (
        student.birth_date,
        unit.father.birth_date,
        unit.mother.birth_date,
    ) {
        (Some(student_born), Some(father_born), Some(mother_born)) => {
            student_born < father_born && student_born < mother_born
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::assignment::eligibility::filter_eligible;
    use crate::models::Address;
    use crate::utils::test_support::{
        family_with_unit, parent_at, student, student_at, unit, with_children,
    };
    use chrono::NaiveDate;

    fn config(batch: &str) -> AssignmentConfig {
        AssignmentConfig::builder()
            .batch(batch)
            .max_children_per_unit(3)
            .build()
    }

    fn plan_for(
        families: &[crate::models::Family],
        students: &[Student],
        config: &AssignmentConfig,
    ) -> AssignmentPlan {
        let pool = filter_eligible(families, students, config);
        AssignmentPlanner::new(config.clone()).plan(&pool)
    }

    #[test]
    fn test_plan_is_deterministic() {
        let families = vec![
            family_with_unit("FAM1", "2015", unit("F1", "M1")),
            family_with_unit("FAM2", "2015", unit("F2", "M2")),
        ];
        let students = vec![
            student("S1", Gender::Male, "2015"),
            student("S2", Gender::Female, "2015"),
            student("S3", Gender::Male, "2015"),
        ];
        let config = config("2015");
        let first = plan_for(&families, &students, &config);
        let second = plan_for(&families, &students, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_student_assigned_twice() {
        let families = vec![
            family_with_unit("FAM1", "2015", unit("F1", "M1")),
            family_with_unit("FAM2", "2015", unit("F2", "M2")),
        ];
        let students = vec![
            student("S1", Gender::Male, "2015"),
            student("S2", Gender::Female, "2015"),
        ];
        let plan = plan_for(&families, &students, &config("2015"));
        let mut seen = std::collections::HashSet::new();
        for assignment in &plan.assignments {
            assert!(seen.insert(assignment.student_id.clone()));
        }
    }

    #[test]
    fn test_capacity_respected_and_birth_order_continues() {
        let seeded = with_children(unit("F1", "M1"), &[("C1", Relationship::Son)]);
        let families = vec![family_with_unit("FAM1", "2015", seeded)];
        let students = vec![
            student("S1", Gender::Female, "2015"),
            student("S2", Gender::Female, "2015"),
            student("S3", Gender::Male, "2015"),
        ];
        let config = config("2015");
        let plan = plan_for(&families, &students, &config);
        // One child exists, cap is 3, so exactly two more fit.
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.assignments[0].birth_order, 2);
        assert_eq!(plan.assignments[1].birth_order, 3);
    }

    #[test]
    fn test_gender_balance_prefers_under_represented() {
        let seeded = with_children(unit("F1", "M1"), &[("C1", Relationship::Son)]);
        let families = vec![family_with_unit("FAM1", "2015", seeded)];
        let students = vec![
            student("S1", Gender::Male, "2015"),
            student("S2", Gender::Female, "2015"),
        ];
        let plan = plan_for(&families, &students, &config("2015"));
        // Unit has a son, so the daughter goes first.
        assert_eq!(plan.assignments[0].student_id, "S2");
        assert_eq!(plan.assignments[0].relationship, Relationship::Daughter);
    }

    #[test]
    fn test_gender_preference_relaxes_when_unsatisfiable() {
        let seeded = with_children(unit("F1", "M1"), &[("C1", Relationship::Son)]);
        let families = vec![family_with_unit("FAM1", "2015", seeded)];
        // Only sons available; the daughter preference must not block.
        let students = vec![
            student("S1", Gender::Male, "2015"),
            student("S2", Gender::Male, "2015"),
        ];
        let plan = plan_for(&families, &students, &config("2015"));
        assert_eq!(plan.assignments.len(), 2);
    }

    #[test]
    fn test_age_filter_excludes_student_older_than_both_parents() {
        let born = |y| NaiveDate::from_ymd_opt(y, 6, 1).unwrap();
        let mut base = unit("F1", "M1");
        base.father = Some(parent_at("F1", Address::default(), Some(born(1990))));
        base.mother = Some(parent_at("M1", Address::default(), Some(born(1992))));
        let families = vec![family_with_unit("FAM1", "2015", base)];

        let mut older = student("S1", Gender::Male, "2015");
        older.birth_date = Some(born(1985));
        let mut younger = student("S2", Gender::Male, "2015");
        younger.birth_date = Some(born(2005));

        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(1)
            .consider_age(true)
            .build();
        let plan = plan_for(&families, &[older, younger], &config);
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].student_id, "S2");
    }

    #[test]
    fn test_unknown_age_is_never_excluded() {
        let born = |y| NaiveDate::from_ymd_opt(y, 6, 1).unwrap();
        let mut base = unit("F1", "M1");
        base.father = Some(parent_at("F1", Address::default(), Some(born(1990))));
        base.mother = Some(parent_at("M1", Address::default(), Some(born(1992))));
        let families = vec![family_with_unit("FAM1", "2015", base)];

        // No birth date on the student; the age filter must pass them.
        let students = vec![student("S1", Gender::Male, "2015")];
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(1)
            .consider_age(true)
            .build();
        let plan = plan_for(&families, &students, &config);
        assert_eq!(plan.assignments.len(), 1);
    }

    #[test]
    fn test_age_filter_relaxes_after_gender() {
        let born = |y| NaiveDate::from_ymd_opt(y, 6, 1).unwrap();
        let mut base = unit("F1", "M1");
        base.father = Some(parent_at("F1", Address::default(), Some(born(1990))));
        base.mother = Some(parent_at("M1", Address::default(), Some(born(1992))));
        let families = vec![family_with_unit("FAM1", "2015", base)];

        // The only candidate is older than both parents; with one slot
        // the planner must still fill it once both preferences relax.
        let mut only = student("S1", Gender::Male, "2015");
        only.birth_date = Some(born(1980));
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(1)
            .consider_age(true)
            .build();
        let plan = plan_for(&families, &[only], &config);
        assert_eq!(plan.assignments.len(), 1);
        assert!(plan.failed.is_empty());
    }

    #[test]
    fn test_homogeneous_prefers_matching_address() {
        let home = Address::new("01", "Asella", "Arsi", "Oromia");
        let away = Address::new("05", "Tabor", "Hawassa", "Sidama");
        let base = unit("F1", "M1");
        let mut seeded = base;
        seeded.father = Some(parent_at("F1", home.clone(), None));
        seeded.mother = Some(parent_at("M1", home.clone(), None));
        let families = vec![family_with_unit("FAM1", "2015", seeded)];

        let students = vec![
            student_at("S1", Gender::Male, "2015", away),
            student_at("S2", Gender::Male, "2015", home),
        ];
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(1)
            .balance_gender(false)
            .granularity(Granularity::Region)
            .build();
        let plan = plan_for(&families, &students, &config);
        assert_eq!(plan.assignments[0].student_id, "S2");
        assert_eq!(plan.assignments[0].address_match.as_deref(), Some("Oromia"));
    }

    #[test]
    fn test_heterogeneous_prefers_new_region() {
        let region_a = Address::new("01", "W", "Z", "RegionA");
        let region_b = Address::new("02", "X", "Y", "RegionB");
        let mut seeded = unit("F1", "M1");
        seeded.children = vec![crate::models::ChildRecord {
            student_id: "C1".to_string(),
            full_name: "C1".to_string(),
            relationship: Relationship::Son,
            birth_order: 1,
            address: region_a.clone(),
        }];
        let families = vec![family_with_unit("FAM1", "2015", seeded)];

        let students = vec![
            student_at("S1", Gender::Male, "2015", region_a),
            student_at("S2", Gender::Male, "2015", region_b),
        ];
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(2)
            .mode(AssignmentMode::Heterogeneous)
            .balance_gender(false)
            .build();
        let plan = plan_for(&families, &students, &config);
        // One slot left; the candidate from the new region wins.
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].student_id, "S2");
        assert_eq!(plan.assignments[0].diversity_score, Some(2.0));
    }

    #[test]
    fn test_ties_break_by_input_order() {
        let families = vec![family_with_unit("FAM1", "2015", unit("F1", "M1"))];
        let students = vec![
            student("S2", Gender::Male, "2015"),
            student("S1", Gender::Male, "2015"),
        ];
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(1)
            .balance_gender(false)
            .build();
        let plan = plan_for(&families, &students, &config);
        // Identical scores; the (batch, id) ordering puts S1 first.
        assert_eq!(plan.assignments[0].student_id, "S1");
    }

    #[test]
    fn test_unfilled_unit_recorded_when_pool_exhausted() {
        let families = vec![family_with_unit("FAM1", "2015", unit("F1", "M1"))];
        let plan = plan_for(&families, &[], &config("2015"));
        assert!(plan.assignments.is_empty());
        assert_eq!(plan.failed.len(), 1);
        assert_eq!(plan.failed[0].unfilled_slots, 3);
        assert_eq!(plan.failed[0].reason, AssignmentFailure::NoEligibleStudents);
    }

    #[test]
    fn test_batch_restriction_reported_and_lifted() {
        let strict = family_with_unit("FAM1", "2015", unit("F1", "M1"));
        let mut open = family_with_unit("FAM2", "2015", unit("F2", "M2"));
        open.allow_other_batches = true;

        let students = vec![student("S1", Gender::Male, "2014")];
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(1)
            .build();
        let plan = plan_for(&[strict, open], &students, &config);

        // Only the cross-batch family receives the out-of-batch student.
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].family_id, "FAM2");
        assert_eq!(plan.assignments[0].batch, "2014");
        let strict_failure = plan
            .failed
            .iter()
            .find(|f| f.family_id == "FAM1")
            .expect("strict family should be reported");
        assert_eq!(strict_failure.reason, AssignmentFailure::BatchRestricted);
    }
}
