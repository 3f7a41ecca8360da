//! Plan executor
//!
//! Persists an approved plan through the store boundary: assignments are
//! grouped by family and each family receives exactly one append call,
//! so the number of writes is bounded by the number of families touched.
//! Family updates are independent; one failure never blocks the others
//! and committed updates are never rolled back. A cancel flag checked
//! between writes stops further updates.

use crate::algorithm::assignment::AssignmentPlan;
use crate::models::ChildRecord;
use crate::store::{ChildAddition, FamilyStore};
use crate::utils::progress;
use log::{info, warn};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Cooperative cancellation flag for an execution run
///
/// Cancellation stops further per-family writes; it never rolls back
/// writes that already committed.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Overall outcome of an execution run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Every family update succeeded
    Succeeded,
    /// Some family updates succeeded and some failed
    PartiallyFailed,
    /// Every family update failed
    Failed,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::PartiallyFailed => write!(f, "partially failed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One family whose update did not commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    /// Family id
    pub family_id: String,
    /// Family display name
    pub family_name: String,
    /// Why the update failed
    pub reason: String,
}

/// Per-family results of an execution run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    /// Families whose update committed
    pub success_count: usize,
    /// Families whose update failed or was cancelled
    pub failure_count: usize,
    /// Itemized failures
    pub failures: Vec<ExecutionFailure>,
    /// Overall status
    pub status: ExecutionStatus,
    /// Human-readable outcome line
    pub message: String,
}

/// One family's batched additions
struct FamilyBatch {
    family_id: String,
    family_name: String,
    additions: Vec<ChildAddition>,
}

/// Executor that persists approved plans
#[derive(Debug)]
pub struct PlanExecutor<'a, S: FamilyStore> {
    store: &'a S,
}

impl<'a, S: FamilyStore> PlanExecutor<'a, S> {
    /// Create an executor over the given store
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Persist a plan, one store call per affected family
    pub async fn execute(&self, plan: &AssignmentPlan, cancel: &CancelFlag) -> ExecutionReport {
        let batches = group_by_family(plan);
        if batches.is_empty() {
            return ExecutionReport {
                success_count: 0,
                failure_count: 0,
                failures: Vec::new(),
                status: ExecutionStatus::Succeeded,
                message: "no assignments to persist".to_string(),
            };
        }

        let start = Instant::now();
        info!(
            "Executing plan: {} assignments across {} families",
            plan.assignments.len(),
            batches.len()
        );
        let pb = progress::create_main_progress_bar(batches.len() as u64, Some("Persisting families"));

        let mut success_count = 0;
        let mut failures = Vec::new();
        for batch in &batches {
            if cancel.is_cancelled() {
                warn!(
                    "Execution cancelled; skipping family {} and all remaining writes",
                    batch.family_id
                );
                failures.push(ExecutionFailure {
                    family_id: batch.family_id.clone(),
                    family_name: batch.family_name.clone(),
                    reason: "cancelled before write".to_string(),
                });
                continue;
            }

            match self
                .store
                .persist_family_children(&batch.family_id, &batch.additions)
                .await
            {
                Ok(()) => success_count += 1,
                Err(e) => {
                    warn!("Family {} update failed: {e}", batch.family_id);
                    failures.push(ExecutionFailure {
                        family_id: batch.family_id.clone(),
                        family_name: batch.family_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            pb.inc(1);
        }
        progress::finish_progress_bar(&pb, Some("Persistence complete"));

        let failure_count = failures.len();
        let status = if failure_count == 0 {
            ExecutionStatus::Succeeded
        } else if success_count > 0 {
            ExecutionStatus::PartiallyFailed
        } else {
            ExecutionStatus::Failed
        };
        let message = format!(
            "persisted {success_count} of {} family updates in {:.2?}",
            batches.len(),
            start.elapsed()
        );
        info!("Execution {status}: {message}");

        ExecutionReport {
            success_count,
            failure_count,
            failures,
            status,
            message,
        }
    }
}

/// Group a plan's assignments by family, preserving first-seen order
fn group_by_family(plan: &AssignmentPlan) -> Vec<FamilyBatch> {
    let mut batches: Vec<FamilyBatch> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for assignment in &plan.assignments {
        let addition = ChildAddition {
            unit_path: assignment.unit_path,
            child: ChildRecord {
                student_id: assignment.student_id.clone(),
                full_name: assignment.student_name.clone(),
                relationship: assignment.relationship,
                birth_order: assignment.birth_order,
                address: assignment.address.clone(),
            },
        };
        match index.get(assignment.family_id.as_str()) {
            Some(&i) => batches[i].additions.push(addition),
            None => {
                index.insert(assignment.family_id.as_str(), batches.len());
                batches.push(FamilyBatch {
                    family_id: assignment.family_id.clone(),
                    family_name: assignment.family_name.clone(),
                    additions: vec![addition],
                });
            }
        }
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::assignment::{AssignmentConfig, AssignmentEngine};
    use crate::models::Gender;
    use crate::store::MemoryStore;
    use crate::utils::test_support::{family_with_unit, student, unit};

    fn fixture_store(failing: &[&str]) -> MemoryStore {
        MemoryStore::new(
            vec![
                family_with_unit("FAM1", "2015", unit("F1", "M1")),
                family_with_unit("FAM2", "2015", unit("F2", "M2")),
            ],
            vec![
                student("S1", Gender::Male, "2015"),
                student("S2", Gender::Female, "2015"),
                student("S3", Gender::Male, "2015"),
                student("S4", Gender::Female, "2015"),
            ],
        )
        .with_failing_families(failing)
    }

    async fn preview_plan(store: &MemoryStore) -> AssignmentPlan {
        let config = AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(2)
            .build();
        let engine = AssignmentEngine::new(config);
        let families = store.fetch_families("2015").await.unwrap();
        let students = store.fetch_students("2015").await.unwrap();
        engine.preview(&families, &students).unwrap().plan
    }

    #[tokio::test]
    async fn test_one_write_per_family() {
        let store = fixture_store(&[]);
        let plan = preview_plan(&store).await;
        assert_eq!(plan.assignments.len(), 4);
        let report = PlanExecutor::new(&store).execute(&plan, &CancelFlag::new()).await;
        assert_eq!(report.status, ExecutionStatus::Succeeded);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failure_count, 0);
    }

    #[tokio::test]
    async fn test_partial_failure_independence() {
        let store = fixture_store(&["FAM1"]);
        let plan = preview_plan(&store).await;
        let report = PlanExecutor::new(&store).execute(&plan, &CancelFlag::new()).await;
        assert_eq!(report.status, ExecutionStatus::PartiallyFailed);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.failures[0].family_id, "FAM1");
        // The failing family's children were not written; the other's were.
        let families = store.families_snapshot();
        assert!(families[0].groups[0].units[0].children.is_empty());
        assert_eq!(families[1].groups[0].units[0].children.len(), 2);
    }

    #[tokio::test]
    async fn test_all_failures_is_failed() {
        let store = fixture_store(&["FAM1", "FAM2"]);
        let plan = preview_plan(&store).await;
        let report = PlanExecutor::new(&store).execute(&plan, &CancelFlag::new()).await;
        assert_eq!(report.status, ExecutionStatus::Failed);
        assert_eq!(report.success_count, 0);
        assert_eq!(report.failure_count, 2);
    }

    #[tokio::test]
    async fn test_empty_plan_succeeds_without_writes() {
        let store = fixture_store(&[]);
        let plan = AssignmentPlan {
            mode: crate::models::AssignmentMode::Homogeneous,
            assignments: Vec::new(),
            failed: Vec::new(),
        };
        let report = PlanExecutor::new(&store).execute(&plan, &CancelFlag::new()).await;
        assert_eq!(report.status, ExecutionStatus::Succeeded);
        assert_eq!(report.success_count + report.failure_count, 0);
    }

    #[tokio::test]
    async fn test_cancelled_run_issues_no_writes() {
        let store = fixture_store(&[]);
        let plan = preview_plan(&store).await;
        let cancel = CancelFlag::new();
        cancel.cancel();
        let report = PlanExecutor::new(&store).execute(&plan, &cancel).await;
        assert_eq!(report.status, ExecutionStatus::Failed);
        assert_eq!(report.failure_count, 2);
        assert!(report.failures.iter().all(|f| f.reason.contains("cancelled")));
        let families = store.families_snapshot();
        assert!(families.iter().all(|f| f.groups[0].units[0].children.is_empty()));
    }
}
