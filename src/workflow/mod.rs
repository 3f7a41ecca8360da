//! Assignment workflow orchestration
//!
//! The workflow drives the four-stage process around the pure engine:
//! Configure, Preview, Review/Confirm, Execute. Stages are an explicit
//! enumerated state with guarded transitions, so a plan can never be
//! executed without a fresh, reviewed preview. The two store calls
//! (fetch before planning, persist after confirmation) are the only
//! suspension points; everything between them is synchronous computation
//! over one consistent snapshot.

pub mod executor;

pub use executor::{CancelFlag, ExecutionFailure, ExecutionReport, ExecutionStatus, PlanExecutor};

use crate::algorithm::assignment::{
    AssignmentConfig, AssignmentEngine, PreviewOutcome, validate_plan,
};
use crate::error::{AssignmentError, Result};
use crate::models::Family;
use crate::store::FamilyStore;
use std::fmt;

/// Stage of the assignment workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Configuration accepted, nothing fetched yet
    Configured,
    /// A preview has been computed and can be inspected
    Previewed,
    /// The operator confirmed the previewed plan
    Reviewed,
    /// Per-family writes are being issued
    Executing,
    /// Terminal: every family update committed
    Succeeded,
    /// Terminal: some family updates committed, some failed
    PartiallyFailed,
    /// Terminal: no family update committed
    Failed,
}

impl WorkflowState {
    /// Whether the workflow has finished executing
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::PartiallyFailed | Self::Failed)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::Previewed => write!(f, "previewed"),
            Self::Reviewed => write!(f, "reviewed"),
            Self::Executing => write!(f, "executing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::PartiallyFailed => write!(f, "partially failed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Orchestrator for the preview-then-commit assignment process
#[derive(Debug)]
pub struct AssignmentWorkflow<S: FamilyStore> {
    store: S,
    engine: AssignmentEngine,
    state: WorkflowState,
    /// Family snapshot from the last preview, used for plan validation
    families: Vec<Family>,
    preview: Option<PreviewOutcome>,
    report: Option<ExecutionReport>,
}

impl<S: FamilyStore> AssignmentWorkflow<S> {
    /// Create a workflow, validating the configuration up front
    pub fn new(store: S, config: AssignmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            engine: AssignmentEngine::new(config),
            state: WorkflowState::Configured,
            families: Vec::new(),
            preview: None,
            report: None,
        })
    }

    /// Current workflow stage
    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    /// The last computed preview, if any
    #[must_use]
    pub const fn preview_outcome(&self) -> Option<&PreviewOutcome> {
        self.preview.as_ref()
    }

    /// The execution report, once a run has finished
    #[must_use]
    pub const fn execution_report(&self) -> Option<&ExecutionReport> {
        self.report.as_ref()
    }

    /// Fetch a fresh snapshot and compute a preview
    ///
    /// Allowed while configured or already previewed; previewing again
    /// replaces the earlier plan. A fetch failure propagates and leaves
    /// the state unchanged so the stage can be retried.
    pub async fn preview(&mut self) -> Result<&PreviewOutcome> {
        match self.state {
            WorkflowState::Configured | WorkflowState::Previewed => {}
            state => {
                return Err(AssignmentError::InvalidTransition {
                    state,
                    action: "preview",
                });
            }
        }

        let batch = self.engine.config().batch.clone();
        let (families, students) = futures::try_join!(
            self.store.fetch_families(&batch),
            self.store.fetch_students(&batch)
        )?;

        let outcome = self.engine.preview(&families, &students)?;
        self.families = families;
        self.state = WorkflowState::Previewed;
        Ok(self.preview.insert(outcome))
    }

    /// Confirm the previewed plan, unlocking execution
    pub fn confirm_review(&mut self) -> Result<()> {
        if self.state != WorkflowState::Previewed {
            return Err(AssignmentError::InvalidTransition {
                state: self.state,
                action: "confirm review",
            });
        }
        self.state = WorkflowState::Reviewed;
        Ok(())
    }

    /// Persist the reviewed plan
    ///
    /// The plan is re-validated against the previewed family snapshot
    /// first; a validation failure leaves the workflow reviewed so the
    /// operator can return to preview. Per-family outcomes always drive
    /// the workflow into a terminal state.
    pub async fn execute(&mut self, cancel: &CancelFlag) -> Result<&ExecutionReport> {
        if self.state != WorkflowState::Reviewed {
            return Err(AssignmentError::InvalidTransition {
                state: self.state,
                action: "execute",
            });
        }
        let plan = match &self.preview {
            Some(outcome) => outcome.plan.clone(),
            None => {
                return Err(AssignmentError::InvalidTransition {
                    state: self.state,
                    action: "execute without a plan",
                });
            }
        };
        validate_plan(&plan, &self.families, self.engine.config())?;

        self.state = WorkflowState::Executing;
        let report = PlanExecutor::new(&self.store).execute(&plan, cancel).await;
        self.state = match report.status {
            ExecutionStatus::Succeeded => WorkflowState::Succeeded,
            ExecutionStatus::PartiallyFailed => WorkflowState::PartiallyFailed,
            ExecutionStatus::Failed => WorkflowState::Failed,
        };
        Ok(self.report.insert(report))
    }

    /// Return to the configured stage, discarding plan and report
    ///
    /// Allowed from every stage except mid-execution; a finished or
    /// abandoned run starts over with a fresh preview.
    pub fn reset(&mut self, config: AssignmentConfig) -> Result<()> {
        if self.state == WorkflowState::Executing {
            return Err(AssignmentError::InvalidTransition {
                state: self.state,
                action: "reset",
            });
        }
        config.validate()?;
        self.engine = AssignmentEngine::new(config);
        self.state = WorkflowState::Configured;
        self.families.clear();
        self.preview = None;
        self.report = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::store::MemoryStore;
    use crate::utils::test_support::{family_with_unit, student, unit};

    fn store() -> MemoryStore {
        MemoryStore::new(
            vec![family_with_unit("FAM1", "2015", unit("F1", "M1"))],
            vec![student("S1", Gender::Male, "2015")],
        )
    }

    fn config() -> AssignmentConfig {
        AssignmentConfig::builder()
            .batch("2015")
            .max_children_per_unit(2)
            .build()
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let result = AssignmentWorkflow::new(store(), AssignmentConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_execute_requires_review() {
        let mut workflow = AssignmentWorkflow::new(store(), config()).unwrap();
        workflow.preview().await.unwrap();
        let result = workflow.execute(&CancelFlag::new()).await;
        assert!(matches!(
            result,
            Err(AssignmentError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_confirm_requires_preview() {
        let mut workflow = AssignmentWorkflow::new(store(), config()).unwrap();
        assert!(workflow.confirm_review().is_err());
    }

    #[tokio::test]
    async fn test_full_run_reaches_terminal_state() {
        let mut workflow = AssignmentWorkflow::new(store(), config()).unwrap();
        workflow.preview().await.unwrap();
        workflow.confirm_review().unwrap();
        let report = workflow.execute(&CancelFlag::new()).await.unwrap();
        assert_eq!(report.status, ExecutionStatus::Succeeded);
        assert_eq!(workflow.state(), WorkflowState::Succeeded);

        // Terminal states do not preview; reset first.
        assert!(workflow.preview().await.is_err());
        workflow.reset(config()).unwrap();
        assert_eq!(workflow.state(), WorkflowState::Configured);
        assert!(workflow.preview_outcome().is_none());
    }

    #[tokio::test]
    async fn test_re_preview_replaces_plan() {
        let mut workflow = AssignmentWorkflow::new(store(), config()).unwrap();
        let first = workflow.preview().await.unwrap().clone();
        let second = workflow.preview().await.unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(workflow.state(), WorkflowState::Previewed);
    }
}
