//! A deterministic auto-assignment engine that places students into
//! family units under capacity, gender-balance, age and non-duplication
//! constraints, with a preview-then-commit workflow.

pub mod algorithm;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;
pub mod workflow;

// Re-export the most common types for easier use
// Core types
pub use error::{AssignmentError, Result};
pub use models::{Address, AssignmentMode, Family, Gender, Relationship, Student, UnitPath};

// Engine
pub use algorithm::assignment::{
    AssignmentConfig, AssignmentEngine, AssignmentPlan, AssignmentStatistics, Granularity,
    PreviewOutcome, ProposedAssignment, QualityLabel,
};

// Store boundary
pub use store::{ChildAddition, FamilyStore, JsonFileStore, MemoryStore};

// Workflow
pub use workflow::{
    AssignmentWorkflow, CancelFlag, ExecutionReport, ExecutionStatus, WorkflowState,
};
