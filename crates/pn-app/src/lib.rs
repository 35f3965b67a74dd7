//! Shared application service layer for pumpnet.
//!
//! This crate gives the CLI one interface to the backend crates:
//! scenario management, compilation to runtime values, end-to-end
//! evaluation and library queries.

pub mod compile;
pub mod error;
pub mod evaluate;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod report;

// Re-export key types for convenience
pub use compile::{CostInputs, PumpTables, ScenarioRuntime, compile_scenario};
pub use error::{AppError, AppResult, CurveKind};
pub use evaluate::{
    BranchFlow, CurveSample, DutyPoint, EnergyReport, EvaluateOptions, Evaluation, FittedPump,
    LossSummary, SensitivityRow, evaluate, evaluate_path, evaluate_scenario,
    evaluate_with_progress,
};
pub use progress::{EvaluationProgressEvent, EvaluationStage};
pub use project_service::{
    ScenarioSummary, load_scenario, save_scenario, summarize, validate_scenario,
};
pub use report::{Section, SegmentRow, segment_breakdown};
