#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStage {
    FittingCurves,
    SolvingOperatingPoint,
    BreakingDownLosses,
    SamplingCurves,
    SweepingSensitivity,
    Completed,
}

impl EvaluationStage {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationStage::FittingCurves => "fitting pump curves",
            EvaluationStage::SolvingOperatingPoint => "solving operating point",
            EvaluationStage::BreakingDownLosses => "breaking down losses",
            EvaluationStage::SamplingCurves => "sampling curves",
            EvaluationStage::SweepingSensitivity => "sweeping diameter sensitivity",
            EvaluationStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationProgressEvent {
    pub stage: EvaluationStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl EvaluationProgressEvent {
    pub fn stage(stage: EvaluationStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }
}
