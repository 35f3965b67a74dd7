//! End-to-end evaluation of a compiled scenario.

use std::path::Path;
use std::time::Instant;

use pn_components::energy_metrics;
use pn_project::schema::Scenario;
use pn_solver::{
    OperatingPointConfig, ParallelConfig, Polynomial, SampleRow, ScaleRange, SensitivityConfig,
    SystemCurve, diameter_sensitivity, efficiency_at, find_operating_point, fit_curve,
    sample_curve,
};
use serde::{Deserialize, Serialize};

use crate::compile::{ScenarioRuntime, compile_scenario};
use crate::error::{AppError, AppResult, CurveKind};
use crate::progress::{EvaluationProgressEvent, EvaluationStage};
use crate::project_service;
use crate::report::{SegmentRow, segment_breakdown};

/// Knobs for one evaluation.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Number of samples per curve for charting
    pub curve_points: usize,
    /// Overrides the scenario's sensitivity range when set
    pub sensitivity_range: Option<ScaleRange>,
    pub operating_point: OperatingPointConfig,
    pub parallel: ParallelConfig,
    pub sensitivity: SensitivityConfig,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            curve_points: 100,
            sensitivity_range: None,
            operating_point: OperatingPointConfig::default(),
            parallel: ParallelConfig::default(),
            sensitivity: SensitivityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPump {
    /// Head polynomial, highest degree first
    pub head_coefficients: Vec<f64>,
    /// Efficiency polynomial, highest degree first
    pub efficiency_coefficients: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DutyPoint {
    pub flow_m3h: f64,
    pub head_m: f64,
    pub efficiency_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    pub power_kw: f64,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossSummary {
    pub static_m: f64,
    pub before_m: f64,
    pub parallel_m: f64,
    pub after_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchFlow {
    pub name: String,
    pub flow_m3h: f64,
}

/// One charting sample. `system_head_m` is `None` where the split is infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub flow_m3h: f64,
    pub pump_head_m: Option<f64>,
    pub system_head_m: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub scale_pct: f64,
    pub annual_cost: Option<f64>,
}

/// Everything a report needs about one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scenario: String,
    pub pump: FittedPump,
    pub operating_point: DutyPoint,
    pub energy: EnergyReport,
    pub losses: LossSummary,
    pub branch_flows: Vec<BranchFlow>,
    pub segments: Vec<SegmentRow>,
    pub curves: Vec<CurveSample>,
    pub sensitivity: Vec<SensitivityRow>,
}

impl Evaluation {
    /// Pretty-printed JSON report.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load, compile and evaluate a scenario file.
pub fn evaluate_path(path: &Path, options: &EvaluateOptions) -> AppResult<Evaluation> {
    let scenario = project_service::load_scenario(path)?;
    evaluate_scenario(&scenario, options)
}

pub fn evaluate_scenario(scenario: &Scenario, options: &EvaluateOptions) -> AppResult<Evaluation> {
    let runtime = compile_scenario(scenario)?;
    evaluate(&runtime, options)
}

pub fn evaluate(runtime: &ScenarioRuntime, options: &EvaluateOptions) -> AppResult<Evaluation> {
    evaluate_with_progress(runtime, options, None)
}

/// Run the evaluation pipeline, reporting each stage to `progress_cb`.
///
/// The checks run in a fixed order: curve data, pump compatibility, empty
/// network, then the operating point search.
pub fn evaluate_with_progress(
    runtime: &ScenarioRuntime,
    options: &EvaluateOptions,
    mut progress_cb: Option<&mut dyn FnMut(EvaluationProgressEvent)>,
) -> AppResult<Evaluation> {
    let started = Instant::now();
    let mut emit = |stage: EvaluationStage, message: Option<String>| {
        tracing::debug!(stage = stage.label(), "evaluation stage");
        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(EvaluationProgressEvent::stage(
                stage,
                started.elapsed().as_secs_f64(),
                message,
            ));
        }
    };

    emit(EvaluationStage::FittingCurves, None);
    let degree = runtime.pump.degree;
    let head = fit(&runtime.pump.head, degree, CurveKind::Head)?;
    let efficiency = fit(&runtime.pump.efficiency, degree, CurveKind::Efficiency)?;

    let geometric_head_m = runtime.geometric_head_m;
    let shutoff_head_m = head.eval(0.0);
    if shutoff_head_m < geometric_head_m {
        return Err(AppError::IncompatiblePump {
            shutoff_head_m,
            geometric_head_m,
        });
    }

    if runtime.topology.is_empty() {
        return Err(AppError::EmptyTopology);
    }

    emit(EvaluationStage::SolvingOperatingPoint, None);
    let ctx = runtime.loss_context();
    let system = SystemCurve::new(&runtime.topology, ctx, geometric_head_m)
        .with_parallel_config(options.parallel);
    let op = find_operating_point(&head, &system, geometric_head_m, &options.operating_point)?;
    let efficiency_pct = efficiency_at(&efficiency, op.flow_m3h);

    let cost = runtime.cost.with_pump_efficiency(efficiency_pct);
    let energy = energy_metrics(op.flow_m3h, op.head_m, &cost, &runtime.fluid);

    emit(
        EvaluationStage::BreakingDownLosses,
        Some(format!("Q = {:.2} m³/h", op.flow_m3h)),
    );
    let losses = system.losses(op.flow_m3h)?;
    let segments = segment_breakdown(&runtime.topology, ctx, op.flow_m3h, &losses.parallel)?;
    let branch_flows = losses
        .parallel
        .flows
        .iter()
        .map(|(name, flow_m3h)| BranchFlow {
            name: name.clone(),
            flow_m3h: *flow_m3h,
        })
        .collect();

    emit(EvaluationStage::SamplingCurves, None);
    let q_max = chart_flow_limit(op.flow_m3h, &runtime.pump.head);
    let pump_samples = sample_curve(&head, q_max, options.curve_points)?;
    let system_samples = sample_curve(&system, q_max, options.curve_points)?;
    let curves = pump_samples
        .iter()
        .zip(system_samples.iter())
        .map(|(p, s)| CurveSample {
            flow_m3h: p.flow_m3h,
            pump_head_m: p.head_m,
            system_head_m: s.head_m,
        })
        .collect();

    emit(EvaluationStage::SweepingSensitivity, None);
    let range = options.sensitivity_range.unwrap_or(runtime.sensitivity);
    let sensitivity = diameter_sensitivity(
        &runtime.topology,
        ctx,
        geometric_head_m,
        op.flow_m3h,
        &cost,
        range,
        &SensitivityConfig {
            parallel: options.parallel,
            ..options.sensitivity
        },
    )?
    .into_iter()
    .map(|p| SensitivityRow {
        scale_pct: p.scale_pct,
        annual_cost: p.annual_cost,
    })
    .collect();

    emit(EvaluationStage::Completed, None);
    tracing::info!(
        scenario = %runtime.name,
        flow_m3h = op.flow_m3h,
        head_m = op.head_m,
        power_kw = energy.power_kw(),
        "evaluation complete"
    );

    Ok(Evaluation {
        scenario: runtime.name.clone(),
        pump: FittedPump {
            head_coefficients: head.coefficients().to_vec(),
            efficiency_coefficients: efficiency.coefficients().to_vec(),
        },
        operating_point: DutyPoint {
            flow_m3h: op.flow_m3h,
            head_m: op.head_m,
            efficiency_pct,
        },
        energy: EnergyReport {
            power_kw: energy.power_kw(),
            annual_cost: energy.annual_cost,
        },
        losses: LossSummary {
            static_m: geometric_head_m,
            before_m: losses.before_m,
            parallel_m: losses.parallel.head_loss_m,
            after_m: losses.after_m,
        },
        branch_flows,
        segments,
        curves,
        sensitivity,
    })
}

fn fit(rows: &[SampleRow], degree: usize, curve: CurveKind) -> AppResult<Polynomial> {
    fit_curve(rows, degree).ok_or_else(|| {
        let found = valid_rows(rows).count();
        tracing::warn!(%curve, found, degree, "not enough curve data");
        AppError::InsufficientCurveData {
            curve,
            degree,
            required: degree + 1,
            found,
        }
    })
}

fn valid_rows(rows: &[SampleRow]) -> impl Iterator<Item = (f64, f64)> + '_ {
    rows.iter()
        .filter_map(|r| Some((r.flow.coerce()?, r.value.coerce()?)))
}

/// Upper flow for charts: 20 % beyond the duty point or the pump table,
/// whichever reaches further.
fn chart_flow_limit(duty_flow_m3h: f64, head_rows: &[SampleRow]) -> f64 {
    let max_sample = valid_rows(head_rows)
        .map(|(q, _)| q)
        .fold(0.0_f64, f64::max);
    1.2 * duty_flow_m3h.max(max_sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_limit_covers_duty_and_table() {
        let rows = vec![SampleRow::new(0.0, 40.0), SampleRow::new(100.0, 25.0)];
        assert!((chart_flow_limit(50.0, &rows) - 120.0).abs() < 1e-12);
        assert!((chart_flow_limit(150.0, &rows) - 180.0).abs() < 1e-12);
        assert!((chart_flow_limit(10.0, &[]) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn fit_failure_reports_counts() {
        let rows = vec![SampleRow::new(0.0, 40.0), SampleRow::new("x", 30.0)];
        match fit(&rows, 2, CurveKind::Head) {
            Err(AppError::InsufficientCurveData {
                curve,
                required,
                found,
                ..
            }) => {
                assert_eq!(curve, CurveKind::Head);
                assert_eq!(required, 3);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
