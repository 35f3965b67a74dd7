//! Per-segment loss breakdown at the operating point.

use pn_components::{LossContext, NetworkTopology, PipeSegment};
use pn_core::SegmentId;
use pn_core::units::to_mm;
use pn_solver::ParallelSolution;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Where in the network a segment sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Before,
    Parallel,
    After,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Before => "Before split",
            Section::Parallel => "Parallel",
            Section::After => "After junction",
        }
    }
}

/// One row of the segment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub section: Section,
    /// Branch name for parallel segments
    pub branch: Option<String>,
    /// 1-based position within its section or branch
    pub index: usize,
    pub segment_id: SegmentId,
    pub material: String,
    pub length_m: f64,
    pub diameter_mm: f64,
    pub flow_m3h: f64,
    pub velocity_mps: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub major_m: f64,
    pub minor_m: f64,
}

impl SegmentRow {
    pub fn total_m(&self) -> f64 {
        self.major_m + self.minor_m
    }
}

/// Loss table for every segment that carries flow at `flow_m3h`.
///
/// Branch segments use the branch flows from `parallel`. A lone branch is not
/// part of the hydraulics and is left out.
pub fn segment_breakdown(
    topology: &NetworkTopology,
    ctx: LossContext<'_>,
    flow_m3h: f64,
    parallel: &ParallelSolution,
) -> AppResult<Vec<SegmentRow>> {
    let mut rows = Vec::new();

    push_rows(&mut rows, &topology.before, Section::Before, None, ctx, flow_m3h)?;

    for branch in topology.active_branches() {
        let branch_flow = parallel.flow_of(&branch.name).ok_or_else(|| {
            AppError::Solver(format!("no flow computed for branch '{}'", branch.name))
        })?;
        push_rows(
            &mut rows,
            &branch.segments,
            Section::Parallel,
            Some(&branch.name),
            ctx,
            branch_flow,
        )?;
    }

    push_rows(&mut rows, &topology.after, Section::After, None, ctx, flow_m3h)?;

    Ok(rows)
}

fn push_rows(
    rows: &mut Vec<SegmentRow>,
    segments: &[PipeSegment],
    section: Section,
    branch: Option<&str>,
    ctx: LossContext<'_>,
    flow_m3h: f64,
) -> AppResult<()> {
    for (i, segment) in segments.iter().enumerate() {
        let loss = segment.losses(ctx, flow_m3h)?;
        rows.push(SegmentRow {
            section,
            branch: branch.map(str::to_string),
            index: i + 1,
            segment_id: segment.id,
            material: segment.material.clone(),
            length_m: segment.length.value,
            diameter_mm: to_mm(segment.diameter),
            flow_m3h,
            velocity_mps: loss.velocity_mps,
            reynolds: loss.reynolds,
            friction_factor: loss.friction_factor,
            major_m: loss.major_m,
            minor_m: loss.minor_m,
        });
    }
    Ok(())
}
