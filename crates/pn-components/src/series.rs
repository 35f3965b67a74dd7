//! Series paths: the same flow passes through every segment in order.

use crate::common::{HeadLoss, LossContext};
use crate::error::ComponentResult;
use crate::pipe::SegmentLoss;
use crate::segment::PipeSegment;

/// Total head loss of an ordered run of segments. An empty run loses nothing.
pub fn series_loss(
    segments: &[PipeSegment],
    ctx: LossContext<'_>,
    flow_m3h: f64,
) -> ComponentResult<f64> {
    segments.iter().try_fold(0.0, |acc, segment| {
        Ok(acc + segment.head_loss(ctx, flow_m3h)?)
    })
}

/// Per-segment breakdown of a series run, in order.
pub fn series_losses(
    segments: &[PipeSegment],
    ctx: LossContext<'_>,
    flow_m3h: f64,
) -> ComponentResult<Vec<SegmentLoss>> {
    segments
        .iter()
        .map(|segment| segment.losses(ctx, flow_m3h))
        .collect()
}

impl HeadLoss for [PipeSegment] {
    fn head_loss(&self, ctx: LossContext<'_>, flow_m3h: f64) -> ComponentResult<f64> {
        series_loss(self, ctx, flow_m3h)
    }
}
