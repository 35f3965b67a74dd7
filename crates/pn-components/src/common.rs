//! Common utilities for component calculations.

use crate::error::ComponentResult;
use pn_fluids::{FluidProperties, Library};

/// Everything a loss evaluation needs besides geometry and flow.
#[derive(Clone, Copy, Debug)]
pub struct LossContext<'a> {
    pub fluid: FluidProperties,
    pub library: &'a Library,
}

impl<'a> LossContext<'a> {
    pub fn new(fluid: FluidProperties, library: &'a Library) -> Self {
        Self { fluid, library }
    }
}

/// Anything that dissipates head as a function of volumetric flow.
///
/// Implementations must be deterministic and free of side effects so they can
/// be probed repeatedly by root finders.
pub trait HeadLoss {
    /// Head loss [m] at `flow_m3h` [m³/h].
    fn head_loss(&self, ctx: LossContext<'_>, flow_m3h: f64) -> ComponentResult<f64>;
}
