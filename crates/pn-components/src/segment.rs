//! Pipe segments and their fittings.

use crate::common::{HeadLoss, LossContext};
use crate::error::{ComponentError, ComponentResult};
use crate::pipe::{SegmentLoss, segment_loss};
use pn_core::SegmentId;
use pn_core::units::Length;

/// Localised loss element (valve, elbow, tee, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Fitting {
    pub name: String,
    /// Loss coefficient K
    pub k: f64,
    pub quantity: u32,
}

impl Fitting {
    /// # Errors
    /// Returns error if K is negative or non-finite, or quantity is zero.
    pub fn new(name: impl Into<String>, k: f64, quantity: u32) -> ComponentResult<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "fitting K must be non-negative",
            });
        }
        if quantity == 0 {
            return Err(ComponentError::InvalidArg {
                what: "fitting quantity must be at least 1",
            });
        }
        Ok(Self {
            name: name.into(),
            k,
            quantity,
        })
    }

    /// Fitting with the K factor from the built-in catalogue.
    pub fn from_catalog(name: &str, quantity: u32) -> ComponentResult<Self> {
        let k = pn_fluids::fitting_k(name).ok_or(ComponentError::InvalidArg {
            what: "fitting not in catalogue",
        })?;
        Self::new(name, k, quantity)
    }

    /// Contribution to the segment's minor loss coefficient.
    pub fn k_total(&self) -> f64 {
        self.k * f64::from(self.quantity)
    }
}

/// Straight run of pipe of one material and diameter, plus its fittings.
///
/// The constructor does not validate geometry. A non-positive diameter is
/// handled by the loss model as a penalty instead of an error, so that root
/// finders can probe such regions.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSegment {
    pub id: SegmentId,
    pub length: Length,
    pub diameter: Length,
    /// Material name, resolved through the library at evaluation time.
    pub material: String,
    pub fittings: Vec<Fitting>,
}

impl PipeSegment {
    pub fn new(length: Length, diameter: Length, material: impl Into<String>) -> Self {
        Self {
            id: SegmentId::new(),
            length,
            diameter,
            material: material.into(),
            fittings: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: SegmentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_fitting(mut self, fitting: Fitting) -> Self {
        self.fittings.push(fitting);
        self
    }

    /// Sum of K·qty over all fittings.
    pub fn k_minor(&self) -> f64 {
        self.fittings.iter().map(Fitting::k_total).sum()
    }

    /// Copy with the diameter multiplied by `factor`. Id is kept.
    pub fn scaled_diameter(&self, factor: f64) -> Self {
        Self {
            diameter: self.diameter * factor,
            ..self.clone()
        }
    }

    /// Full loss breakdown (major, minor, velocity) at `flow_m3h`.
    pub fn losses(&self, ctx: LossContext<'_>, flow_m3h: f64) -> ComponentResult<SegmentLoss> {
        let material = ctx.library.resolve_material(&self.material)?;
        Ok(segment_loss(
            self.length.value,
            self.diameter.value,
            self.k_minor(),
            material.epsilon_m(),
            &ctx.fluid,
            flow_m3h,
        ))
    }
}

impl HeadLoss for PipeSegment {
    fn head_loss(&self, ctx: LossContext<'_>, flow_m3h: f64) -> ComponentResult<f64> {
        Ok(self.losses(ctx, flow_m3h)?.total())
    }
}
