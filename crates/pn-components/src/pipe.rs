//! Pipe friction and fitting losses using the Darcy-Weisbach correlation.

use pn_core::PENALTY;
use pn_core::units::constants::{G_MPS2, S_PER_H};
use pn_fluids::FluidProperties;

/// Reynolds number above which flow is treated as turbulent.
pub const TURBULENT_RE: f64 = 4000.0;

/// Head loss breakdown for one segment at one flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLoss {
    /// Distributed friction loss [m]
    pub major_m: f64,
    /// Fitting loss [m]
    pub minor_m: f64,
    /// Mean velocity [m/s]
    pub velocity_mps: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
}

impl SegmentLoss {
    /// Returned for non-positive diameters. The huge loss steers any
    /// enclosing root finder away; it is never reported as an error.
    pub fn invalid_geometry() -> Self {
        Self {
            major_m: PENALTY,
            minor_m: 0.0,
            velocity_mps: 0.0,
            reynolds: 0.0,
            friction_factor: 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.major_m + self.minor_m
    }
}

/// Darcy friction factor.
///
/// - turbulent (Re > 4000): Swamee-Jain explicit approximation of Colebrook
/// - laminar (0 < Re <= 4000): 64/Re
/// - no flow: 0
pub fn friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    if reynolds > TURBULENT_RE {
        let log_term = (relative_roughness / 3.7 + 5.74 / reynolds.powf(0.9)).log10();
        0.25 / log_term.powi(2)
    } else if reynolds > 0.0 {
        64.0 / reynolds
    } else {
        0.0
    }
}

/// Head losses of a single segment.
///
/// Lengths in metres, flow in m³/h. Negative flow is clamped to zero.
pub fn segment_loss(
    length_m: f64,
    diameter_m: f64,
    k_minor: f64,
    roughness_m: f64,
    fluid: &FluidProperties,
    flow_m3h: f64,
) -> SegmentLoss {
    if diameter_m <= 0.0 {
        return SegmentLoss::invalid_geometry();
    }

    let flow_m3s = flow_m3h.max(0.0) / S_PER_H;
    let area = std::f64::consts::PI * diameter_m.powi(2) / 4.0;
    let velocity = flow_m3s / area;

    let nu = fluid.nu();
    let reynolds = if nu > 0.0 {
        velocity * diameter_m / nu
    } else {
        0.0
    };

    let f = friction_factor(reynolds, roughness_m / diameter_m);
    let dynamic_head = velocity.powi(2) / (2.0 * G_MPS2);

    SegmentLoss {
        major_m: f * (length_m / diameter_m) * dynamic_head,
        minor_m: k_minor * dynamic_head,
        velocity_mps: velocity,
        reynolds,
        friction_factor: f,
    }
}
