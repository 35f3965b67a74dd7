//! Fluid and pipe material property values.

use crate::error::{LibraryError, LibraryResult};
use pn_core::units::{Density, KinVisc, Length, kg_per_m3, m2ps, mm};

/// Incompressible fluid properties at the evaluation temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidProperties {
    /// Density [kg/m³]
    pub density: Density,
    /// Kinematic viscosity [m²/s]
    pub kinematic_viscosity: KinVisc,
}

impl FluidProperties {
    /// Build from raw SI values without validation.
    ///
    /// Built-in table rows go through here; user entries should use [`Self::checked`].
    pub fn new(density_kg_m3: f64, nu_m2_s: f64) -> Self {
        Self {
            density: kg_per_m3(density_kg_m3),
            kinematic_viscosity: m2ps(nu_m2_s),
        }
    }

    /// Build from raw SI values, rejecting non-positive or non-finite input.
    pub fn checked(density_kg_m3: f64, nu_m2_s: f64) -> LibraryResult<Self> {
        if !density_kg_m3.is_finite() || density_kg_m3 <= 0.0 {
            return Err(LibraryError::NonPhysical {
                what: "density must be positive",
            });
        }
        if !nu_m2_s.is_finite() || nu_m2_s <= 0.0 {
            return Err(LibraryError::NonPhysical {
                what: "kinematic viscosity must be positive",
            });
        }
        Ok(Self::new(density_kg_m3, nu_m2_s))
    }

    pub fn rho(&self) -> f64 {
        self.density.value
    }

    pub fn nu(&self) -> f64 {
        self.kinematic_viscosity.value
    }
}

/// Pipe wall material, characterised by absolute roughness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipeMaterial {
    /// Absolute roughness ε
    pub roughness: Length,
}

impl PipeMaterial {
    /// Roughness given in millimetres, as material tables list it.
    pub fn from_mm(roughness_mm: f64) -> Self {
        Self {
            roughness: mm(roughness_mm),
        }
    }

    pub fn checked_mm(roughness_mm: f64) -> LibraryResult<Self> {
        if !roughness_mm.is_finite() || roughness_mm < 0.0 {
            return Err(LibraryError::NonPhysical {
                what: "roughness cannot be negative",
            });
        }
        Ok(Self::from_mm(roughness_mm))
    }

    /// Roughness in metres.
    pub fn epsilon_m(&self) -> f64 {
        self.roughness.value
    }
}
