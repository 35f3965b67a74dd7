//! Two-tier registry of pipe materials and fluids.
//!
//! Lookups go through `resolve_*`. Precedence is fixed: a user entry shadows
//! a built-in entry with the same name. The two are never merged.

use crate::catalog::{builtin_fluids, builtin_materials};
use crate::error::{LibraryError, LibraryResult};
use crate::model::{FluidProperties, PipeMaterial};
use std::collections::BTreeMap;

/// Where a resolved entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    BuiltIn,
    User,
}

#[derive(Debug, Clone)]
struct Registry<T> {
    builtin: BTreeMap<String, T>,
    user: BTreeMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            builtin: BTreeMap::new(),
            user: BTreeMap::new(),
        }
    }
}

impl<T: Copy> Registry<T> {
    fn resolve(&self, name: &str) -> Option<T> {
        self.user
            .get(name)
            .or_else(|| self.builtin.get(name))
            .copied()
    }

    fn add_user(&mut self, name: &str, value: T) -> LibraryResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::InvalidArg {
                what: "library entry name cannot be empty",
            });
        }
        if self.user.contains_key(name) {
            return Err(LibraryError::Duplicate {
                name: name.to_string(),
            });
        }
        self.user.insert(name.to_string(), value);
        Ok(())
    }

    fn entries(&self) -> Vec<(&str, T, Tier)> {
        let mut out: Vec<(&str, T, Tier)> = self
            .builtin
            .iter()
            .filter(|(name, _)| !self.user.contains_key(*name))
            .map(|(name, v)| (name.as_str(), *v, Tier::BuiltIn))
            .collect();
        out.extend(
            self.user
                .iter()
                .map(|(name, v)| (name.as_str(), *v, Tier::User)),
        );
        out
    }
}

/// Snapshot of the material and fluid tables available to one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Library {
    materials: Registry<PipeMaterial>,
    fluids: Registry<FluidProperties>,
}

impl Library {
    /// Library with no entries at all (mostly for tests).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in materials and fluids only.
    pub fn builtin() -> Self {
        let mut lib = Self::empty();
        for (name, material) in builtin_materials() {
            lib.materials.builtin.insert(name.to_string(), material);
        }
        for (name, fluid) in builtin_fluids() {
            lib.fluids.builtin.insert(name.to_string(), fluid);
        }
        lib
    }

    /// Register a user material. Roughness is given in mm.
    pub fn add_user_material(&mut self, name: &str, roughness_mm: f64) -> LibraryResult<()> {
        let material = PipeMaterial::checked_mm(roughness_mm)?;
        self.materials.add_user(name, material)
    }

    /// Register a user fluid.
    pub fn add_user_fluid(
        &mut self,
        name: &str,
        density_kg_m3: f64,
        nu_m2_s: f64,
    ) -> LibraryResult<()> {
        let fluid = FluidProperties::checked(density_kg_m3, nu_m2_s)?;
        self.fluids.add_user(name, fluid)
    }

    /// Builder-style variant of [`Self::add_user_material`].
    pub fn with_user_material(mut self, name: &str, roughness_mm: f64) -> LibraryResult<Self> {
        self.add_user_material(name, roughness_mm)?;
        Ok(self)
    }

    pub fn with_user_fluid(
        mut self,
        name: &str,
        density_kg_m3: f64,
        nu_m2_s: f64,
    ) -> LibraryResult<Self> {
        self.add_user_fluid(name, density_kg_m3, nu_m2_s)?;
        Ok(self)
    }

    pub fn resolve_material(&self, name: &str) -> LibraryResult<PipeMaterial> {
        self.materials
            .resolve(name)
            .ok_or_else(|| LibraryError::UnknownMaterial {
                name: name.to_string(),
            })
    }

    pub fn resolve_fluid(&self, name: &str) -> LibraryResult<FluidProperties> {
        self.fluids
            .resolve(name)
            .ok_or_else(|| LibraryError::UnknownFluid {
                name: name.to_string(),
            })
    }

    /// Effective material table: built-ins not shadowed, then user entries.
    pub fn materials(&self) -> Vec<(&str, PipeMaterial, Tier)> {
        self.materials.entries()
    }

    pub fn fluids(&self) -> Vec<(&str, FluidProperties, Tier)> {
        self.fluids.entries()
    }

    /// Names that resolve as materials, each listed once.
    pub fn material_names(&self) -> Vec<&str> {
        self.materials.entries().into_iter().map(|(n, _, _)| n).collect()
    }

    pub fn fluid_names(&self) -> Vec<&str> {
        self.fluids.entries().into_iter().map(|(n, _, _)| n).collect()
    }
}
