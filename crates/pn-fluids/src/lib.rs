//! pn-fluids: fluid and pipe material properties for pumpnet.
//!
//! Provides:
//! - `FluidProperties` (density + kinematic viscosity) and `PipeMaterial` (roughness)
//! - the built-in catalogue of materials, fluids and fitting loss coefficients
//! - `Library`, a two-tier registry overlaying user entries on the built-ins

pub mod catalog;
pub mod error;
pub mod library;
pub mod model;

pub use catalog::{
    FittingCatalogEntry, builtin_fluids, builtin_materials, filter_fitting_catalog,
    fitting_catalog, fitting_k,
};
pub use error::{LibraryError, LibraryResult};
pub use library::{Library, Tier};
pub use model::{FluidProperties, PipeMaterial};
