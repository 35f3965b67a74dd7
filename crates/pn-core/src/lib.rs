//! pn-core: stable foundation for pumpnet.
//!
//! Contains:
//! - units (uom SI types + constructors, gravity)
//! - numeric (solver penalty marker and helpers)
//! - ids (stable segment IDs for UI correlation)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PnError, PnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
