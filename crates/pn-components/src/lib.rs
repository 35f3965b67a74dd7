//! pn-components: pipe network elements and their hydraulic models.
//!
//! Provides:
//! - `Fitting`, `PipeSegment` and the immutable `NetworkTopology`
//! - the friction/fitting head loss model (Darcy-Weisbach, Swamee-Jain)
//! - series path summation
//! - electrical power and annual energy cost of the pump drive
//!
//! Every model here is a pure function of its inputs. Flow rates are in m³/h,
//! heads in metres of fluid column.
//!
//! # Example
//!
//! ```no_run
//! use pn_components::{HeadLoss, LossContext, PipeSegment};
//! use pn_core::units::{m, mm};
//! use pn_fluids::Library;
//!
//! let library = Library::builtin();
//! let fluid = library.resolve_fluid("Water at 20°C").unwrap();
//! let ctx = LossContext::new(fluid, &library);
//!
//! let segment = PipeSegment::new(m(100.0), mm(100.0), "Carbon Steel (new)");
//! let loss = segment.head_loss(ctx, 50.0).unwrap();
//! println!("Head loss: {loss:.3} m");
//! ```

pub mod common;
pub mod energy;
pub mod error;
pub mod pipe;
pub mod segment;
pub mod series;
pub mod topology;

// Re-exports
pub use common::{HeadLoss, LossContext};
pub use energy::{CostParameters, EnergyMetrics, OPERATING_DAYS_PER_YEAR, energy_metrics};
pub use error::{ComponentError, ComponentResult};
pub use pipe::{SegmentLoss, TURBULENT_RE, friction_factor, segment_loss};
pub use segment::{Fitting, PipeSegment};
pub use series::{series_loss, series_losses};
pub use topology::{Branch, NetworkTopology};
