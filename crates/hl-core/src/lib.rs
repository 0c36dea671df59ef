//! hl-core: shared foundation for heatload.
//!
//! Contains:
//! - units (uom SI conversions + physical constants)
//! - numeric (parameter checks)
//! - index (name -> contiguous index maps used by the solvers)
//! - error (shared error types)

pub mod error;
pub mod index;
pub mod numeric;
pub mod units;

pub use error::{HlError, HlResult};
pub use index::NameIndex;
pub use numeric::*;
pub use units::*;
