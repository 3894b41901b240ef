//! Unit-aware measurements
//!
//! Only the small part of a unit system that the plotting tools need: parsing
//! unit expressions, converting between compatible units, and carrying one or
//! more magnitudes alongside their unit.
//!
//! ```rust
//! use eprem_plots::quantity::measure;
//!
//! let radius = measure([215.0], "Rsun").unwrap().with_unit("au").unwrap();
//! assert!((radius.value().unwrap() - 1.0).abs() < 0.01);
//! ```

mod measurement;
mod unit;

#[doc(inline)]
pub use crate::quantity::measurement::{measure, Measurement};

#[doc(inline)]
pub use crate::quantity::unit::{conversion_factor, Unit};
