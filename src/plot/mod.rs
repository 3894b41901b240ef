//! Assembling and drawing figures
//!
//! Figures are built up as plain data first: a [Figure] is a row of [Panel]s,
//! each holding labelled [Series] of points. Nothing touches the drawing
//! backend until [render] is called, so the content and layout of a figure
//! can be inspected directly.
//!
//! ```ignore
//! use eprem_plots::plot::{self, spectrum};
//!
//! let figure = spectrum::build_figure(0, None, &paths, &options)?;
//! plot::ensure_directory(&output)?;
//! plot::render(&figure, &output.join(spectrum::output_name(0, &options.time()?)))?;
//! ```
//!
//! The two layouts used by the command line tools live in [spectrum] and
//! [survey].

// Split into subfiles for development, but anything important is re-exported
mod figure;
mod render;

pub mod spectrum;
pub mod survey;

#[doc(inline)]
pub use crate::plot::figure::{Colour, Figure, Panel, Scale, Series, Style};

#[doc(inline)]
pub use crate::plot::render::{ensure_directory, render, show};
