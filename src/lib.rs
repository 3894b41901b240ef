//! # The EPREM plots crate
//!
//! A collection of plotting tools for stream observer output of the EPREM
//! energetic particle model
//!
//! ## Installation
//!
//! Direct install from github:
//!
//! ```shell
//! cargo install --git https://github.com/repositony/eprem-plots.git
//! ```
//!
//! ## Overview
//!
//! The crate contains two command line tools for quickly looking at the
//! results of one or more simulation runs.
//!
//! | Command line    | Description                                              |
//! | --------------- | -------------------------------------------------------- |
//! | `flux-energy`   | Flux spectrum against energy at chosen shells and radii  |
//! | `stream-survey` | Flux, fluence, and integral flux of each stream observer |
//!
//! All tools are fully documented with detailed `--help` messages, including
//! examples for common use cases.
//!
//! ### Selecting runs
//!
//! Runs are directories containing the simulation configuration and the
//! observer files. A directory of runs is recognised automatically when every
//! entry in it is itself a directory, and specific runs may be picked out by
//! name or by glob pattern. See [paths::build_paths] for the full rules.
//!
//! ### Selecting data
//!
//! Times, shells, radii, and species are given loosely on the command line and
//! normalised into typed selections by the [params] module.
//!
//! | Selection | Examples                          |
//! | --------- | --------------------------------- |
//! | Time      | `--time 10`, `--time 2.5 day`     |
//! | Shell     | `--shell 0 5 10`                  |
//! | Radius    | `--radius 0.5 1.0`, `--radius 1 2 au` |
//! | Species   | `--species 0`, `--species He++`   |
//!
//! ## Advanced use
//!
//! The library is usable on its own. Observer data are read through [eprem],
//! and figures are plain data from [plot] until rendered.
//!
//! ```ignore
//! use eprem_plots::eprem::Dataset;
//! use eprem_plots::params::SurveyOptions;
//! use eprem_plots::plot::{self, survey};
//!
//! let dataset = Dataset::open("./run", None)?;
//! for observer in dataset.streams()? {
//!     let figure = survey::survey_figure(&observer, &SurveyOptions::default())?;
//!     plot::render(&figure, survey::output_name(&observer).as_ref())?;
//! }
//! ```
//!
//! As an overview:
//! - The [eprem] module reads run configuration and stream observer data.
//! - The [params] module turns command line values into typed selections.
//! - The [paths] module resolves which run directories to plot.
//! - The [plot] module assembles and renders figures.
//! - The [quantity] module handles units and unit-tagged values.
//!
//! In the background, `nom` parses unit expressions, glob patterns, and
//! configuration files, `serde` reads observer data, `clap` is used for the
//! command line interface, and `plotters` draws the images.

// Public facing modules
pub mod eprem;
pub mod params;
pub mod paths;
pub mod pattern;
pub mod plot;
pub mod quantity;
pub mod utils;

// Re-exports of useful data structures
#[doc(inline)]
pub use crate::eprem::{Dataset, Observer};

#[doc(inline)]
pub use crate::params::{LocationSpec, SpeciesSpec, TimeSpec};

#[doc(inline)]
pub use crate::paths::{build_paths, RunSelector};
