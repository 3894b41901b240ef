//! Access to EPREM simulation output
//!
//! # Overview
//!
//! A simulation run is a directory containing the simulation configuration
//! (`eprem.cfg` by default) and one data file per stream observer, named by
//! stream number:
//!
//! ```text
//! run/
//!  ├── eprem.cfg
//!  ├── obs000000.json
//!  ├── obs000001.json
//!  └── ...
//! ```
//!
//! Observer files hold the time steps, energy bins, shell radii, and
//! differential flux of every species, each tagged with the unit it is stored
//! in. Species symbols come from the `mass` and `charge` arrays of the
//! configuration.
//!
//! # Quickstart
//!
//! ```ignore
//! use eprem_plots::eprem;
//! use eprem_plots::params::{LocationSpec, SpeciesSpec, TimeSpec};
//!
//! // Open stream 0 of the run in the current directory
//! let stream = eprem::stream(0, None, ".")?;
//!
//! // Proton spectrum at the inner shell for the first time step
//! let flux = stream.flux(
//!     &TimeSpec::Index(0),
//!     &LocationSpec::Shell(0),
//!     &SpeciesSpec::Symbol("H+".into()),
//!     "1 / (cm^2 s sr MeV)",
//! )?;
//! ```

// Split into subfiles for development, but anything important is re-exported
mod config;
mod observer;

#[doc(inline)]
pub use crate::eprem::config::{species_symbol, SimulationConfig, DEFAULT_CONFIG};

#[doc(inline)]
pub use crate::eprem::observer::{Observer, ObserverReader};

// internal modules
use crate::pattern::Pattern;
use crate::utils::f;

// standard library
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, Result};
use log::{debug, warn};

/// File name pattern for stream observer data
pub const OBSERVER_PATTERN: &str = "obs[0-9][0-9][0-9][0-9][0-9][0-9].json";

/// All stream observers of a single simulation run
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    config: SimulationConfig,
    species: Vec<String>,
    streams: BTreeMap<usize, PathBuf>,
}

impl Dataset {
    /// Open the run in `source`
    ///
    /// - `source` - Run directory
    /// - `config` - Configuration file name relative to `source`, defaults to
    /// [DEFAULT_CONFIG]
    pub fn open<P: AsRef<Path>>(source: P, config: Option<&str>) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        if !source.is_dir() {
            return Err(anyhow!("{} is not a directory", source.display()));
        }

        let config = SimulationConfig::read(source.join(config.unwrap_or(DEFAULT_CONFIG)))?;
        let species = config.species()?;

        let pattern = Pattern::new(OBSERVER_PATTERN)?;
        let streams = pattern
            .glob(&source)
            .into_iter()
            .filter_map(|path| stream_number(&path).map(|n| (n, path)))
            .collect::<BTreeMap<usize, PathBuf>>();

        if streams.is_empty() {
            warn!("No stream observers found in {}", source.display());
        }

        debug!(
            "Opened {} with {} stream(s) and species {:?}",
            source.display(),
            streams.len(),
            species
        );

        Ok(Self {
            source,
            config,
            species,
            streams,
        })
    }

    /// Run directory
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The simulation configuration of this run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Species symbols for this run
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Stream numbers available, in ascending order
    pub fn stream_numbers(&self) -> Vec<usize> {
        self.streams.keys().copied().collect()
    }

    /// Read a single stream observer
    pub fn stream(&self, num: usize) -> Result<Observer> {
        let path = self.streams.get(&num).ok_or_else(|| {
            anyhow!(
                "No stream {num} in {}, found {:?}",
                self.source.display(),
                self.stream_numbers()
            )
        })?;
        ObserverReader::new(self.species.clone()).parse(path)
    }

    /// Read every stream observer, in stream order
    pub fn streams(&self) -> Result<Vec<Observer>> {
        self.stream_numbers()
            .into_iter()
            .map(|num| self.stream(num))
            .collect()
    }
}

/// Open a single stream observer from the run in `source`
///
/// Convenience wrapper around [Dataset::open] and [Dataset::stream].
pub fn stream<P: AsRef<Path>>(num: usize, config: Option<&str>, source: P) -> Result<Observer> {
    Dataset::open(source, config)?.stream(num)
}

/// File name of the observer for stream `num`
///
/// ```rust
/// # use eprem_plots::eprem::observer_filename;
/// assert_eq!(observer_filename(3), "obs000003.json");
/// ```
pub fn observer_filename(num: usize) -> String {
    f!("obs{num:06}.json")
}

/// Stream number from an observer file name, e.g. `obs000003.json` is 3
fn stream_number(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .strip_prefix("obs")?
        .parse::<usize>()
        .ok()
}
