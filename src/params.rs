//! Normalisation of user input into canonical selections
//!
//! Command line values for time, shell, radius, and species may be missing,
//! a single value, or several values with an optional trailing unit. The
//! functions here turn those raw strings into the typed selections used to
//! index observer data.
//!
//! An option that was given without any values is treated exactly like an
//! option that was never given at all.
//!
//! | Input            | Missing        | Given                                  |
//! | ---------------- | -------------- | -------------------------------------- |
//! | time             | index `0`      | `N` index, or `VALUE UNIT` pair         |
//! | shell (spectrum) | none           | list of shell indices                  |
//! | radius (spectrum)| none           | `R0 [R1 ...] [UNIT]`, default unit `au` |
//! | location (survey)| shell `0`      | one shell, or `VALUE UNIT` in `au`     |
//! | species          | index `0`      | index or symbol, e.g. `H+`             |

// internal modules
use crate::quantity::{measure, Measurement};
use crate::utils::{f, float_label};

// external crates
use anyhow::{anyhow, bail, Context, Result};
use log::debug;

/// Unit assumed for radii given without one, and used to display locations
pub const DEFAULT_RADIUS_UNIT: &str = "au";

/// A time step index or a physical time
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpec {
    /// Index into the observer time steps
    Index(usize),
    /// Magnitude and unit, interpolated between time steps
    Value(f64, String),
}

impl TimeSpec {
    /// Human readable description used in plot titles
    ///
    /// ```rust
    /// # use eprem_plots::params::TimeSpec;
    /// assert_eq!(TimeSpec::Index(3).label(), "time index = 3");
    /// assert_eq!(TimeSpec::Value(2.5, "hour".into()).label(), "time = 2.5 hour");
    /// ```
    pub fn label(&self) -> String {
        match self {
            TimeSpec::Index(i) => f!("time index = {i}"),
            TimeSpec::Value(v, unit) => f!("time = {} {}", float_label(*v), unit),
        }
    }

    /// The leading element of the selection, as used in output file names
    ///
    /// This is the index for an index, or the magnitude for a physical time.
    pub fn leading(&self) -> String {
        match self {
            TimeSpec::Index(i) => f!("{i}"),
            TimeSpec::Value(v, _) => float_label(*v),
        }
    }
}

/// A shell index or a radial distance
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// Index into the shells of the stream
    Shell(usize),
    /// Single-valued radius, interpolated between shells
    Radius(Measurement),
}

impl std::fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LocationSpec::Shell(s) => write!(f, "shell = {s}"),
            LocationSpec::Radius(r) => write!(f, "radius = {r}"),
        }
    }
}

/// A species index or symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SpeciesSpec {
    Index(usize),
    Symbol(String),
}

/// Get an appropriate time selection from user input
///
/// A single value must be an integer index, a pair is a magnitude and unit.
/// Anything longer is rejected.
pub fn normalize_time(time: Option<&[String]>) -> Result<TimeSpec> {
    let spec = match time.unwrap_or_default() {
        [] => TimeSpec::Index(0),
        [index] => TimeSpec::Index(
            index
                .trim()
                .parse::<usize>()
                .with_context(|| f!("Time index \"{index}\" is not a non-negative integer"))?,
        ),
        [value, unit] => TimeSpec::Value(parse_float(value)?, unit.to_string()),
        other => bail!(
            "Expected a time index or a value-unit pair, found {:?}",
            other
        ),
    };
    debug!("Time selection: {spec:?}");
    Ok(spec)
}

/// Get appropriate shell indices from user input, order preserved
pub fn normalize_shell(shell: Option<&[usize]>) -> Vec<usize> {
    shell.unwrap_or_default().to_vec()
}

/// Get appropriate radii from user input
///
/// All values share one unit. If the last value is not a number it is taken
/// as the unit for all preceding values, otherwise the default unit applies.
/// Missing input gives an empty measurement.
pub fn normalize_radius(radius: Option<&[String]>) -> Result<Measurement> {
    let radius = radius.unwrap_or_default();

    let (values, unit) = match radius.split_last() {
        None => (&radius[..0], DEFAULT_RADIUS_UNIT),
        Some((last, rest)) if !rest.is_empty() && last.trim().parse::<f64>().is_err() => {
            (rest, last.as_str())
        }
        Some(_) => (radius, DEFAULT_RADIUS_UNIT),
    };

    let magnitudes = values
        .iter()
        .map(|v| parse_float(v))
        .collect::<Result<Vec<f64>>>()?;

    let radii = measure(magnitudes, unit)?;
    debug!("Radius selection: {radii}");
    Ok(radii)
}

/// Get the shell or radius at which to plot
///
/// A shell index takes precedence over a radius. A radius must be a single
/// value-unit pair and is converted to `au` for display. Defaults to shell 0.
pub fn normalize_location(shell: Option<usize>, radius: Option<&[String]>) -> Result<LocationSpec> {
    if let Some(shell) = shell {
        return Ok(LocationSpec::Shell(shell));
    }

    match radius.unwrap_or_default() {
        [] => Ok(LocationSpec::Shell(0)),
        [value, unit] => {
            let r = measure([parse_float(value)?], unit)?.with_unit(DEFAULT_RADIUS_UNIT)?;
            Ok(LocationSpec::Radius(r))
        }
        other => Err(anyhow!(
            "Expected a radius as a value-unit pair, found {:?}",
            other
        )),
    }
}

/// Get the ion species to plot
///
/// Anything that reads as a non-negative integer is an index, everything else
/// is a species symbol. Defaults to index 0.
pub fn normalize_species(species: Option<&str>) -> SpeciesSpec {
    match species.map(str::trim) {
        None | Some("") => SpeciesSpec::Index(0),
        Some(s) => match s.parse::<usize>() {
            Ok(i) => SpeciesSpec::Index(i),
            Err(_) => SpeciesSpec::Symbol(s.to_string()),
        },
    }
}

/// Parse a finite number, with the offending text in the error
fn parse_float(value: &str) -> Result<f64> {
    let number = value
        .trim()
        .parse::<f64>()
        .with_context(|| f!("Unable to interpret \"{value}\" as a number"))?;
    if !number.is_finite() {
        bail!("Expected a finite number, found \"{value}\"");
    }
    Ok(number)
}

/// User options for the energy spectrum plot
///
/// Every field is optional. See the module documentation for defaults.
#[derive(Debug, Clone, Default)]
pub struct SpectrumOptions {
    /// `N` or `VALUE UNIT`
    pub time: Option<Vec<String>>,
    /// Shell indices for marker series
    pub shell: Option<Vec<usize>>,
    /// `R0 [R1 ...] [UNIT]` for line series
    pub radius: Option<Vec<String>>,
    /// Explicit x-axis limits
    pub xlim: Option<(f64, f64)>,
    /// Explicit y-axis limits
    pub ylim: Option<(f64, f64)>,
}

impl SpectrumOptions {
    pub fn time(&self) -> Result<TimeSpec> {
        normalize_time(self.time.as_deref())
    }

    pub fn shells(&self) -> Vec<usize> {
        normalize_shell(self.shell.as_deref())
    }

    pub fn radii(&self) -> Result<Measurement> {
        normalize_radius(self.radius.as_deref())
    }
}

/// User options for the stream survey plot
#[derive(Debug, Clone, Default)]
pub struct SurveyOptions {
    /// Shell index, takes precedence over `radius`
    pub shell: Option<usize>,
    /// `VALUE UNIT` pair
    pub radius: Option<Vec<String>>,
    /// Species index or symbol
    pub species: Option<String>,
    /// Overrides the default time display unit
    pub time_unit: Option<String>,
    /// Overrides the default energy display unit
    pub energy_unit: Option<String>,
    pub flux_ylim: Option<(f64, f64)>,
    pub fluence_ylim: Option<(f64, f64)>,
    pub intflux_ylim: Option<(f64, f64)>,
}

impl SurveyOptions {
    pub fn location(&self) -> Result<LocationSpec> {
        normalize_location(self.shell, self.radius.as_deref())
    }

    pub fn species(&self) -> SpeciesSpec {
        normalize_species(self.species.as_deref())
    }

    /// Display units with any user overrides applied
    pub fn units(&self) -> DisplayUnits {
        let mut units = DisplayUnits::default();
        if let Some(unit) = &self.time_unit {
            units.time = unit.clone();
        }
        if let Some(unit) = &self.energy_unit {
            units.energy = unit.clone();
        }
        units
    }
}

/// Units in which each plotted quantity is displayed
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUnits {
    pub time: String,
    pub energy: String,
    pub flux: String,
    pub fluence: String,
    pub integral_flux: String,
}

impl Default for DisplayUnits {
    fn default() -> Self {
        Self {
            time: "hour".to_string(),
            energy: "MeV".to_string(),
            flux: "1 / (cm^2 s sr MeV/nuc)".to_string(),
            fluence: "1 / (cm^2 sr MeV/nuc)".to_string(),
            integral_flux: "1 / (cm^2 s sr)".to_string(),
        }
    }
}
