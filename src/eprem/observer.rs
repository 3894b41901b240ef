//! Stream observer data and selection by time, location, and species

// internal modules
use crate::params::{LocationSpec, SpeciesSpec, TimeSpec};
use crate::quantity::{Measurement, Unit};
use crate::utils::f;

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;
use log::{debug, trace};
use serde::Deserialize;

/// An array of values tagged with the unit they are stored in
#[derive(Debug, Clone, Deserialize)]
pub struct Array<T> {
    pub unit: String,
    pub values: T,
}

/// Layout of a stream observer file
///
/// | Field    | Shape                                    |
/// | -------- | ---------------------------------------- |
/// | `time`   | time                                     |
/// | `energy` | energy                                   |
/// | `radius` | time x shell                             |
/// | `flux`   | time x shell x species x energy          |
#[derive(Debug, Clone, Deserialize)]
struct ObserverFile {
    time: Array<Vec<f64>>,
    energy: Array<Vec<f64>>,
    radius: Array<Vec<Vec<f64>>>,
    flux: Array<Vec<Vec<Vec<Vec<f64>>>>>,
}

/// A single stream observer from an EPREM run
///
/// All accessors convert to the requested display unit. Flux selections are
/// made with the typed selections from [crate::params].
#[derive(Debug, Clone)]
pub struct Observer {
    source: PathBuf,
    species: Vec<String>,
    time: Array<Vec<f64>>,
    energy: Array<Vec<f64>>,
    radius: Array<Vec<Vec<f64>>>,
    flux: Array<Vec<Vec<Vec<Vec<f64>>>>>,
}

/// A simple reader for stream observer files
#[derive(Debug, Default)]
pub struct ObserverReader {
    species: Vec<String>,
}

impl ObserverReader {
    /// Reader for a run with the given species symbols
    pub fn new(species: Vec<String>) -> Self {
        Self { species }
    }

    /// Deserialise an observer file and check the array shapes are consistent
    pub fn parse(&self, path: &Path) -> Result<Observer> {
        let file = File::open(path).with_context(|| f!("Could not open {}", path.display()))?;
        let data: ObserverFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| f!("Could not read observer data from {}", path.display()))?;

        for unit in [
            &data.time.unit,
            &data.energy.unit,
            &data.radius.unit,
            &data.flux.unit,
        ] {
            Unit::parse(unit).with_context(|| f!("Bad unit in {}", path.display()))?;
        }

        let observer = Observer {
            source: path.to_path_buf(),
            species: self.species.clone(),
            time: data.time,
            energy: data.energy,
            radius: data.radius,
            flux: data.flux,
        };
        observer
            .check_shapes()
            .with_context(|| f!("Inconsistent observer data in {}", path.display()))?;

        debug!(
            "Read {}: {} times, {} shells, {} species, {} energies",
            path.display(),
            observer.n_times(),
            observer.n_shells(),
            observer.species.len(),
            observer.energy.values.len()
        );
        Ok(observer)
    }
}

/// Public accessors
impl Observer {
    /// Path to the file this observer was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Species symbols, e.g. `["H+", "He++"]`
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Energy bins in the requested unit
    pub fn energy(&self, unit: &str) -> Result<Vec<f64>> {
        let factor = factor(&self.energy.unit, unit)?;
        Ok(self.energy.values.iter().map(|e| e * factor).collect())
    }

    /// Time steps in the requested unit
    pub fn times(&self, unit: &str) -> Result<Vec<f64>> {
        let factor = factor(&self.time.unit, unit)?;
        Ok(self.time.values.iter().map(|t| t * factor).collect())
    }

    /// Flux spectrum against energy at a single time and location
    pub fn flux(
        &self,
        time: &TimeSpec,
        location: &LocationSpec,
        species: &SpeciesSpec,
        unit: &str,
    ) -> Result<Vec<f64>> {
        let factor = factor(&self.flux.unit, unit)?;
        let s = self.species_index(species)?;

        let mut spectrum = vec![0.0; self.energy.values.len()];
        for (t, wt) in self.time_weights(time)? {
            for (e, value) in self.spectrum_at(t, location, s)?.iter().enumerate() {
                spectrum[e] += wt * value;
            }
        }

        Ok(spectrum.iter().map(|v| v * factor).collect())
    }

    /// Flux spectrum for every time step, indexed as `[time][energy]`
    pub fn flux_history(
        &self,
        location: &LocationSpec,
        species: &SpeciesSpec,
        unit: &str,
    ) -> Result<Vec<Vec<f64>>> {
        let factor = factor(&self.flux.unit, unit)?;
        let s = self.species_index(species)?;

        (0..self.n_times())
            .map(|t| -> Result<Vec<f64>> {
                let spectrum = self.spectrum_at(t, location, s)?;
                Ok(spectrum.iter().map(|v| v * factor).collect())
            })
            .collect()
    }

    /// Time-integrated flux against energy
    pub fn fluence(
        &self,
        location: &LocationSpec,
        species: &SpeciesSpec,
        unit: &str,
    ) -> Result<Vec<f64>> {
        let seconds = Unit::parse("s")?;
        let stored = Unit::parse(&self.flux.unit)?.times(&seconds);
        let factor = stored
            .factor_to(&Unit::parse(unit)?)
            .with_context(|| f!("Cannot express fluence in {unit}"))?;

        let history = self.flux_history(location, species, &self.flux.unit)?;
        let times = self.times("s")?;

        Ok((0..self.energy.values.len())
            .map(|e| {
                let series = history.iter().map(|spectrum| spectrum[e]).collect_vec();
                trapezoid(&times, &series) * factor
            })
            .collect())
    }

    /// Energy-integrated flux above a threshold, against time
    pub fn integral_flux(
        &self,
        location: &LocationSpec,
        species: &SpeciesSpec,
        threshold: &Measurement,
        unit: &str,
    ) -> Result<Vec<f64>> {
        let stored = Unit::parse(&self.flux.unit)?.times(&Unit::parse(&self.energy.unit)?);
        let factor = stored
            .factor_to(&Unit::parse(unit)?)
            .with_context(|| f!("Cannot express integral flux in {unit}"))?;

        let threshold = threshold
            .with_unit(&self.energy.unit)?
            .value()
            .ok_or_else(|| anyhow!("Missing energy threshold"))?;

        let history = self.flux_history(location, species, &self.flux.unit)?;
        Ok(history
            .iter()
            .map(|spectrum| integrate_above(&self.energy.values, spectrum, threshold) * factor)
            .collect())
    }
}

/// Selection helpers
impl Observer {
    fn n_times(&self) -> usize {
        self.time.values.len()
    }

    fn n_shells(&self) -> usize {
        self.radius.values.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Flux in stored units at time step `t` for species index `s`
    fn spectrum_at(&self, t: usize, location: &LocationSpec, s: usize) -> Result<Vec<f64>> {
        let mut spectrum = vec![0.0; self.energy.values.len()];
        for (shell, ws) in self.shell_weights(t, location)? {
            for (e, value) in self.flux.values[t][shell][s].iter().enumerate() {
                spectrum[e] += ws * value;
            }
        }
        Ok(spectrum)
    }

    /// Time steps and interpolation weights for a time selection
    fn time_weights(&self, time: &TimeSpec) -> Result<Vec<(usize, f64)>> {
        match time {
            TimeSpec::Index(i) if *i < self.n_times() => Ok(vec![(*i, 1.0)]),
            TimeSpec::Index(i) => bail!(
                "Time index {i} out of range for {} time steps",
                self.n_times()
            ),
            TimeSpec::Value(value, unit) => {
                let target = value * factor(unit, &self.time.unit)?;
                trace!("Interpolating to time {target} {}", self.time.unit);
                Ok(bracket(&self.time.values, target))
            }
        }
    }

    /// Shells and interpolation weights for a location at time step `t`
    fn shell_weights(&self, t: usize, location: &LocationSpec) -> Result<Vec<(usize, f64)>> {
        match location {
            LocationSpec::Shell(s) if *s < self.n_shells() => Ok(vec![(*s, 1.0)]),
            LocationSpec::Shell(s) => bail!(
                "Shell {s} out of range for {} shells",
                self.n_shells()
            ),
            LocationSpec::Radius(r) => {
                let target = r
                    .with_unit(&self.radius.unit)?
                    .value()
                    .ok_or_else(|| anyhow!("Missing radius value"))?;
                Ok(bracket(&self.radius.values[t], target))
            }
        }
    }

    /// Position of the species in the species list
    fn species_index(&self, species: &SpeciesSpec) -> Result<usize> {
        match species {
            SpeciesSpec::Index(i) if *i < self.species.len() => Ok(*i),
            SpeciesSpec::Index(i) => bail!(
                "Species index {i} out of range for {} species",
                self.species.len()
            ),
            SpeciesSpec::Symbol(symbol) => self
                .species
                .iter()
                .position(|s| s == symbol)
                .ok_or_else(|| anyhow!("Unknown species {symbol}, expected one of {:?}", self.species)),
        }
    }

    /// Make sure every array agrees on the number of times, shells, species, and energies
    fn check_shapes(&self) -> Result<()> {
        let (nt, ns, nsp, ne) = (
            self.n_times(),
            self.n_shells(),
            self.species.len(),
            self.energy.values.len(),
        );

        if nt == 0 || ns == 0 || ne == 0 {
            bail!("Expected at least one time, shell, and energy");
        }

        if self.radius.values.len() != nt || self.radius.values.iter().any(|r| r.len() != ns) {
            bail!("Radius array should be {nt} x {ns}");
        }

        let flux_ok = self.flux.values.len() == nt
            && self.flux.values.iter().all(|shells| {
                shells.len() == ns
                    && shells.iter().all(|species| {
                        species.len() == nsp && species.iter().all(|e| e.len() == ne)
                    })
            });

        if !flux_ok {
            bail!("Flux array should be {nt} x {ns} x {nsp} x {ne}");
        }

        Ok(())
    }
}

/// Conversion factor between unit expressions
fn factor(from: &str, to: &str) -> Result<f64> {
    Unit::parse(from)?
        .factor_to(&Unit::parse(to)?)
        .with_context(|| f!("Cannot convert {from} to {to}"))
}

/// Indices and linear interpolation weights bracketing `x` in ascending `xs`
///
/// Values outside of the range are clamped to the first or last element.
fn bracket(xs: &[f64], x: f64) -> Vec<(usize, f64)> {
    let last = xs.len().saturating_sub(1);
    if xs.len() < 2 || !x.is_finite() || x <= xs[0] {
        return vec![(0, 1.0)];
    }
    if x >= xs[last] {
        return vec![(last, 1.0)];
    }

    // at least two elements and x above the first
    let upper = xs.iter().position(|v| *v >= x).unwrap_or(last).max(1);
    let lower = upper - 1;
    let width = xs[upper] - xs[lower];
    if width <= 0.0 {
        return vec![(upper, 1.0)];
    }

    let w = (x - xs[lower]) / width;
    vec![(lower, 1.0 - w), (upper, w)]
}

/// Trapezoidal integral of `y` over `x`
fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .tuple_windows()
        .map(|((x0, y0), (x1, y1))| 0.5 * (x1 - x0) * (y0 + y1))
        .sum()
}

/// Trapezoidal integral of `y` over `x` from `threshold` to the end of `x`
///
/// The integrand is linearly interpolated at the threshold itself.
fn integrate_above(x: &[f64], y: &[f64], threshold: f64) -> f64 {
    let start = match x.iter().position(|v| *v >= threshold) {
        Some(i) => i,
        None => return 0.0,
    };

    let mut xs = Vec::with_capacity(x.len() - start + 1);
    let mut ys = Vec::with_capacity(x.len() - start + 1);

    if start > 0 && x[start] > threshold {
        let w = (threshold - x[start - 1]) / (x[start] - x[start - 1]);
        xs.push(threshold);
        ys.push(y[start - 1] + w * (y[start] - y[start - 1]));
    }

    xs.extend_from_slice(&x[start..]);
    ys.extend_from_slice(&y[start..]);
    trapezoid(&xs, &ys)
}
