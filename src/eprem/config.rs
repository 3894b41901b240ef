//! Reader for EPREM simulation configuration files
//!
//! The configuration is a flat list of `key = value` lines. Comments start
//! with `#` and may follow a value on the same line. Arrays are written in
//! square brackets, e.g. `mass = [1.0, 4.0]`.
//!
//! Only the entries relevant to plotting are interpreted, the rest are kept as
//! raw strings.

// internal modules
use crate::utils::f;

// standard library
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, Context, Result};
use log::{debug, trace};

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0, space0};
use nom::combinator::{all_consuming, map, rest};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::{delimited, separated_pair, terminated};
use nom::IResult;

/// Default name of the configuration file within a run directory
pub const DEFAULT_CONFIG: &str = "eprem.cfg";

/// Parsed simulation configuration
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    /// Where the configuration was read from
    pub path: PathBuf,
    /// Raw values keyed by parameter name
    entries: HashMap<String, String>,
}

impl SimulationConfig {
    /// Read a configuration file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| f!("Could not open configuration {}", path.display()))?;
        let reader = BufReader::new(file);

        let mut entries = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let line = strip_comment(&line).trim();

            if line.is_empty() {
                continue;
            }

            match key_value(line) {
                Ok((_, (key, value))) => {
                    trace!("[ Entry ] {key} = {value}");
                    entries.insert(key.to_string(), value.trim().to_string());
                }
                Err(_) => trace!("Ignored \"{line}\""),
            }
        }

        debug!("Read {} entries from {}", entries.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Raw string value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Numeric array value of a parameter
    ///
    /// A scalar is accepted as a single element array.
    pub fn get_array(&self, key: &str) -> Result<Option<Vec<f64>>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => all_consuming(number_array)(value)
                .map(|(_, v)| Some(v))
                .map_err(|_| anyhow!("Unable to interpret {key} = {value} as numbers")),
        }
    }

    /// Symbols for every ion species in the simulation
    ///
    /// Derived from the `mass` and `charge` arrays, which default to a single
    /// proton species.
    pub fn species(&self) -> Result<Vec<String>> {
        let mass = self.get_array("mass")?.unwrap_or_else(|| vec![1.0]);
        let charge = self.get_array("charge")?.unwrap_or_else(|| vec![1.0]);

        if mass.len() != charge.len() {
            return Err(anyhow!(
                "Found {} masses but {} charges in {}",
                mass.len(),
                charge.len(),
                self.path.display()
            ));
        }

        Ok(mass
            .iter()
            .zip(charge.iter())
            .map(|(m, q)| species_symbol(*m, *q))
            .collect())
    }
}

/// Symbol for an ion from its mass (proton masses) and charge (elementary)
///
/// ```rust
/// # use eprem_plots::eprem::species_symbol;
/// assert_eq!(species_symbol(1.0, 1.0), "H+");
/// assert_eq!(species_symbol(4.0, 2.0), "He++");
/// assert_eq!(species_symbol(3.0, 1.0), "m3+");
/// ```
pub fn species_symbol(mass: f64, charge: f64) -> String {
    let element = match mass.round() as i64 {
        1 => "H".to_string(),
        4 => "He".to_string(),
        12 => "C".to_string(),
        14 => "N".to_string(),
        16 => "O".to_string(),
        20 => "Ne".to_string(),
        24 => "Mg".to_string(),
        28 => "Si".to_string(),
        32 => "S".to_string(),
        56 => "Fe".to_string(),
        m => f!("m{m}"),
    };
    let charge = charge.round().max(0.0) as usize;
    f!("{}{}", element, "+".repeat(charge))
}

/// Everything before a `#`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

// ! Parser combinators

/// `key = value`, value taken verbatim
fn key_value(i: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.'),
        delimited(space0, char('='), space0),
        rest,
    )(i)
}

/// `[1.0, 2.0]` or a bare number
fn number_array(i: &str) -> IResult<&str, Vec<f64>> {
    let list = separated_list1(
        delimited(multispace0, char(','), multispace0),
        double,
    );
    alt((
        delimited(
            terminated(char('['), multispace0),
            list,
            delimited(multispace0, char(']'), multispace0),
        ),
        map(terminated(double, multispace0), |v| vec![v]),
    ))(i)
}
