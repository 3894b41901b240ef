// internal modules
use crate::quantity::Unit;
use crate::utils::{f, float_label};

// external crates
use anyhow::{Context, Result};

/// One or more magnitudes sharing a single unit
///
/// The unit is validated on construction so that later conversions only fail
/// for incompatible dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    values: Vec<f64>,
    unit: String,
}

/// Construct a [Measurement] from magnitudes and a unit expression
///
/// ```rust
/// # use eprem_plots::quantity::measure;
/// let radii = measure([1.0, 2.0], "au").unwrap();
/// assert_eq!(radii.values(), &[1.0, 2.0]);
/// assert_eq!(radii.unit(), "au");
/// assert!(measure([1.0], "parsec").is_err());
/// ```
pub fn measure<I: IntoIterator<Item = f64>>(values: I, unit: &str) -> Result<Measurement> {
    Unit::parse(unit).context("Invalid unit for measurement")?;
    Ok(Measurement {
        values: values.into_iter().collect(),
        unit: unit.trim().to_string(),
    })
}

impl Measurement {
    /// Magnitudes in the current unit
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The unit expression
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The first magnitude, if there is one
    pub fn value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert every magnitude to another unit
    ///
    /// ```rust
    /// # use eprem_plots::quantity::measure;
    /// let time = measure([2.0], "day").unwrap().with_unit("hour").unwrap();
    /// assert_eq!(time.value(), Some(48.0));
    /// ```
    pub fn with_unit(&self, unit: &str) -> Result<Measurement> {
        let target = Unit::parse(unit)?;
        let factor = Unit::parse(&self.unit)?
            .factor_to(&target)
            .with_context(|| f!("Cannot convert {} to {}", self.unit, unit))?;
        Ok(Measurement {
            values: self.values.iter().map(|v| v * factor).collect(),
            unit: unit.trim().to_string(),
        })
    }

    /// Iterate over each magnitude as its own single-valued measurement
    pub fn iter(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.values.iter().map(|v| Measurement {
            values: vec![*v],
            unit: self.unit.clone(),
        })
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.values.as_slice() {
            [value] => write!(f, "{} {}", float_label(*value), self.unit),
            values => {
                let s = values
                    .iter()
                    .map(|v| float_label(*v))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{}] {}", s, self.unit)
            }
        }
    }
}
