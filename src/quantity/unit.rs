// external crates
use anyhow::{anyhow, bail, Result};

// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{alpha1, char, i32 as integer, space0, space1};
use nom::combinator::{all_consuming, map, map_res, opt, value};
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

/// Exponents of the base dimensions: length, time, energy, solid angle
type Dimensions = [i32; 4];

const NONE: Dimensions = [0, 0, 0, 0];
const LENGTH: Dimensions = [1, 0, 0, 0];
const TIME: Dimensions = [0, 1, 0, 0];
const ENERGY: Dimensions = [0, 0, 1, 0];
const ANGLE: Dimensions = [0, 0, 0, 1];

/// A physical unit reduced to a scale factor and dimension exponents
///
/// Scale factors are relative to the base units `cm`, `s`, `MeV`, and `sr`.
/// Parsing accepts compound expressions with products (whitespace or `*`),
/// quotients (`/`), integer powers (`^`), and parentheses.
///
/// ```rust
/// # use eprem_plots::quantity::Unit;
/// let per_mev = Unit::parse("1 / (cm^2 s sr MeV)").unwrap();
/// let per_kev = Unit::parse("1 / (cm^2 s sr keV)").unwrap();
/// assert!((per_mev.factor_to(&per_kev).unwrap() - 1e-3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    scale: f64,
    dimensions: Dimensions,
}

impl Unit {
    /// Parse a unit expression such as `au`, `hour`, or `1 / (cm^2 s sr MeV/nuc)`
    pub fn parse(expression: &str) -> Result<Self> {
        let text = expression.trim();
        if text.is_empty() {
            bail!("Empty unit expression");
        }
        all_consuming(product)(text)
            .map(|(_, unit)| unit)
            .map_err(|_| anyhow!("Unable to interpret \"{expression}\" as a unit"))
    }

    /// Factor that converts a value in `self` to a value in `other`
    pub fn factor_to(&self, other: &Unit) -> Result<f64> {
        if self.dimensions != other.dimensions {
            bail!(
                "Incompatible dimensions {:?} and {:?}",
                self.dimensions,
                other.dimensions
            );
        }
        Ok(self.scale / other.scale)
    }

    /// Product of two units
    pub fn times(&self, other: &Unit) -> Unit {
        let mut dimensions = self.dimensions;
        for (d, o) in dimensions.iter_mut().zip(other.dimensions) {
            *d += o;
        }
        Unit {
            scale: self.scale * other.scale,
            dimensions,
        }
    }

    /// Quotient of two units
    pub fn per(&self, other: &Unit) -> Unit {
        self.times(&other.powi(-1))
    }

    /// Raise the unit to an integer power
    pub fn powi(&self, n: i32) -> Unit {
        Unit {
            scale: self.scale.powi(n),
            dimensions: self.dimensions.map(|d| d * n),
        }
    }
}

/// Conversion factor between two unit expressions
///
/// ```rust
/// # use eprem_plots::quantity::conversion_factor;
/// assert_eq!(conversion_factor("day", "hour").unwrap(), 24.0);
/// assert!(conversion_factor("au", "hour").is_err());
/// ```
pub fn conversion_factor(from: &str, to: &str) -> Result<f64> {
    Unit::parse(from)?.factor_to(&Unit::parse(to)?)
}

/// Known unit symbols and their definition in base units
fn symbol(name: &str) -> Result<Unit> {
    let (scale, dimensions) = match name {
        // lengths
        "cm" => (1.0, LENGTH),
        "m" => (1.0e2, LENGTH),
        "km" => (1.0e5, LENGTH),
        "au" => (1.495978707e13, LENGTH),
        "Rsun" | "Rs" => (6.957e10, LENGTH),
        // times
        "s" => (1.0, TIME),
        "min" | "minute" => (60.0, TIME),
        "h" | "hour" => (3600.0, TIME),
        "d" | "day" => (86400.0, TIME),
        // energies
        "eV" => (1.0e-6, ENERGY),
        "keV" => (1.0e-3, ENERGY),
        "MeV" => (1.0, ENERGY),
        "GeV" => (1.0e3, ENERGY),
        // solid angle
        "sr" => (1.0, ANGLE),
        // per-nucleon quantities are treated as dimensionless counts
        "nuc" => (1.0, NONE),
        _ => bail!("Unknown unit symbol \"{name}\""),
    };
    Ok(Unit { scale, dimensions })
}

// ! Parser combinators

/// Factors joined by `*`, `/`, or whitespace, evaluated left to right
fn product(i: &str) -> IResult<&str, Unit> {
    let (i, first) = factor(i)?;
    let (i, rest) = many0(pair(operator, factor))(i)?;
    let unit = rest.into_iter().fold(first, |acc, (divide, u)| match divide {
        true => acc.per(&u),
        false => acc.times(&u),
    });
    Ok((i, unit))
}

/// `true` for division, `false` for multiplication
fn operator(i: &str) -> IResult<&str, bool> {
    alt((
        value(true, delimited(space0, char('/'), space0)),
        value(false, delimited(space0, char('*'), space0)),
        value(false, space1),
    ))(i)
}

/// Atom with an optional integer power
fn factor(i: &str) -> IResult<&str, Unit> {
    let (i, base) = atom(i)?;
    let (i, power) = opt(preceded(char('^'), integer))(i)?;
    Ok((i, base.powi(power.unwrap_or(1))))
}

/// Parenthesised group, named symbol, or bare number
fn atom(i: &str) -> IResult<&str, Unit> {
    alt((
        delimited(pair(char('('), space0), product, pair(space0, char(')'))),
        map_res(alpha1, symbol),
        map(double, |scale| Unit {
            scale,
            dimensions: NONE,
        }),
    ))(i)
}
