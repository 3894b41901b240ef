//! Common small functions used throughout the crate
//!
//! These are left public for the convenience of the user. For example
//! prettier formatting for scientific numbers on plot labels.

use std::fmt::LowerExp;

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends primitives with more specific formatting options
pub trait NumberFmt {
    /// Scientific notation for tick and legend labels
    ///
    /// The exponent is always signed and zero padded to `exp_pad` digits, so
    /// log axis ticks read `1e+2` and energy labels `1.00e+1 MeV`.
    ///
    /// ```rust
    /// # use eprem_plots::utils::NumberFmt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((12.5).sci(2, 1), "1.25e+1".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumberFmt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        let exp = match num.find('e') {
            Some(idx) => num.split_off(idx),
            None => return num,
        };
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Shortest round-trip representation of a float, always with a decimal point
///
/// Labels such as `r = 1.0 au` are expected to show whole numbers as floats.
///
/// ```rust
/// # use eprem_plots::utils::float_label;
/// assert_eq!(float_label(1.0), "1.0");
/// assert_eq!(float_label(2.5), "2.5");
/// ```
pub fn float_label(value: f64) -> String {
    f!("{value:?}")
}

/// Find the range of values that can be shown on an axis
///
/// Non-finite values are always ignored, and non-positive values are ignored
/// for logarithmic axes. Returns `None` if nothing is left.
///
/// ```rust
/// # use eprem_plots::utils::data_range;
/// let values = [0.0, 1.0, f64::NAN, 100.0];
/// assert_eq!(data_range(values.iter().copied(), true), Some((1.0, 100.0)));
/// assert_eq!(data_range(values.iter().copied(), false), Some((0.0, 100.0)));
/// ```
pub fn data_range<I: IntoIterator<Item = f64>>(values: I, positive: bool) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite() && (!positive || *v > 0.0))
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((v.min(lo), v.max(hi))),
        })
}
