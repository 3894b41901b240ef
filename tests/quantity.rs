use eprem_plots::quantity::{conversion_factor, measure, Unit};
use rstest::rstest;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * b.abs().max(1.0)
}

#[rstest]
#[case("hour", "s", 3600.0)]
#[case("day", "hour", 24.0)]
#[case("min", "s", 60.0)]
#[case("au", "cm", 1.495978707e13)]
#[case("km", "m", 1000.0)]
#[case("GeV", "MeV", 1000.0)]
#[case("keV", "eV", 1000.0)]
#[case("MeV/nuc", "MeV", 1.0)]
#[case("1 / (cm^2 s sr MeV)", "1 / (cm^2 s sr keV)", 1.0e-3)]
#[case("1 / (m^2 s sr MeV)", "1 / (cm^2 s sr MeV)", 1.0e-4)]
#[case("cm^-2 s^-1", "1 / (cm^2 s)", 1.0)]
#[case("m * s", "cm * s", 100.0)]
fn conversions(#[case] from: &str, #[case] to: &str, #[case] expected: f64) {
    let factor = conversion_factor(from, to).unwrap();
    assert!(close(factor, expected), "{from} -> {to} gave {factor}");
}

#[rstest]
#[case("au", "s")]
#[case("MeV", "1 / MeV")]
#[case("1 / (cm^2 s sr)", "1 / (cm^2 sr)")]
fn incompatible_units(#[case] from: &str, #[case] to: &str) {
    assert!(conversion_factor(from, to).is_err());
}

#[rstest]
#[case("parsec")]
#[case("cm^")]
#[case("(cm s")]
#[case("")]
fn unknown_or_malformed_units(#[case] expression: &str) {
    assert!(Unit::parse(expression).is_err());
}

#[test]
fn derived_units() {
    let flux = Unit::parse("1 / (cm^2 s sr MeV)").unwrap();
    let fluence = flux.times(&Unit::parse("s").unwrap());
    assert!(close(
        fluence.factor_to(&Unit::parse("1 / (cm^2 sr MeV)").unwrap()).unwrap(),
        1.0
    ));

    let area = Unit::parse("m").unwrap().powi(2);
    assert!(close(area.factor_to(&Unit::parse("cm^2").unwrap()).unwrap(), 1.0e4));

    let speed = Unit::parse("km").unwrap().per(&Unit::parse("s").unwrap());
    assert!(close(speed.factor_to(&Unit::parse("cm / s").unwrap()).unwrap(), 1.0e5));
}

#[test]
fn measurements() {
    let radii = measure([1.0, 2.0], "au").unwrap();
    assert_eq!(radii.len(), 2);
    assert_eq!(radii.to_string(), "[1.0, 2.0] au");

    let each = radii.iter().map(|r| r.to_string()).collect::<Vec<String>>();
    assert_eq!(each, vec!["1.0 au", "2.0 au"]);

    let empty = measure(Vec::new(), "au").unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.value(), None);

    assert!(radii.with_unit("hour").is_err());
}
