//! Small simulation runs written to temporary directories
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::json;

pub const CONFIG: &str = "# test run
mass = [1.0, 4.0]   # protons and alphas
charge = [1.0, 2.0]
numObservers = 2
";

/// Flux values are `100 * (t+1) * (s+1) * (sp+1) / 10^e` so every selection is
/// easy to check by hand
pub fn flux_value(t: usize, s: usize, sp: usize, e: usize) -> f64 {
    100.0 * ((t + 1) * (s + 1) * (sp + 1)) as f64 / 10f64.powi(e as i32)
}

/// Observer with 3 times (0, 1, 2 hours), 3 shells (0.5, 1.0, 1.5 au), 2
/// species, and 3 energies (1, 10, 100 MeV)
pub fn observer_json() -> serde_json::Value {
    let flux = (0..3)
        .map(|t| {
            (0..3)
                .map(|s| {
                    (0..2)
                        .map(|sp| (0..3).map(|e| flux_value(t, s, sp, e)).collect::<Vec<f64>>())
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    json!({
        "time": { "unit": "s", "values": [0.0, 3600.0, 7200.0] },
        "energy": { "unit": "MeV", "values": [1.0, 10.0, 100.0] },
        "radius": {
            "unit": "au",
            "values": [[0.5, 1.0, 1.5], [0.5, 1.0, 1.5], [0.5, 1.0, 1.5]]
        },
        "flux": { "unit": "1 / (cm^2 s sr MeV)", "values": flux },
    })
}

/// Write a run with the given stream numbers into `dir`
pub fn write_run(dir: &Path, streams: &[usize]) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("eprem.cfg"), CONFIG).unwrap();
    for num in streams {
        let path = dir.join(format!("obs{num:06}.json"));
        fs::write(path, observer_json().to_string()).unwrap();
    }
}

/// Relative comparison for computed floats
pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a - e).abs() <= 1e-9 * e.abs().max(1.0),
            "{actual:?} != {expected:?}"
        );
    }
}
