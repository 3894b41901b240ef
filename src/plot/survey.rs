//! Flux, fluence, and integral flux of a single stream observer
//!
//! The survey is a row of three panels at one location for one species:
//!
//! | Panel         | x axis         | y axis (log)                        |
//! | ------------- | -------------- | ----------------------------------- |
//! | Flux          | time           | flux, one line per energy bin       |
//! | Fluence       | energy (log)   | time-integrated flux                |
//! | Integral flux | time           | flux above 10, 50, and 100 MeV      |

// internal modules
use crate::eprem::{Dataset, Observer};
use crate::params::{DisplayUnits, LocationSpec, SpeciesSpec, SurveyOptions};
use crate::plot::{Colour, Figure, Panel, Scale, Series, Style};
use crate::quantity::measure;
use crate::utils::{f, float_label, NumberFmt};

// external crates
use anyhow::{anyhow, bail, Result};
use log::debug;

/// Energy thresholds for the integral flux, in MeV
pub const THRESHOLDS: [f64; 3] = [10.0, 50.0, 100.0];

/// Build the three survey panels for one observer
pub fn survey_figure(observer: &Observer, options: &SurveyOptions) -> Result<Figure> {
    let location = options.location()?;
    let species = options.species();
    let units = options.units();

    let mut figure = Figure::new((2000, 600));
    figure.suptitle = Some(make_suptitle(observer, &location, &species)?);
    figure.panels = vec![
        flux_panel(observer, &location, &species, &units, options.flux_ylim)?,
        fluence_panel(observer, &location, &species, &units, options.fluence_ylim)?,
        intflux_panel(observer, &location, &species, &units, options.intflux_ylim)?,
    ];

    debug!("Survey of {} at {location}", observer.source().display());
    Ok(figure)
}

/// Overall title naming the location and species
///
/// Species given by index are shown by their symbol.
pub fn make_suptitle(
    observer: &Observer,
    location: &LocationSpec,
    species: &SpeciesSpec,
) -> Result<String> {
    let symbol = match species {
        SpeciesSpec::Symbol(symbol) => symbol.clone(),
        SpeciesSpec::Index(i) => observer
            .species()
            .get(*i)
            .cloned()
            .ok_or_else(|| anyhow!("Species index {i} out of range for {:?}", observer.species()))?,
    };
    Ok(f!("{location} | species = {symbol}"))
}

/// Stream numbers to plot, either the one requested or every stream in the run
pub fn get_streams(dataset: &Dataset, num: Option<usize>) -> Result<Vec<usize>> {
    let available = dataset.stream_numbers();
    match num {
        None => Ok(available),
        Some(n) if available.contains(&n) => Ok(vec![n]),
        Some(n) => bail!(
            "Stream {n} not found in {}, available streams are {:?}",
            dataset.source().display(),
            available
        ),
    }
}

/// Output file name, the observer file name with a png extension
///
/// e.g. `obs000003.json` is saved as `obs000003.png`
pub fn output_name(observer: &Observer) -> String {
    let stem = observer
        .source()
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "stream".to_string());
    f!("{stem}.png")
}

/// Flux against time for every energy bin
fn flux_panel(
    observer: &Observer,
    location: &LocationSpec,
    species: &SpeciesSpec,
    units: &DisplayUnits,
    ylim: Option<(f64, f64)>,
) -> Result<Panel> {
    let times = observer.times(&units.time)?;
    let energies = observer.energy(&units.energy)?;
    let history = observer.flux_history(location, species, &units.flux)?;

    let last = energies.len().saturating_sub(1).max(1) as f64;
    let series = energies
        .iter()
        .enumerate()
        .map(|(e, energy)| {
            let flux = history.iter().map(|spectrum| spectrum[e]).collect::<Vec<f64>>();
            Series::new(
                &f!("{} {}", energy.sci(2, 1), units.energy),
                &times,
                &flux,
                Style::Solid,
                Colour::Gradient(e as f64 / last),
            )
        })
        .collect();

    Ok(Panel {
        title: Some("Flux".to_string()),
        xlabel: f!("Time [{}]", units.time),
        ylabel: f!("Flux [{}]", units.flux),
        xscale: Scale::Linear,
        yscale: Scale::Log,
        ylim,
        series,
        legend: true,
        ..Default::default()
    })
}

/// Fluence against energy
fn fluence_panel(
    observer: &Observer,
    location: &LocationSpec,
    species: &SpeciesSpec,
    units: &DisplayUnits,
    ylim: Option<(f64, f64)>,
) -> Result<Panel> {
    let energies = observer.energy(&units.energy)?;
    let fluence = observer.fluence(location, species, &units.fluence)?;

    Ok(Panel {
        title: Some("Fluence".to_string()),
        xlabel: f!("Energy [{}]", units.energy),
        ylabel: f!("Fluence [{}]", units.fluence),
        xscale: Scale::Log,
        yscale: Scale::Log,
        ylim,
        series: vec![Series::new(
            "Fluence",
            &energies,
            &fluence,
            Style::Solid,
            Colour::Black,
        )],
        ..Default::default()
    })
}

/// Integral flux against time above each threshold
fn intflux_panel(
    observer: &Observer,
    location: &LocationSpec,
    species: &SpeciesSpec,
    units: &DisplayUnits,
    ylim: Option<(f64, f64)>,
) -> Result<Panel> {
    let times = observer.times(&units.time)?;

    let mut series = Vec::with_capacity(THRESHOLDS.len());
    for (i, threshold) in THRESHOLDS.iter().enumerate() {
        let threshold = measure([*threshold], "MeV")?.with_unit(&units.energy)?;
        let label = f!(
            "E > {} {}",
            float_label(threshold.value().unwrap_or_default()),
            units.energy
        );
        let intflux = observer.integral_flux(location, species, &threshold, &units.integral_flux)?;
        series.push(Series::new(&label, &times, &intflux, Style::Solid, Colour::Cycle(i)));
    }

    Ok(Panel {
        title: Some("Integral flux".to_string()),
        xlabel: f!("Time [{}]", units.time),
        ylabel: f!("Integral flux [{}]", units.integral_flux),
        xscale: Scale::Linear,
        yscale: Scale::Log,
        ylim,
        series,
        legend: true,
        ..Default::default()
    })
}
