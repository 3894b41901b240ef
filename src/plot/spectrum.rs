//! Flux against energy at fixed shells and radii
//!
//! Every panel shows the seed spectrum for reference, a solid line for each
//! requested radius, and markers for each requested shell. One panel is drawn
//! per simulation run.

// internal modules
use crate::eprem::{self, Observer};
use crate::params::{LocationSpec, SpeciesSpec, SpectrumOptions, TimeSpec};
use crate::plot::{Colour, Figure, Panel, Scale, Series, Style};
use crate::quantity::Measurement;
use crate::utils::{f, float_label};

// standard library
use std::path::PathBuf;

// external crates
use anyhow::{bail, Result};
use log::{debug, trace};

/// Energy unit for the x axis
pub const ENERGY_UNIT: &str = "MeV";

/// Flux unit for the y axis
pub const FLUX_UNIT: &str = "1 / (cm^2 s sr MeV)";

/// Species shown on every spectrum
pub const SPECIES: &str = "H+";

/// Label of the reference curve
pub const SEED_LABEL: &str = "Seed spectrum";

/// Read stream `num` from every run and lay out one panel per run
///
/// - `config` - Simulation configuration file name within each run
/// - `paths` - Run directories, one panel each in the order given
pub fn build_figure(
    num: usize,
    config: Option<&str>,
    paths: &[PathBuf],
    options: &SpectrumOptions,
) -> Result<Figure> {
    let observers = paths
        .iter()
        .map(|path| eprem::stream(num, config, path))
        .collect::<Result<Vec<Observer>>>()?;
    spectrum_figure(num, &observers, options)
}

/// Lay out a spectrum panel for each observer
///
/// A single observer gets a titled panel with its own legend. Several
/// observers share axes, are titled by run name, and only the first panel
/// carries axis labels and the legend.
pub fn spectrum_figure(num: usize, observers: &[Observer], options: &SpectrumOptions) -> Result<Figure> {
    if observers.is_empty() {
        bail!("No runs to plot for stream {num}");
    }

    let time = options.time()?;
    let shells = options.shells();
    let radii = options.radii()?;
    let title = f!("Stream {num} ({})", time.label());

    let n = observers.len() as u32;
    let mut figure = Figure::new((200 + 400 * n, 400));

    if let [observer] = observers {
        let mut panel = add_panel(observer, &time, &shells, &radii, options)?;
        panel.title = Some(title);
        panel.legend = true;
        figure.panels.push(panel);
        return Ok(figure);
    }

    figure.suptitle = Some(title);
    figure.share_axes = true;
    for (i, observer) in observers.iter().enumerate() {
        let mut panel = add_panel(observer, &time, &shells, &radii, options)?;
        panel.title = Some(run_name(observer));
        panel.legend = i == 0;
        panel.label_outer = true;
        figure.panels.push(panel);
    }

    Ok(figure)
}

/// Build the spectrum panel for a single observer
pub fn add_panel(
    observer: &Observer,
    time: &TimeSpec,
    shells: &[usize],
    radii: &Measurement,
    options: &SpectrumOptions,
) -> Result<Panel> {
    let species = SpeciesSpec::Symbol(SPECIES.to_string());
    let energy = observer.energy(ENERGY_UNIT)?;

    let mut panel = Panel {
        xlabel: f!("Energy [{ENERGY_UNIT}]"),
        ylabel: f!("Flux [{FLUX_UNIT}]"),
        xscale: Scale::Log,
        yscale: Scale::Log,
        xlim: options.xlim,
        ylim: options.ylim,
        ..Default::default()
    };

    let seed = observer.flux(&TimeSpec::Index(0), &LocationSpec::Shell(0), &species, FLUX_UNIT)?;
    panel
        .series
        .push(Series::new(SEED_LABEL, &energy, &seed, Style::Dotted, Colour::Black));

    for (i, radius) in radii.iter().enumerate() {
        let label = f!("r = {} {}", float_label(radius.value().unwrap_or_default()), radius.unit());
        trace!("Adding {label}");
        let flux = observer.flux(time, &LocationSpec::Radius(radius), &species, FLUX_UNIT)?;
        panel
            .series
            .push(Series::new(&label, &energy, &flux, Style::Solid, Colour::Cycle(i)));
    }

    // colour cycle starts over for the shell markers
    for (i, shell) in shells.iter().enumerate() {
        let label = f!("shell = {shell}");
        trace!("Adding {label}");
        let flux = observer.flux(time, &LocationSpec::Shell(*shell), &species, FLUX_UNIT)?;
        panel
            .series
            .push(Series::new(&label, &energy, &flux, Style::Markers, Colour::Cycle(i)));
    }

    debug!(
        "Spectrum panel for {} with {} series",
        observer.source().display(),
        panel.series.len()
    );
    Ok(panel)
}

/// Output file name for stream `num`
///
/// The leading element of the time selection is used as given, so a physical
/// time is written as its magnitude.
///
/// ```rust
/// # use eprem_plots::params::TimeSpec;
/// # use eprem_plots::plot::spectrum::output_name;
/// assert_eq!(output_name(3, &TimeSpec::Index(10)), "stream3_flux-t10h.png");
/// assert_eq!(output_name(0, &TimeSpec::Value(2.5, "day".into())), "stream0_flux-t2.5h.png");
/// ```
pub fn output_name(num: usize, time: &TimeSpec) -> String {
    f!("stream{num}_flux-t{}h.png", time.leading())
}

/// Name of the run directory an observer was read from
fn run_name(observer: &Observer) -> String {
    observer
        .source()
        .parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| observer.source().display().to_string())
}
