//! Command line tool to survey stream observers
//!
//! Plots the flux, fluence, and integral flux of stream observers in a single
//! row of panels, at one shell or radius for one species.
//!
//! # Usage
//!
//! ```text
//! Usage: stream-survey [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default every stream observer in the run is plotted at the inner shell
//! for the first species, one image per stream.
//!
//! ### > How to choose the location
//!
//! Either a shell index or a radius with a unit, but not both.
//!
//! ```bash
//! stream-survey -n 0 --shell 10
//! stream-survey -n 0 --radius 1.0 au
//! ```
//!
//! ### > How to choose the species
//!
//! Species are chosen by index or by symbol.
//!
//! ```bash
//! stream-survey --species He++
//! ```
//!

// crate modules
use eprem_plots::eprem::Dataset;
use eprem_plots::params::SurveyOptions;
use eprem_plots::paths::fullpath;
use eprem_plots::plot::{self, survey};
use eprem_plots::utils::f;

// standard library
use std::path::PathBuf;

// external crates
use anyhow::{anyhow, Result};
use clap::Parser;
use kdam::{BarBuilder, BarExt};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+1 to make 'Warn' the default)
    let verbosity = cli.verbose as usize + 1;
    logging_init(verbosity, cli.quiet);

    // open the run and work out which streams are wanted
    let source = fullpath(cli.input.clone().unwrap_or_else(|| PathBuf::from(".")))?;
    let dataset = Dataset::open(&source, cli.config.as_deref())?;
    let streams = survey::get_streams(&dataset, cli.stream)?;
    debug!("Streams to plot: {streams:?}");

    // images go next to the data unless told otherwise
    let output = match &cli.output {
        Some(path) => fullpath(path)?,
        None => source.clone(),
    };
    plot::ensure_directory(&output)?;

    let options = survey_options(&cli);
    debug!("{options:?}");

    // progress only makes sense without the log messages
    let disable_progress = cli.quiet || cli.verbose > 0;
    let mut progress_bar = BarBuilder::default()
        .total(streams.len())
        .delay(0.0)
        .unit(" streams")
        .disable(disable_progress)
        .build()
        .map_err(|e| anyhow!(e))?;

    for num in streams {
        let observer = dataset.stream(num)?;
        let figure = survey::survey_figure(&observer, &options)?;

        let path = output.join(survey::output_name(&observer));
        plot::render(&figure, &path)?;
        info!("Saved {}", path.display());

        if cli.show {
            plot::show(&path);
        }
        progress_bar.update(1)?;
    }

    // need an extra line for clean spacing if the progress bar is printed
    if !disable_progress {
        eprintln!()
    };

    Ok(())
}

/// Plot flux, fluence, and integral flux of stream observers
///
/// Each stream gets one image with three panels:
///   - flux against time, one line per energy bin
///   - fluence against energy
///   - integral flux against time above 10, 50, and 100 MeV
///
/// Every stream in the run is plotted unless one is chosen with
/// --stream. Images are named after the observer file, e.g.
/// 'obs000000.png'.
///
/// Examples
/// --------
///
///  Typical use
///     $ stream-survey -i ./run
///
///  A single stream at a given shell
///     $ stream-survey -n 3 --shell 10
///
///  At a radius, for helium
///     $ stream-survey -n 3 --radius 1.0 au --species He++
///
///  Change the display units
///     $ stream-survey --time-unit day --energy-unit keV
///
///  Fix the flux axis
///     $ stream-survey --flux-ylim 1e-3 1e5
///
/// Notes
/// -----
///
/// --shell and --radius are mutually exclusive. Without either,
/// the inner shell (0) is used. Radii are shown in au.
///
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    before_help(banner()),
    after_help("Typical use: stream-survey -i ./run -n 0 --shell 10\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("stream-survey [options]")
)]
struct Cli {
    // * Input options
    /// Stream observer number (all streams default)
    #[arg(help_heading("Input options"))]
    #[arg(short = 'n', long)]
    #[arg(value_name = "num")]
    stream: Option<usize>,

    /// Simulation configuration file ('eprem.cfg' default)
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    config: Option<String>,

    /// Run directory (current directory default)
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(value_name = "dir")]
    input: Option<PathBuf>,

    // * Plot options
    /// Shell index to plot at
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(conflicts_with = "radius")]
    #[arg(value_name = "shell")]
    shell: Option<usize>,

    /// Radius to plot at, as a value and unit
    ///
    /// e.g. '--radius 1.0 au' or '--radius 215 Rsun'
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 0..)]
    #[arg(value_name = "radius")]
    radius: Option<Vec<String>>,

    /// Species index or symbol (first species default)
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(value_name = "species")]
    species: Option<String>,

    /// Unit for time axes ('hour' default)
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(value_name = "unit")]
    time_unit: Option<String>,

    /// Unit for energy ('MeV' default)
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(value_name = "unit")]
    energy_unit: Option<String>,

    /// Flux axis limits
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 2, allow_negative_numbers = true)]
    #[arg(value_names = ["lo", "hi"])]
    flux_ylim: Option<Vec<f64>>,

    /// Fluence axis limits
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 2, allow_negative_numbers = true)]
    #[arg(value_names = ["lo", "hi"])]
    fluence_ylim: Option<Vec<f64>>,

    /// Integral flux axis limits
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 2, allow_negative_numbers = true)]
    #[arg(value_names = ["lo", "hi"])]
    intflux_ylim: Option<Vec<f64>>,

    /// Directory for output images (input directory default)
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "dir")]
    output: Option<PathBuf>,

    /// Open each image once saved
    #[arg(help_heading("Output options"))]
    #[arg(long)]
    show: bool,

    // * Flags
    /// Verbose logging (-v, -vv, -vvv)
    ///
    /// If specified, the default log level of WARN is increased to
    /// INFO (-v), DEBUG (-vv), or TRACE (-vvv). Errors and Warnings
    /// are always logged unless in quiet (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

/// Collect the plot options from the command line
#[doc(hidden)]
fn survey_options(cli: &Cli) -> SurveyOptions {
    SurveyOptions {
        shell: cli.shell,
        radius: cli.radius.clone(),
        species: cli.species.clone(),
        time_unit: cli.time_unit.clone(),
        energy_unit: cli.energy_unit.clone(),
        flux_ylim: limits(&cli.flux_ylim),
        fluence_ylim: limits(&cli.fluence_ylim),
        intflux_ylim: limits(&cli.intflux_ylim),
    }
}

#[doc(hidden)]
fn limits(values: &Option<Vec<f64>>) -> Option<(f64, f64)> {
    match values.as_deref() {
        Some([lo, hi]) => Some((*lo, *hi)),
        _ => None,
    }
}

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    let result = stderrlog::new()
        .modules(vec![
            module_path!(),
            "eprem_plots::eprem",
            "eprem_plots::params",
            "eprem_plots::pattern",
            "eprem_plots::paths",
            "eprem_plots::plot",
        ])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init();

    if let Err(e) = result {
        eprintln!("Unable to initialise logging: {e}");
    }
}

/// Creates a banner for the command line
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "EPREM :: StreamSurvey");
    s += &f!("{:-<1$}", "", 70);
    s
}
