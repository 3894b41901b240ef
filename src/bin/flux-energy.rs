//! Command line tool to plot flux spectra against energy
//!
//! Plots the flux of a single stream observer against energy at any number of
//! shells and radii, with the seed spectrum shown for reference. Several runs
//! may be compared side by side.
//!
//! # Usage
//!
//! ```text
//! Usage: flux-energy [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! ### > How to choose the runs
//!
//! By default the current directory is the run. If the input directory holds
//! nothing but other directories, each of these is treated as a run and gets a
//! panel of its own.
//!
//! ```bash
//! # Every run under ./scan
//! flux-energy -i ./scan
//!
//! # Only some of them, by name or by pattern
//! flux-energy -i ./scan -r low mid high
//! flux-energy -i ./scan -r "run_0*"
//! ```
//!
//! ### > How to choose where to plot
//!
//! Shells are drawn as markers and radii as solid lines. A unit may follow the
//! radii, otherwise they are in au.
//!
//! ```bash
//! flux-energy --shell 0 10 20 --radius 0.5 1.0 au --time 2.5 day
//! ```
//!

// crate modules
use eprem_plots::params::SpectrumOptions;
use eprem_plots::paths::{build_paths, fullpath, RunSelector};
use eprem_plots::plot::{self, spectrum};
use eprem_plots::utils::f;

// standard library
use std::path::PathBuf;

// external crates
use anyhow::Result;
use clap::Parser;
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+1 to make 'Warn' the default)
    let verbosity = cli.verbose as usize + 1;
    logging_init(verbosity, cli.quiet);

    // work out which runs to compare
    let runs = run_selector(&cli.runs);
    let paths = build_paths(cli.input.as_deref(), runs.as_ref())?;

    // everything needed for the plot
    let options = spectrum_options(&cli);
    debug!("{options:?}");
    let figure = spectrum::build_figure(cli.stream, cli.config.as_deref(), &paths, &options)?;

    // write to the output directory, creating it if needed
    let output = fullpath(cli.output.unwrap_or_else(|| PathBuf::from(".")))?;
    plot::ensure_directory(&output)?;

    let path = output.join(spectrum::output_name(cli.stream, &options.time()?));
    plot::render(&figure, &path)?;
    info!("Saved {}", path.display());

    Ok(())
}

/// Plot flux against energy for a stream observer
///
/// The flux is plotted at every requested shell (markers) and
/// radius (solid lines) on log-log axes. The seed spectrum of the
/// inner shell at the first time step is always included.
///
/// Several runs are plotted side by side on shared axes, one
/// panel per run.
///
/// Examples
/// --------
///
///  Typical use
///     $ flux-energy -n 0 --shell 0 10 20
///
///  Radii in au, or with an explicit unit
///     $ flux-energy --radius 0.5 1.0
///     $ flux-energy --radius 100 200 Rsun
///
///  At a time index, or at a physical time
///     $ flux-energy --shell 0 --time 12
///     $ flux-energy --shell 0 --time 2.5 day
///
///  Compare every run in a directory
///     $ flux-energy -i ./scan --radius 1.0
///
///  Compare specific runs
///     $ flux-energy -i ./scan -r low high --radius 1.0
///
/// Notes
/// -----
///
/// The output file is named 'stream<n>_flux-t<time>h.png' after
/// the first value given to --time, whether that is an index or
/// a magnitude.
///
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    before_help(banner()),
    after_help("Typical use: flux-energy -n 0 --shell 0 10 --radius 1.0 au\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("flux-energy [options]")
)]
struct Cli {
    // * Input options
    /// Stream observer number
    #[arg(help_heading("Input options"))]
    #[arg(short = 'n', long)]
    #[arg(value_name = "num")]
    #[arg(default_value = "0")]
    stream: usize,

    /// Simulation configuration file ('eprem.cfg' default)
    ///
    /// Relative to each run directory.
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    config: Option<String>,

    /// Directory of a run, or of several runs
    ///
    /// Defaults to the current directory. If every entry of the
    /// directory is itself a directory, each one is taken as a run.
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(value_name = "dir")]
    input: Option<PathBuf>,

    /// Run names, or a single glob pattern
    ///
    /// Names are relative to the input directory. A single value
    /// is matched as a glob pattern, e.g. "run_0*".
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(num_args = 0..)]
    #[arg(value_name = "run")]
    runs: Option<Vec<String>>,

    // * Plot options
    /// Time index, or a value and unit
    ///
    /// e.g. '--time 12' for the 13th time step, or '--time 2.5 day'
    /// to interpolate to a physical time. Defaults to index 0.
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 0..)]
    #[arg(value_name = "time")]
    time: Option<Vec<String>>,

    /// Shell indices, plotted as markers
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 0..)]
    #[arg(value_name = "shell")]
    shell: Option<Vec<usize>>,

    /// Radii and an optional unit, plotted as lines
    ///
    /// Values are in au unless the last value is a unit, e.g.
    /// '--radius 100 200 Rsun'.
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 0..)]
    #[arg(value_name = "radius")]
    radius: Option<Vec<String>>,

    /// Energy axis limits
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 2, allow_negative_numbers = true)]
    #[arg(value_names = ["lo", "hi"])]
    xlim: Option<Vec<f64>>,

    /// Flux axis limits
    #[arg(help_heading("Plot options"))]
    #[arg(long)]
    #[arg(num_args = 2, allow_negative_numbers = true)]
    #[arg(value_names = ["lo", "hi"])]
    ylim: Option<Vec<f64>>,

    /// Directory for the output image (current directory default)
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "dir")]
    output: Option<PathBuf>,

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
fn spectrum_options(cli: &Cli) -> SpectrumOptions {
    SpectrumOptions {
        time: cli.time.clone(),
        shell: cli.shell.clone(),
        radius: cli.radius.clone(),
        xlim: limits(&cli.xlim),
        ylim: limits(&cli.ylim),
    }
}

/// A lone value with wildcards is a pattern, anything else is a list of names
#[doc(hidden)]
fn run_selector(runs: &Option<Vec<String>>) -> Option<RunSelector> {
    match runs.as_deref() {
        None | Some([]) => None,
        Some([run]) if run.contains(&['*', '?', '['][..]) => Some(RunSelector::Pattern(run.clone())),
        Some(names) => Some(RunSelector::Names(names.to_vec())),
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
    s += &f!("{:^70}\n", "EPREM :: FluxEnergy");
    s += &f!("{:-<1$}", "", 70);
    s
}
