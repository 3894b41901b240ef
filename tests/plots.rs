mod common;

use common::{assert_close, write_run};

use eprem_plots::eprem::{self, Dataset};
use eprem_plots::params::{LocationSpec, SpeciesSpec, SpectrumOptions, SurveyOptions, TimeSpec};
use eprem_plots::paths::build_paths;
use eprem_plots::plot::{self, ensure_directory, spectrum, survey, Colour, Scale, Style};

use std::fs;
use std::path::Path;

use rstest::{fixture, rstest};
use tempfile::TempDir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[fixture]
fn run() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), &[0, 1]);
    dir
}

/// Three runs side by side
#[fixture]
fn scan() -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in ["fast", "medium", "slow"] {
        write_run(&dir.path().join(name), &[0]);
    }
    dir
}

#[rstest]
fn spectrum_single_run(run: TempDir) {
    let options = SpectrumOptions {
        shell: Some(vec![0, 2]),
        radius: Some(strings(&["1.0", "au"])),
        ..Default::default()
    };

    let paths = build_paths(Some(run.path()), None).unwrap();
    assert_eq!(paths.len(), 1);

    let figure = spectrum::build_figure(0, None, &paths, &options).unwrap();
    assert_eq!(figure.panels.len(), 1);
    assert_eq!(figure.suptitle, None);

    let panel = &figure.panels[0];
    assert_eq!(panel.title.as_deref(), Some("Stream 0 (time index = 0)"));
    assert!(panel.legend);
    assert_eq!((panel.xscale, panel.yscale), (Scale::Log, Scale::Log));
    assert_eq!(panel.count_style(Style::Dotted), 1);
    assert_eq!(panel.count_style(Style::Markers), 2);
    assert_eq!(panel.count_style(Style::Solid), 1);

    let labels = panel
        .series
        .iter()
        .map(|s| s.label.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(
        labels,
        vec![spectrum::SEED_LABEL, "r = 1.0 au", "shell = 0", "shell = 2"]
    );

    // colours start over for the shell markers
    let colours = panel.series.iter().map(|s| s.colour).collect::<Vec<Colour>>();
    assert_eq!(
        colours,
        vec![Colour::Black, Colour::Cycle(0), Colour::Cycle(0), Colour::Cycle(1)]
    );

    // seed spectrum is shell 0 at the first time step
    assert_eq!(
        panel.series[0].points,
        vec![(1.0, 100.0), (10.0, 10.0), (100.0, 1.0)]
    );
}

#[rstest]
fn spectrum_limits_only_when_given(run: TempDir) {
    let paths = vec![run.path().to_path_buf()];

    let figure = spectrum::build_figure(0, None, &paths, &SpectrumOptions::default()).unwrap();
    assert_eq!(figure.panels[0].xlim, None);
    assert_eq!(figure.panels[0].ylim, None);
    assert_eq!(figure.panels[0].series.len(), 1);

    let options = SpectrumOptions {
        xlim: Some((1.0, 100.0)),
        ylim: Some((1e-2, 1e3)),
        ..Default::default()
    };
    let figure = spectrum::build_figure(0, None, &paths, &options).unwrap();
    assert_eq!(figure.panels[0].xlim, Some((1.0, 100.0)));
    assert_eq!(figure.panels[0].ylim, Some((1e-2, 1e3)));
}

#[rstest]
fn spectrum_several_runs(scan: TempDir) {
    let options = SpectrumOptions {
        time: Some(strings(&["1.5", "hour"])),
        radius: Some(strings(&["0.5", "1.5"])),
        ..Default::default()
    };

    let paths = build_paths(Some(scan.path()), None).unwrap();
    let figure = spectrum::build_figure(0, None, &paths, &options).unwrap();

    assert_eq!(figure.panels.len(), 3);
    assert!(figure.share_axes);
    assert_eq!(
        figure.suptitle.as_deref(),
        Some("Stream 0 (time = 1.5 hour)")
    );

    let titles = figure
        .panels
        .iter()
        .map(|p| p.title.clone().unwrap_or_default())
        .collect::<Vec<String>>();
    assert_eq!(titles, vec!["fast", "medium", "slow"]);

    let legends = figure.panels.iter().map(|p| p.legend).collect::<Vec<bool>>();
    assert_eq!(legends, vec![true, false, false]);
    assert!(figure.panels.iter().all(|p| p.label_outer));
    assert!(figure.panels.iter().all(|p| p.count_style(Style::Solid) == 2));

    // only the leftmost panel keeps y axis labels
    let labelled = figure
        .panels
        .iter()
        .enumerate()
        .map(|(i, p)| p.labels_y_axis(i))
        .collect::<Vec<bool>>();
    assert_eq!(labelled, vec![true, false, false]);
}

/// Names of every entry in a directory
fn entries(dir: &Path) -> Vec<String> {
    let mut names = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect::<Vec<String>>();
    names.sort();
    names
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']), "{} is not a png", path.display());
}

#[rstest]
fn spectrum_rendered_to_file(run: TempDir) {
    let options = SpectrumOptions {
        shell: Some(vec![0, 2]),
        radius: Some(strings(&["1.0", "au"])),
        ..Default::default()
    };
    let paths = build_paths(Some(run.path()), None).unwrap();
    let figure = spectrum::build_figure(0, None, &paths, &options).unwrap();

    let output = run.path().join("plots").join("spectra");
    ensure_directory(&output).unwrap();

    let name = spectrum::output_name(0, &options.time().unwrap());
    plot::render(&figure, &output.join(&name)).unwrap();

    assert_eq!(entries(&output), vec![name.clone()]);
    assert_png(&output.join(&name));
}

#[rstest]
fn several_runs_rendered_to_file(scan: TempDir) {
    let options = SpectrumOptions {
        radius: Some(strings(&["1.0"])),
        ylim: Some((1e-1, 1e4)),
        ..Default::default()
    };
    let paths = build_paths(Some(scan.path()), None).unwrap();
    let figure = spectrum::build_figure(0, None, &paths, &options).unwrap();

    let output = TempDir::new().unwrap();
    let name = spectrum::output_name(0, &options.time().unwrap());
    plot::render(&figure, &output.path().join(&name)).unwrap();

    assert_eq!(entries(output.path()), vec![name.clone()]);
    assert_png(&output.path().join(&name));
}

#[rstest]
fn survey_rendered_per_stream(run: TempDir) {
    let dataset = Dataset::open(run.path(), None).unwrap();
    let output = run.path().join("survey");
    ensure_directory(&output).unwrap();

    for num in survey::get_streams(&dataset, None).unwrap() {
        let observer = dataset.stream(num).unwrap();
        let figure = survey::survey_figure(&observer, &SurveyOptions::default()).unwrap();
        plot::render(&figure, &output.join(survey::output_name(&observer))).unwrap();
    }

    assert_eq!(entries(&output), vec!["obs000000.png", "obs000001.png"]);
    assert_png(&output.join("obs000000.png"));
    assert_png(&output.join("obs000001.png"));
}

#[rstest]
fn spectrum_missing_stream(run: TempDir) {
    let paths = vec![run.path().to_path_buf()];
    assert!(spectrum::build_figure(7, None, &paths, &SpectrumOptions::default()).is_err());
    assert!(spectrum::build_figure(0, None, &[], &SpectrumOptions::default()).is_err());
}

#[rstest]
#[case(0, TimeSpec::Index(0), "stream0_flux-t0h.png")]
#[case(2, TimeSpec::Index(15), "stream2_flux-t15h.png")]
#[case(1, TimeSpec::Value(3.0, "day".into()), "stream1_flux-t3.0h.png")]
fn spectrum_file_names(#[case] num: usize, #[case] time: TimeSpec, #[case] expected: &str) {
    assert_eq!(spectrum::output_name(num, &time), expected);
}

#[rstest]
fn survey_defaults(run: TempDir) {
    let observer = eprem::stream(0, None, run.path()).unwrap();
    let figure = survey::survey_figure(&observer, &SurveyOptions::default()).unwrap();

    let suptitle = figure.suptitle.clone().unwrap();
    assert!(suptitle.contains("shell = 0"));
    assert_eq!(suptitle, "shell = 0 | species = H+");

    assert_eq!(figure.panels.len(), 3);
    let [flux, fluence, intflux] = [&figure.panels[0], &figure.panels[1], &figure.panels[2]];

    // one line per energy bin, times in hours
    assert_eq!(flux.series.len(), 3);
    assert_eq!(flux.xlabel, "Time [hour]");
    assert_eq!(flux.yscale, Scale::Log);
    let times = flux.series[0].points.iter().map(|p| p.0).collect::<Vec<f64>>();
    assert_close(&times, &[0.0, 1.0, 2.0]);

    assert_eq!((fluence.xscale, fluence.yscale), (Scale::Log, Scale::Log));
    assert_eq!(fluence.series.len(), 1);

    let labels = intflux
        .series
        .iter()
        .map(|s| s.label.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(labels, vec!["E > 10.0 MeV", "E > 50.0 MeV", "E > 100.0 MeV"]);

    assert!(figure.panels.iter().all(|p| p.ylim.is_none()));
}

#[rstest]
fn survey_options_applied(run: TempDir) {
    let observer = eprem::stream(1, None, run.path()).unwrap();
    let options = SurveyOptions {
        radius: Some(strings(&["1.0", "au"])),
        species: Some("1".into()),
        time_unit: Some("minute".into()),
        energy_unit: Some("keV".into()),
        flux_ylim: Some((1.0, 1e4)),
        intflux_ylim: Some((10.0, 1e5)),
        ..Default::default()
    };
    let figure = survey::survey_figure(&observer, &options).unwrap();

    assert_eq!(
        figure.suptitle.as_deref(),
        Some("radius = 1.0 au | species = He++")
    );
    assert_eq!(figure.panels[0].xlabel, "Time [minute]");
    assert_eq!(figure.panels[1].xlabel, "Energy [keV]");
    assert_eq!(figure.panels[0].ylim, Some((1.0, 1e4)));
    assert_eq!(figure.panels[1].ylim, None);
    assert_eq!(figure.panels[2].ylim, Some((10.0, 1e5)));
    assert_eq!(figure.panels[2].series.len(), 3);
    assert!(figure.panels[2].series[0].label.ends_with(" keV"));
}

#[rstest]
fn survey_suptitle_by_symbol(run: TempDir) {
    let observer = eprem::stream(0, None, run.path()).unwrap();
    let title = survey::make_suptitle(
        &observer,
        &LocationSpec::Shell(2),
        &SpeciesSpec::Symbol("He++".into()),
    )
    .unwrap();
    assert_eq!(title, "shell = 2 | species = He++");

    assert!(survey::make_suptitle(&observer, &LocationSpec::Shell(0), &SpeciesSpec::Index(5)).is_err());
}

#[rstest]
fn survey_streams(run: TempDir) {
    let dataset = Dataset::open(run.path(), None).unwrap();
    assert_eq!(survey::get_streams(&dataset, None).unwrap(), vec![0, 1]);
    assert_eq!(survey::get_streams(&dataset, Some(1)).unwrap(), vec![1]);
    assert!(survey::get_streams(&dataset, Some(4)).is_err());

    let observer = dataset.stream(1).unwrap();
    assert_eq!(survey::output_name(&observer), "obs000001.png");
}

#[test]
fn output_directory_created() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("plots").join("spectra");
    ensure_directory(&output).unwrap();
    assert!(output.is_dir());

    // already existing is fine
    ensure_directory(&output).unwrap();
}
