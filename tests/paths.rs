use eprem_plots::paths::{build_paths, fullpath, RunSelector};
use eprem_plots::pattern::{glob, Pattern};

use std::fs;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Base directory holding only run directories
#[fixture]
fn runs() -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in ["run_02", "run_01", "other"] {
        fs::create_dir(dir.path().join(name)).unwrap();
    }
    dir
}

fn base(dir: &TempDir) -> PathBuf {
    fullpath(dir.path()).unwrap()
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

#[test]
fn defaults_to_current_directory() {
    let paths = build_paths(None, None).unwrap();
    assert_eq!(paths, vec![std::env::current_dir().unwrap()]);
}

#[rstest]
fn directory_of_runs(runs: TempDir) {
    let paths = build_paths(Some(runs.path()), None).unwrap();
    assert_eq!(names(&paths), vec!["other", "run_01", "run_02"]);
    assert!(paths.iter().all(|p| p.parent() == Some(base(&runs).as_path())));
}

#[rstest]
fn directory_with_a_file_is_a_single_run(runs: TempDir) {
    fs::write(runs.path().join("eprem.cfg"), "").unwrap();
    let paths = build_paths(Some(runs.path()), None).unwrap();
    assert_eq!(paths, vec![base(&runs)]);
}

#[test]
fn empty_or_missing_directory_is_a_single_run() {
    let dir = TempDir::new().unwrap();
    assert_eq!(build_paths(Some(dir.path()), None).unwrap(), vec![base(&dir)]);

    let missing = dir.path().join("missing");
    assert_eq!(
        build_paths(Some(missing.as_path()), None).unwrap(),
        vec![fullpath(&missing).unwrap()]
    );
}

#[rstest]
fn explicit_names_keep_order(runs: TempDir) {
    let selector = RunSelector::from(vec![
        "run_02".to_string(),
        "missing".to_string(),
        "run_01".to_string(),
    ]);
    let paths = build_paths(Some(runs.path()), Some(&selector)).unwrap();
    assert_eq!(names(&paths), vec!["run_02", "missing", "run_01"]);
}

#[test]
fn explicit_names_without_base() {
    let selector = RunSelector::from(vec!["b".to_string(), "/data/a".to_string()]);
    let paths = build_paths(None, Some(&selector)).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0], std::env::current_dir().unwrap().join("b"));
    assert_eq!(paths[1], PathBuf::from("/data/a"));
}

#[rstest]
#[case(RunSelector::from("run_*"))]
#[case(RunSelector::from(vec!["run_*".to_string()]))]
#[case(RunSelector::from("run_0[0-9]"))]
fn single_pattern_relative_to_base(runs: TempDir, #[case] selector: RunSelector) {
    let paths = build_paths(Some(runs.path()), Some(&selector)).unwrap();
    assert_eq!(names(&paths), vec!["run_01", "run_02"]);
}

#[rstest]
#[case("run_[0-9")]
#[case("run_]")]
fn malformed_pattern_matches_nothing(runs: TempDir, #[case] pattern: &str) {
    assert!(Pattern::new(pattern).is_err());
    let selector = RunSelector::from(pattern);
    assert!(build_paths(Some(runs.path()), Some(&selector))
        .unwrap()
        .is_empty());
}

#[rstest]
#[case("*", "anything", true)]
#[case("*", "", true)]
#[case("run_?", "run_1", true)]
#[case("run_?", "run_12", false)]
#[case("[!a-c]*", "delta", true)]
#[case("[!a-c]*", "bravo", false)]
#[case("[^a-c]*", "bravo", false)]
#[case("obs[0-9][0-9].json", "obs12.json", true)]
#[case("obs[0-9][0-9].json", "obs1a.json", false)]
#[case("*.json", "obs.json.bak", false)]
fn pattern_matching(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
    assert_eq!(Pattern::new(pattern).unwrap().matches(name), expected);
}

#[test]
fn glob_nested_components() {
    let dir = TempDir::new().unwrap();
    for run in ["sweep/a", "sweep/b", "other/c"] {
        fs::create_dir_all(dir.path().join(run)).unwrap();
        fs::write(dir.path().join(run).join("eprem.cfg"), "").unwrap();
    }

    let found = glob(dir.path(), "*/*/eprem.cfg");
    assert_eq!(found.len(), 3);

    let found = glob(dir.path(), "sweep/*");
    let expected: Vec<PathBuf> = ["a", "b"]
        .iter()
        .map(|n| dir.path().join("sweep").join(n))
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn fullpath_normalises() {
    assert_eq!(
        fullpath("/data/./runs/../runs/a").unwrap(),
        Path::new("/data/runs/a")
    );
    assert!(fullpath("relative").unwrap().is_absolute());
}
