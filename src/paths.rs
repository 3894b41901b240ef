//! Resolution of simulation run directories from user input
//!
//! A run is a directory holding the simulation configuration and stream
//! observer files. Users may point at a single run, a parent directory of
//! several runs, or name runs explicitly or by glob pattern.
//!
//! | Input directory | Runs given                 | Result                                        |
//! | --------------- | -------------------------- | --------------------------------------------- |
//! | no              | no                         | the current directory                         |
//! | no              | pattern                    | matches in the current directory              |
//! | no              | names                      | each name as a full path                      |
//! | yes             | no                         | all children if they are all directories, otherwise the input directory |
//! | yes             | single pattern or name     | matches relative to the input directory       |
//! | yes             | several names              | each name joined to the input directory       |
//!
//! Explicit names are never checked for existence here.

// internal modules
use crate::pattern::glob;

// standard library
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

// external crates
use anyhow::{Context, Result};
use log::debug;

/// How the user selected simulation runs
#[derive(Debug, Clone, PartialEq)]
pub enum RunSelector {
    /// A single glob pattern
    Pattern(String),
    /// Explicit run names or path fragments
    Names(Vec<String>),
}

impl From<Vec<String>> for RunSelector {
    fn from(names: Vec<String>) -> Self {
        RunSelector::Names(names)
    }
}

impl From<&str> for RunSelector {
    fn from(pattern: &str) -> Self {
        RunSelector::Pattern(pattern.to_string())
    }
}

/// Expand a leading `~` and make the path absolute and lexically normalised
///
/// Unlike [std::fs::canonicalize] the path does not need to exist.
///
/// ```rust
/// # use eprem_plots::paths::fullpath;
/// # use std::path::PathBuf;
/// let path = fullpath("/data/runs/../runs/./a").unwrap();
/// assert_eq!(path, PathBuf::from("/data/runs/a"));
/// ```
pub fn fullpath<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();

    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    let absolute = match expanded.is_absolute() {
        true => expanded,
        false => current_dir()?.join(expanded),
    };

    let mut normalised = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalised.pop();
            }
            other => normalised.push(other.as_os_str()),
        }
    }
    Ok(normalised)
}

/// Convert user input into full paths to simulation runs
///
/// - `indir` - A single simulation directory or the parent of several
/// - `runs` - Run names, or a glob pattern for several runs
pub fn build_paths(indir: Option<&Path>, runs: Option<&RunSelector>) -> Result<Vec<PathBuf>> {
    let paths = match (indir, runs) {
        (None, None) => vec![current_dir()?],
        (None, Some(RunSelector::Pattern(pattern))) => glob(current_dir()?, pattern)
            .into_iter()
            .map(fullpath)
            .collect::<Result<Vec<PathBuf>>>()?,
        (None, Some(RunSelector::Names(names))) => names
            .iter()
            .map(fullpath)
            .collect::<Result<Vec<PathBuf>>>()?,
        (Some(indir), None) => {
            let path = fullpath(indir)?;
            match child_directories(&path) {
                Some(children) => children,
                None => vec![path],
            }
        }
        (Some(indir), Some(selector)) => {
            let path = fullpath(indir)?;
            match selector {
                RunSelector::Pattern(pattern) => glob(&path, pattern),
                RunSelector::Names(names) => match names.as_slice() {
                    [pattern] => glob(&path, pattern),
                    _ => names.iter().map(|name| path.join(name)).collect(),
                },
            }
        }
    };

    debug!("Resolved {} run path(s)", paths.len());
    for path in &paths {
        debug!("  {}", path.display());
    }
    Ok(paths)
}

/// Immediate children of `path`, but only if every one is a directory
///
/// Returns `None` for a missing directory, an empty directory, or one with
/// any non-directory entries.
fn child_directories(path: &Path) -> Option<Vec<PathBuf>> {
    if !path.is_dir() {
        return None;
    }

    let mut children = fs::read_dir(path)
        .ok()?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()
        .ok()?;

    if children.is_empty() || !children.iter().all(|p| p.is_dir()) {
        return None;
    }

    children.sort();
    Some(children)
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().context("Unable to determine the current directory")
}
