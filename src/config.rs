//! Run configuration.
//!
//! A [`Config`] is built once at startup from the command line and never
//! changes afterwards. It carries exactly two things:
//!
//! - `root`: the canonical directory to walk. Must exist.
//! - `out_root`: an optional canonical directory that collects every PDF
//!   instead of writing each one next to its images. Created on resolution,
//!   before any directory is processed.
//!
//! There is no config file and no environment-driven behavior beyond `~`
//! expansion against the platform home directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal access problems. Any of these stops the run before traversal starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot access root directory {path}: {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("root is not a directory: {0}")]
    RootNotDirectory(PathBuf),
    #[error("cannot create output directory {path}: {source}")]
    OutRootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Process-wide, read-only run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
    pub out_root: Option<PathBuf>,
}

impl Config {
    /// Resolve user-supplied paths into a ready-to-use configuration.
    ///
    /// Expands `~`, canonicalizes `root`, and creates `out_root` (with any
    /// missing parents) when one is given.
    pub fn resolve(root: &Path, out_root: Option<&Path>) -> Result<Self, ConfigError> {
        let root = expand_home(root);
        let root = root
            .canonicalize()
            .map_err(|source| ConfigError::RootInaccessible {
                path: root.clone(),
                source,
            })?;
        if !root.is_dir() {
            return Err(ConfigError::RootNotDirectory(root));
        }

        let out_root = match out_root {
            Some(path) => Some(prepare_out_root(&expand_home(path))?),
            None => None,
        };

        Ok(Self { root, out_root })
    }
}

fn prepare_out_root(path: &Path) -> Result<PathBuf, ConfigError> {
    let err = |source| ConfigError::OutRootInaccessible {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(path).map_err(err)?;
    path.canonicalize().map_err(err)
}

/// Expand a leading `~` to the user's home directory.
///
/// Only the bare `~` and `~/...` forms are handled; `~user` is left alone.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
