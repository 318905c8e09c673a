//! Plugin manifest tooling
//!
//! Finds and parses `plugin.json` and propagates the plugin id into the
//! server and webapp source trees.

mod apply;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use pluginctl_types::Manifest;

pub use apply::apply_manifest;

/// File name of the plugin manifest.
pub const MANIFEST_NAME: &str = "plugin.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no {MANIFEST_NAME} found in {dir} or any parent directory")]
    NotFound { dir: PathBuf },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locate and parse the manifest, searching upward from `dir`. Returns
/// the manifest and the path it was loaded from.
pub fn find_manifest(dir: &Path) -> Result<(Manifest, PathBuf), ManifestError> {
    let mut current = Some(dir);

    while let Some(dir) = current {
        let candidate = dir.join(MANIFEST_NAME);
        if candidate.is_file() {
            let manifest = load_manifest(&candidate)?;
            return Ok((manifest, candidate));
        }
        current = dir.parent();
    }

    Err(ManifestError::NotFound {
        dir: dir.to_path_buf(),
    })
}

/// Parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
