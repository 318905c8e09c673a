//! Shared types for pluginctl
//!
//! This crate contains the data structures used across the pluginctl
//! crates: the subset of the server configuration the tools consult and
//! the plugin manifest model.

use std::collections::HashMap;

use serde::Deserialize;

// ============================================================================
// Server configuration
// ============================================================================

/// Subset of the Mattermost server configuration consumed by pluginctl.
///
/// The config endpoint serializes with PascalCase keys; everything not
/// modeled here is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerConfig {
    #[serde(default)]
    pub log_settings: LogSettings,
}

/// File log sink settings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogSettings {
    /// Whether file log records are emitted as JSON. Nullable on the wire.
    pub file_json: Option<bool>,
}

// ============================================================================
// Plugin manifest
// ============================================================================

/// Plugin manifest (`plugin.json`), modeled only as deeply as the build
/// tooling needs. Unknown fields are ignored; the manifest is never
/// written back.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Manifest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub min_server_version: Option<String>,
    #[serde(default)]
    pub server: Option<ManifestServer>,
    #[serde(default)]
    pub webapp: Option<ManifestWebapp>,
}

/// Server component declaration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ManifestServer {
    /// Per-platform executable paths, keyed like "linux-amd64".
    #[serde(default)]
    pub executables: HashMap<String, String>,

    /// Single executable path, used when `executables` is empty.
    #[serde(default)]
    pub executable: Option<String>,
}

/// Webapp component declaration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ManifestWebapp {
    #[serde(default)]
    pub bundle_path: String,
}

impl Manifest {
    /// Whether the manifest declares a runnable server component.
    pub fn has_server(&self) -> bool {
        self.server.as_ref().is_some_and(|s| {
            !s.executables.is_empty() || s.executable.as_deref().is_some_and(|e| !e.is_empty())
        })
    }

    /// Whether the manifest declares a webapp bundle.
    pub fn has_webapp(&self) -> bool {
        self.webapp.as_ref().is_some_and(|w| !w.bundle_path.is_empty())
    }
}
