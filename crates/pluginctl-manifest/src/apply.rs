use std::fs;
use std::path::Path;

use pluginctl_types::Manifest;

use crate::ManifestError;

/// Server-side constant file emitted by `apply`.
const SERVER_ID_PATH: &str = "server/src/plugin_id.rs";

/// Webapp constant file emitted by `apply`.
const WEBAPP_ID_PATH: &str = "webapp/src/plugin_id.js";

/// Propagate the plugin id into the server and webapp source trees, for
/// the components the manifest declares. `root` is the directory the
/// manifest was found in.
pub fn apply_manifest(manifest: &Manifest, root: &Path) -> Result<(), ManifestError> {
    if manifest.has_server() {
        write_file(&root.join(SERVER_ID_PATH), &server_id_file(&manifest.id))?;
    }

    if manifest.has_webapp() {
        write_file(&root.join(WEBAPP_ID_PATH), &webapp_id_file(&manifest.id))?;
    }

    Ok(())
}

fn server_id_file(id: &str) -> String {
    format!("pub const PLUGIN_ID: &str = \"{id}\";\n")
}

fn webapp_id_file(id: &str) -> String {
    format!("export default '{id}';\n")
}

fn write_file(path: &Path, contents: &str) -> Result<(), ManifestError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };

    write().map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluginctl_types::{ManifestServer, ManifestWebapp};

    fn manifest(server: bool, webapp: bool) -> Manifest {
        Manifest {
            id: "com.example.demo".to_string(),
            server: server.then(|| ManifestServer {
                executable: Some("server/dist/plugin".to_string()),
                ..Default::default()
            }),
            webapp: webapp.then(|| ManifestWebapp {
                bundle_path: "webapp/dist/main.js".to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_writes_both_components() {
        let dir = tempfile::tempdir().unwrap();
        apply_manifest(&manifest(true, true), dir.path()).unwrap();

        let server = fs::read_to_string(dir.path().join(SERVER_ID_PATH)).unwrap();
        assert_eq!(server, "pub const PLUGIN_ID: &str = \"com.example.demo\";\n");

        let webapp = fs::read_to_string(dir.path().join(WEBAPP_ID_PATH)).unwrap();
        assert_eq!(webapp, "export default 'com.example.demo';\n");
    }

    #[test]
    fn test_apply_skips_undeclared_components() {
        let dir = tempfile::tempdir().unwrap();
        apply_manifest(&manifest(true, false), dir.path()).unwrap();

        assert!(dir.path().join(SERVER_ID_PATH).exists());
        assert!(!dir.path().join(WEBAPP_ID_PATH).exists());
    }

    #[test]
    fn test_apply_without_components_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        apply_manifest(&manifest(false, false), dir.path()).unwrap();

        assert!(!dir.path().join("server").exists());
        assert!(!dir.path().join("webapp").exists());
    }
}
