use anyhow::Result;
use clap::{Parser, Subcommand};

use pluginctl_manifest::{apply_manifest, find_manifest};

/// manifest - build-system queries and codegen for plugin.json
///
/// Subcommand names are literal because build scripts invoke them.
#[derive(Parser, Debug)]
#[command(name = "manifest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the plugin id
    #[command(name = "plugin_id")]
    PluginId,

    /// Print "true" when the manifest declares a server component
    #[command(name = "has_server")]
    HasServer,

    /// Print "true" when the manifest declares a webapp component
    #[command(name = "has_webapp")]
    HasWebapp,

    /// Write the plugin id constants into the server and webapp trees
    Apply,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, manifest_path) = find_manifest(&cwd)?;
    let root = manifest_path.parent().unwrap_or(cwd.as_path());

    match cli.command {
        // No trailing newlines: build scripts capture the output verbatim.
        Command::PluginId => print!("{}", manifest.id),
        Command::HasServer => {
            if manifest.has_server() {
                print!("true");
            }
        }
        Command::HasWebapp => {
            if manifest.has_webapp() {
                print!("true");
            }
        }
        Command::Apply => apply_manifest(&manifest, root)?,
    }

    Ok(())
}
