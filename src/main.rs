use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use pluginctl_client::{Client, Transport};

/// Commands other than `logs-watch` must finish within this deadline.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// pluginctl - administer a plugin on a running Mattermost server
#[derive(Parser, Debug)]
#[command(name = "pluginctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a plugin bundle and enable it
    Deploy {
        plugin_id: String,
        bundle_path: PathBuf,
    },

    /// Enable the plugin
    Enable { plugin_id: String },

    /// Disable the plugin
    Disable { plugin_id: String },

    /// Disable, then enable the plugin
    Reset { plugin_id: String },

    /// Print the latest plugin log records
    Logs { plugin_id: String },

    /// Follow the plugin log records until interrupted
    #[command(name = "logs-watch")]
    LogsWatch { plugin_id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let transport = Transport::from_env().await?;
    let client = Client::connect(transport).await?;

    match cli.command {
        Command::Deploy {
            plugin_id,
            bundle_path,
        } => with_deadline(deploy(&client, &plugin_id, &bundle_path)).await,
        Command::Enable { plugin_id } => with_deadline(enable_plugin(&client, &plugin_id)).await,
        Command::Disable { plugin_id } => with_deadline(disable_plugin(&client, &plugin_id)).await,
        Command::Reset { plugin_id } => with_deadline(reset_plugin(&client, &plugin_id)).await,
        Command::Logs { plugin_id } => with_deadline(print_logs(&client, &plugin_id)).await,
        // Keeps watching forever; deliberately not under the deadline.
        Command::LogsWatch { plugin_id } => watch_logs(&client, &plugin_id).await,
    }
}

async fn with_deadline<F>(fut: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::time::timeout(COMMAND_TIMEOUT, fut)
        .await
        .map_err(|_| anyhow!("command timed out after {} seconds", COMMAND_TIMEOUT.as_secs()))?
}

/// Upload and enable a plugin bundle. Fails if plugin uploads are
/// disabled on the server.
async fn deploy(client: &Client, plugin_id: &str, bundle_path: &Path) -> Result<()> {
    let bundle = tokio::fs::read(bundle_path)
        .await
        .with_context(|| format!("failed to open {}", bundle_path.display()))?;
    let filename = bundle_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("plugin.tar.gz");

    tracing::info!("uploading plugin via API");
    client
        .upload_plugin(filename, bundle)
        .await
        .context("failed to upload plugin bundle")?;

    enable_plugin(client, plugin_id).await
}

async fn enable_plugin(client: &Client, plugin_id: &str) -> Result<()> {
    tracing::info!("enabling plugin");
    client
        .enable_plugin(plugin_id)
        .await
        .context("failed to enable plugin")
}

async fn disable_plugin(client: &Client, plugin_id: &str) -> Result<()> {
    tracing::info!("disabling plugin");
    client
        .disable_plugin(plugin_id)
        .await
        .context("failed to disable plugin")
}

async fn reset_plugin(client: &Client, plugin_id: &str) -> Result<()> {
    disable_plugin(client, plugin_id).await?;
    enable_plugin(client, plugin_id).await
}

async fn print_logs(client: &Client, plugin_id: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    pluginctl_logs::tail(client, plugin_id, &mut out).await?;
    Ok(())
}

async fn watch_logs(client: &Client, plugin_id: &str) -> Result<()> {
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let mut out = std::io::stdout().lock();
    pluginctl_logs::follow(client, plugin_id, cancel, &mut out).await?;
    Ok(())
}
