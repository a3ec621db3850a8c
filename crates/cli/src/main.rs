//! `sweepctl` – operator CLI for the sweeper maintenance engine.
//!
//! Every subcommand goes through the same facade the desktop front-end
//! uses, so a failing command here fails the same way in the UI.

mod config;
mod logging;
mod serve;

use anyhow::{bail, Context};
use bridge::release::{is_newer, ReleaseChecker};
use bridge::types::*;
use bridge::{GatewayError, InvokeOptions, MaintenanceClient, UnixSocketChannel};
use clap::{Parser, Subcommand};
use config::ReleaseConfig;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "sweepctl",
    version,
    about = "Operator CLI for the sweeper maintenance engine"
)]
struct Cli {
    /// Engine socket path (overrides config).
    #[arg(long, global = true)]
    socket: Option<PathBuf>,
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,
    /// Do not log failed commands. The exit code still reports them.
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Application cache files.
    Cache {
        #[command(subcommand)]
        action: CleanAction,
    },
    /// Files in the desktop trash.
    Trash {
        #[command(subcommand)]
        action: CleanAction,
    },
    /// System log files.
    Logs {
        #[command(subcommand)]
        action: CleanAction,
    },
    /// Large files in the home directory.
    LargeFiles {
        #[command(subcommand)]
        action: CleanAction,
    },
    /// systemd services.
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Preview a file's content.
    Preview { path: String },
    /// Open a file with its default application or a given program.
    Open {
        path: String,
        /// Program to open the file with.
        #[arg(long = "with")]
        program: Option<String>,
    },
    /// Invoke an engine command by name with JSON args.
    Call {
        /// Command name (e.g. "getCacheSummary").
        name: String,
        /// JSON object with the command arguments.
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Serve a scripted replay engine on the socket.
    Serve {
        /// Fixture YAML with the scripted responses.
        #[arg(long)]
        fixture: PathBuf,
    },
    /// Print the version, optionally checking for a newer release.
    Version {
        #[arg(long)]
        check: bool,
    },
}

#[derive(Subcommand)]
enum CleanAction {
    /// List files found by the engine.
    List,
    /// Total size and file count.
    Summary,
    /// Delete the given files.
    Clear {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Delete everything in this category.
    ClearAll {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ServiceAction {
    /// Running services.
    Running,
    /// All loaded services.
    All,
    /// Stop one or more services.
    Stop {
        #[arg(required = true)]
        services: Vec<String>,
    },
    /// Start a service.
    Start { service: String },
    /// Enable one or more services.
    Enable {
        #[arg(required = true)]
        services: Vec<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Area {
    Cache,
    Trash,
    Logs,
    LargeFiles,
}

impl Area {
    fn label(self) -> &'static str {
        match self {
            Area::Cache => "cache files",
            Area::Trash => "trash",
            Area::Logs => "log files",
            Area::LargeFiles => "large files",
        }
    }
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    logging::init_logging(&config.logging);
    let _ = rustls::crypto::ring::default_provider().install_default();

    let socket = cli
        .socket
        .clone()
        .unwrap_or_else(|| config.engine.socket_path.clone());
    let options = InvokeOptions {
        suppress_error: cli.quiet || config.engine.suppress_errors,
    };

    let code = match cli.command {
        Commands::Serve { fixture } => serve::run_daemon(socket, &fixture).await,
        Commands::Version { check } => cmd_version(check, &config.release, cli.json).await,
        command => {
            let api = MaintenanceClient::from_channel(Arc::new(UnixSocketChannel::new(&socket)))
                .with_options(options);
            match run(command, &api, cli.json).await {
                Ok(()) => 0,
                Err(e) => report(&e),
            }
        }
    };
    std::process::exit(code);
}

/// Print the failure and pick the exit code: 1 when the engine refused,
/// 2 when it could not be reached or the invocation itself was wrong.
fn report(err: &anyhow::Error) -> i32 {
    eprintln!("error: {:#}", err);
    match err.downcast_ref::<GatewayError>() {
        Some(GatewayError::Transport(_)) => 2,
        Some(_) => 1,
        None => 2,
    }
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

async fn run(command: Commands, api: &MaintenanceClient, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Cache { action } => cmd_clean(Area::Cache, action, api, json).await,
        Commands::Trash { action } => cmd_clean(Area::Trash, action, api, json).await,
        Commands::Logs { action } => cmd_clean(Area::Logs, action, api, json).await,
        Commands::LargeFiles { action } => cmd_clean(Area::LargeFiles, action, api, json).await,
        Commands::Services { action } => cmd_services(action, api, json).await,
        Commands::Preview { path } => {
            let preview = api.preview_file(path).await?;
            emit(&preview, json, print_preview);
            Ok(())
        }
        Commands::Open { path, program } => {
            let opened = api.open_file(path, program).await?;
            emit(&opened, json, |p| println!("opened {}", p));
            Ok(())
        }
        Commands::Call { name, args } => cmd_call(&name, &args, api, json).await,
        // dispatched in main
        Commands::Serve { .. } | Commands::Version { .. } => Ok(()),
    }
}

async fn cmd_clean(
    area: Area,
    action: CleanAction,
    api: &MaintenanceClient,
    json: bool,
) -> anyhow::Result<()> {
    match action {
        CleanAction::List => {
            let rows = match area {
                Area::Cache => to_rows(api.get_cache_files().await?, |f| {
                    FileRow::new(&f.path, f.size, &f.modified)
                }),
                Area::Trash => to_rows(api.get_trash_files().await?, |f| {
                    FileRow::new(&f.path, f.size, &f.deleted_date)
                }),
                Area::Logs => to_rows(api.get_system_logs().await?, |f| {
                    FileRow::new(f.path(), f.size(), f.modified())
                }),
                Area::LargeFiles => to_rows(api.get_large_files().await?, |f| {
                    FileRow::new(&f.path, f.size, &f.modified)
                }),
            };
            if json {
                print_json(&rows.raw);
            } else {
                print_files(&rows.rows);
            }
        }
        CleanAction::Summary => {
            let summary = match area {
                Area::Cache => api.get_cache_summary().await?,
                Area::Trash => api.get_trash_summary().await?,
                Area::Logs => api.get_log_summary().await?,
                Area::LargeFiles => api.get_large_files_summary().await?,
            };
            emit(&summary, json, |s| {
                println!(
                    "{}: {} files, {}",
                    area.label(),
                    s.file_count,
                    human_size(s.total_size)
                )
            });
        }
        CleanAction::Clear { paths } => {
            let out = match area {
                Area::Cache => api.clear_selected_cache_files(paths).await?,
                Area::Trash => api.clear_selected_trash_files(paths).await?,
                Area::Logs => api.clear_selected_log_files(paths).await?,
                Area::LargeFiles => api.clear_selected_large_files(paths).await?,
            };
            emit(&out, json, |m| print_done(m));
        }
        CleanAction::ClearAll { yes } => {
            if !yes && !confirm(&format!("Permanently clear all {}?", area.label()))? {
                println!("aborted");
                return Ok(());
            }
            let out = match area {
                Area::Cache => api.clear_cache().await?,
                Area::Trash => api.clear_trash().await?,
                Area::Logs => api.clear_all_logs().await?,
                Area::LargeFiles => api.clear_all_large_files().await?,
            };
            emit(&out, json, |m| print_done(m));
        }
    }
    Ok(())
}

async fn cmd_services(
    action: ServiceAction,
    api: &MaintenanceClient,
    json: bool,
) -> anyhow::Result<()> {
    match action {
        ServiceAction::Running => {
            let services = api.get_system_services().await?;
            emit(&services, json, |s| print_services(s));
        }
        ServiceAction::All => {
            let services = api.get_all_services().await?;
            emit(&services, json, |s| print_services(s));
        }
        ServiceAction::Stop { mut services } => {
            if services.len() == 1 {
                let name = api.stop_service(services.remove(0)).await?;
                emit(&name, json, |n| println!("stopped {}", n));
            } else {
                let names = api.stop_selected_services(services).await?;
                emit(&names, json, |n| println!("stopped {}", n.join(", ")));
            }
        }
        ServiceAction::Start { service } => {
            let name = api.start_service(service).await?;
            emit(&name, json, |n| println!("started {}", n));
        }
        ServiceAction::Enable { mut services } => {
            if services.len() == 1 {
                let name = api.enable_service(services.remove(0)).await?;
                emit(&name, json, |n| println!("enabled {}", n));
            } else {
                let names = api.enable_selected_services(services).await?;
                emit(&names, json, |n| println!("enabled {}", n.join(", ")));
            }
        }
    }
    Ok(())
}

async fn cmd_call(
    name: &str,
    args_str: &str,
    api: &MaintenanceClient,
    json: bool,
) -> anyhow::Result<()> {
    let args: Value = serde_json::from_str(args_str).context("invalid JSON args")?;
    let args = match args {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(map),
        other => bail!("args must be a JSON object, got {}", other),
    };

    let data: Value = api
        .gateway()
        .invoke_with(name, args, api.options())
        .await?;
    if json || !data.is_string() {
        print_json(&data);
    } else {
        print_done(data.as_str().unwrap_or_default());
    }
    Ok(())
}

async fn cmd_version(check: bool, release: &ReleaseConfig, json: bool) -> i32 {
    let current = env!("CARGO_PKG_VERSION");
    if !check {
        if json {
            print_json(&serde_json::json!({ "version": current }));
        } else {
            println!("sweepctl {}", current);
        }
        return 0;
    }

    let checker = ReleaseChecker::new(&release.owner, &release.repo)
        .with_timeout(Duration::from_millis(release.timeout_ms));
    let checked = checker
        .latest()
        .await
        .and_then(|latest| is_newer(current, &latest.tag_name).map(|newer| (latest, newer)));
    match checked {
        Ok((latest, update_available)) => {
            if json {
                print_json(&serde_json::json!({
                    "version": current,
                    "latest": latest,
                    "update_available": update_available,
                }));
            } else if update_available {
                println!("sweepctl {} – {} is available", current, latest.tag_name);
                if let Some(url) = &latest.html_url {
                    println!("  {}", url);
                }
            } else {
                println!("sweepctl {} is up to date", current);
            }
            0
        }
        Err(e) => {
            eprintln!("error: update check failed: {}", e);
            2
        }
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("failed to read confirmation")
}

// ===========================================================================
// Output helpers
// ===========================================================================

struct FileRow {
    path: String,
    size: u64,
    date: String,
}

impl FileRow {
    fn new(path: &str, size: u64, date: &str) -> Self {
        Self {
            path: path.to_string(),
            size,
            date: date.to_string(),
        }
    }
}

/// Listing kept both as the engine sent it (for `--json`) and as rows.
struct Listing {
    raw: Value,
    rows: Vec<FileRow>,
}

fn to_rows<T: Serialize>(items: Vec<T>, row: impl Fn(&T) -> FileRow) -> Listing {
    let rows = items.iter().map(row).collect();
    let raw = serde_json::to_value(&items).unwrap_or(Value::Null);
    Listing { raw, rows }
}

fn emit<T: Serialize + ?Sized>(value: &T, json: bool, human: impl FnOnce(&T)) {
    if json {
        print_json(value);
    } else {
        human(value);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let j = serde_json::to_string_pretty(value).unwrap_or_default();
    println!("{}", j);
}

fn print_done(message: &str) {
    if message.is_empty() {
        println!("done");
    } else {
        println!("{}", message);
    }
}

fn print_files(rows: &[FileRow]) {
    for r in rows {
        println!("{:>10}  {:<19}  {}", human_size(r.size), r.date, r.path);
    }
    let total: u64 = rows.iter().map(|r| r.size).sum();
    println!("{} files, {}", rows.len(), human_size(total));
}

fn print_services(services: &[SystemServiceItem]) {
    for s in services {
        let state = if s.is_running { "running" } else { "stopped" };
        let detail = s
            .description
            .as_deref()
            .or(s.active.as_deref())
            .unwrap_or("");
        println!("{:<40} {:<10} {:<8} {}", s.name, s.status, state, detail);
    }
    println!("{} services", services.len());
}

fn print_preview(p: &FilePreview) {
    println!("{} ({})", p.name, p.path);
    match &p.body {
        PreviewBody::Text { content } => println!("{}", content),
        PreviewBody::Image { image_url } => {
            println!("  image, {} bytes as data URL", image_url.len())
        }
        PreviewBody::Binary => println!("  binary file, no preview"),
        PreviewBody::Unknown => println!("  unknown file type"),
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bridge::{ReplayEngine, ResponseEnvelope, TransportError};
    use clap::CommandFactory;
    use serde_json::json;

    fn replay_client(engine: ReplayEngine) -> (MaintenanceClient, Arc<ReplayEngine>) {
        let engine = Arc::new(engine);
        (MaintenanceClient::from_channel(engine.clone()), engine)
    }

    fn service_engine() -> ReplayEngine {
        ReplayEngine::new()
            .with_reply("stopService", ResponseEnvelope::success("cups"))
            .with_reply("enableService", ResponseEnvelope::success("cups"))
            .with_reply(
                "stopSelectedServices",
                ResponseEnvelope::success(json!(["cups", "avahi-daemon"])),
            )
            .with_reply(
                "enableSelectedServices",
                ResponseEnvelope::success(json!(["cups", "avahi-daemon"])),
            )
    }

    fn services(action: ServiceAction) -> Commands {
        Commands::Services { action }
    }

    #[tokio::test]
    async fn test_one_service_uses_single_command() {
        let (api, engine) = replay_client(service_engine());
        run(services(ServiceAction::Stop { services: vec!["cups".into()] }), &api, true)
            .await
            .unwrap();
        run(services(ServiceAction::Enable { services: vec!["cups".into()] }), &api, true)
            .await
            .unwrap();

        let sent: Vec<(String, Option<serde_json::Value>)> = engine
            .requests()
            .into_iter()
            .map(|r| (r.name, r.args.map(serde_json::Value::Object)))
            .collect();
        assert_eq!(
            sent,
            vec![
                ("stopService".to_string(), Some(json!({ "service": "cups" }))),
                ("enableService".to_string(), Some(json!({ "service": "cups" }))),
            ]
        );
    }

    #[tokio::test]
    async fn test_several_services_use_batch_command() {
        let (api, engine) = replay_client(service_engine());
        let names = vec!["cups".to_string(), "avahi-daemon".to_string()];
        run(services(ServiceAction::Stop { services: names.clone() }), &api, true)
            .await
            .unwrap();
        run(services(ServiceAction::Enable { services: names }), &api, true)
            .await
            .unwrap();

        let sent: Vec<(String, Option<serde_json::Value>)> = engine
            .requests()
            .into_iter()
            .map(|r| (r.name, r.args.map(serde_json::Value::Object)))
            .collect();
        let batch = json!({ "services": ["cups", "avahi-daemon"] });
        assert_eq!(
            sent,
            vec![
                ("stopSelectedServices".to_string(), Some(batch.clone())),
                ("enableSelectedServices".to_string(), Some(batch)),
            ]
        );
    }

    #[tokio::test]
    async fn test_engine_failure_maps_to_exit_code_one() {
        let (api, _) = replay_client(ReplayEngine::new().with_reply(
            "stopService",
            ResponseEnvelope::error("Failed to stop service cups"),
        ));
        let err = run(services(ServiceAction::Stop { services: vec!["cups".into()] }), &api, true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to stop service cups");
        assert_eq!(report(&err), 1);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_clear_with_paths() {
        let cli = Cli::try_parse_from(["sweepctl", "trash", "clear", "/tmp/a", "/tmp/b"]).unwrap();
        match cli.command {
            Commands::Trash {
                action: CleanAction::Clear { paths },
            } => assert_eq!(paths, vec!["/tmp/a", "/tmp/b"]),
            _ => panic!("parsed wrong subcommand"),
        }
    }

    #[test]
    fn test_clear_requires_paths() {
        assert!(Cli::try_parse_from(["sweepctl", "cache", "clear"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sweepctl",
            "services",
            "stop",
            "cups",
            "--quiet",
            "--socket",
            "/tmp/e.sock",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/e.sock")));
    }

    #[test]
    fn test_exit_codes() {
        let cmd = anyhow::Error::new(GatewayError::command_failed("clearCache", None));
        assert_eq!(report(&cmd), 1);
        let transport = anyhow::Error::new(GatewayError::Transport(TransportError::Rejected(
            "ConnectionLost".into(),
        )));
        assert_eq!(report(&transport), 2);
        assert_eq!(report(&anyhow::anyhow!("bad args")), 2);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(100 * 1024 * 1024), "100.0 MiB");
    }
}
