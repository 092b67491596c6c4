mod backend;
mod command;
mod config;
mod scene;
mod telemetry;
mod web;

use clap::{Parser, Subcommand};
use log::{error, info};
use std::process::ExitCode;
use std::sync::{Arc, Mutex as StdMutex};

use crate::backend::{CommandClient, HttpBackend, TelemetryClient};
use crate::command::{CommandDispatcher, CommandKind, ControlPanel};
use crate::config::Config;
use crate::scene::{lock_scene, spawn_scene_task, MemoryEngine, SceneReconciler, SharedScene};
use crate::telemetry::PollLoop;
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "sat-dashboard")]
#[command(about = "Live telemetry globe and control panel for the satellite simulation")]
struct Cli {
    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll telemetry and serve the dashboard
    Serve,
    /// Poll telemetry and log each reconciliation
    Watch {
        /// Stop after this many publications
        #[arg(long)]
        count: Option<u64>,
    },
    /// Send one control command
    Send {
        kind: CommandKind,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long, default_value_t = 1.0)]
        step_size: f64,
        #[arg(long, default_value_t = 1.0)]
        replay_speed: f64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Watch { count } => watch(config, count).await,
        Commands::Send {
            kind,
            start_time,
            step_size,
            replay_speed,
        } => {
            let panel = ControlPanel {
                start_time: start_time.unwrap_or_default(),
                step_size_seconds: step_size,
                replay_speed,
            };
            send(config, kind, panel).await
        }
    }
}

fn connect(config: &Config) -> Option<HttpBackend> {
    match HttpBackend::new(&config.backend) {
        Ok(backend) => {
            info!("Using simulation backend at {}", backend.api_base());
            Some(backend)
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

fn build_scene(config: &Config) -> Option<SceneReconciler<MemoryEngine>> {
    match config.scene.marker_style() {
        Ok(style) => Some(
            SceneReconciler::new(MemoryEngine::new(), style).with_sweep(config.scene.sweep_missing),
        ),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

async fn serve(config: Config) -> ExitCode {
    let (Some(backend), Some(reconciler)) = (connect(&config), build_scene(&config)) else {
        return ExitCode::FAILURE;
    };

    let mut poll = PollLoop::start(
        Arc::new(TelemetryClient::new(backend.clone())),
        config.poll.interval,
        config.poll.overlap,
    );
    let scene: SharedScene = Arc::new(StdMutex::new(reconciler));
    let scene_task = spawn_scene_task(scene.clone(), poll.view().subscribe());

    let state = AppState {
        telemetry: poll.view(),
        scene: scene.clone(),
        dispatcher: Arc::new(CommandDispatcher::new(CommandClient::new(backend))),
    };

    let result = web::run_server(&config.web.bind, state, shutdown_signal()).await;

    poll.stop().await;
    scene_task.abort();
    lock_scene(&scene).teardown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn watch(config: Config, count: Option<u64>) -> ExitCode {
    let (Some(backend), Some(mut reconciler)) = (connect(&config), build_scene(&config)) else {
        return ExitCode::FAILURE;
    };

    let mut poll = PollLoop::start(
        Arc::new(TelemetryClient::new(backend)),
        config.poll.interval,
        config.poll.overlap,
    );
    let mut rx = poll.view().subscribe();
    let mut seen = 0u64;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(publication) = rx.borrow_and_update().clone() else {
                    continue;
                };
                let report = reconciler.reconcile(&publication.telemetry);
                info!(
                    "Telemetry #{}: {} snapshots, {} created, {} updated, {} swept, {} entities",
                    publication.sequence,
                    publication.telemetry.len(),
                    report.created,
                    report.updated,
                    report.swept,
                    reconciler.entities().len()
                );
                seen += 1;
                if count.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    poll.stop().await;
    if let Some(engine) = reconciler.engine() {
        let stats = engine.stats();
        info!(
            "Scene engine saw {} adds, {} position writes, {} removals",
            stats.adds, stats.position_writes, stats.removals
        );
    }
    reconciler.teardown();
    ExitCode::SUCCESS
}

async fn send(config: Config, kind: CommandKind, panel: ControlPanel) -> ExitCode {
    let Some(command) = panel.command_for(kind) else {
        error!("{} needs --start-time", kind);
        return ExitCode::FAILURE;
    };
    let Some(backend) = connect(&config) else {
        return ExitCode::FAILURE;
    };

    let dispatcher = CommandDispatcher::new(CommandClient::new(backend));
    match dispatcher.dispatch(command.command, command.parameters).await {
        Ok(accepted) => match serde_json::to_string_pretty(&accepted) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to encode response: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
