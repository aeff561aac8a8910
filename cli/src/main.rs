use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use suitcast_cli::commands;
use suitcast_cli::console::{ConsoleForwarder, ConsoleNotifier};
use suitcast_cli::repl::readline_async;
use suitcast_core::engine::PredictionEngine;
use suitcast_core::reset_clock::ResetSchedule;
use suitcast_core::service::{DEFAULT_QUEUE_CAPACITY, PredictionService, ServiceHandle};
use suitcast_core::source::tail_file;
use suitcast_types::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Suit prediction tracker")]
struct Args {
    /// Config file (defaults to the per-user location)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// File to follow for incoming records, one per line
    #[arg(short, long)]
    tail: Option<PathBuf>,
    /// Read the tailed file from the beginning instead of the end
    #[arg(long)]
    from_start: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let args = Args::parse();

    let config = suitcast_core::load_config(args.config.as_deref()).map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e.to_string()
    })?;

    let mut engine = PredictionEngine::new(&config, Box::new(ConsoleNotifier::new()));
    engine.add_signal_handler(Box::new(ConsoleForwarder::new()));
    let (service, handle) = PredictionService::new(engine, DEFAULT_QUEUE_CAPACITY);
    let service_task = tokio::spawn(service.run());

    if config.reset.enabled {
        let schedule = ResetSchedule::from_config(&config.reset).map_err(|e| e.to_string())?;
        schedule.spawn(handle.clone());
    }

    let tail_path = args
        .tail
        .or_else(|| config.source.tail_path.as_ref().map(PathBuf::from));
    if let Some(path) = tail_path {
        let from_start = args.from_start || config.source.from_start;
        let poll = Duration::from_millis(config.source.poll_interval_ms);
        let tail_handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = tail_file(&path, from_start, poll, tail_handle).await {
                tracing::error!(path = %path.display(), error = %e, "Tailing stopped");
            }
        });
    }

    loop {
        let line = readline_async().await?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &handle, &config).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    handle.shutdown().await.ok();
    service_task.await.map_err(|e| e.to_string())?;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a record as if it arrived from the source
    Feed { text: String },
    Status {
        #[arg(long)]
        json: bool,
    },
    Queue,
    Stats,
    /// Clear all state now, as the daily reset does
    Reset,
    /// Turn forwarding of finalized records on or off
    Forward { state: ForwardState },
    Config,
    Exit,
}

#[derive(Clone, Copy, ValueEnum)]
enum ForwardState {
    On,
    Off,
}

async fn respond(line: &str, handle: &ServiceHandle, config: &AppConfig) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "suitcast".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Feed { text }) => commands::feed(text, handle).await?,
        Some(Commands::Status { json }) => commands::show_status(*json, handle).await?,
        Some(Commands::Queue) => commands::show_queue(handle).await?,
        Some(Commands::Stats) => commands::show_stats(handle).await?,
        Some(Commands::Reset) => commands::reset(handle).await?,
        Some(Commands::Forward { state }) => {
            commands::set_forwarding(matches!(state, ForwardState::On), handle).await?
        }
        Some(Commands::Config) => commands::show_config(config)?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If SUITCAST_LOG_PATH is set, append to that file so logs stay out of the REPL
    if let Ok(path) = std::env::var("SUITCAST_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
