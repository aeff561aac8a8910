use std::io::Write;

use suitcast_core::engine::{DispatchOutcome, EngineSnapshot};
use suitcast_core::scheduler::{Prediction, PredictionOrigin};
use suitcast_core::service::ServiceHandle;
use suitcast_types::AppConfig;
use suitcast_types::formatting::format_bases;

/// Run one record through the pipeline and print what happened.
pub async fn feed(text: &str, handle: &ServiceHandle) -> Result<(), String> {
    let outcome = handle.process(text, "repl").await.map_err(|e| e.to_string())?;
    match outcome {
        DispatchOutcome::Processed { sequence, signals } => {
            println!("#{} processed, {} signal(s)", sequence, signals.len());
            for signal in &signals {
                println!("  {:?}", signal);
            }
        }
        DispatchOutcome::Ignored(reason) => println!("ignored: {:?}", reason),
    }
    Ok(())
}

pub async fn show_status(json: bool, handle: &ServiceHandle) -> Result<(), String> {
    let snapshot = handle.snapshot().await.map_err(|e| e.to_string())?;
    if json {
        let text = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }
    print_summary(&snapshot);
    Ok(())
}

pub async fn show_queue(handle: &ServiceHandle) -> Result<(), String> {
    let snapshot = handle.snapshot().await.map_err(|e| e.to_string())?;
    println!("active ({}):", snapshot.active.len());
    for prediction in &snapshot.active {
        println!("  {}", describe(prediction));
    }
    println!("queued ({}):", snapshot.queued.len());
    for prediction in &snapshot.queued {
        println!("  {}", describe(prediction));
    }
    Ok(())
}

pub async fn show_stats(handle: &ServiceHandle) -> Result<(), String> {
    let tally = handle.stats().await.map_err(|e| e.to_string())?;
    println!("queued:            {} ({} backups)", tally.queued, tally.backups_queued);
    println!("announced:         {}", tally.announced);
    println!("confirmed (1st):   {}", tally.confirmed_first);
    println!("confirmed (2nd):   {}", tally.confirmed_second);
    println!("failed:            {}", tally.failed);
    println!("expired:           {}", tally.expired);
    println!("forwarded:         {}", tally.forwarded);
    if tally.settled() > 0 {
        let rate = f64::from(tally.confirmed()) * 100.0 / f64::from(tally.settled());
        println!("hit rate:          {:.1}%", rate);
    }
    Ok(())
}

pub async fn reset(handle: &ServiceHandle) -> Result<(), String> {
    handle.daily_reset().await.map_err(|e| e.to_string())?;
    println!("state cleared");
    Ok(())
}

pub async fn set_forwarding(enabled: bool, handle: &ServiceHandle) -> Result<(), String> {
    handle.set_forwarding(enabled).await.map_err(|e| e.to_string())?;
    println!("forwarding {}", if enabled { "on" } else { "off" });
    Ok(())
}

pub fn show_config(config: &AppConfig) -> Result<(), String> {
    if let Ok(path) = suitcast_core::config::default_config_path() {
        println!("# default location: {}", path.display());
    }
    let text = toml::to_string_pretty(config).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

pub fn exit() {
    let _ = write!(std::io::stdout(), "quitting...");
    let _ = std::io::stdout().flush();
}

fn print_summary(snapshot: &EngineSnapshot) {
    match snapshot.current_sequence {
        Some(seq) => println!("current record:  #{}", seq),
        None => println!("current record:  -"),
    }
    println!("history:         {}", snapshot.history_len);
    println!("fingerprints:    {}", snapshot.dedup_len);
    println!("active:          {}", snapshot.active.len());
    println!("queued:          {}", snapshot.queued.len());
    let forwarding = if snapshot.forwarding { "on" } else { "off" };
    match snapshot.last_forwarded {
        Some(seq) => println!("forwarding:      {} (last #{})", forwarding, seq),
        None => println!("forwarding:      {}", forwarding),
    }
}

fn describe(prediction: &Prediction) -> String {
    let origin = match prediction.origin {
        PredictionOrigin::Rule(variant) => format!("{:?}", variant),
        PredictionOrigin::Backup => "backup".to_string(),
    };
    format!(
        "#{} {} {:?} from {} [{}], backup #{}{}",
        prediction.target,
        prediction.predicted,
        prediction.state,
        format_bases(&prediction.bases),
        origin,
        prediction.backup_target,
        prediction.alternate,
    )
}
