use std::path::PathBuf;

use clap::Parser;

use sleepy_node::{NodeConfig, escalate, launch};
use sleepy_platform::sim::SimPlatform;

#[derive(Parser)]
#[command(name = "sleepy-node", about = "Sleepy Thread end device bring-up")]
struct Cli {
    /// Path to configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match NodeConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load config from {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => NodeConfig::default(),
    };

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        sleepy_node::logging::init_json(&config.logging.level);
    } else {
        sleepy_node::logging::init(&config.logging.level);
    }

    let platform = SimPlatform::new(config.simulation.clone());
    let handle = match launch(config, platform) {
        Ok(h) => h,
        Err(e) => escalate(&e),
    };

    let stop = handle.stop_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received SIGINT, stopping");
        stop.stop();
    });

    match tokio::task::spawn_blocking(move || handle.join()).await {
        Ok(Ok(report)) => {
            tracing::info!(
                reason = ?report.reason,
                dispatched = report.dispatched,
                "node stopped"
            );
        }
        _ => {
            tracing::error!("worker thread panicked");
            std::process::abort();
        }
    }
}
