//! Gapwatch terminal dashboard
//!
//! Minimal presentation layer over the market engine. Reads the endpoint
//! from `GAP_ENDPOINT` (or starts the demo loop when `GAP_DEMO=1` or no
//! endpoint is set) and prints every view change. Cues ring the terminal
//! bell unless `GAP_AUDIO=off`.
//!
//! Commands on stdin: `r` retry now, `a` toggle audio, `q` quit.

use std::sync::Arc;

use dotenvy::dotenv;
use gapwatch::audio::{AudioBackend, BellBackend, NullBackend};
use gapwatch::config::{self, EngineConfig};
use gapwatch::{logging, DashboardView, MarketEngine, MarketState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!(environment = %env, "Starting Gapwatch dashboard");

    let backend: Arc<dyn AudioBackend> = if config::audio_output_enabled() {
        Arc::new(BellBackend::stdout())
    } else {
        info!("Audio output disabled, running headless");
        Arc::new(NullBackend)
    };
    let engine = MarketEngine::with_http_source(EngineConfig::default(), backend);

    match config::get_endpoint() {
        Some(endpoint) if !config::demo_requested() => {
            engine
                .set_endpoint(&endpoint)
                .await
                .map_err(|e| format!("Invalid GAP_ENDPOINT: {}", e))?;
            engine.start_live().await?;
        }
        _ => {
            info!("No endpoint configured or demo requested, starting demo mode");
            engine.start_demo().await?;
        }
    }

    let mut views = engine.subscribe();
    let mut commands = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                render(&view);
            }
            line = commands.next_line() => {
                match line {
                    Ok(Some(cmd)) => match cmd.trim() {
                        "r" => {
                            if let Err(e) = engine.retry().await {
                                warn!(error = %e, "Retry rejected");
                            }
                        }
                        "a" => engine.set_audio_enabled(!engine.audio_enabled()),
                        "q" => break,
                        _ => {}
                    },
                    Ok(None) => {
                        // stdin closed; keep running until ctrl-c
                        let _ = signal::ctrl_c().await;
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read command");
                    }
                }
            }
        }
    }

    info!("Shutting down dashboard...");
    engine.shutdown().await;
    Ok(())
}

fn render(view: &DashboardView) {
    let audio = if view.audio_enabled { "on" } else { "off" };
    let loading = if view.loading { " (updating...)" } else { "" };

    match &view.snapshot {
        Some(snapshot) => {
            let marker = match snapshot.state {
                MarketState::Devaluation => "▲",
                MarketState::Appreciation => "▼",
                MarketState::Stable => "=",
            };
            println!(
                "[{:?}] {} {} | official {} | parallel {} | gap {} ({}) | {} | audio {}{}",
                view.mode,
                marker,
                snapshot.state,
                snapshot.official_rate,
                snapshot.parallel_rate,
                snapshot.gap_absolute,
                snapshot.gap_percent,
                snapshot.observed_at,
                audio,
                loading,
            );
        }
        None if !view.loading && view.error.is_none() => {
            println!("[{:?}] waiting for data | audio {}", view.mode, audio);
        }
        None => {}
    }

    if let Some(message) = view.error_message() {
        println!("  ! {}", message);
    }
}
