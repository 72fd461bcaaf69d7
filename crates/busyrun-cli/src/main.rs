//! busyrun CLI - run simulated slow tasks behind a delayed busy indicator.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use busyrun_core::{RunEvent, RunEventKind, RunLabel, RunOptions};
use busyrun_progress::{ControllerContext, ProgressConfig, ProgressController};

mod sticker_sync;
mod terminal;

use sticker_sync::{
    queue_sticker_pack_sync, send_sticker_pack_sync, DeviceRole, SimulatedQueue,
    StickerPackOperation,
};
use terminal::{TerminalPresenter, TerminalReporter};

/// busyrun CLI - long-running task progress controller
#[derive(Parser)]
#[command(name = "busyrun")]
#[command(about = "Run slow tasks behind a delayed busy indicator", long_about = None)]
struct Cli {
    /// Delay before the indicator appears (overrides BUSYRUN_SHOW_DELAY_MS)
    #[arg(long, global = true)]
    show_delay_ms: Option<u64>,

    /// Minimum time the indicator stays up (overrides BUSYRUN_MIN_VISIBLE_MS)
    #[arg(long, global = true)]
    min_visible_ms: Option<u64>,

    /// Print the run timeline as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a task that sleeps and then succeeds or fails
    Simulate {
        /// How long the task takes
        #[arg(short, long)]
        duration_ms: u64,

        /// Make the task fail
        #[arg(long)]
        fail: bool,

        /// Do not report the failure to the user
        #[arg(long)]
        suppress_error_dialog: bool,

        /// Task name used in logs
        #[arg(long, default_value = "simulate")]
        name: String,

        /// Instance id used in logs (random if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Queue a sticker-pack sync message behind the indicator
    #[command(name = "sticker-sync")]
    StickerSync {
        /// Sticker pack id
        #[arg(long)]
        pack_id: String,

        /// Sticker pack key
        #[arg(long)]
        pack_key: String,

        /// Report the pack as uninstalled
        #[arg(long)]
        uninstall: bool,

        /// Act as the primary device (sync is skipped)
        #[arg(long)]
        primary: bool,

        /// Make the queue fail
        #[arg(long)]
        fail: bool,

        /// Simulated queue latency
        #[arg(long, default_value_t = 2500)]
        latency_ms: u64,

        /// Skip the indicator; queue failures are only logged
        #[arg(long)]
        background: bool,
    },
}

/// Failure produced by the `simulate` task.
#[derive(Debug, Error)]
#[error("simulated task failed after {0}ms")]
struct SimulatedFailure(u64);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let controller = ProgressController::new(
        ControllerContext::new(Arc::new(TerminalPresenter::new()), Arc::new(TerminalReporter))
            .with_config(config)
            .with_events(events_tx),
    );
    info!(
        show_delay_ms = controller.config().show_delay.as_millis() as u64,
        min_visible_ms = controller.config().min_visible.as_millis() as u64,
        "Progress controller ready"
    );

    let result = match cli.command {
        Commands::Simulate {
            duration_ms,
            fail,
            suppress_error_dialog,
            name,
            id,
        } => {
            simulate(
                &controller,
                name,
                id,
                duration_ms,
                fail,
                suppress_error_dialog,
            )
            .await
        }
        Commands::StickerSync {
            pack_id,
            pack_key,
            uninstall,
            primary,
            fail,
            latency_ms,
            background,
        } => {
            let operation = StickerPackOperation {
                pack_id,
                pack_key,
                installed: !uninstall,
            };
            let device = if primary {
                DeviceRole::Primary
            } else {
                DeviceRole::Linked
            };
            let queue = SimulatedQueue::new(Duration::from_millis(latency_ms), fail);
            if background {
                send_sticker_pack_sync(&queue, device, &operation).await;
                println!("Sticker pack sync attempted ({} message(s) queued)", queue.sent().len());
                Ok(())
            } else {
                sticker_sync(&controller, &queue, operation, device).await
            }
        }
    };

    drop(controller);
    while let Some(event) = events_rx.recv().await {
        print_event(&event, cli.json)?;
    }

    result
}

fn load_config(cli: &Cli) -> ProgressConfig {
    let mut config = ProgressConfig::from_env();
    if let Some(ms) = cli.show_delay_ms {
        config.show_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.min_visible_ms {
        config.min_visible = Duration::from_millis(ms);
    }
    config
}

async fn simulate(
    controller: &ProgressController,
    name: String,
    id: Option<String>,
    duration_ms: u64,
    fail: bool,
    suppress_error_dialog: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let label = match id {
        Some(id) => RunLabel::new(name, id),
        None => RunLabel::generate(name),
    };
    let options = RunOptions {
        suppress_error_dialog,
    };

    let value = controller
        .run(
            label.name(),
            label.id(),
            || async move {
                tokio::time::sleep(Duration::from_millis(duration_ms)).await;
                if fail {
                    Err(SimulatedFailure(duration_ms))
                } else {
                    Ok(duration_ms)
                }
            },
            options,
        )
        .await?;

    println!("Task finished after {}ms", value);
    Ok(())
}

async fn sticker_sync(
    controller: &ProgressController,
    queue: &SimulatedQueue,
    operation: StickerPackOperation,
    device: DeviceRole,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = controller
        .run_default("sticker-sync", &operation.pack_id, || {
            queue_sticker_pack_sync(queue, device, &operation)
        })
        .await?;

    println!("Sticker pack sync: {:?} ({} message(s) queued)", outcome, queue.sent().len());
    Ok(())
}

fn print_event(event: &RunEvent, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let what = match &event.kind {
        RunEventKind::Started { started_at } => {
            format!("started at {}", started_at.to_rfc3339())
        }
        RunEventKind::ShowTimerCancelled => "show timer cancelled".to_string(),
        RunEventKind::IndicatorShown => "indicator shown".to_string(),
        RunEventKind::MinVisibleWait { remaining_ms } => {
            format!("keeping indicator up for {}ms", remaining_ms)
        }
        RunEventKind::IndicatorHidden => "indicator hidden".to_string(),
        RunEventKind::ErrorReported => "error reported".to_string(),
        RunEventKind::Completed => "completed".to_string(),
        RunEventKind::Failed { error } => format!("failed: {}", error),
    };
    println!("{:>6}ms  {:<24} {}", event.elapsed_ms, event.label.to_string(), what);
    Ok(())
}
