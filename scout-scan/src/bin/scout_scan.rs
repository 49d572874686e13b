// Scout scan demo
// Runs a scan session against a simulated detector and logs what would be spoken

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use scout_core::{BoundingBox, Detection, DetectionFrame, ScanConfig, ScanMode, Verbosity};
use scout_eye::{Detector, VisionError};
use scout_scan::{ScanController, VerbosityPreference};
use scout_spk::LogSink;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

const LABELS: &[&str] = &[
    "chair", "person", "door", "table", "stairs", "bottle", "laptop", "cup", "bag", "bench",
];

#[derive(Parser)]
#[command(name = "scout-scan")]
#[command(about = "Run a continuous scan against a simulated detector", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Confidence threshold mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Speak tier-qualified phrases instead of bare labels
    #[arg(long)]
    verbose_speech: bool,

    /// Seed for the simulated detector
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Probability that a simulated detect call fails
    #[arg(long, default_value = "0.1")]
    failure_rate: f64,

    /// Override the maximum session length in seconds
    #[arg(long)]
    duration: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Interactive,
    Continuous,
}

impl From<ModeArg> for ScanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Interactive => ScanMode::Interactive,
            ModeArg::Continuous => ScanMode::Continuous,
        }
    }
}

/// Produces random labelled boxes after a random model latency
struct SimulatedDetector {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl SimulatedDetector {
    fn new(seed: u64, failure_rate: f64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl Detector for SimulatedDetector {
    async fn detect(&self) -> Result<DetectionFrame, VisionError> {
        let (latency_ms, outcome) = {
            let mut rng = self.rng.lock();
            let latency_ms = rng.gen_range(80..900);
            let outcome = if rng.gen_bool(self.failure_rate) {
                Err(VisionError::Detector("simulated model failure".to_string()))
            } else {
                let count = rng.gen_range(0..4);
                let detections = (0..count)
                    .filter_map(|_| {
                        let label = LABELS.choose(&mut *rng)?;
                        let x = rng.gen_range(0.0..0.7);
                        let y = rng.gen_range(0.0..0.7);
                        let w = rng.gen_range(0.05..0.3);
                        let h = rng.gen_range(0.05..0.3);
                        Some(Detection::new(
                            *label,
                            rng.gen_range(0.3..0.99),
                            BoundingBox::new(x, y, x + w, y + h),
                        ))
                    })
                    .collect();
                Ok(detections)
            };
            (latency_ms, outcome)
        };

        tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        outcome.map(|detections| DetectionFrame::new(detections, latency_ms))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scout=info,scout_scan=info,scout_eye=warn,scout_spk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(secs) = cli.duration {
        config.max_session_secs = secs;
    }

    let verbosity = if cli.verbose_speech {
        Verbosity::Detailed
    } else {
        Verbosity::Brief
    };

    let controller = ScanController::builder(
        config,
        Arc::new(SimulatedDetector::new(cli.seed, cli.failure_rate)),
        Arc::new(LogSink),
    )
    .preferences(Arc::new(VerbosityPreference::new(verbosity)))
    .build()?;

    let session_id = controller.start()?;
    info!(%session_id, "Press Ctrl-C to stop early");

    tokio::select! {
        _ = controller.wait_until_idle() => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            controller.stop().await;
        }
    }
    controller.wait_until_idle().await;

    let report = controller
        .last_report()
        .context("session ended without a report")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
