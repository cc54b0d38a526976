//! # Scout Runtime
//!
//! Reads resolved names from stdin, prints discovered names to stdout.
//! Logs go to stderr.
//!
//! ```text
//! massdns ... | scout-runtime --domain example.com > new-names.txt
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use scout_runtime::wiring::write_names;
use scout_runtime::{RuntimeConfig, ScoutRuntime};
use scout_telemetry::{init_telemetry, TelemetryConfig};

/// Subscout: subdomain discovery from resolved names and URLScan
#[derive(Parser, Debug)]
#[command(name = "scout-runtime")]
#[command(about = "Discover subdomains from resolved names and third-party sources")]
struct Args {
    /// Target domain (repeatable)
    #[arg(short, long = "domain", required = true)]
    domains: Vec<String>,

    /// Seconds to keep running after stdin closes
    #[arg(short, long)]
    linger_secs: Option<u64>,

    /// Do not query URLScan
    #[arg(long)]
    no_urlscan: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Load configuration from the environment, then apply flags.
fn load_config(args: &Args) -> RuntimeConfig {
    let mut config = RuntimeConfig::from_env().with_domains(args.domains.iter().cloned());
    if let Some(secs) = args.linger_secs {
        config = config.with_linger(Duration::from_secs(secs));
    }
    if args.no_urlscan {
        config = config.with_urlscan_enabled(false);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if args.json_logs {
        telemetry = telemetry.with_json_logs(true);
    }
    let _guard = init_telemetry(telemetry).context("initializing telemetry")?;

    let config = load_config(&args);
    let linger = config.linger;

    let runtime = ScoutRuntime::new(config).context("building runtime")?;
    let names = runtime.start().context("starting services")?;
    let printer = tokio::spawn(write_names(
        names,
        runtime.shutdown_signal(),
        tokio::io::stdout(),
    ));

    tokio::select! {
        read = runtime.feed_resolved(BufReader::new(tokio::io::stdin())) => {
            let count = read.context("reading stdin")?;
            info!(names = count, linger_secs = linger.as_secs(), "Input closed, lingering");
            tokio::select! {
                _ = tokio::time::sleep(linger) => {}
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    runtime.shutdown();

    let written = printer.await.context("output task panicked")??;
    info!(names = written, "Discovery finished");

    Ok(())
}
