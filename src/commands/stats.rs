//! Stats command handler.
//!
//! Runs scrape rounds against the local machine and forwards the records to
//! the console, to stdout as JSON lines, or to a JSON export file.

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use crate::core::system_monitor::{build_runtime, Pipeline, Sink};
use crate::core::Config;
use crate::ui::{ConsoleSink, JsonSink};

/// How long shutdown waits for blocking sysinfo queries left behind by a
/// cancelled round.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Execute the stats command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(refresh) = matches.get_one::<u64>("refresh") {
        config.set_refresh_ms(*refresh)?;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout_ms = Some(*timeout);
    }

    let watch = matches.get_flag("watch");

    let mut sink: Box<dyn Sink> = match matches.get_one::<PathBuf>("output") {
        Some(path) => Box::new(
            JsonSink::file(path)
                .with_context(|| format!("Failed to open export file: {:?}", path))?,
        ),
        None if matches.get_flag("json") => Box::new(JsonSink::stdout()),
        None => Box::new(ConsoleSink::stdout()),
    };

    let root = CancellationToken::new();
    if watch {
        let interrupt = root.clone();
        ctrlc::set_handler(move || {
            eprintln!();
            eprintln!("{}", "Stopping...".yellow().bold());
            interrupt.cancel();
        })
        .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;
    }

    let runtime = build_runtime().context("Failed to start metrics runtime")?;
    let pipeline = Pipeline::system();

    block_on_rounds(
        runtime,
        run_rounds(&pipeline, &root, sink.as_mut(), &config, watch),
    )
}

/// Drive `rounds` to completion, then stop the runtime.
///
/// A deadline abandons in-flight provider queries, but their blocking threads
/// keep running; the runtime is not allowed to wait on them past the grace.
fn block_on_rounds<F>(runtime: tokio::runtime::Runtime, rounds: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let outcome = runtime.block_on(rounds);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    outcome
}

/// Run one round, or keep running rounds every refresh period when watching.
///
/// A round cut short by the user's interrupt ends the loop without an error.
pub async fn run_rounds(
    pipeline: &Pipeline,
    root: &CancellationToken,
    sink: &mut dyn Sink,
    config: &Config,
    watch: bool,
) -> Result<()> {
    loop {
        let started = Instant::now();

        let outcome = match config.round_timeout() {
            Some(deadline) => {
                pipeline
                    .run_round_with_deadline(root, &mut *sink, config.scrape_interval(), deadline)
                    .await
            }
            None => {
                pipeline
                    .run_round(root, &mut *sink, config.scrape_interval())
                    .await
            }
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_cancellation() && root.is_cancelled() => return Ok(()),
            Err(e) => return Err(e).context("Scrape round failed"),
        }

        if !watch {
            return Ok(());
        }

        let remaining = config.refresh_interval().saturating_sub(started.elapsed());
        tokio::select! {
            _ = root.cancelled() => return Ok(()),
            _ = tokio::time::sleep(remaining) => {}
        }
    }
}
