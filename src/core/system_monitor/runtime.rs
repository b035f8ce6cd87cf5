//! Pipeline driver and the Tokio runtime it runs on.
//!
//! A round goes Idle -> Running -> Completed. `Round::start` builds a fresh
//! cancellation token and channel (Idle), `Round::run` consumes the round while
//! probes and the consumer execute (Running), and its return value is the
//! round's terminal outcome (Completed). Nothing outlives the call, so running
//! another round always starts from scratch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::aggregator::{self, Emitter};
use super::collector::SysinfoProvider;
use super::metrics::Record;
use super::provider::MetricProvider;
use super::scheduler;
use super::sink::Sink;
use super::tasks::{default_probes, Probe, ProbeContext};
use crate::error::{GroferError, Result};

/// Build the multi-threaded runtime the pipeline runs on.
pub fn build_runtime() -> Result<tokio::runtime::Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .thread_name("metrics-worker")
        .build()?;
    Ok(runtime)
}

/// Runs scrape rounds over a fixed set of probes.
pub struct Pipeline {
    probes: Vec<Arc<dyn Probe>>,
}

impl Pipeline {
    pub fn new(probes: Vec<Arc<dyn Probe>>) -> Self {
        Self { probes }
    }

    /// Pipeline over the standard five probes backed by `provider`.
    pub fn with_provider(provider: Arc<dyn MetricProvider>) -> Self {
        Self::new(default_probes(provider))
    }

    /// Pipeline reading the local machine through sysinfo.
    pub fn system() -> Self {
        Self::with_provider(Arc::new(SysinfoProvider::new()))
    }

    pub fn probes(&self) -> &[Arc<dyn Probe>] {
        &self.probes
    }

    /// Run exactly one round, forwarding every record to `sink`.
    ///
    /// Cancelling `parent` aborts the round; a failing round never cancels
    /// `parent`. `scrape_interval` is only a sampling hint for rate metrics.
    pub async fn run_round<S>(
        &self,
        parent: &CancellationToken,
        sink: &mut S,
        scrape_interval: Duration,
    ) -> Result<()>
    where
        S: Sink + ?Sized,
    {
        Round::start(parent)
            .run(&self.probes, sink, scrape_interval)
            .await
    }

    /// Run one round that is cancelled once `deadline` elapses.
    ///
    /// Probes stopped by the deadline surface as `DeadlineExceeded`; a
    /// provider or sink failure that happened first is still reported as is.
    pub async fn run_round_with_deadline<S>(
        &self,
        parent: &CancellationToken,
        sink: &mut S,
        scrape_interval: Duration,
        deadline: Duration,
    ) -> Result<()>
    where
        S: Sink + ?Sized,
    {
        let scope = parent.child_token();
        let round = self.run_round(&scope, sink, scrape_interval);
        tokio::pin!(round);

        tokio::select! {
            result = &mut round => result,
            _ = tokio::time::sleep(deadline) => {
                log::debug!("Round deadline of {:?} reached, cancelling", deadline);
                scope.cancel();
                match round.await {
                    Err(e) if e.is_cancellation() && !parent.is_cancelled() => {
                        Err(GroferError::DeadlineExceeded(deadline))
                    }
                    other => other,
                }
            }
        }
    }
}

/// State owned by one round: its token and both ends of its channel.
struct Round {
    token: CancellationToken,
    emitter: Emitter,
    rx: mpsc::Receiver<Record>,
}

impl Round {
    fn start(parent: &CancellationToken) -> Self {
        let (emitter, rx) = aggregator::channel();
        Self {
            token: parent.child_token(),
            emitter,
            rx,
        }
    }

    async fn run<S>(
        self,
        probes: &[Arc<dyn Probe>],
        sink: &mut S,
        scrape_interval: Duration,
    ) -> Result<()>
    where
        S: Sink + ?Sized,
    {
        let Round { token, emitter, rx } = self;
        let started = Instant::now();
        log::debug!("Starting round with {} probes", probes.len());

        let ctx = ProbeContext {
            token: token.clone(),
            scrape_interval,
        };

        let producers = async {
            let emitter = emitter;
            let results = scheduler::fan_out(probes, &ctx, &emitter).await;
            // Every probe has returned; dropping the last sender closes the channel
            drop(emitter);
            results
        };
        let consumer = aggregator::drain(rx, &mut *sink, &token);

        let (results, drained) = tokio::join!(producers, consumer);

        let outcome = match (scheduler::first_error(results), drained) {
            (Err(e), _) if !e.is_cancellation() => Err(e),
            (_, Err(e)) => Err(e),
            (Err(e), Ok(_)) => Err(e),
            (Ok(()), Ok(delivered)) => {
                log::debug!(
                    "Round delivered {} records in {:?}",
                    delivered,
                    started.elapsed()
                );
                sink.flush()
            }
        };

        // Release the round's token; the parent is unaffected
        token.cancel();

        if let Err(e) = &outcome {
            log::debug!("Round failed after {:?}: {}", started.elapsed(), e);
        }
        outcome
    }
}
