//! Metric probes.
//!
//! Each probe samples exactly one metric class per round: one provider query,
//! one emit attempt, no retry. Probes check the round's cancellation token at
//! both suspension points (provider query and emit) and bail out with
//! [`GroferError::Cancelled`] as soon as it fires.

mod cpu;
mod disks;
mod info;
mod memory;
mod network;

pub use cpu::CpuProbe;
pub use disks::DiskProbe;
pub use info::InfoProbe;
pub use memory::MemoryProbe;
pub use network::NetworkProbe;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::aggregator::Emitter;
use super::metrics::FieldSet;
use super::provider::MetricProvider;
use crate::error::{GroferError, Result};

/// Per-round inputs shared by every probe.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    /// Cancelled when any branch of the round fails, or when the caller aborts
    pub token: CancellationToken,
    /// Sampling window hint for rate-based metrics
    pub scrape_interval: Duration,
}

/// A unit of work that samples one metric class.
#[async_trait]
pub trait Probe: Send + Sync {
    fn field_set(&self) -> FieldSet;

    /// Query the provider once and emit the resulting record.
    ///
    /// Provider errors are returned unmodified. A cancelled round yields
    /// `GroferError::Cancelled(self.field_set())`.
    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()>;
}

/// The fixed probe set, in registration order CPU, MEM, DISK, NET, INFO.
pub fn default_probes(provider: Arc<dyn MetricProvider>) -> Vec<Arc<dyn Probe>> {
    vec![
        Arc::new(CpuProbe::new(provider.clone())),
        Arc::new(MemoryProbe::new(provider.clone())),
        Arc::new(DiskProbe::new(provider.clone())),
        Arc::new(NetworkProbe::new(provider.clone())),
        Arc::new(InfoProbe::new(provider)),
    ]
}

/// Await a provider query unless the round is cancelled first.
///
/// Dropping the query future is how an in-flight provider call is abandoned.
pub(crate) async fn query<T, F>(field_set: FieldSet, ctx: &ProbeContext, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = ctx.token.cancelled() => Err(GroferError::Cancelled(field_set)),
        result = request => result,
    }
}
