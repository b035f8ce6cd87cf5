//! CPU utilization probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{query, Probe, ProbeContext};
use crate::core::system_monitor::aggregator::Emitter;
use crate::core::system_monitor::metrics::{collect_cpu, FieldSet, Record};
use crate::core::system_monitor::provider::MetricProvider;
use crate::error::Result;

/// Samples per-core utilization over the round's scrape interval.
pub struct CpuProbe {
    provider: Arc<dyn MetricProvider>,
}

impl CpuProbe {
    pub fn new(provider: Arc<dyn MetricProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Probe for CpuProbe {
    fn field_set(&self) -> FieldSet {
        FieldSet::Cpu
    }

    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()> {
        let rates = query(
            FieldSet::Cpu,
            ctx,
            self.provider.cpu_percent(ctx.scrape_interval),
        )
        .await?;

        emitter.emit(&ctx.token, Record::Cpu(collect_cpu(rates))).await
    }
}
