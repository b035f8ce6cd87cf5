//! Memory probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{query, Probe, ProbeContext};
use crate::core::system_monitor::aggregator::Emitter;
use crate::core::system_monitor::metrics::{collect_memory, FieldSet, Record};
use crate::core::system_monitor::provider::MetricProvider;
use crate::error::Result;

pub struct MemoryProbe {
    provider: Arc<dyn MetricProvider>,
}

impl MemoryProbe {
    pub fn new(provider: Arc<dyn MetricProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Probe for MemoryProbe {
    fn field_set(&self) -> FieldSet {
        FieldSet::Mem
    }

    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()> {
        let snapshot = query(FieldSet::Mem, ctx, self.provider.memory()).await?;

        emitter
            .emit(&ctx.token, Record::Mem(collect_memory(&snapshot)))
            .await
    }
}
