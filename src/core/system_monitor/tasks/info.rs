//! Host identity probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{query, Probe, ProbeContext};
use crate::core::system_monitor::aggregator::Emitter;
use crate::core::system_monitor::metrics::{collect_host, FieldSet, Record};
use crate::core::system_monitor::provider::MetricProvider;
use crate::error::Result;

/// Hostname, process count, OS and kernel identity.
pub struct InfoProbe {
    provider: Arc<dyn MetricProvider>,
}

impl InfoProbe {
    pub fn new(provider: Arc<dyn MetricProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Probe for InfoProbe {
    fn field_set(&self) -> FieldSet {
        FieldSet::Info
    }

    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()> {
        let host = query(FieldSet::Info, ctx, self.provider.host_info()).await?;

        emitter
            .emit(&ctx.token, Record::Info(collect_host(&host)))
            .await
    }
}
