//! Network interface probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{query, Probe, ProbeContext};
use crate::core::system_monitor::aggregator::Emitter;
use crate::core::system_monitor::metrics::{collect_network, FieldSet, Record};
use crate::core::system_monitor::provider::MetricProvider;
use crate::error::Result;

/// Reports cumulative byte counters per interface (not rates).
pub struct NetworkProbe {
    provider: Arc<dyn MetricProvider>,
}

impl NetworkProbe {
    pub fn new(provider: Arc<dyn MetricProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Probe for NetworkProbe {
    fn field_set(&self) -> FieldSet {
        FieldSet::Net
    }

    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()> {
        let counters = query(FieldSet::Net, ctx, self.provider.net_io_counters()).await?;

        emitter
            .emit(&ctx.token, Record::Net(collect_network(&counters)))
            .await
    }
}
