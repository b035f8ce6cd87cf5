//! Disk usage probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{query, Probe, ProbeContext};
use crate::core::system_monitor::aggregator::Emitter;
use crate::core::system_monitor::metrics::{collect_disks, FieldSet, Record};
use crate::core::system_monitor::provider::MetricProvider;
use crate::error::Result;

/// Reports usage of every real partition.
///
/// Loop devices and container-runtime storage mounts are dropped before the
/// record is built.
pub struct DiskProbe {
    provider: Arc<dyn MetricProvider>,
}

impl DiskProbe {
    pub fn new(provider: Arc<dyn MetricProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Probe for DiskProbe {
    fn field_set(&self) -> FieldSet {
        FieldSet::Disk
    }

    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()> {
        let partitions = query(FieldSet::Disk, ctx, self.provider.partitions()).await?;

        emitter
            .emit(&ctx.token, Record::Disk(collect_disks(&partitions)))
            .await
    }
}
