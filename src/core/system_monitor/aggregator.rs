//! Fan-in of probe records into a single ordered stream.
//!
//! All probes of a round share one bounded channel with a single slot, so at
//! most one record waits unconsumed while at most one more is being written.
//! The only reader drains records in arrival order and hands each to the sink
//! before taking the next one.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::metrics::Record;
use super::sink::Sink;
use crate::error::{GroferError, Result};

/// Capacity of the round channel.
pub const CHANNEL_CAPACITY: usize = 1;

/// Producer side of the round channel, cloned into every probe task.
#[derive(Debug, Clone)]
pub struct Emitter {
    tx: mpsc::Sender<Record>,
}

/// Create the round channel.
///
/// The channel closes once every `Emitter` clone has been dropped; the driver
/// holds one clone until all probes have returned.
pub fn channel() -> (Emitter, mpsc::Receiver<Record>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    (Emitter { tx }, rx)
}

impl Emitter {
    /// Send a record, waiting for the slot to free up.
    ///
    /// Returns `Cancelled` if the token fires first, or if the consumer has
    /// already stopped reading.
    pub async fn emit(&self, token: &CancellationToken, record: Record) -> Result<()> {
        let field_set = record.field_set();

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(GroferError::Cancelled(field_set)),
            sent = self.tx.send(record) => {
                sent.map_err(|_| GroferError::Cancelled(field_set))
            }
        }
    }
}

/// Drain the channel into the sink until every producer is gone.
///
/// On a sink failure the round token is cancelled so producers blocked on the
/// channel give up, and the sink error is returned.
pub async fn drain<S>(
    mut rx: mpsc::Receiver<Record>,
    sink: &mut S,
    token: &CancellationToken,
) -> Result<usize>
where
    S: Sink + ?Sized,
{
    let mut delivered = 0;

    while let Some(record) = rx.recv().await {
        let field_set = record.field_set();
        if let Err(e) = sink.consume(record) {
            log::error!("Sink rejected {} record: {}", field_set, e);
            token.cancel();
            return Err(e);
        }
        delivered += 1;
        log::trace!("Forwarded {} record to sink", field_set);
    }

    Ok(delivered)
}
