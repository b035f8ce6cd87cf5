//! Fan-out of probes and the error barrier that resolves their results.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{Id, JoinSet};

use super::aggregator::Emitter;
use super::tasks::{Probe, ProbeContext};
use crate::error::{GroferError, Result};

/// Start every probe as its own task and wait until all of them returned.
///
/// Tasks are reaped in completion order and the shared token is cancelled
/// on the first failure or panic, so siblings still in flight stop at their
/// next check point. The emitter passed in is only cloned; the caller keeps
/// ownership of the channel's lifetime.
///
/// Results come back in registration order, one slot per probe.
pub async fn fan_out(
    probes: &[Arc<dyn Probe>],
    ctx: &ProbeContext,
    emitter: &Emitter,
) -> Vec<Result<()>> {
    let mut tasks = JoinSet::new();
    let mut slots: HashMap<Id, usize> = HashMap::with_capacity(probes.len());

    for (index, probe) in probes.iter().enumerate() {
        let probe = Arc::clone(probe);
        let ctx = ctx.clone();
        let emitter = emitter.clone();

        let handle = tasks.spawn(async move { probe.probe(&ctx, &emitter).await });
        slots.insert(handle.id(), index);
    }

    let mut results: Vec<Option<Result<()>>> = probes.iter().map(|_| None).collect();

    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, result)) => (id, result),
            Err(e) => {
                let id = e.id();
                let message = match slots.get(&id) {
                    Some(&index) => {
                        format!("{} probe task failed: {}", probes[index].field_set(), e)
                    }
                    None => format!("probe task failed: {}", e),
                };
                (id, Err(GroferError::task(message)))
            }
        };

        let Some(&index) = slots.get(&id) else {
            continue;
        };
        let field_set = probes[index].field_set();

        if let Err(e) = &result {
            if e.is_cancellation() {
                log::debug!("{} probe stopped: {}", field_set, e);
            } else {
                log::warn!("{} probe failed: {}", field_set, e);
                ctx.token.cancel();
            }
        }
        results[index] = Some(result);
    }

    results
        .into_iter()
        .zip(probes)
        .map(|(slot, probe)| {
            slot.unwrap_or_else(|| {
                Err(GroferError::task(format!(
                    "{} probe task was never joined",
                    probe.field_set()
                )))
            })
        })
        .collect()
}

/// Resolve per-probe results into the round's single outcome.
///
/// The first root-cause error in registration order wins; cancellations only
/// surface when nothing else failed.
pub fn first_error<I>(results: I) -> Result<()>
where
    I: IntoIterator<Item = Result<()>>,
{
    let mut cancellation = None;

    for result in results {
        match result {
            Ok(()) => {}
            Err(e) if e.is_cancellation() => {
                cancellation.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    match cancellation {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
