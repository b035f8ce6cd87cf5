use super::metrics::Record;
use crate::error::Result;

/// Receiver of finished records (console, file export, ...).
///
/// `consume` is called from the round's single consumer, one record at a
/// time, in arrival order. It must not block indefinitely: a stalled sink
/// stalls the whole round.
pub trait Sink: Send {
    fn consume(&mut self, record: Record) -> Result<()>;

    /// Called once after a round delivered its last record.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn consume(&mut self, record: Record) -> Result<()> {
        (**self).consume(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
