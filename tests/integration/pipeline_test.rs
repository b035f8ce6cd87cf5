// Integration tests for the scrape round: fan-out, fan-in and error barrier

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use grofer::core::system_monitor::aggregator::Emitter;
use grofer::core::system_monitor::{
    default_probes, CpuMetrics, FieldSet, Pipeline, Probe, ProbeContext, SysinfoProvider,
};
use grofer::{GroferError, Record, Result, Sink};
use tokio_util::sync::CancellationToken;

use super::support::{all_field_sets_sorted, RecordingSink, ScriptedProvider};

const HINT: Duration = Duration::from_millis(10);

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_healthy_round_delivers_five_records() {
    let pipeline = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));
    let mut sink = RecordingSink::default();

    let result = pipeline
        .run_round(&CancellationToken::new(), &mut sink, HINT)
        .await;

    assert!(result.is_ok(), "round failed: {:?}", result);
    assert_eq!(sink.records.len(), 5);
    assert_eq!(sink.sorted_field_sets(), all_field_sets_sorted());

    for record in &sink.records {
        match record {
            Record::Cpu(cpu) => assert_eq!(cpu.per_core_usage, vec![12.5, 80.0]),
            Record::Mem(mem) => {
                assert_eq!(mem.total_gb, 16.0);
                assert_eq!(mem.used_gb, 6.0);
                assert_eq!(mem.cached_gb, 3.0);
            }
            Record::Disk(disks) => {
                assert_eq!(disks.len(), 1, "loop device must be filtered");
                assert_eq!(disks[0].mount_point, "/");
                assert_eq!(disks[0].usage_percent, 50.0);
            }
            Record::Net(interfaces) => {
                assert_eq!(interfaces.len(), 1);
                assert_eq!(interfaces[0].bytes_received, 654_321);
            }
            Record::Info(host) => {
                assert_eq!(host.hostname, "integration");
                assert_eq!(host.os_platform, "linux/fedora 40");
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_disk_failure_fails_round() {
    let pipeline =
        Pipeline::with_provider(Arc::new(ScriptedProvider::healthy().failing(FieldSet::Disk)));
    let mut sink = RecordingSink::default();

    let err = pipeline
        .run_round(&CancellationToken::new(), &mut sink, HINT)
        .await
        .unwrap_err();

    match err {
        GroferError::Provider { field_set, .. } => assert_eq!(field_set, FieldSet::Disk),
        other => panic!("expected disk provider error, got {:?}", other),
    }
    assert!(sink
        .records
        .iter()
        .all(|record| record.field_set() != FieldSet::Disk));
    assert!(sink.records.len() <= 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failure_releases_hanging_probes() {
    let provider = ScriptedProvider::healthy()
        .failing(FieldSet::Net)
        .hanging(FieldSet::Cpu)
        .hanging(FieldSet::Mem)
        .hanging(FieldSet::Info);
    let pipeline = Pipeline::with_provider(Arc::new(provider));
    let mut sink = RecordingSink::default();

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        pipeline.run_round(&CancellationToken::new(), &mut sink, HINT),
    )
    .await
    .expect("probes kept running after a sibling failed");

    assert!(matches!(
        result,
        Err(GroferError::Provider {
            field_set: FieldSet::Net,
            ..
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_consecutive_rounds_are_independent() {
    let pipeline = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));
    let root = CancellationToken::new();

    let mut first = RecordingSink::default();
    let mut second = RecordingSink::default();
    pipeline.run_round(&root, &mut first, HINT).await.unwrap();
    pipeline.run_round(&root, &mut second, HINT).await.unwrap();

    assert_eq!(first.sorted_field_sets(), all_field_sets_sorted());
    assert_eq!(second.sorted_field_sets(), all_field_sets_sorted());
    assert!(!root.is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_round_after_failed_round_succeeds() {
    let failing =
        Pipeline::with_provider(Arc::new(ScriptedProvider::healthy().failing(FieldSet::Cpu)));
    let healthy = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));
    let root = CancellationToken::new();

    let mut sink = RecordingSink::default();
    assert!(failing.run_round(&root, &mut sink, HINT).await.is_err());

    let mut sink = RecordingSink::default();
    healthy.run_round(&root, &mut sink, HINT).await.unwrap();
    assert_eq!(sink.records.len(), 5);
}

/// Host collector that panics instead of returning an error.
struct PanickingInfo;

#[async_trait]
impl Probe for PanickingInfo {
    fn field_set(&self) -> FieldSet {
        FieldSet::Info
    }

    async fn probe(&self, _ctx: &ProbeContext, _emitter: &Emitter) -> Result<()> {
        panic!("host collector bug");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panic_releases_hanging_siblings() {
    let provider = Arc::new(ScriptedProvider::healthy().hanging(FieldSet::Cpu));
    let mut probes = default_probes(provider);
    probes[4] = Arc::new(PanickingInfo);
    let pipeline = Pipeline::new(probes);
    let mut sink = RecordingSink::default();

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        pipeline.run_round(&CancellationToken::new(), &mut sink, HINT),
    )
    .await
    .expect("round hung after a panic");

    assert!(matches!(result, Err(GroferError::Task(_))));
}

/// Probe that emits a CPU record and counts completed emits.
struct CountingProbe {
    emitted: Arc<AtomicUsize>,
}

#[async_trait]
impl Probe for CountingProbe {
    fn field_set(&self) -> FieldSet {
        FieldSet::Cpu
    }

    async fn probe(&self, ctx: &ProbeContext, emitter: &Emitter) -> Result<()> {
        emitter
            .emit(&ctx.token, Record::Cpu(CpuMetrics::default()))
            .await?;
        self.emitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Slow sink asserting that producers never run more than one record ahead.
struct BackpressureSink {
    emitted: Arc<AtomicUsize>,
    consumed: usize,
    max_ahead: usize,
}

impl Sink for BackpressureSink {
    fn consume(&mut self, _record: Record) -> Result<()> {
        self.consumed += 1;
        std::thread::sleep(Duration::from_millis(20));
        let ahead = self
            .emitted
            .load(Ordering::SeqCst)
            .saturating_sub(self.consumed);
        self.max_ahead = self.max_ahead.max(ahead);
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_channel_bounds_unconsumed_records() {
    let emitted = Arc::new(AtomicUsize::new(0));
    let probes: Vec<Arc<dyn Probe>> = (0..8)
        .map(|_| {
            Arc::new(CountingProbe {
                emitted: emitted.clone(),
            }) as Arc<dyn Probe>
        })
        .collect();
    let pipeline = Pipeline::new(probes);
    let mut sink = BackpressureSink {
        emitted: emitted.clone(),
        consumed: 0,
        max_ahead: 0,
    };

    pipeline
        .run_round(&CancellationToken::new(), &mut sink, HINT)
        .await
        .unwrap();

    assert_eq!(sink.consumed, 8);
    assert!(
        sink.max_ahead <= 1,
        "{} records were buffered at once",
        sink.max_ahead
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_system_provider_round() {
    let pipeline = Pipeline::with_provider(Arc::new(SysinfoProvider::new()));
    let mut sink = RecordingSink::default();

    pipeline
        .run_round(&CancellationToken::new(), &mut sink, Duration::from_millis(200))
        .await
        .unwrap();

    assert_eq!(sink.sorted_field_sets(), all_field_sets_sorted());
}
