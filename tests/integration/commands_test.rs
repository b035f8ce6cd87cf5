// Integration tests for the stats command loop

use std::sync::Arc;
use std::time::Duration;

use grofer::commands::stats::run_rounds;
use grofer::core::system_monitor::{FieldSet, Pipeline};
use grofer::Config;
use tokio_util::sync::CancellationToken;

use super::support::{RecordingSink, ScriptedProvider};

fn fast_config() -> Config {
    Config {
        refresh_ms: 1000,
        timeout_ms: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_shot_runs_one_round() {
    let pipeline = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));
    let mut sink = RecordingSink::default();

    run_rounds(
        &pipeline,
        &CancellationToken::new(),
        &mut sink,
        &fast_config(),
        false,
    )
    .await
    .unwrap();

    assert_eq!(sink.records.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watch_stops_cleanly_on_interrupt() {
    let pipeline = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));
    let mut sink = RecordingSink::default();
    let root = CancellationToken::new();

    let interrupt = root.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        interrupt.cancel();
    });

    tokio::time::timeout(
        Duration::from_secs(5),
        run_rounds(&pipeline, &root, &mut sink, &fast_config(), true),
    )
    .await
    .expect("watch loop ignored the interrupt")
    .unwrap();

    // The first round completes well before the interrupt
    assert!(sink.records.len() >= 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_round_is_reported() {
    let pipeline =
        Pipeline::with_provider(Arc::new(ScriptedProvider::healthy().failing(FieldSet::Info)));
    let mut sink = RecordingSink::default();

    let err = run_rounds(
        &pipeline,
        &CancellationToken::new(),
        &mut sink,
        &fast_config(),
        true,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Scrape round failed"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_round_timeout_is_reported() {
    let pipeline =
        Pipeline::with_provider(Arc::new(ScriptedProvider::healthy().hanging(FieldSet::Cpu)));
    let mut sink = RecordingSink::default();
    let config = Config {
        refresh_ms: 1000,
        timeout_ms: Some(50),
    };

    let err = run_rounds(
        &pipeline,
        &CancellationToken::new(),
        &mut sink,
        &config,
        false,
    )
    .await
    .unwrap_err();

    let cause = err
        .downcast_ref::<grofer::GroferError>()
        .expect("round error preserved");
    assert!(matches!(cause, grofer::GroferError::DeadlineExceeded(_)));
}
