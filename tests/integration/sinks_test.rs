// Integration tests for console and JSON export sinks fed by a full round

use std::sync::Arc;
use std::time::Duration;

use grofer::core::system_monitor::{FieldSet, Pipeline};
use grofer::ui::{ConsoleSink, JsonSink};
use grofer::{Record, Sink};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::support::ScriptedProvider;

const HINT: Duration = Duration::from_millis(10);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_round_exports_json_lines_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("metrics.jsonl");
    let pipeline = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));

    let mut sink = JsonSink::file(&path).unwrap();
    pipeline
        .run_round(&CancellationToken::new(), &mut sink, HINT)
        .await
        .unwrap();
    drop(sink);

    let contents = std::fs::read_to_string(&path).unwrap();
    let records: Vec<Record> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 5);
    let mem = records
        .iter()
        .find(|record| record.field_set() == FieldSet::Mem)
        .expect("MEM record exported");
    match mem {
        Record::Mem(mem) => assert_eq!(mem.total_gb, 16.0),
        other => panic!("unexpected record {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_round_renders_to_console() {
    let pipeline = Pipeline::with_provider(Arc::new(ScriptedProvider::healthy()));

    let mut sink = ConsoleSink::new(Vec::new());
    pipeline
        .run_round(&CancellationToken::new(), &mut sink, HINT)
        .await
        .unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    for field_set in FieldSet::ALL {
        assert!(output.contains(field_set.as_str()), "missing {}", field_set);
    }
    assert!(output.contains("Hostname: integration"));
    assert!(!output.contains("/snap/core22"));
}

#[test]
fn test_json_sink_flush_reaches_writer() {
    let mut sink = JsonSink::new(Vec::new());
    sink.consume(Record::Net(Vec::new())).unwrap();
    sink.flush().unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(output, "{\"field_set\":\"NET\",\"payload\":[]}\n");
}
