//! End-to-end reporting through a `ChannelProducer`.
//!
//! These tests drive a real reporter over the in-process channel and check
//! what a downstream consumer receives, including under concurrent callers
//! and across shutdown.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use faultline_client::{ChannelProducer, CloseContext, Producer, Reporter, ReporterError};
use faultline_types::{EventDecoder, ReportEvent, ReportEventSchema};

fn build(capacity: usize, service: &str) -> (Reporter, faultline_client::OutboundReceiver) {
    let (producer, outbound) = ChannelProducer::new(capacity);
    let producer: Arc<dyn Producer> = Arc::new(producer);
    let reporter = Reporter::new(Some(producer), service).expect("reporter should build");
    (reporter, outbound)
}

#[tokio::test]
async fn reported_error_reaches_consumer_as_expected_record() {
    let (reporter, mut outbound) = build(16, "Bob");

    reporter
        .notify(
            "666",
            "Ricky Ticky Tic Tac",
            &io::Error::other("Flubba Wubba Dub Dub"),
        )
        .await
        .expect("notify should succeed");

    let payload = outbound.recv().await.expect("payload should arrive");
    let event = ReportEventSchema.decode(&payload).expect("payload should decode");
    assert_eq!(
        event,
        ReportEvent {
            instance_id: "666".to_string(),
            event_msg: "Ricky Ticky Tic Tac: Flubba Wubba Dub Dub".to_string(),
            service_name: "Bob".to_string(),
            event_type: "error".to_string(),
        }
    );
    assert!(outbound.try_recv().is_none(), "exactly one record is submitted");
}

#[tokio::test]
async fn concurrent_reporters_deliver_every_event() {
    let (reporter, mut outbound) = build(4, "importer");

    let consumer = tokio::spawn(async move {
        let mut ids = Vec::new();
        while let Some(payload) = outbound.recv().await {
            let event = ReportEventSchema.decode(&payload).expect("decode");
            ids.push(event.instance_id);
        }
        ids
    });

    let mut handles = Vec::new();
    for i in 0..50 {
        let reporter = reporter.clone();
        handles.push(tokio::spawn(async move {
            let err = io::Error::new(io::ErrorKind::InvalidData, format!("row {i} malformed"));
            reporter
                .notify(&format!("instance-{i}"), "validating rows", &err)
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task should not panic")
            .expect("notify should succeed");
    }

    reporter
        .close(Some(CloseContext::with_timeout(Duration::from_secs(5))))
        .await
        .expect("close should drain");

    let ids = consumer.await.expect("consumer should not panic");
    assert_eq!(ids.len(), 50);
    let unique: HashSet<_> = ids.into_iter().collect();
    assert_eq!(unique.len(), 50);
}

#[tokio::test]
async fn per_task_order_is_preserved_under_concurrency() {
    let (reporter, mut outbound) = build(2, "importer");

    let consumer = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(payload) = outbound.recv().await {
            events.push(ReportEventSchema.decode(&payload).expect("decode"));
        }
        events
    });

    let mut handles = Vec::new();
    for task in 0..4 {
        let reporter = reporter.clone();
        handles.push(tokio::spawn(async move {
            for seq in 0..10 {
                let err = io::Error::other(format!("{seq}"));
                reporter
                    .notify(&format!("task-{task}"), "step", &err)
                    .await
                    .expect("notify should succeed");
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task should not panic");
    }
    reporter.close(None).await.expect("close should drain");

    let events = consumer.await.expect("consumer should not panic");
    for task in 0..4 {
        let id = format!("task-{task}");
        let seqs: Vec<String> = events
            .iter()
            .filter(|e| e.instance_id == id)
            .map(|e| e.event_msg.clone())
            .collect();
        let expected: Vec<String> = (0..10).map(|seq| format!("step: {seq}")).collect();
        assert_eq!(seqs, expected, "events for {id} should keep call order");
    }
}

#[tokio::test]
async fn notify_after_close_is_rejected() {
    let (reporter, outbound) = build(4, "importer");
    drop(outbound);

    reporter.close(None).await.expect("close should succeed");

    let result = reporter
        .notify("late", "after shutdown", &io::Error::other("x"))
        .await;
    assert!(matches!(result, Err(ReporterError::ChannelClosed)));
}

#[tokio::test(start_paused = true)]
async fn close_times_out_when_nothing_drains() {
    let (reporter, _outbound) = build(4, "importer");
    reporter
        .notify("stuck", "queued", &io::Error::other("x"))
        .await
        .expect("notify should succeed");

    let result = reporter
        .close(Some(CloseContext::with_timeout(Duration::from_secs(2))))
        .await;

    assert!(matches!(result, Err(ReporterError::Timeout(d)) if d == Duration::from_secs(2)));
}

#[tokio::test]
async fn validation_failures_leave_the_channel_untouched() {
    let (reporter, mut outbound) = build(4, "importer");
    let err = io::Error::other("x");

    assert!(reporter.notify("", "ctx", &err).await.is_err());
    assert!(reporter.notify("id", "", &err).await.is_err());

    assert!(outbound.try_recv().is_none());
}
