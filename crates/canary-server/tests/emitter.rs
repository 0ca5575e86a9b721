#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use canary_server::config::{EmitterSection, Variant};
use canary_server::emitter::{Emitter, EmitterSettings, TickReport};

use common::{FixedPlacement, RecordingSink};

fn section(variant: Variant) -> EmitterSection {
    EmitterSection {
        variant,
        ..EmitterSection::default()
    }
}

fn value_of(w: &common::Write) -> f64 {
    w.req.time_series[0].points[0].value.double_value
}

#[test]
fn hostname_mismatch_fails_before_any_sample() {
    for variant in [Variant::Canary, Variant::Fleet] {
        let err = EmitterSettings::from_config(&section(variant), Some("localhost")).expect_err("must fail");
        assert_eq!(err.code().as_str(), "HOSTNAME_MISMATCH");

        let err = EmitterSettings::from_config(&section(variant), None).expect_err("must fail");
        assert_eq!(err.code().as_str(), "HOSTNAME_MISMATCH");
    }
}

#[test]
fn staging_ignores_hostname() {
    let s = EmitterSettings::from_config(&section(Variant::Staging), Some("localhost")).unwrap();
    assert_eq!(s.project, "projects/qcon-2017-workshop");
    assert_eq!(s.metric_types.len(), 1);
    assert!(s.scheme.server_group().is_none());
}

#[tokio::test]
async fn staging_tick_writes_one_labeled_point() {
    let settings = EmitterSettings::from_config(&section(Variant::Staging), None).unwrap();
    let sink = Arc::new(RecordingSink::ok());
    let mut emitter = Emitter::new(settings, sink.clone(), Arc::new(FixedPlacement::known())).with_seed(1);

    assert_eq!(emitter.tick().await, TickReport { sent: 1, failed: 0 });

    let writes = sink.writes();
    assert_eq!(writes.len(), 1);
    let w = &writes[0];
    assert_eq!(w.project, "projects/qcon-2017-workshop");

    let ts = &w.req.time_series[0];
    assert_eq!(ts.metric.metric_type, "custom.googleapis.com/workshop/canary/request/errors");
    assert_eq!(ts.metric.labels.get("environment").map(String::as_str), Some("STAGING"));
    assert_eq!(ts.resource.resource_type, "gce_instance");
    assert_eq!(ts.resource.labels["instance_id"], "1234567890");
    assert_eq!(ts.resource.labels["zone"], "us-central1-a");

    let point = &ts.points[0];
    assert_eq!(point.interval.start_time, point.interval.end_time);
    assert!((0.0..0.1).contains(&point.value.double_value));
}

#[tokio::test]
async fn fleet_tick_writes_each_metric_separately() {
    let settings = EmitterSettings::from_config(&section(Variant::Fleet), Some("canary-v3-xyz123")).unwrap();
    let sink = Arc::new(RecordingSink::ok());
    let mut emitter = Emitter::new(settings, sink.clone(), Arc::new(FixedPlacement::unknown())).with_seed(2);

    for _ in 0..50 {
        emitter.tick().await;
    }

    let writes = sink.writes();
    assert_eq!(writes.len(), 150);
    for w in &writes {
        assert_eq!(w.req.time_series.len(), 1);
        let ts = &w.req.time_series[0];
        assert_eq!(ts.points.len(), 1);
        assert_eq!(ts.metric.labels["cluster"], "canary");
        assert_eq!(ts.metric.labels["servergroup"], "canary-v3");
        assert_eq!(ts.resource.labels["instance_id"], "unknown");
        assert_eq!(ts.resource.labels["zone"], "unknown");

        let v = value_of(w);
        if ts.metric.metric_type.contains("errors") {
            assert!((0.0..0.1).contains(&v), "flat error value {v}");
        } else {
            assert!((0.0..0.5).contains(&v), "aux value {v}");
        }
    }

    let order: Vec<_> = writes[..3].iter().map(|w| w.req.time_series[0].metric.metric_type.clone()).collect();
    assert!(order[0].ends_with("/errors"));
    assert!(order[1].ends_with("/random1"));
    assert!(order[2].ends_with("/random2"));
}

#[tokio::test]
async fn canary_errors_are_biased_against_non_baseline() {
    let collect = |host: &'static str| async move {
        let settings = EmitterSettings::from_config(&section(Variant::Canary), Some(host)).unwrap();
        let sink = Arc::new(RecordingSink::ok());
        let mut emitter = Emitter::new(settings, sink.clone(), Arc::new(FixedPlacement::known())).with_seed(3);
        for _ in 0..200 {
            emitter.tick().await;
        }
        sink.writes()
            .iter()
            .filter(|w| w.req.time_series[0].metric.metric_type.contains("errors"))
            .map(value_of)
            .collect::<Vec<_>>()
    };

    let baseline = collect("web-baseline-v1-a1").await;
    assert_eq!(baseline.len(), 200);
    assert!(baseline.iter().all(|v| (0.0..0.1).contains(v)));

    let canary = collect("web-canary-v2-b2").await;
    assert!(canary.iter().all(|v| (0.0..2.0).contains(v)));
    assert!(canary.iter().any(|v| *v >= 0.1));
}

#[tokio::test]
async fn failed_upload_is_counted_not_fatal() {
    let settings = EmitterSettings::from_config(&section(Variant::Fleet), Some("canary-v3-xyz123")).unwrap();
    let sink = Arc::new(RecordingSink::failing());
    let mut emitter = Emitter::new(settings, sink.clone(), Arc::new(FixedPlacement::known()));

    assert_eq!(emitter.tick().await, TickReport { sent: 0, failed: 3 });
    assert_eq!(emitter.tick().await, TickReport { sent: 0, failed: 3 });
    assert_eq!(sink.writes().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn failing_upload_waits_full_interval() {
    let settings = EmitterSettings::from_config(&section(Variant::Staging), None).unwrap();
    let interval = settings.interval;
    assert_eq!(interval, Duration::from_secs(60));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = Arc::new(RecordingSink::failing().notifying(tx));
    let cancel = CancellationToken::new();
    let handle = Emitter::new(settings, sink, Arc::new(FixedPlacement::known())).spawn(cancel.clone());

    let mut stamps = Vec::new();
    for _ in 0..3 {
        stamps.push(rx.recv().await.expect("emitter stopped early"));
    }
    cancel.cancel();
    handle.await.unwrap();

    for pair in stamps.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= interval, "next tick fired after {gap:?}");
        assert!(gap < interval + Duration::from_secs(1), "next tick fired after {gap:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_never_ticks() {
    let settings = EmitterSettings::from_config(&section(Variant::Staging), None).unwrap();
    let sink = Arc::new(RecordingSink::ok());
    let cancel = CancellationToken::new();
    cancel.cancel();

    Emitter::new(settings, sink.clone(), Arc::new(FixedPlacement::known()))
        .run(cancel)
        .await;

    assert!(sink.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_the_wait() {
    let settings = EmitterSettings::from_config(&section(Variant::Staging), None).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = Arc::new(RecordingSink::ok().notifying(tx));
    let cancel = CancellationToken::new();
    let handle = Emitter::new(settings, sink.clone(), Arc::new(FixedPlacement::known())).spawn(cancel.clone());

    rx.recv().await.expect("first tick");
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(sink.writes().len(), 1);
}
