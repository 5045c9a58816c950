//! Integration tests for upornot.
//!
//! These tests drive the classifier, the CLI glue and the HTTP fetcher
//! through the public API.

use upornot::cli::{CliApp, CliConfig, OutputFormat, OutputFormatter, ReportStatus, StatusReport};
use upornot::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════════
// TEST HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Record shaped like the server's default 60/120/slower histogram
fn sample_record(total: u64, ok: u64, avg_ms: f64, counts: [u64; 3]) -> TelemetryRecord {
    TelemetryRecord::new(total, ok, avg_ms).with_buckets(vec![
        LatencyBucket::bounded(60.0, counts[0]),
        LatencyBucket::bounded(120.0, counts[1]),
        LatencyBucket::slower(counts[2]),
    ])
}

const SERVER_BODY: &str = r#"{
    "count": 50,
    "ok": 48,
    "avg_ms": 23.5,
    "buckets": [
        {"max_ms": 60, "count": 40},
        {"max_ms": 120, "count": 6},
        {"count": 2}
    ]
}"#;

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFIER TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_server_body_end_to_end() {
    let record = TelemetryRecord::from_json(SERVER_BODY).unwrap();
    assert!(record.validate().is_ok());

    let (verdict, detail) = classify(&record).unwrap().into_parts();
    // 50 / 2 = 25, not lossy; weighted 40 + 3 = 43 >= 33
    assert_eq!(verdict, Verdict::Green);
    assert_eq!(verdict.to_string(), "🟢");
    assert_eq!(
        detail.lines(),
        &[
            "ok: 48/50",
            "avg: 23.5 ms",
            "60 ms: 40",
            "120 ms: 6",
            "slower: 2"
        ]
    );
}

#[test]
fn test_offline_server_body_renders_whole_average() {
    let body = r#"{"count":50,"avg_ms":0,"ok":0,"buckets":[{"max_ms":60,"count":0},
        {"max_ms":100,"count":0},{"max_ms":200,"count":0},{"max_ms":1000,"count":0},{"count":0}]}"#;
    let record = TelemetryRecord::from_json(body).unwrap();

    let app = CliApp::new(CliConfig::default()).unwrap();
    let report = app.classify_record(&record).unwrap();
    assert_eq!(
        app.output().render(&report),
        "🔴 offline\n---\nok: 0/50\navg: 0 ms\n60 ms: 0\n100 ms: 0\n200 ms: 0\n1000 ms: 0\nslower: 0"
    );
}

#[test]
fn test_rule_order_over_one_window() {
    // offline wins even with nonsense elsewhere
    let offline = sample_record(50, 0, 900.0, [0, 0, 0]);
    assert_eq!(score(&offline).unwrap(), Verdict::Red("offline".into()));

    // 50 / 30 = 1
    let red = sample_record(50, 20, 900.0, [0, 0, 20]);
    assert_eq!(score(&red).unwrap(), Verdict::Red("lossy".into()));

    // 50 / 4 = 12, loss beats lag
    let yellow = sample_record(50, 46, 900.0, [0, 0, 46]);
    assert_eq!(score(&yellow).unwrap(), Verdict::Yellow("lossy".into()));

    // 50 / 3 = 16, not lossy; lag beats slowness
    let laggy = sample_record(50, 47, 100.4, [0, 0, 47]);
    assert_eq!(score(&laggy).unwrap(), Verdict::Yellow("laggy 100ms".into()));

    // weighted 10 + 20 / 2 = 20 < 33
    let slow = sample_record(50, 50, 80.0, [10, 20, 20]);
    assert_eq!(score(&slow).unwrap(), Verdict::Yellow("slow (20/33)".into()));
}

#[test]
fn test_exact_laggy_threshold_is_not_laggy() {
    let record = sample_record(50, 50, 100.0, [50, 0, 0]);
    assert_eq!(score(&record).unwrap(), Verdict::Green);
}

#[test]
fn test_malformed_records_are_rejected() {
    let too_many_ok = sample_record(10, 11, 10.0, [11, 0, 0]);
    let err = classify(&too_many_ok).unwrap_err();
    assert_eq!(err, Error::OkExceedsTotal { ok: 11, total: 10 });
    assert!(err.is_malformed_telemetry());

    let one_bucket =
        TelemetryRecord::new(10, 10, 10.0).with_buckets(vec![LatencyBucket::slower(10)]);
    assert!(matches!(
        classify(&one_bucket),
        Err(Error::InsufficientBuckets { got: 1, need: 2 })
    ));

    // summarize still renders what it was given
    assert_eq!(summarize(&one_bucket).len(), 3);
}

#[test]
fn test_custom_thresholds() {
    let classifier = HealthClassifier::new(ClassifierConfig {
        yellow_loss_ratio: 100,
        ..Default::default()
    })
    .unwrap();

    // 50 / 2 = 25, lossy only under the stricter threshold
    let record = sample_record(50, 48, 20.0, [48, 0, 0]);
    assert_eq!(score(&record).unwrap(), Verdict::Green);
    assert_eq!(
        classifier.score(&record).unwrap(),
        Verdict::Yellow("lossy".into())
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLI TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_classifies_and_renders() {
    let app = CliApp::new(CliConfig::default()).unwrap();
    let record = sample_record(50, 50, 150.0, [10, 40, 0]);

    let report = app.classify_record(&record).unwrap();
    assert_eq!(
        app.output().render(&report),
        "🟡 laggy 150ms\n---\nok: 50/50\navg: 150 ms\n60 ms: 10\n120 ms: 40\nslower: 0"
    );
}

#[test]
fn test_cli_json_output() {
    let mut config = CliConfig::default();
    config.format = OutputFormat::Json;
    config.glyphs = false;
    let app = CliApp::new(config).unwrap();

    let report = app.report(ProbeOutcome::Unknown("503".into()));
    let json: serde_json::Value = serde_json::from_str(&app.output().render(&report)).unwrap();

    assert_eq!(json["status"], "unknown");
    assert_eq!(json["line"], "unknown");
    assert_eq!(json["detail"][0], "503");
}

#[test]
fn test_config_file_feeds_the_app() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"url": "http://probe.lan/api/target/1.1.1.1", "thresholds": {"laggy_avg_ms": 20.0}}"#,
    )
    .unwrap();

    let config = CliConfig::load(&path).unwrap();
    assert_eq!(config.url, "http://probe.lan/api/target/1.1.1.1");
    assert_eq!(config.timeout_ms, 5_000);

    let app = CliApp::new(config).unwrap();
    let report = app
        .classify_record(&sample_record(50, 50, 25.0, [50, 0, 0]))
        .unwrap();
    assert_eq!(report.status, ReportStatus::Yellow);
    assert_eq!(report.label.as_deref(), Some("laggy 25ms"));
}

#[test]
fn test_unknown_report_renders_reason() {
    let formatter = OutputFormatter::default();
    let report = StatusReport::unknown("Connection error: connection refused");
    assert_eq!(
        formatter.render(&report),
        "❓\n---\nConnection error: connection refused"
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTY TESTS
// ═══════════════════════════════════════════════════════════════════════════════

mod properties {
    use proptest::prelude::*;
    use upornot::prelude::*;

    fn arb_record() -> impl Strategy<Value = TelemetryRecord> {
        (
            0u64..1_000,
            0u64..1_000,
            0.0f64..1_000.0,
            prop::collection::vec(0u64..500, 0..6),
        )
            .prop_map(|(total, ok, avg, counts)| {
                let last = counts.len().saturating_sub(1);
                let buckets = counts
                    .iter()
                    .enumerate()
                    .map(|(i, &count)| {
                        if i == last {
                            LatencyBucket::slower(count)
                        } else {
                            LatencyBucket::bounded(60.0 * (i as f64 + 1.0), count)
                        }
                    })
                    .collect();
                TelemetryRecord::new(total, ok, avg).with_buckets(buckets)
            })
    }

    proptest! {
        #[test]
        fn offline_whenever_nothing_came_back(mut record in arb_record()) {
            record.ok_count = 0;
            prop_assert_eq!(score(&record).unwrap(), Verdict::Red("offline".into()));
        }

        #[test]
        fn classification_is_deterministic(record in arb_record()) {
            prop_assert_eq!(classify(&record), classify(&record));
        }

        #[test]
        fn detail_has_one_line_per_bucket(record in arb_record()) {
            prop_assert_eq!(summarize(&record).len(), 2 + record.latency_buckets.len());
        }

        #[test]
        fn rejected_records_are_malformed(record in arb_record()) {
            if let Err(e) = classify(&record) {
                prop_assert!(e.is_malformed_telemetry());
                prop_assert!(record.ok_count > record.total_count || record.latency_buckets.len() < 2);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP FETCHER TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "client")]
mod fetcher {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use upornot::prelude::*;
    use upornot::probe::HttpFetcherConfig;

    use super::SERVER_BODY;

    /// Serve one canned HTTP response; the raw request comes back on the channel
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (addr.to_string(), rx)
    }

    fn fetcher() -> HttpProbeFetcher {
        HttpProbeFetcher::new(HttpFetcherConfig {
            connect_timeout_ms: 1_000,
            timeout_ms: 2_000,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_record() {
        let (addr, request) = serve_once("200 OK", SERVER_BODY).await;
        let target = ProbeTarget::new(format!("http://{}/api/target/8.8.8.8", addr)).unwrap();

        let record = match fetcher().fetch(&target).await {
            ProbeOutcome::Telemetry(record) => record,
            other => panic!("expected telemetry, got {:?}", other),
        };
        assert_eq!(record.total_count, 50);
        assert_eq!(record.ok_count, 48);
        assert!(record.latency_buckets[2].is_unbounded());

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /api/target/8.8.8.8 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_error_status_is_unknown() {
        let (addr, _request) = serve_once("503 Service Unavailable", "").await;
        let target = ProbeTarget::new(format!("http://{}/api/target/8.8.8.8", addr)).unwrap();

        assert_eq!(
            fetcher().fetch(&target).await,
            ProbeOutcome::Unknown("503".into())
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_unknown() {
        let (addr, _request) = serve_once("200 OK", "{\"count\": \"lots\"}").await;
        let target = ProbeTarget::new(format!("http://{}/api/target/8.8.8.8", addr)).unwrap();

        let err = fetcher().fetch_record(&target).await.unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_connection_refused_is_unknown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let target = ProbeTarget::new(format!("http://{}/api/target/8.8.8.8", addr)).unwrap();
        let err = fetcher().fetch_record(&target).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(!fetcher().fetch(&target).await.is_telemetry());
    }

    #[tokio::test]
    async fn test_addr_override_keeps_host_header() {
        let (addr, request) = serve_once("200 OK", SERVER_BODY).await;
        let target = ProbeTarget::new("http://probe.invalid/api/target/8.8.8.8")
            .unwrap()
            .with_addr_override(Some(&addr))
            .unwrap();

        assert!(fetcher().fetch(&target).await.is_telemetry());

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/target/8.8.8.8 http/1.1"));
        assert!(request.contains("host: probe.invalid\r\n"));
    }

    #[tokio::test]
    async fn test_addr_override_host_header_without_userinfo() {
        let (addr, request) = serve_once("200 OK", SERVER_BODY).await;
        let target = ProbeTarget::new("http://watcher@probe.invalid:8080/api/target/8.8.8.8")
            .unwrap()
            .with_addr_override(Some(&addr))
            .unwrap();

        assert!(fetcher().fetch(&target).await.is_telemetry());

        let request = request.await.unwrap().to_lowercase();
        assert!(request.contains("host: probe.invalid:8080\r\n"));
        assert!(!request.contains("host: watcher@"));
    }

    #[test]
    fn test_https_with_addr_override_is_a_config_error() {
        let mut config = upornot::cli::CliConfig::new("https://probe.invalid/api/target/8.8.8.8".into());
        config.addr = Some("127.0.0.1:443".into());
        assert!(upornot::cli::CliApp::new(config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_targets() {
        let (addr, request) = serve_once(
            "200 OK",
            r#"{"targets":["/api/target/8.8.8.8","/api/target/1.1.1.1"]}"#,
        )
        .await;
        let target = ProbeTarget::new(format!("http://{}/api/target/8.8.8.8", addr)).unwrap();

        let targets = fetcher().fetch_targets(&target).await.unwrap();
        assert_eq!(targets, vec!["/api/target/8.8.8.8", "/api/target/1.1.1.1"]);
        assert!(request.await.unwrap().starts_with("GET /api/targets HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_targets_null_listing() {
        let (addr, _request) = serve_once("200 OK", r#"{"targets":null}"#).await;
        let target = ProbeTarget::new(format!("http://{}/", addr)).unwrap();

        assert!(fetcher().fetch_targets(&target).await.unwrap().is_empty());
    }
}
