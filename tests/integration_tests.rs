//! Apexcore Integration Tests
//!
//! End-to-end scenarios across the public API:
//! - Admission: ceilings, window sliding, client isolation, quota headers
//! - Telemetry: full request lifecycle, history bounds, aggregate report

use std::sync::Arc;
use std::time::Duration;

use apexcore::admission::{headers as quota_headers, AdmissionConfig, AdmissionController};
use apexcore::clock::ManualClock;
use apexcore::report::OverallReport;
use apexcore::telemetry::{headers as query_headers, FixedCost, TelemetryConfig};
use apexcore::{PathFilter, StatementKind, TelemetryCollector};

// =============================================================================
// Admission control
// =============================================================================

#[test]
fn test_sixty_requests_then_deny_then_recover() {
    let clock = ManualClock::new();
    let controller =
        AdmissionController::with_clock(AdmissionConfig::default(), clock.clone())
            .expect("default config is valid");

    // All 60 requests within one second are admitted
    for i in 0..60 {
        assert!(controller.allow("10.0.0.1"), "request {} should pass", i);
    }

    // The 61st within the same minute is denied
    assert!(!controller.allow("10.0.0.1"));

    // After 61 seconds the minute window has slid past the burst
    clock.advance(Duration::from_secs(61));
    assert!(controller.allow("10.0.0.1"));
}

#[test]
fn test_hourly_ceiling_outlasts_minute_windows() {
    let clock = ManualClock::new();
    let config = AdmissionConfig {
        per_minute_limit: 10,
        per_hour_limit: 25,
        ..AdmissionConfig::default()
    };
    let controller =
        AdmissionController::with_clock(config, clock.clone()).expect("valid config");

    let mut admitted = 0;
    for _minute in 0..4 {
        for _ in 0..10 {
            if controller.allow("10.0.0.1") {
                admitted += 1;
            }
        }
        clock.advance(Duration::from_secs(61));
    }

    // The hour ceiling capped the total despite fresh minute windows
    assert_eq!(admitted, 25);

    clock.advance(Duration::from_secs(3600));
    assert!(controller.allow("10.0.0.1"));
}

#[test]
fn test_quota_info_drives_rate_limit_headers() {
    let controller = AdmissionController::new();
    assert!(controller.allow("10.0.0.1"));
    assert!(controller.allow("10.0.0.1"));

    let info = controller.info("10.0.0.1");
    let config = controller.config();

    // What a host would publish on a response
    let headers = [
        (quota_headers::REMAINING_MINUTE, info.remaining_per_minute),
        (quota_headers::REMAINING_HOUR, info.remaining_per_hour),
        (quota_headers::LIMIT_MINUTE, config.per_minute_limit),
        (quota_headers::LIMIT_HOUR, config.per_hour_limit),
    ];

    assert_eq!(headers[0], ("X-RateLimit-Remaining-Minute", 58));
    assert_eq!(headers[1], ("X-RateLimit-Remaining-Hour", 998));
    assert_eq!(headers[2], ("X-RateLimit-Limit-Minute", 60));
    assert_eq!(headers[3], ("X-RateLimit-Limit-Hour", 1000));
}

#[test]
fn test_exhausting_one_client_leaves_another_untouched() {
    let clock = ManualClock::new();
    let config = AdmissionConfig {
        per_minute_limit: 5,
        per_hour_limit: 10,
        ..AdmissionConfig::default()
    };
    let controller = AdmissionController::with_clock(config, clock).expect("valid config");

    for _ in 0..5 {
        assert!(controller.allow("10.0.0.1"));
    }
    assert!(!controller.allow("10.0.0.1"));

    assert!(controller.allow("10.0.0.2"));
    let info = controller.info("10.0.0.2");
    assert_eq!(info.used_per_minute, 1);
}

#[test]
fn test_concurrent_clients_do_not_corrupt_counters() {
    let controller = Arc::new(AdmissionController::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let controller = Arc::clone(&controller);
            std::thread::spawn(move || {
                let client = format!("10.0.1.{worker}");
                let mut admitted = 0;
                for _ in 0..100 {
                    if controller.allow(&client) {
                        admitted += 1;
                    }
                }
                (client, admitted)
            })
        })
        .collect();

    for handle in handles {
        let (client, admitted) = handle.join().expect("worker finishes");
        // Each client is alone on its window: exactly the minute ceiling
        assert_eq!(admitted, 60);
        let info = controller.info(&client);
        assert_eq!(info.used_per_minute, 60);
        assert_eq!(info.remaining_per_minute, 0);
    }
}

// =============================================================================
// Telemetry
// =============================================================================

#[test]
fn test_full_request_lifecycle() {
    let collector = TelemetryCollector::with_cost_model(
        TelemetryConfig::default(),
        Arc::new(FixedCost(0)),
    )
    .expect("valid config");

    let mut scope = collector.begin("/articles", "GET");
    scope.record_timed("SELECT * FROM articles", Duration::from_millis(10));
    scope.record_timed("SELECT * FROM tags", Duration::from_millis(5));

    let id = scope.request_id().to_string();
    let summary = scope.finish();

    assert_eq!(summary.total_queries, 2);
    assert_eq!(summary.total_cost_ms, 15);
    assert_eq!(summary.average_cost_ms, 7.5);
    assert_eq!(summary.max_cost_ms, 10);
    assert_eq!(summary.kind_counts[&StatementKind::Select], 2);
    assert_eq!(summary.table_counts["articles"], 1);
    assert_eq!(summary.table_counts["tags"], 1);

    // What a host would publish on the response
    let headers = [
        (query_headers::QUERY_COUNT, summary.total_queries),
        (query_headers::QUERY_TIME, summary.total_cost_ms),
    ];
    assert_eq!(headers[0], ("X-Query-Count", 2));
    assert_eq!(headers[1], ("X-Query-Time", 15));

    // The summary is retrievable by id afterwards
    let cached = collector.lookup(&id).expect("summary retained");
    assert_eq!(cached.total_cost_ms, 15);
}

#[test]
fn test_history_keeps_only_the_last_capacity_requests() {
    let collector = TelemetryCollector::with_cost_model(
        TelemetryConfig {
            history_capacity: 100,
        },
        Arc::new(FixedCost(1)),
    )
    .expect("valid config");

    let mut ids = Vec::new();
    for i in 0..101 {
        let mut scope = collector.begin(&format!("/articles/{i}"), "GET");
        scope.record("SELECT * FROM articles");
        ids.push(scope.request_id().to_string());
        scope.finish();
    }

    assert_eq!(collector.history_len(), 100);
    // Oldest evicted, the 100 most recent retained
    assert!(collector.lookup(&ids[0]).is_none());
    for id in &ids[1..] {
        assert!(collector.lookup(id).is_some());
    }

    // Snapshot preserves insertion order
    let all = collector.all();
    assert_eq!(all.first().expect("non-empty").request_id, ids[1]);
    assert_eq!(all.last().expect("non-empty").request_id, ids[100]);
}

#[test]
fn test_lifecycle_hook_with_path_filter() {
    let collector = TelemetryCollector::new();
    let filter = PathFilter::default();

    // Simulated lifecycle hook: only non-skipped paths open sessions
    for path in ["/articles", "/static/site.css", "/tags", "/actuator/health"] {
        if filter.should_skip(path) {
            continue;
        }
        let scope = collector.begin(path, "GET");
        scope.finish();
    }

    let paths: Vec<String> = collector.all().into_iter().map(|s| s.path).collect();
    assert_eq!(paths, vec!["/articles", "/tags"]);
}

#[test]
fn test_overall_report_over_live_history() {
    let collector = TelemetryCollector::with_cost_model(
        TelemetryConfig::default(),
        Arc::new(FixedCost(10)),
    )
    .expect("valid config");

    for _ in 0..3 {
        let mut scope = collector.begin("/articles", "GET");
        scope.record("SELECT * FROM articles");
        scope.record("SELECT * FROM categories");
        scope.finish();
    }

    let report = OverallReport::from_summaries(&collector.all(), 2);

    assert_eq!(report.total_requests, 3);
    assert_eq!(report.total_queries, 6);
    assert_eq!(report.average_queries_per_request, 2.0);
    assert_eq!(report.total_cost_ms, 60);
    assert_eq!(report.average_cost_ms, 10.0);
    assert_eq!(report.kind_distribution[&StatementKind::Select], 6);
    assert_eq!(report.table_distribution["articles"], 3);
    assert_eq!(report.recent.len(), 2);
}

#[test]
fn test_clear_resets_history_but_not_live_scopes() {
    let collector = TelemetryCollector::new();

    let mut scope = collector.begin("/articles", "GET");
    scope.record("SELECT * FROM articles");

    {
        let finished = collector.begin("/tags", "GET");
        finished.finish();
    }
    assert_eq!(collector.history_len(), 1);

    collector.clear();
    assert_eq!(collector.history_len(), 0);

    // The in-flight scope still finishes normally after the clear
    let summary = scope.finish();
    assert_eq!(summary.total_queries, 1);
    assert_eq!(collector.history_len(), 1);
}

#[test]
fn test_recording_concurrent_requests_stays_isolated() {
    let collector = Arc::new(
        TelemetryCollector::with_cost_model(
            TelemetryConfig::default(),
            Arc::new(FixedCost(1)),
        )
        .expect("valid config"),
    );

    std::thread::scope(|s| {
        for worker in 0..8u64 {
            let collector = Arc::clone(&collector);
            s.spawn(move || {
                let mut scope = collector.begin(&format!("/articles/{worker}"), "GET");
                for _ in 0..worker + 1 {
                    scope.record("SELECT * FROM articles");
                }
                let summary = scope.finish();
                assert_eq!(summary.total_queries, worker + 1);
            });
        }
    });

    assert_eq!(collector.history_len(), 8);
    let total: u64 = collector.all().iter().map(|s| s.total_queries).sum();
    assert_eq!(total, (1..=8).sum::<u64>());
}
