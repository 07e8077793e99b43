//! Reshaper properties over generated row sets.
//!
//! Rows are generated with a seeded RNG so failures replay exactly.

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use hourglass::fingerprint;
use hourglass::reshape::hour::{bucket_column, canonical, parse_timestamp};
use hourglass::reshape::{reshape, reshape_json, reshape_rows, RawRow};
use hourglass::ReshapeConfig;

fn generated_rows(rng: &mut StdRng, rows: usize, entities: usize) -> Vec<RawRow> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..rows)
        .map(|i| {
            let mut row = if rng.gen_bool(0.1) {
                RawRow::default()
            } else {
                RawRow::new(&format!("e{}", rng.gen_range(0..entities)))
            };
            for _ in 0..rng.gen_range(0..30) {
                let ts = start + Duration::hours(rng.gen_range(0..24 * 40));
                row = row.with_bucket(&bucket_column("h_", &ts), json!(rng.gen_range(0..1000)));
            }
            if i % 3 == 0 {
                let ts = start + Duration::hours(rng.gen_range(0..24 * 40));
                row = row.with_anomaly(&ts.format("%Y-%m-%d %H:%M:%S UTC").to_string());
            }
            row
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Points are strictly ascending and unique
// ---------------------------------------------------------------------------
#[test]
fn points_strictly_ascending() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let rows = generated_rows(&mut rng, 25, 6);
        let out = reshape(&rows, &ReshapeConfig::default());
        let times: Vec<_> = out
            .points
            .iter()
            .map(|p| parse_timestamp(&p.hour).expect("canonical hour parses"))
            .collect();
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1], "not strictly ascending: {:?}", pair);
        }
    }
}

// ---------------------------------------------------------------------------
// One descriptor per distinct entity, first-seen order
// ---------------------------------------------------------------------------
#[test]
fn series_first_seen_distinct() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let rows = generated_rows(&mut rng, 30, 8);
        let out = reshape(&rows, &ReshapeConfig::default());

        let mut expected: Vec<&str> = Vec::new();
        for id in rows.iter().filter_map(|r| r.entity_id.as_deref()) {
            if !expected.contains(&id) {
                expected.push(id);
            }
        }
        let got: Vec<&str> = out.series.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(got, expected);
        assert!(out.series.iter().all(|s| s.key == s.name));
    }
}

// ---------------------------------------------------------------------------
// Bucket encoding round-trips through the reshaper
// ---------------------------------------------------------------------------
#[test]
fn bucket_roundtrip_recovers_hour() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
            + Duration::hours(rng.gen_range(0..24 * 365 * 40));
        let rows = vec![RawRow::new("A").with_bucket(&bucket_column("h_", &ts), json!(1))];
        let out = reshape(&rows, &ReshapeConfig::default());
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.points[0].hour, canonical(&ts));
    }
}

// ---------------------------------------------------------------------------
// Anomalies: every name is a row's entity; missing hours give null values
// ---------------------------------------------------------------------------
#[test]
fn anomalies_reference_rows_and_points() {
    let mut rng = StdRng::seed_from_u64(19);
    let rows = generated_rows(&mut rng, 60, 10);
    let out = reshape(&rows, &ReshapeConfig::default());
    let expected = rows
        .iter()
        .filter(|r| r.entity_id.is_some() && r.anomaly_timestamp.is_some())
        .count();
    assert_eq!(out.anomalies.len(), expected);
    for a in &out.anomalies {
        assert!(out.series.iter().any(|s| s.key == a.name));
        let from_points = out.point_at(&a.hour).and_then(|p| p.get(&a.name));
        assert_eq!(a.value, from_points);
    }
}

// ---------------------------------------------------------------------------
// Row order does not change points (distinct entities)
// ---------------------------------------------------------------------------
#[test]
fn row_order_does_not_change_points() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut rows: Vec<RawRow> = (0..12)
        .map(|i| {
            let mut row = RawRow::new(&format!("e{}", i));
            for h in 0..rng.gen_range(1..10) {
                row = row.with_bucket(&format!("h_20250101_{:02}", h), json!(i * 10 + h));
            }
            row
        })
        .collect();
    let cfg = ReshapeConfig::default();
    let baseline = reshape(&rows, &cfg).points;
    for _ in 0..10 {
        rows.shuffle(&mut rng);
        assert_eq!(reshape(&rows, &cfg).points, baseline);
    }
}

// ---------------------------------------------------------------------------
// Deterministic replay: same input, same output, same fingerprint
// ---------------------------------------------------------------------------
#[test]
fn deterministic_replay() {
    let mut rng = StdRng::seed_from_u64(31);
    let rows = generated_rows(&mut rng, 40, 7);
    let cfg = ReshapeConfig::default();
    let (a, ra) = reshape_rows(&rows, &cfg);
    let (b, rb) = reshape_rows(&rows, &cfg);
    assert_eq!(a, b);
    assert_eq!(ra, rb);
    assert_eq!(fingerprint::of_json(&a).unwrap(), fingerprint::of_json(&b).unwrap());
}

// ---------------------------------------------------------------------------
// Malformed cells degrade per field, never per reshape
// ---------------------------------------------------------------------------
#[test]
fn malformed_input_degrades_locally() {
    let input = json!([
        {"entity_id": "A", "h_20250101_00": "12", "h_20250101_01": {"x": 1}, "h_20250230_00": 4},
        {"h_20250101_00": 99},
        {"entity_id": "", "h_20250101_00": 98},
        {"entity_id": "B", "h_20250101_00": null, "anomaly_timestamp": "2025-01-01T00:00:00Z"},
        {"entity_id": "C", "anomaly_timestamp": "the other day"},
        {"entity_id": "D", "notes": "no buckets at all"}
    ]);
    let cfg = ReshapeConfig::default();
    let rows = hourglass::reshape::rows_from_json(&input, &cfg).unwrap();
    let (out, report) = reshape_rows(&rows, &cfg);

    assert_eq!(report.rows, 6);
    assert_eq!(report.skipped_rows, 2);
    assert_eq!(report.skipped_fields, 1);
    assert_eq!(report.skipped_anomalies, 1);

    let got = serde_json::to_value(&out.points).unwrap();
    assert_eq!(
        got,
        json!([
            {"hour": "2025-01-01T00:00:00Z", "A": 12.0, "B": 0.0},
            {"hour": "2025-01-01T01:00:00Z", "A": 0.0}
        ])
    );
    let keys: Vec<&str> = out.series.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B", "C", "D"]);
    assert_eq!(out.anomalies.len(), 1);
    assert_eq!(out.anomalies[0].value, Some(0.0));
    assert_eq!(rows[5].extra.get("notes"), Some(&json!("no buckets at all")));
}

#[test]
fn non_array_input_is_rejected() {
    let cfg = ReshapeConfig::default();
    for bad in [json!(null), json!("rows"), json!({"rows": []}), json!(5)] {
        assert!(reshape_json(&bad, &cfg).is_err(), "accepted {}", bad);
    }
    let err = reshape_json(&json!([{}, [], {}]), &cfg).unwrap_err();
    assert_eq!(err.to_string(), "row 1 is not a record, got array");
    assert!(matches!(reshape_json(&Value::Array(vec![]), &cfg), Ok(r) if r.points.is_empty()));
}
