//! Emit a pseudo-random row set for `hourglass reshape`.
//!
//! Deterministic for a given `SEED`. Mixes in the malformed inputs the
//! reshaper has to survive: rows without ids, out-of-range hours, non-numeric
//! counts, garbage anomaly timestamps.

use serde_json::{json, Map, Value};
use std::env;

fn lcg(seed: &mut u64) -> u64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    *seed >> 16
}

fn pick(seed: &mut u64, n: u64) -> u64 {
    lcg(seed) % n
}

fn main() {
    let mut seed = env::var("SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(42u64);
    let rows = env::var("ROWS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20u64);
    let hours = env::var("HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24u64);

    let mut out = Vec::new();
    for i in 0..rows {
        let mut row = Map::new();
        let roll = pick(&mut seed, 100);
        if roll >= 5 {
            // ~10% duplicate ids
            let id = if roll < 15 && i > 0 { pick(&mut seed, i) } else { i };
            row.insert("entity_id".to_string(), json!(format!("source-{}", id)));
        }
        for h in 0..hours {
            if pick(&mut seed, 10) < 2 {
                continue;
            }
            let day = 1 + h / 24;
            let hour = h % 24;
            let column = if pick(&mut seed, 100) < 3 {
                format!("h_202501{:02}_{}", day, 24 + pick(&mut seed, 70))
            } else {
                format!("h_202501{:02}_{:02}", day, hour)
            };
            let value = match pick(&mut seed, 100) {
                0..=2 => Value::Null,
                3..=4 => json!("n/a"),
                5..=9 => json!(pick(&mut seed, 500).to_string()),
                _ => json!(pick(&mut seed, 500)),
            };
            row.insert(column, value);
        }
        let roll = pick(&mut seed, 100);
        if roll < 20 {
            let h = pick(&mut seed, hours.max(1));
            row.insert(
                "anomaly_timestamp".to_string(),
                json!(format!("2025-01-{:02} {:02}:00:00 UTC", 1 + h / 24, h % 24)),
            );
            if pick(&mut seed, 2) == 0 {
                row.insert("anomaly_type".to_string(), json!("click_drop"));
            }
        } else if roll < 23 {
            row.insert("anomaly_timestamp".to_string(), json!("sometime tuesday"));
        }
        row.insert("campaign".to_string(), json!(format!("c{}", pick(&mut seed, 4))));
        out.push(Value::Object(row));
    }

    match serde_json::to_string_pretty(&Value::Array(out)) {
        Ok(s) => println!("{}", s),
        Err(err) => {
            eprintln!("encode failed: {}", err);
            std::process::exit(1);
        }
    }
}
