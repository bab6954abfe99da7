//! Reader for the old single-file history layout.
//!
//! That layout kept only the latest category for the whole file and stored
//! it as an integer (0 High, 1 Average, 2 Low):
//!
//! ```json
//! {"price_category": 1, "prices": [{"price": 40, "timestamp": "..."}]}
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::common::enums::PriceCategory;
use crate::common::tracker_error::TrackerError;
use crate::sample::sample::Sample;

#[derive(Debug, Deserialize)]
struct LegacyHistory {
    #[serde(rename = "price_category", default = "legacy_average")]
    last_category: i64,
    #[serde(default)]
    prices: Option<Vec<LegacyPrice>>,
}

#[derive(Debug, Deserialize)]
struct LegacyPrice {
    price: u64,
    timestamp: DateTime<Utc>,
}

fn legacy_average() -> i64 {
    1
}

/// Integer category code used by the old file layout and by early table items.
pub fn legacy_category(code: i64) -> Result<PriceCategory, TrackerError> {
    match code {
        0 => Ok(PriceCategory::High),
        1 => Ok(PriceCategory::Average),
        2 => Ok(PriceCategory::Low),
        other => Err(TrackerError::format(format!(
            "unknown legacy price category {}",
            other
        ))),
    }
}

/// Convert legacy JSON into sample records. Every record is Average except
/// the last one in file order, which takes the file's stored category.
pub fn parse_legacy(data: &[u8]) -> Result<Vec<Sample>, TrackerError> {
    let history: LegacyHistory = serde_json::from_slice(data)
        .map_err(|e| TrackerError::format(format!("not a legacy history file: {}", e)))?;

    let last_category = legacy_category(history.last_category)?;
    let prices = history.prices.unwrap_or_default();
    let last = prices.len().saturating_sub(1);

    Ok(prices
        .into_iter()
        .enumerate()
        .map(|(idx, p)| {
            let category = if idx == last {
                last_category
            } else {
                PriceCategory::Average
            };
            Sample::new(p.price, p.timestamp, category)
        })
        .collect())
}

pub fn read_legacy_file(path: &Path) -> Result<Vec<Sample>, TrackerError> {
    let data = std::fs::read(path)
        .map_err(|e| TrackerError::store(format!("failed to read {}: {}", path.display(), e)))?;
    parse_legacy(&data)
}
