use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::enums::PriceCategory;

/// One observed gas price together with the band it was put in when recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    price: u64,
    timestamp: DateTime<Utc>,
    category: PriceCategory,
}

impl Sample {
    pub fn new(price: u64, timestamp: DateTime<Utc>, category: PriceCategory) -> Self {
        Self {
            price,
            timestamp,
            category,
        }
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn category(&self) -> PriceCategory {
        self.category
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} price={} category={}",
            self.timestamp.to_rfc3339(),
            self.price,
            self.category
        )
    }
}
