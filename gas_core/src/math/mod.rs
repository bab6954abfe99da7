pub mod categorize;
pub mod price_stats;
