use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Band a price falls into relative to the rolling one-sigma envelope.
///
/// Labels are fixed: `"High"`, `"Average"`, `"Low"`. Anything else fails to
/// parse or deserialize rather than falling back to a default.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum PriceCategory {
    #[strum(serialize = "High")]
    High,
    #[strum(serialize = "Average")]
    Average,
    #[strum(serialize = "Low")]
    Low,
}

impl PriceCategory {
    /// Average is the resting state that never triggers a notification.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_label_mapping_is_total() {
        for category in PriceCategory::iter() {
            let label = category.to_string();
            assert_eq!(PriceCategory::from_str(&label).unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(PriceCategory::from_str("Medium").is_err());
        assert!(PriceCategory::from_str("high").is_err());
        assert!(serde_json::from_str::<PriceCategory>("\"Medium\"").is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&PriceCategory::Low).unwrap(), "\"Low\"");
        let parsed: PriceCategory = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(parsed, PriceCategory::High);
    }

    #[test]
    fn test_only_average_is_neutral() {
        assert!(PriceCategory::Average.is_neutral());
        assert!(!PriceCategory::High.is_neutral());
        assert!(!PriceCategory::Low.is_neutral());
    }
}
