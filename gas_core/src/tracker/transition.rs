use std::fmt;

use crate::common::enums::PriceCategory;

/// A category change worth telling someone about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub new: PriceCategory,
    pub previous: PriceCategory,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.previous, self.new)
    }
}

/// Decide whether moving to `new` from `previous` should notify.
///
/// Fires only when there is a previous category, the new one is not Average,
/// and the two differ. High to Low fires like any other change.
pub fn detect_transition(
    new: PriceCategory,
    previous: Option<PriceCategory>,
) -> Option<Transition> {
    let previous = previous?;
    if new.is_neutral() || new == previous {
        return None;
    }
    Some(Transition { new, previous })
}

/// Human readable message for a transition, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChange {
    pub transition: Transition,
    pub price: u64,
}

impl CategoryChange {
    pub fn new(new: PriceCategory, previous: PriceCategory, price: u64) -> Self {
        Self {
            transition: Transition { new, previous },
            price,
        }
    }

    pub fn subject(&self) -> String {
        format!("Gas Prices are {}", self.transition.new)
    }

    pub fn body(&self) -> String {
        format!(
            "Ethereum gas prices are no longer {}, they are now {}\n\nSpecifically, medium gas is now {}\n",
            self.transition.previous, self.transition.new, self.price
        )
    }
}
