//! Embeddable value types shared by several entities.
//!
//! `Address` and `Period` are value objects: no identity of their own, compared
//! by their fields, and flattened into the columns of whichever entity embeds
//! them. Entities expose helpers to assemble/split them so the column layout
//! stays a mapping detail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address value type. Embedded into `member`, `delivery`, and the
/// `address_history` collection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl Address {
    pub fn new(city: &str, street: &str, zipcode: &str) -> Self {
        Self {
            city: city.to_string(),
            street: street.to_string(),
            zipcode: zipcode.to_string(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.city, self.street, self.zipcode)
    }
}

/// Time-span value type embedded into `member` (membership period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Period {
    pub fn starting(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(started_at),
            ended_at: None,
        }
    }

    /// Whether `at` falls inside the period. Open ends are unbounded.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let after_start = self.started_at.is_none_or(|s| s <= at);
        let before_end = self.ended_at.is_none_or(|e| at <= e);
        after_start && before_end
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn address_compares_by_value() {
        let a = Address::new("seoul", "teheran-ro", "06234");
        let b = Address::new("seoul", "teheran-ro", "06234");
        assert_eq!(a, b);
        assert_ne!(a, Address::new("busan", "teheran-ro", "06234"));
    }

    #[test]
    fn period_contains_handles_open_ends() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let probe = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

        let open = Period::starting(start);
        assert!(open.is_open());
        assert!(open.contains(probe));
        assert!(!open.contains(before));

        let unbounded = Period {
            started_at: None,
            ended_at: None,
        };
        assert!(unbounded.contains(probe));
    }
}
