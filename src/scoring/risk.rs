use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Direction;

/// Above this R:R the target is flagged as probably unrealistic.
pub const MAX_IDEAL_RR: f64 = 4.5;

/// Reward over risk, measured from the entry in the trade's direction.
/// `None` when a price is missing or either leg is zero or negative.
pub fn risk_reward(
    direction: Direction,
    entry: Option<f64>,
    stop: Option<f64>,
    target: Option<f64>,
) -> Option<f64> {
    let (entry, stop, target) = (entry?, stop?, target?);
    let (risk, reward) = legs(direction, entry, stop, target);
    if risk > 0.0 && reward > 0.0 {
        Some(reward / risk)
    } else {
        None
    }
}

/// Signed (risk, reward) distances. Negative values mean the stop or target
/// sits on the wrong side of the entry.
pub fn legs(direction: Direction, entry: f64, stop: f64, target: f64) -> (f64, f64) {
    match direction {
        Direction::Long => (entry - stop, target - entry),
        Direction::Short => (stop - entry, entry - target),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RrClass {
    BelowMinimum,
    Acceptable,
    IdealZone,
    VeryHigh,
}

pub fn classify_rr(rr: f64, min_rr: f64) -> RrClass {
    if rr < min_rr {
        RrClass::BelowMinimum
    } else if rr < min_rr + 1.0 {
        RrClass::Acceptable
    } else if rr <= MAX_IDEAL_RR {
        RrClass::IdealZone
    } else {
        RrClass::VeryHigh
    }
}

impl RrClass {
    /// Advisory text shown beside the ratio.
    pub fn message(&self, min_rr: f64) -> String {
        match self {
            RrClass::BelowMinimum => format!("Below {}R (does not meet your minimum)", min_rr),
            RrClass::Acceptable => format!("OK (> {}R but below your ideal 3R-4R)", min_rr),
            RrClass::IdealZone => "Within your ideal 3R-4R zone".to_string(),
            RrClass::VeryHigh => "Very high RR, make sure TP is realistic".to_string(),
        }
    }
}

impl fmt::Display for RrClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RrClass::BelowMinimum => write!(f, "below minimum"),
            RrClass::Acceptable => write!(f, "acceptable"),
            RrClass::IdealZone => write!(f, "ideal zone"),
            RrClass::VeryHigh => write!(f, "very high, verify target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_worked_example() {
        let rr = risk_reward(Direction::Long, Some(2500.0), Some(2450.0), Some(2600.0));
        assert_eq!(rr, Some(2.0));
    }

    #[test]
    fn short_mirrors_long() {
        let rr = risk_reward(Direction::Short, Some(100.0), Some(105.0), Some(85.0));
        assert_eq!(rr, Some(3.0));
    }

    #[test]
    fn stop_on_wrong_side_is_not_applicable() {
        assert_eq!(
            risk_reward(Direction::Long, Some(100.0), Some(110.0), Some(120.0)),
            None
        );
        assert_eq!(
            risk_reward(Direction::Short, Some(100.0), Some(90.0), Some(80.0)),
            None
        );
    }

    #[test]
    fn zero_legs_and_missing_prices_are_not_applicable() {
        assert_eq!(risk_reward(Direction::Long, Some(100.0), Some(100.0), Some(120.0)), None);
        assert_eq!(risk_reward(Direction::Long, Some(100.0), Some(90.0), Some(100.0)), None);
        assert_eq!(risk_reward(Direction::Long, None, Some(90.0), Some(120.0)), None);
        assert_eq!(risk_reward(Direction::Short, Some(100.0), None, Some(80.0)), None);
    }

    #[test]
    fn classification_bands() {
        assert_eq!(classify_rr(1.9, 2.0), RrClass::BelowMinimum);
        assert_eq!(classify_rr(2.0, 2.0), RrClass::Acceptable);
        assert_eq!(classify_rr(2.99, 2.0), RrClass::Acceptable);
        assert_eq!(classify_rr(3.0, 2.0), RrClass::IdealZone);
        assert_eq!(classify_rr(4.5, 2.0), RrClass::IdealZone);
        assert_eq!(classify_rr(4.51, 2.0), RrClass::VeryHigh);
    }

    #[test]
    fn high_minimum_skips_ideal_zone() {
        // min 4 => acceptable covers [4, 5), which already crosses 4.5
        assert_eq!(classify_rr(4.8, 4.0), RrClass::Acceptable);
        assert_eq!(classify_rr(5.0, 4.0), RrClass::VeryHigh);
    }

    #[test]
    fn message_mentions_minimum() {
        assert!(RrClass::BelowMinimum.message(2.5).contains("2.5R"));
        assert_eq!(RrClass::VeryHigh.to_string(), "very high, verify target");
    }
}
