use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Trend read for a single timeframe. An unset reading is `Option::None`
/// at the call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendState {
    Bullish,
    Bearish,
    Consolidating,
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendState::Bullish => write!(f, "BULLISH"),
            TrendState::Bearish => write!(f, "BEARISH"),
            TrendState::Consolidating => write!(f, "CONSOLIDATING"),
        }
    }
}

impl TrendState {
    pub fn to_direction(self) -> Option<Direction> {
        match self {
            TrendState::Bullish => Some(Direction::Long),
            TrendState::Bearish => Some(Direction::Short),
            TrendState::Consolidating => None,
        }
    }

    pub fn agrees_with(self, direction: Direction) -> bool {
        self.to_direction() == Some(direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupType {
    #[default]
    Trend,
    KeyLevel,
}

impl SetupType {
    /// Human label stored inside the setup description string.
    pub fn label(&self) -> &'static str {
        match self {
            SetupType::Trend => "Trend continuation",
            SetupType::KeyLevel => "HTF key level rejection",
        }
    }

    pub fn from_label(label: &str) -> Option<SetupType> {
        match label.trim() {
            "Trend continuation" => Some(SetupType::Trend),
            "HTF key level rejection" => Some(SetupType::KeyLevel),
            _ => None,
        }
    }
}

impl fmt::Display for SetupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_polarity_matches_direction() {
        assert!(TrendState::Bullish.agrees_with(Direction::Long));
        assert!(!TrendState::Bullish.agrees_with(Direction::Short));
        assert!(TrendState::Bearish.agrees_with(Direction::Short));
        assert!(!TrendState::Consolidating.agrees_with(Direction::Long));
        assert!(!TrendState::Consolidating.agrees_with(Direction::Short));
    }

    #[test]
    fn direction_serializes_uppercase() {
        let json = serde_json::to_string(&Direction::Short).unwrap();
        assert_eq!(json, "\"SHORT\"");
        assert_eq!("long".parse::<Direction>().unwrap(), Direction::Long);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn setup_type_labels_round_trip() {
        for st in [SetupType::Trend, SetupType::KeyLevel] {
            assert_eq!(SetupType::from_label(st.label()), Some(st));
        }
        let json = serde_json::to_string(&SetupType::KeyLevel).unwrap();
        assert_eq!(json, "\"KEY_LEVEL\"");
    }
}
