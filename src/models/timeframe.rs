use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart intervals used by the ICC form. The serialized form is the label
/// stored in the `htf` / `ltf` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "Daily")]
    D1,
    #[serde(rename = "Weekly")]
    W1,
}

/// Timeframes that can be picked as the higher timeframe of a setup.
pub const HTF_OPTIONS: &[Timeframe] = &[Timeframe::H4, Timeframe::D1, Timeframe::W1];

/// Timeframes that can be picked as the entry timeframe of a setup.
pub const LTF_OPTIONS: &[Timeframe] = &[Timeframe::M5, Timeframe::M15, Timeframe::M30];

/// Timeframes that carry a trend reading, in scoring order.
pub const TREND_TIMEFRAMES: &[Timeframe] =
    &[Timeframe::D1, Timeframe::H4, Timeframe::H1, Timeframe::M15];

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1H",
            Timeframe::H4 => "4H",
            Timeframe::D1 => "Daily",
            Timeframe::W1 => "Weekly",
        }
    }

    pub fn is_htf_option(&self) -> bool {
        HTF_OPTIONS.contains(self)
    }

    pub fn is_ltf_option(&self) -> bool {
        LTF_OPTIONS.contains(self)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
