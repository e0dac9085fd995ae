use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Direction, Timeframe};

/// Insert payload for `icc_setups`. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIccSetup {
    pub user_id: String,
    pub pair: String,
    pub direction: Direction,
    pub htf: Timeframe,
    /// Pipe-delimited setup description, see `scoring::description`.
    pub indication_type: String,
    pub indication_price: f64,
    pub correction_done: bool,
    pub liquidity_grab: bool,
    pub ltf: Timeframe,
    pub ltf_structure_ok: bool,
    pub sl_price: Option<f64>,
    pub entry_price: Option<f64>,
    pub risk_percent: Option<f64>,
}

/// Subset of `icc_setups` columns read back for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IccSetupRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub pair: String,
    pub direction: Direction,
    #[serde(default)]
    pub indication_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConfluenceLog {
    pub user_id: String,
    pub weekly_percent: f64,
    pub daily_percent: f64,
    pub h4_percent: f64,
    pub h2_1h_30m_percent: f64,
    pub lower_tf_percent: f64,
    pub overall_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceLogRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub weekly_percent: f64,
    pub daily_percent: f64,
    pub h4_percent: f64,
    pub h2_1h_30m_percent: f64,
    pub lower_tf_percent: f64,
    pub overall_percent: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Desc => "desc",
            SortOrder::Asc => "asc",
        }
    }
}

/// Primary keys may be uuid strings or bigint identities depending on schema.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
