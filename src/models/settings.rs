use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Timeframe;

/// Per-user scoring rules. Any field missing or null in a stored row falls
/// back to its default, so older rows stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSettings")]
pub struct UserSettings {
    pub min_score: f64,
    pub min_rr: f64,
    pub default_risk_percent: f64,
    pub daily_weight: f64,
    pub h4_weight: f64,
    pub h1_weight: f64,
    pub m15_weight: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            min_score: 60.0,
            min_rr: 2.0,
            default_risk_percent: 10.0,
            daily_weight: 10.0,
            h4_weight: 10.0,
            h1_weight: 10.0,
            m15_weight: 5.0,
        }
    }
}

/// Column values as read back; nullable in the table.
#[derive(Deserialize)]
struct StoredSettings {
    min_score: Option<f64>,
    min_rr: Option<f64>,
    default_risk_percent: Option<f64>,
    daily_weight: Option<f64>,
    h4_weight: Option<f64>,
    h1_weight: Option<f64>,
    m15_weight: Option<f64>,
}

impl From<StoredSettings> for UserSettings {
    fn from(raw: StoredSettings) -> Self {
        let d = UserSettings::default();
        UserSettings {
            min_score: raw.min_score.unwrap_or(d.min_score),
            min_rr: raw.min_rr.unwrap_or(d.min_rr),
            default_risk_percent: raw.default_risk_percent.unwrap_or(d.default_risk_percent),
            daily_weight: raw.daily_weight.unwrap_or(d.daily_weight),
            h4_weight: raw.h4_weight.unwrap_or(d.h4_weight),
            h1_weight: raw.h1_weight.unwrap_or(d.h1_weight),
            m15_weight: raw.m15_weight.unwrap_or(d.m15_weight),
        }
    }
}

impl UserSettings {
    pub fn trend_weights(&self) -> TrendWeights {
        TrendWeights {
            daily: self.daily_weight,
            h4: self.h4_weight,
            h1: self.h1_weight,
            m15: self.m15_weight,
        }
    }

    /// Weights must be non-negative; totals are not constrained.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("daily_weight", self.daily_weight),
            ("h4_weight", self.h4_weight),
            ("h1_weight", self.h1_weight),
            ("m15_weight", self.m15_weight),
            ("min_score", self.min_score),
            ("min_rr", self.min_rr),
            ("default_risk_percent", self.default_risk_percent),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendWeights {
    pub daily: f64,
    pub h4: f64,
    pub h1: f64,
    pub m15: f64,
}

impl TrendWeights {
    pub fn get(&self, tf: Timeframe) -> f64 {
        match tf {
            Timeframe::D1 => self.daily,
            Timeframe::H4 => self.h4,
            Timeframe::H1 => self.h1,
            Timeframe::M15 => self.m15,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.daily + self.h4 + self.h1 + self.m15
    }
}

/// Row shape of `icc_settings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsRow {
    pub user_id: String,
    #[serde(flatten)]
    pub settings: UserSettings,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
