use serde::{Deserialize, Serialize};

use crate::models::{Direction, Timeframe, TrendState, TrendWeights, TREND_TIMEFRAMES};

/// Trend reading per scored timeframe. `None` means the trader left it unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendReadings {
    pub daily: Option<TrendState>,
    pub h4: Option<TrendState>,
    pub h1: Option<TrendState>,
    pub m15: Option<TrendState>,
}

impl TrendReadings {
    pub fn get(&self, tf: Timeframe) -> Option<TrendState> {
        match tf {
            Timeframe::D1 => self.daily,
            Timeframe::H4 => self.h4,
            Timeframe::H1 => self.h1,
            Timeframe::M15 => self.m15,
            _ => None,
        }
    }

    pub fn all(state: TrendState) -> Self {
        Self {
            daily: Some(state),
            h4: Some(state),
            h1: Some(state),
            m15: Some(state),
        }
    }
}

/// Contribution of one timeframe: its weight when the reading agrees with
/// the trade direction, zero otherwise.
pub fn score_timeframe(direction: Direction, state: Option<TrendState>, weight: f64) -> f64 {
    match state {
        Some(s) if s.agrees_with(direction) => weight,
        _ => 0.0,
    }
}

/// Weighted alignment score across the four trend timeframes. Not capped;
/// the upper bound is whatever the weights sum to.
pub fn trend_score(direction: Direction, readings: &TrendReadings, weights: &TrendWeights) -> f64 {
    TREND_TIMEFRAMES
        .iter()
        .map(|&tf| score_timeframe(direction, readings.get(tf), weights.get(tf)))
        .sum()
}
