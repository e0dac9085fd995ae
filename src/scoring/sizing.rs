use serde::{Deserialize, Serialize};

use crate::models::InstrumentSpec;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    pub risk_money: f64,
    pub lots: f64,
    pub units: f64,
}

/// Cash at risk for the given account and risk percent.
pub fn risk_money(account_size: Option<f64>, risk_percent: Option<f64>) -> Option<f64> {
    let account = positive(account_size)?;
    let pct = finite(risk_percent)?;
    Some(account * pct / 100.0)
}

/// Lots sized so that hitting the stop costs exactly `risk_money`.
/// Returns `None` instead of dividing by a missing or non-positive input.
pub fn position_size(
    account_size: Option<f64>,
    risk_percent: Option<f64>,
    sl_pips: Option<f64>,
    pip_value_per_lot: f64,
    contract_size: f64,
) -> Option<PositionSize> {
    let risk_money = risk_money(account_size, risk_percent)?;
    let sl_pips = positive(sl_pips)?;
    let pip_value = positive(Some(pip_value_per_lot))?;

    let lots = risk_money / (sl_pips * pip_value);
    Some(PositionSize {
        risk_money,
        lots,
        units: lots * contract_size,
    })
}

/// Same as [`position_size`] with pip value and contract size taken from an
/// instrument spec.
pub fn position_size_for(
    spec: &InstrumentSpec,
    account_size: Option<f64>,
    risk_percent: Option<f64>,
    sl_pips: Option<f64>,
) -> Option<PositionSize> {
    position_size(
        account_size,
        risk_percent,
        sl_pips,
        spec.pip_value_per_lot,
        spec.contract_size,
    )
}

/// Stop distance in pips. A positive explicit value wins; otherwise it is
/// derived from the entry/stop gap and the instrument's pip size.
pub fn resolve_stop_pips(
    explicit: Option<f64>,
    entry: Option<f64>,
    stop: Option<f64>,
    pip_size: f64,
) -> Option<f64> {
    if let Some(pips) = positive(explicit) {
        return Some(pips);
    }
    let (entry, stop) = (finite(entry)?, finite(stop)?);
    if pip_size <= 0.0 {
        return None;
    }
    Some((entry - stop).abs() / pip_size)
}

fn finite(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite())
}

fn positive(x: Option<f64>) -> Option<f64> {
    finite(x).filter(|v| *v > 0.0)
}
