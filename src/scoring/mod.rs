pub mod description;
pub mod icc;
pub mod risk;
pub mod sizing;
pub mod trend;

pub use description::SetupDescription;
pub use icc::{final_score, icc_score, Grade, IccFlags, SetupQuality};
pub use risk::{classify_rr, risk_reward, RrClass};
pub use sizing::{position_size, resolve_stop_pips, risk_money, PositionSize};
pub use trend::{trend_score, TrendReadings};

use serde::{Deserialize, Serialize};

use crate::models::{
    Direction, Instrument, SetupType, Timeframe, UserSettings, HTF_OPTIONS, LTF_OPTIONS,
};

/// Everything the trader fills in for one ICC setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IccForm {
    pub instrument: Instrument,
    /// Overrides the stored pair name; sizing still uses `instrument`.
    pub custom_pair: Option<String>,
    pub direction: Direction,
    pub setup_type: SetupType,
    pub htf_key_level: bool,
    pub htf: Timeframe,
    pub ltf: Timeframe,
    pub trends: TrendReadings,
    pub flags: IccFlags,
    pub indication_price: Option<f64>,
    pub sl_price: Option<f64>,
    pub tp_price: Option<f64>,
    pub account_size: Option<f64>,
    /// Falls back to the user's default risk when absent.
    pub risk_percent: Option<f64>,
    pub stop_loss_pips: Option<f64>,
}

impl Default for IccForm {
    fn default() -> Self {
        Self {
            instrument: Instrument::default(),
            custom_pair: None,
            direction: Direction::Long,
            setup_type: SetupType::default(),
            htf_key_level: false,
            htf: Timeframe::H4,
            ltf: Timeframe::M15,
            trends: TrendReadings::default(),
            flags: IccFlags::default(),
            indication_price: None,
            sl_price: None,
            tp_price: None,
            account_size: None,
            risk_percent: None,
            stop_loss_pips: None,
        }
    }
}

impl IccForm {
    /// Pair name as stored: the upper-cased custom pair when given, else the
    /// instrument symbol.
    pub fn pair(&self) -> String {
        match self.custom_pair.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_uppercase(),
            _ => self.instrument.symbol().to_string(),
        }
    }

    /// HTF must be one of 4H/Daily/Weekly and LTF one of 5m/15m/30m.
    pub fn check_timeframes(&self) -> std::result::Result<(), String> {
        if !self.htf.is_htf_option() {
            return Err(format!(
                "htf must be one of {}, got {}",
                option_labels(HTF_OPTIONS),
                self.htf
            ));
        }
        if !self.ltf.is_ltf_option() {
            return Err(format!(
                "ltf must be one of {}, got {}",
                option_labels(LTF_OPTIONS),
                self.ltf
            ));
        }
        Ok(())
    }

    pub fn effective_risk_percent(&self, settings: &UserSettings) -> Option<f64> {
        self.risk_percent
            .or(Some(settings.default_risk_percent))
            .filter(|r| r.is_finite())
    }
}

fn option_labels(options: &[Timeframe]) -> String {
    options
        .iter()
        .map(Timeframe::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Snapshot of every derived value for one form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IccAssessment {
    pub pair: String,
    pub trend_score: f64,
    pub icc_score: f64,
    pub final_score: f64,
    pub grade: Grade,
    pub quality: SetupQuality,
    pub risk_points: Option<f64>,
    pub reward_points: Option<f64>,
    pub rr: Option<f64>,
    pub rr_class: Option<RrClass>,
    pub rr_message: Option<String>,
    pub risk_percent: Option<f64>,
    pub stop_pips: Option<f64>,
    pub risk_money: Option<f64>,
    pub position: Option<PositionSize>,
}

impl IccAssessment {
    pub fn evaluate(form: &IccForm, settings: &UserSettings) -> IccAssessment {
        let trend = trend_score(form.direction, &form.trends, &settings.trend_weights());
        let icc = icc_score(&form.flags);
        let fin = final_score(trend, icc);

        let (risk_points, reward_points) =
            match (form.indication_price, form.sl_price, form.tp_price) {
                (Some(entry), Some(stop), Some(target)) => {
                    let (risk, reward) = risk::legs(form.direction, entry, stop, target);
                    (Some(risk), Some(reward))
                }
                _ => (None, None),
            };
        let rr = risk_reward(form.direction, form.indication_price, form.sl_price, form.tp_price);
        let rr_class = rr.map(|r| classify_rr(r, settings.min_rr));

        let spec = form.instrument.spec();
        let risk_percent = form.effective_risk_percent(settings);
        let stop_pips = resolve_stop_pips(
            form.stop_loss_pips,
            form.indication_price,
            form.sl_price,
            spec.pip_size,
        );

        IccAssessment {
            pair: form.pair(),
            trend_score: trend,
            icc_score: icc,
            final_score: fin,
            grade: Grade::from_score(fin),
            quality: SetupQuality::from_score(fin),
            risk_points,
            reward_points,
            rr,
            rr_class,
            rr_message: rr_class.map(|c| c.message(settings.min_rr)),
            risk_percent,
            stop_pips,
            risk_money: risk_money(form.account_size, risk_percent),
            position: sizing::position_size_for(&spec, form.account_size, risk_percent, stop_pips),
        }
    }

    pub fn description(&self, form: &IccForm) -> SetupDescription {
        SetupDescription {
            setup_type: Some(form.setup_type),
            htf_key_level: form.htf_key_level,
            flags: form.flags,
            trend_score: Some(self.trend_score),
            icc_score: Some(self.icc_score),
            final_score: Some(self.final_score),
            rr: self.rr.map(description::round2),
            grade: Some(self.grade),
        }
    }
}
