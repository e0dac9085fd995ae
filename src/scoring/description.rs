//! Pipe-delimited summary stored in `icc_setups.indication_type`, e.g.
//!
//! ```text
//! SetupType: Trend continuation | HTFKeyLevel: NO | Indication: YES | Correction: YES |
//! Continuation: NO | TrendScore: 25 | ICCScore: 50 | FinalScore: 75 | RR: 2.50R | Grade: B
//! ```
//!
//! Parsing never fails: unknown segments are skipped, malformed numbers read
//! back as `None` and malformed flags as `false`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::SetupType;
use crate::scoring::icc::{Grade, IccFlags};

const SEP: &str = " | ";
const NA: &str = "NA";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetupDescription {
    pub setup_type: Option<SetupType>,
    pub htf_key_level: bool,
    pub flags: IccFlags,
    pub trend_score: Option<f64>,
    pub icc_score: Option<f64>,
    pub final_score: Option<f64>,
    /// Stored with two decimals.
    pub rr: Option<f64>,
    pub grade: Option<Grade>,
}

impl SetupDescription {
    pub fn parse(raw: &str) -> SetupDescription {
        let mut out = SetupDescription::default();

        for part in raw.split('|').map(str::trim) {
            let Some((key, value)) = part.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "SetupType" => out.setup_type = SetupType::from_label(value),
                "HTFKeyLevel" => out.htf_key_level = is_yes(value),
                "Indication" => out.flags.indication = is_yes(value),
                "Correction" => out.flags.correction = is_yes(value),
                "Continuation" => out.flags.continuation = is_yes(value),
                "TrendScore" => out.trend_score = parse_number(value),
                "ICCScore" => out.icc_score = parse_number(value),
                "FinalScore" => out.final_score = parse_number(value),
                "RR" => out.rr = parse_number(value.strip_suffix('R').unwrap_or(value)),
                "Grade" => out.grade = value.parse().ok(),
                _ => {}
            }
        }

        out
    }

    /// Nullable column variant; an empty column decodes to the default.
    pub fn parse_opt(raw: Option<&str>) -> SetupDescription {
        raw.map(SetupDescription::parse).unwrap_or_default()
    }
}

impl fmt::Display for SetupDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rr = match self.rr {
            Some(rr) if rr.is_finite() => format!("{:.2}R", rr),
            _ => NA.to_string(),
        };
        let segments = [
            format!("SetupType: {}", self.setup_type.map_or(NA, |s| s.label())),
            format!("HTFKeyLevel: {}", yes_no(self.htf_key_level)),
            format!("Indication: {}", yes_no(self.flags.indication)),
            format!("Correction: {}", yes_no(self.flags.correction)),
            format!("Continuation: {}", yes_no(self.flags.continuation)),
            format!("TrendScore: {}", number(self.trend_score)),
            format!("ICCScore: {}", number(self.icc_score)),
            format!("FinalScore: {}", number(self.final_score)),
            format!("RR: {}", rr),
            format!("Grade: {}", self.grade.map_or(NA, |g| g.as_str())),
        ];
        write!(f, "{}", segments.join(SEP))
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

fn is_yes(value: &str) -> bool {
    value.contains("YES")
}

fn number(x: Option<f64>) -> String {
    match x {
        Some(v) if v.is_finite() => format!("{}", v),
        _ => NA.to_string(),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
