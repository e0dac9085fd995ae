use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const POINTS_PER_STAGE: f64 = 25.0;
const MAX_FINAL_SCORE: f64 = 100.0;

const AVOID_BELOW: f64 = 34.0;
const MEDIUM_BELOW: f64 = 67.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IccFlags {
    pub indication: bool,
    pub correction: bool,
    pub continuation: bool,
}

impl IccFlags {
    pub fn count(&self) -> usize {
        [self.indication, self.correction, self.continuation]
            .iter()
            .filter(|&&f| f)
            .count()
    }
}

/// 25 points per confirmed stage. Tops out at 75.
pub fn icc_score(flags: &IccFlags) -> f64 {
    POINTS_PER_STAGE * flags.count() as f64
}

/// Combined score, capped at 100. Inputs are never negative so no lower clamp.
pub fn final_score(trend_score: f64, icc_score: f64) -> f64 {
    (trend_score + icc_score).min(MAX_FINAL_SCORE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(final_score: f64) -> Grade {
        if final_score >= 90.0 {
            Grade::APlus
        } else if final_score >= 80.0 {
            Grade::A
        } else if final_score >= 70.0 {
            Grade::B
        } else if final_score >= 60.0 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A+" => Ok(Grade::APlus),
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            other => Err(format!("unknown grade: {}", other)),
        }
    }
}

/// Coarse three-band verdict shown next to the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupQuality {
    Avoid,
    Medium,
    HighProbability,
}

impl SetupQuality {
    pub fn from_score(final_score: f64) -> SetupQuality {
        if final_score < AVOID_BELOW {
            SetupQuality::Avoid
        } else if final_score < MEDIUM_BELOW {
            SetupQuality::Medium
        } else {
            SetupQuality::HighProbability
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetupQuality::Avoid => "Avoid this trade",
            SetupQuality::Medium => "Medium quality",
            SetupQuality::HighProbability => "High probability ICC trade",
        }
    }
}

impl fmt::Display for SetupQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
