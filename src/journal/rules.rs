use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::UserSettings;
use crate::scoring::{Grade, IccAssessment};

/// Advisory findings that need an explicit override before a setup is saved.
/// None of them block on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleWarning {
    BelowRules {
        final_score: f64,
        min_score: f64,
        rr: Option<f64>,
        min_rr: f64,
    },
    GradeD,
}

impl RuleWarning {
    pub fn message(&self) -> &'static str {
        match self {
            RuleWarning::BelowRules { .. } => "This setup is below your ICC/R:R rules. Save it anyway?",
            RuleWarning::GradeD => "This setup is graded D (avoid). Save it anyway?",
        }
    }
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// An absent R:R never trips the minimum; only a computed ratio below it does.
pub fn check_rules(assessment: &IccAssessment, settings: &UserSettings) -> Vec<RuleWarning> {
    let mut warnings = Vec::new();

    let score_low = assessment.final_score < settings.min_score;
    let rr_low = assessment.rr.is_some_and(|rr| rr < settings.min_rr);
    if score_low || rr_low {
        warnings.push(RuleWarning::BelowRules {
            final_score: assessment.final_score,
            min_score: settings.min_score,
            rr: assessment.rr,
            min_rr: settings.min_rr,
        });
    }

    if assessment.grade == Grade::D {
        warnings.push(RuleWarning::GradeD);
    }

    warnings
}
