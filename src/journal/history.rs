use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::{Direction, IccSetupRow};
use crate::scoring::{SetupDescription, SetupQuality};

/// One saved setup as the history view shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub pair: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
    pub created_local: String,
    pub parsed: SetupDescription,
    /// "Y / N / Y" for indication, correction, continuation.
    pub stages: String,
    pub trend_display: String,
    pub icc_display: String,
    pub final_display: String,
    /// Band of the stored final score; `None` for rows without one.
    pub quality: Option<SetupQuality>,
}

impl HistoryEntry {
    pub fn from_row(row: IccSetupRow, tz: Tz) -> HistoryEntry {
        let parsed = SetupDescription::parse_opt(row.indication_type.as_deref());
        HistoryEntry {
            created_local: row
                .created_at
                .with_timezone(&tz)
                .format("%Y-%m-%d %H:%M %Z")
                .to_string(),
            stages: stage_marks(&parsed),
            trend_display: display_score(parsed.trend_score),
            icc_display: display_score(parsed.icc_score),
            final_display: display_score(parsed.final_score),
            quality: parsed.final_score.map(SetupQuality::from_score),
            id: row.id,
            pair: row.pair,
            direction: row.direction,
            created_at: row.created_at,
            parsed,
        }
    }
}

fn stage_marks(parsed: &SetupDescription) -> String {
    let mark = |b: bool| if b { "Y" } else { "N" };
    format!(
        "{} / {} / {}",
        mark(parsed.flags.indication),
        mark(parsed.flags.correction),
        mark(parsed.flags.continuation)
    )
}

/// Score cell text: the number with a percent sign, or a dash when absent.
fn display_score(score: Option<f64>) -> String {
    score.map_or_else(|| "—".to_string(), |s| format!("{}%", s))
}
