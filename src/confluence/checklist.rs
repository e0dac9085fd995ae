use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    Weekly,
    Daily,
    H4,
    H2H1M30,
    LowerTf,
}

impl BucketKind {
    pub fn label(&self) -> &'static str {
        match self {
            BucketKind::Weekly => "WEEKLY",
            BucketKind::Daily => "DAILY",
            BucketKind::H4 => "4H",
            BucketKind::H2H1M30 => "2H, 1H, 30m",
            BucketKind::LowerTf => "LOWER TF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    pub weight: u32,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub kind: BucketKind,
    pub label: String,
    pub items: Vec<ChecklistItem>,
}

impl Bucket {
    fn new(kind: BucketKind, items: &[(&str, u32)]) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            items: items
                .iter()
                .map(|&(name, weight)| ChecklistItem {
                    name: name.to_string(),
                    weight,
                    checked: false,
                })
                .collect(),
        }
    }

    /// Sum of the weights of checked items. Not clamped to 100.
    pub fn percent(&self) -> u32 {
        self.items
            .iter()
            .filter(|i| i.checked)
            .map(|i| i.weight)
            .sum()
    }

    pub fn max_percent(&self) -> u32 {
        self.items.iter().map(|i| i.weight).sum()
    }

    pub fn item_mut(&mut self, name: &str) -> Option<&mut ChecklistItem> {
        self.items.iter_mut().find(|i| i.name == name)
    }
}

const TREND: &str = "Trend";
const AOI: &str = "At AOI / Rejected";
const EMA: &str = "Touching EMA";
const ROUND_LEVEL: &str = "Round Psychological Level";
const PREV_STRUCTURE: &str = "Rejection from Previous Structure";
const CANDLE_REJECTION: &str = "Candlestick Rejection from AOI";
const BREAK_RETEST: &str = "Break & Retest / H&S Pattern";

/// The five buckets, in display order, all unchecked.
pub fn default_buckets() -> Vec<Bucket> {
    vec![
        Bucket::new(
            BucketKind::Weekly,
            &[
                (TREND, 10),
                (AOI, 10),
                (EMA, 5),
                (ROUND_LEVEL, 5),
                (PREV_STRUCTURE, 10),
                (BREAK_RETEST, 10),
            ],
        ),
        Bucket::new(
            BucketKind::Daily,
            &[
                (TREND, 10),
                (AOI, 10),
                (EMA, 5),
                (ROUND_LEVEL, 10),
                (PREV_STRUCTURE, 10),
                (CANDLE_REJECTION, 10),
                (BREAK_RETEST, 10),
            ],
        ),
        Bucket::new(
            BucketKind::H4,
            &[
                (TREND, 5),
                (AOI, 10),
                (EMA, 5),
                (ROUND_LEVEL, 10),
                (PREV_STRUCTURE, 10),
                (CANDLE_REJECTION, 5),
                (BREAK_RETEST, 10),
            ],
        ),
        Bucket::new(
            BucketKind::H2H1M30,
            &[
                (TREND, 5),
                (AOI, 5),
                (EMA, 5),
                (ROUND_LEVEL, 10),
                (PREV_STRUCTURE, 10),
                (BREAK_RETEST, 10),
            ],
        ),
        Bucket::new(
            BucketKind::LowerTf,
            &[
                ("Shift of structure", 10),
                ("Engulfing candlestick (5m/15m/30m)", 10),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_maxima() {
        let max: Vec<u32> = default_buckets().iter().map(|b| b.max_percent()).collect();
        assert_eq!(max, vec![50, 65, 55, 45, 20]);
    }

    #[test]
    fn labels_follow_kind() {
        let labels: Vec<String> = default_buckets().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["WEEKLY", "DAILY", "4H", "2H, 1H, 30m", "LOWER TF"]);
    }
}
