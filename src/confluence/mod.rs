pub mod checklist;

pub use checklist::{default_buckets, Bucket, BucketKind, ChecklistItem};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{JournalError, Result};
use crate::models::NewConfluenceLog;

const LOW_BELOW: u32 = 30;
const MEDIUM_BELOW: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfluenceLevel {
    Low,
    Medium,
    High,
}

impl ConfluenceLevel {
    pub fn from_total(total: u32) -> ConfluenceLevel {
        if total < LOW_BELOW {
            ConfluenceLevel::Low
        } else if total < MEDIUM_BELOW {
            ConfluenceLevel::Medium
        } else {
            ConfluenceLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfluenceLevel::Low => "Low Confluence",
            ConfluenceLevel::Medium => "Medium Confluence",
            ConfluenceLevel::High => "High Confluence",
        }
    }
}

impl fmt::Display for ConfluenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfluenceLevel::Low => write!(f, "Low"),
            ConfluenceLevel::Medium => write!(f, "Medium"),
            ConfluenceLevel::High => write!(f, "High"),
        }
    }
}

/// A checked item addressed by bucket label and item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedItem {
    pub bucket: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceChecklist {
    pub buckets: Vec<Bucket>,
}

impl Default for ConfluenceChecklist {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
        }
    }
}

impl ConfluenceChecklist {
    /// Fresh checklist with the given items ticked. Unknown bucket or item
    /// names are rejected.
    pub fn with_checked(checked: &[CheckedItem]) -> Result<Self> {
        let mut list = Self::default();
        for c in checked {
            list.check(&c.bucket, &c.item)?;
        }
        Ok(list)
    }

    pub fn check(&mut self, bucket_label: &str, item_name: &str) -> Result<()> {
        let bucket = self
            .buckets
            .iter_mut()
            .find(|b| b.label == bucket_label)
            .ok_or_else(|| {
                JournalError::InvalidInput(format!("unknown confluence bucket: {}", bucket_label))
            })?;
        let item = bucket.item_mut(item_name).ok_or_else(|| {
            JournalError::InvalidInput(format!(
                "unknown item '{}' in bucket {}",
                item_name, bucket_label
            ))
        })?;
        item.checked = true;
        Ok(())
    }

    /// Flip one item by position; returns the new state, or `None` when the
    /// indices are out of range.
    pub fn toggle(&mut self, bucket: usize, item: usize) -> Option<bool> {
        let it = self.buckets.get_mut(bucket)?.items.get_mut(item)?;
        it.checked = !it.checked;
        Some(it.checked)
    }

    pub fn bucket_percent(&self, kind: BucketKind) -> u32 {
        self.buckets
            .iter()
            .filter(|b| b.kind == kind)
            .map(Bucket::percent)
            .sum()
    }

    pub fn total(&self) -> u32 {
        self.buckets.iter().map(Bucket::percent).sum()
    }

    pub fn level(&self) -> ConfluenceLevel {
        ConfluenceLevel::from_total(self.total())
    }

    pub fn summary(&self) -> ConfluenceSummary {
        ConfluenceSummary {
            rows: self
                .buckets
                .iter()
                .map(|b| BucketPercent {
                    label: b.label.clone(),
                    percent: b.percent(),
                    max_percent: b.max_percent(),
                })
                .collect(),
            weekly: self.bucket_percent(BucketKind::Weekly),
            daily: self.bucket_percent(BucketKind::Daily),
            h4: self.bucket_percent(BucketKind::H4),
            h2_1h_30m: self.bucket_percent(BucketKind::H2H1M30),
            lower_tf: self.bucket_percent(BucketKind::LowerTf),
            total: self.total(),
            level: self.level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketPercent {
    pub label: String,
    pub percent: u32,
    /// Score with every item in the bucket ticked.
    pub max_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceSummary {
    pub rows: Vec<BucketPercent>,
    pub weekly: u32,
    pub daily: u32,
    pub h4: u32,
    pub h2_1h_30m: u32,
    pub lower_tf: u32,
    pub total: u32,
    pub level: ConfluenceLevel,
}

impl ConfluenceSummary {
    pub fn to_log(&self, user_id: &str) -> NewConfluenceLog {
        NewConfluenceLog {
            user_id: user_id.to_string(),
            weekly_percent: self.weekly as f64,
            daily_percent: self.daily as f64,
            h4_percent: self.h4 as f64,
            h2_1h_30m_percent: self.h2_1h_30m as f64,
            lower_tf_percent: self.lower_tf as f64,
            overall_percent: self.total as f64,
        }
    }
}
