use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum SampleKind {
    ChairCount(u32),
    SitStand(u32),
}

/// One successful remote-detection outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSample {
    pub kind: SampleKind,
    pub timestamp: DateTime<Utc>,
}

impl DetectionSample {
    pub fn chairs(count: u32) -> Self {
        Self {
            kind: SampleKind::ChairCount(count),
            timestamp: Utc::now(),
        }
    }

    pub fn seated(count: u32) -> Self {
        Self {
            kind: SampleKind::SitStand(count),
            timestamp: Utc::now(),
        }
    }
}
