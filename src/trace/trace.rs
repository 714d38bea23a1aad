use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::architecture::Omission;

/// One pipeline stage record, written as a JSON line.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub stage: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub omission: Option<String>,
}

impl TraceEvent {
    pub fn now(stage: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            stage: stage.to_string(),
            count: None,
            action_index: None,
            detail: None,
            omission: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_action(mut self, index: usize) -> Self {
        self.action_index = Some(index);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_omission(mut self, omission: &Omission) -> Self {
        self.omission = Some(omission.kind.as_str().to_string());
        self.action_index = omission.action_index;
        self.detail = Some(format!("{}: {}", omission.subject, omission.detail));
        self
    }
}
