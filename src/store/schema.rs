use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Completion flags keyed `"{patternId}-{problemId}"`.
pub type CompletionStatus = BTreeMap<String, bool>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionData {
    pub schema_version: u32,
    #[serde(rename = "completionStatus", default)]
    pub completion_status: CompletionStatus,
}

impl Default for CompletionData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            completion_status: CompletionStatus::new(),
        }
    }
}

impl CompletionData {
    pub fn new(completion_status: CompletionStatus) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            completion_status,
        }
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub patternbook_export_version: u32,
    pub exported_at: DateTime<Utc>,
    #[serde(rename = "completionStatus")]
    pub completion_status: CompletionStatus,
}
