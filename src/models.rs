use crate::aging::{AgingReport, Issue};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// One entry of the issue export. Every field tolerates a wrong type so a
/// bad entry is rejected on its own instead of failing the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub number: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub updated_at: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub labels: Vec<LabelRecord>,
    #[serde(default)]
    pub approve: Value,
}

impl IssueRecord {
    /// Entries that are not objects become an empty record, which fails
    /// timestamp parsing later like any other broken entry.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("issue entry is not an object: {err}");
            Self::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelRecord {
    Named { name: String },
    Plain(String),
    Other(Value),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueCard {
    pub issue: Issue,
    pub report: AgingReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedIssue {
    pub number: u64,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Board {
    pub newest: Vec<IssueCard>,
    pub newer: Vec<IssueCard>,
    pub older: Vec<IssueCard>,
    pub oldest: Vec<IssueCard>,
    pub unbucketed: Vec<IssueCard>,
    pub rejected: Vec<RejectedIssue>,
}

/// Analytics export, as written by the reporting job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageviewReport {
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default, rename = "totalsForAllResults")]
    pub totals_for_all_results: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageviewWindow {
    pub rows: Vec<Vec<String>>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageviewsResponse {
    pub day30: Option<PageviewWindow>,
    pub day7: Option<PageviewWindow>,
    pub day1: Option<PageviewWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMonth {
    pub label: String,
    pub formatted: String,
}
