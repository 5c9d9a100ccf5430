//! Issue aging: elapsed-day metrics, the summary list and bucket assignment.
//!
//! Everything here is pure. Callers inject `now` so the same inputs always
//! produce the same report.

use crate::errors::AgingError;
use crate::models::{IssueRecord, LabelRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const MS_PER_DAY: i64 = 86_400_000;

const DATE_FORMAT: &str = "%a %b %d %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Newest,
    Newer,
    Older,
    Oldest,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Newest, Bucket::Newer, Bucket::Older, Bucket::Oldest];

    pub fn heading(self) -> &'static str {
        match self {
            Bucket::Newest => "Newest",
            Bucket::Newer => "Newer",
            Bucket::Older => "Older",
            Bucket::Oldest => "Oldest",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Bucket::Newest => "newest-posts",
            Bucket::Newer => "newer-posts",
            Bucket::Older => "older-posts",
            Bucket::Oldest => "oldest-posts",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub url: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub labels: Vec<String>,
    /// Zero or one entries.
    pub approval_dates: Vec<DateTime<Utc>>,
}

impl Issue {
    pub fn from_record(record: &IssueRecord) -> Result<Self, AgingError> {
        let created = timestamp_field("created_at", &record.created_at)?;
        let updated = timestamp_field("updated_at", &record.updated_at)?;
        let approval_dates = match &record.approve {
            Value::Null => Vec::new(),
            Value::String(raw) => match parse_approval(Some(raw.as_str())) {
                Some(token) => vec![parse_timestamp("approve", token)?],
                None => Vec::new(),
            },
            other => return Err(invalid_timestamp("approve", other)),
        };
        let labels = record
            .labels
            .iter()
            .filter_map(|label| match label {
                LabelRecord::Named { name } => Some(name.clone()),
                LabelRecord::Plain(name) => Some(name.clone()),
                LabelRecord::Other(_) => None,
            })
            .collect();

        Ok(Self {
            number: record.number,
            title: record.title.clone(),
            url: record.html_url.clone(),
            created,
            updated,
            labels,
            approval_dates,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingReport {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub approval: Option<DateTime<Utc>>,
    pub created_days: i64,
    pub updated_days: i64,
    pub approval_days: Option<i64>,
    pub summary_html: String,
    pub bucket: Option<Bucket>,
}

pub fn compute_aging(issue: &Issue, now: DateTime<Utc>) -> AgingReport {
    let approval = issue.approval_dates.first().copied();
    let approval_days = approval.map(|date| days_between(date, now));

    let mut report = AgingReport {
        created: issue.created,
        updated: issue.updated,
        approval,
        created_days: days_between(issue.created, now),
        updated_days: days_between(issue.updated, now),
        approval_days,
        summary_html: String::new(),
        bucket: approval_days.map(classify),
    };
    report.summary_html = render_summary_html(&report);
    report
}

/// First match wins. Exactly 21 and exactly 42 match no range and land in
/// `Newest`.
pub fn classify(approval_days: i64) -> Bucket {
    if approval_days > 42 {
        Bucket::Oldest
    } else if approval_days > 21 && approval_days < 42 {
        Bucket::Older
    } else if approval_days > 7 && approval_days < 21 {
        Bucket::Newer
    } else {
        Bucket::Newest
    }
}

/// Whole days from `then` to `now`, rounding halves up.
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - then).num_milliseconds();
    (millis + MS_PER_DAY / 2).div_euclid(MS_PER_DAY)
}

pub fn summary_lines(report: &AgingReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Created at {}. {} days ago.",
            report.created.format(DATE_FORMAT),
            report.created_days
        ),
        format!(
            "Last updated {}. {} days ago.",
            report.updated.format(DATE_FORMAT),
            report.updated_days
        ),
    ];
    if let Some(days) = report.approval_days {
        lines.push(format!("Sent for approval {days} days ago."));
    }
    lines
}

pub fn render_summary(report: &AgingReport) -> String {
    summary_lines(report).join("\n")
}

pub fn render_summary_html(report: &AgingReport) -> String {
    let items: String = summary_lines(report)
        .iter()
        .map(|line| format!("<li>{line}</li>"))
        .collect();
    format!("<ul class=\"meta\">{items}</ul>")
}

/// The first whitespace-separated token, or `None` for a blank value.
pub fn parse_approval(raw: Option<&str>) -> Option<&str> {
    raw.and_then(|value| value.split_whitespace().next())
}

pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, AgingError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(AgingError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn timestamp_field(field: &'static str, value: &Value) -> Result<DateTime<Utc>, AgingError> {
    match value {
        Value::String(raw) => parse_timestamp(field, raw),
        other => Err(invalid_timestamp(field, other)),
    }
}

fn invalid_timestamp(field: &'static str, value: &Value) -> AgingError {
    AgingError::InvalidTimestamp {
        field,
        value: value.to_string(),
    }
}
