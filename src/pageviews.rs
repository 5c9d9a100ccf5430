use crate::models::{PageviewReport, PageviewWindow, PageviewsResponse, ReportMonth};
use crate::storage::load_report;
use chrono::{Datelike, Duration, NaiveDate};
use std::path::Path;

pub const PAGEVIEWS_METRIC: &str = "ga:pageviews";

const REPORT_30DAY: &str = "results_30day.json";
const REPORT_7DAY: &str = "results_7day.json";
const REPORT_1DAY: &str = "results_1day.json";

/// Each window loads independently; an unreadable report leaves only its own
/// window empty.
pub async fn load_pageviews(data_dir: &Path) -> PageviewsResponse {
    let path30 = data_dir.join(REPORT_30DAY);
    let path7 = data_dir.join(REPORT_7DAY);
    let path1 = data_dir.join(REPORT_1DAY);
    let (day30, day7, day1) = tokio::join!(
        load_report(&path30),
        load_report(&path7),
        load_report(&path1),
    );

    PageviewsResponse {
        day30: day30.map(to_window),
        day7: day7.map(to_window),
        day1: day1.map(to_window),
    }
}

pub fn to_window(report: PageviewReport) -> PageviewWindow {
    let total = report
        .totals_for_all_results
        .get(PAGEVIEWS_METRIC)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0);

    PageviewWindow {
        rows: report.rows,
        total,
    }
}

/// The calendar month before `today`.
pub fn report_month(today: NaiveDate) -> ReportMonth {
    let first_of_month = today - Duration::days(i64::from(today.day0()));
    let previous = first_of_month - Duration::days(1);

    ReportMonth {
        label: previous.format("%B %Y").to_string(),
        formatted: previous.format("%Y-%m").to_string(),
    }
}
