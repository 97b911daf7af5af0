use std::collections::BTreeSet;

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};

use crate::models::{Launch, LaunchOutcome};

use super::{LaunchFilter, SortOrder};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Where a launch sits relative to today, in whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchStatus {
    DaysSince(u64),
    DaysUntil(u64),
    LaunchingToday,
}

impl std::fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchStatus::DaysSince(1) => write!(f, "1 day since launch"),
            LaunchStatus::DaysSince(days) => write!(f, "{} days since launch", days),
            LaunchStatus::DaysUntil(1) => write!(f, "1 day until launch"),
            LaunchStatus::DaysUntil(days) => write!(f, "{} days until launch", days),
            LaunchStatus::LaunchingToday => write!(f, "Launching today"),
        }
    }
}

/// Classify a launch by whole days elapsed between it and `now_unix`.
/// The day count truncates toward zero, so anything under 24 hours
/// either side is today. Out-of-range timestamps saturate.
pub fn launch_status(scheduled_unix: i64, now_unix: i64) -> LaunchStatus {
    let days = now_unix.saturating_sub(scheduled_unix) / SECONDS_PER_DAY;
    match days.cmp(&0) {
        std::cmp::Ordering::Greater => LaunchStatus::DaysSince(days.unsigned_abs()),
        std::cmp::Ordering::Less => LaunchStatus::DaysUntil(days.unsigned_abs()),
        std::cmp::Ordering::Equal => LaunchStatus::LaunchingToday,
    }
}

/// UTC calendar year of a launch, from its epoch timestamp
pub fn launch_year(scheduled_unix: i64) -> String {
    DateTime::from_timestamp(scheduled_unix, 0)
        .map(|dt| dt.year().to_string())
        .unwrap_or_default()
}

/// A launch ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchView {
    pub flight_number: i64,
    pub name: String,
    /// "Mar 24, 2006 at 22:30"
    pub date_time: String,
    /// "Falcon 1 / Merlin A"
    pub rocket_info: String,
    pub site_name: String,
    pub status: LaunchStatus,
    pub mission_patch_url: Option<String>,
    pub outcome: LaunchOutcome,
    pub launch_year: String,
    pub launch_date_unix: i64,
    pub wikipedia_url: Option<String>,
    pub video_url: Option<String>,
    pub article_url: Option<String>,
}

impl LaunchView {
    pub fn new(launch: &Launch, now_unix: i64) -> Self {
        let date_time = if launch.launch_time.is_empty() {
            launch.launch_date.clone()
        } else {
            format!("{} at {}", launch.launch_date, launch.launch_time)
        };

        Self {
            flight_number: launch.flight_number,
            name: launch.mission_name.clone(),
            date_time,
            rocket_info: format!("{} / {}", launch.rocket_name, launch.rocket_type),
            site_name: launch.site_name.clone(),
            status: launch_status(launch.launch_date_unix, now_unix),
            mission_patch_url: launch.mission_patch_url.clone(),
            outcome: launch.outcome,
            launch_year: launch_year(launch.launch_date_unix),
            launch_date_unix: launch.launch_date_unix,
            wikipedia_url: launch.wikipedia_url.clone(),
            video_url: launch.video_url.clone(),
            article_url: launch.article_url.clone(),
        }
    }
}

/// Build the visible launch list: keep launches matching the year and
/// outcome filters, then order by scheduled time. Ties keep their input
/// order.
pub fn filter_and_sort(
    launches: &[Launch],
    filter: &LaunchFilter,
    now_unix: i64,
) -> Vec<LaunchView> {
    let mut views: Vec<LaunchView> = launches
        .iter()
        .map(|launch| LaunchView::new(launch, now_unix))
        .filter(|view| filter.matches_year(&view.launch_year))
        .filter(|view| filter.outcome.matches(view.outcome))
        .collect();

    match filter.sort {
        SortOrder::Ascending => views.sort_by_key(|view| view.launch_date_unix),
        SortOrder::Descending => views.sort_by(|a, b| b.launch_date_unix.cmp(&a.launch_date_unix)),
    }

    views
}

/// Distinct launch years, oldest first
pub fn available_years(launches: &[Launch]) -> Vec<String> {
    launches
        .iter()
        .map(|launch| launch_year(launch.launch_date_unix))
        .filter(|year| !year.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
