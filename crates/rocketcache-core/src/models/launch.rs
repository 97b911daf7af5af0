use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::format_date_time;

/// Result of a launch. The API reports this as a nullable boolean;
/// upcoming launches and a few historical ones have no verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchOutcome {
    Succeeded,
    Failed,
    Unknown,
}

impl From<Option<bool>> for LaunchOutcome {
    fn from(success: Option<bool>) -> Self {
        match success {
            Some(true) => LaunchOutcome::Succeeded,
            Some(false) => LaunchOutcome::Failed,
            None => LaunchOutcome::Unknown,
        }
    }
}

impl std::fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchOutcome::Succeeded => write!(f, "Success"),
            LaunchOutcome::Failed => write!(f, "Failure"),
            LaunchOutcome::Unknown => write!(f, "Unknown"),
        }
    }
}

// ============================================================================
// Wire types (GET /launches)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchDto {
    pub flight_number: i64,
    pub mission_name: String,
    pub launch_year: String,
    pub launch_date_unix: i64,
    pub launch_date_utc: String,
    pub launch_date_local: String,
    pub rocket: RocketDto,
    pub launch_site: LaunchSiteDto,
    #[serde(default)]
    pub launch_success: Option<bool>,
    pub links: LinksDto,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub upcoming: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocketDto {
    pub rocket_id: String,
    pub rocket_name: String,
    pub rocket_type: String,
    #[serde(default)]
    pub second_stage: Option<SecondStageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondStageDto {
    #[serde(default)]
    pub payloads: Vec<PayloadDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadDto {
    pub payload_id: String,
    #[serde(default)]
    pub customers: Vec<String>,
    #[serde(default)]
    pub payload_type: Option<String>,
    #[serde(default)]
    pub payload_mass_kg: Option<f64>,
    #[serde(default)]
    pub orbit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchSiteDto {
    pub site_id: String,
    pub site_name: String,
    pub site_name_long: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksDto {
    #[serde(default)]
    pub mission_patch: Option<String>,
    #[serde(default)]
    pub mission_patch_small: Option<String>,
    #[serde(default)]
    pub article_link: Option<String>,
    #[serde(default)]
    pub wikipedia: Option<String>,
    #[serde(default)]
    pub video_link: Option<String>,
}

impl LaunchDto {
    /// Flatten into the persisted row shape. Only the first second-stage
    /// payload is kept; its customers are stored as a JSON text array.
    pub fn to_record(&self) -> LaunchRecord {
        let payload = self
            .rocket
            .second_stage
            .as_ref()
            .and_then(|stage| stage.payloads.first());

        let customers = payload.and_then(|p| serde_json::to_string(&p.customers).ok());

        LaunchRecord {
            flight_number: self.flight_number,
            mission_name: self.mission_name.clone(),
            launch_year: self.launch_year.clone(),
            launch_date_unix: self.launch_date_unix,
            launch_date_utc: self.launch_date_utc.clone(),
            launch_date_local: self.launch_date_local.clone(),
            rocket_id: self.rocket.rocket_id.clone(),
            rocket_name: self.rocket.rocket_name.clone(),
            rocket_type: self.rocket.rocket_type.clone(),
            site_id: self.launch_site.site_id.clone(),
            site_name: self.launch_site.site_name.clone(),
            site_name_long: self.launch_site.site_name_long.clone(),
            outcome: LaunchOutcome::from(self.launch_success),
            upcoming: self.upcoming,
            details: self.details.clone(),
            mission_patch_url: self.links.mission_patch.clone(),
            mission_patch_small_url: self.links.mission_patch_small.clone(),
            article_url: self.links.article_link.clone(),
            video_url: self.links.video_link.clone(),
            wikipedia_url: self.links.wikipedia.clone(),
            customers,
            payload_type: payload.and_then(|p| p.payload_type.clone()),
            orbit: payload.and_then(|p| p.orbit.clone()),
            payload_mass_kg: payload.and_then(|p| p.payload_mass_kg),
        }
    }
}

// ============================================================================
// Storage record
// ============================================================================

/// One cached launch row, keyed by flight number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub flight_number: i64,
    pub mission_name: String,
    pub launch_year: String,
    pub launch_date_unix: i64,
    pub launch_date_utc: String,
    pub launch_date_local: String,
    pub rocket_id: String,
    pub rocket_name: String,
    pub rocket_type: String,
    pub site_id: String,
    pub site_name: String,
    pub site_name_long: String,
    pub outcome: LaunchOutcome,
    pub upcoming: bool,
    pub details: Option<String>,
    pub mission_patch_url: Option<String>,
    pub mission_patch_small_url: Option<String>,
    pub article_url: Option<String>,
    pub video_url: Option<String>,
    pub wikipedia_url: Option<String>,
    /// JSON array of customer names
    pub customers: Option<String>,
    pub payload_type: Option<String>,
    pub orbit: Option<String>,
    pub payload_mass_kg: Option<f64>,
}

impl LaunchRecord {
    fn payload_summary(&self) -> Option<PayloadSummary> {
        if self.customers.is_none()
            && self.payload_type.is_none()
            && self.orbit.is_none()
            && self.payload_mass_kg.is_none()
        {
            return None;
        }

        let customers = match self.customers.as_deref() {
            Some(text) => serde_json::from_str::<Vec<String>>(text).unwrap_or_else(|e| {
                debug!(flight = self.flight_number, error = %e, "Unreadable customers column");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Some(PayloadSummary {
            customers,
            payload_type: self.payload_type.clone(),
            mass_kg: self.payload_mass_kg,
            orbit: self.orbit.clone(),
        })
    }

    pub fn to_launch(&self) -> Launch {
        let (launch_date, launch_time) = format_date_time(&self.launch_date_utc);
        Launch {
            flight_number: self.flight_number,
            mission_name: self.mission_name.clone(),
            launch_date,
            launch_time,
            launch_date_unix: self.launch_date_unix,
            rocket_id: self.rocket_id.clone(),
            rocket_name: self.rocket_name.clone(),
            rocket_type: self.rocket_type.clone(),
            site_id: self.site_id.clone(),
            site_name: self.site_name.clone(),
            mission_patch_url: self
                .mission_patch_small_url
                .clone()
                .or_else(|| self.mission_patch_url.clone()),
            outcome: self.outcome,
            upcoming: self.upcoming,
            details: self.details.clone(),
            article_url: self.article_url.clone(),
            wikipedia_url: self.wikipedia_url.clone(),
            video_url: self.video_url.clone(),
            payload: self.payload_summary(),
        }
    }
}

// ============================================================================
// Domain model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadSummary {
    pub customers: Vec<String>,
    pub payload_type: Option<String>,
    pub mass_kg: Option<f64>,
    pub orbit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub flight_number: i64,
    pub mission_name: String,
    /// Display date, e.g. "Mar 24, 2006"; the raw string if it didn't parse
    pub launch_date: String,
    /// Display time, e.g. "22:30"; empty if the date didn't parse
    pub launch_time: String,
    /// Scheduled time in seconds since the epoch, authoritative for ordering
    pub launch_date_unix: i64,
    pub rocket_id: String,
    pub rocket_name: String,
    pub rocket_type: String,
    pub site_id: String,
    pub site_name: String,
    pub mission_patch_url: Option<String>,
    pub outcome: LaunchOutcome,
    pub upcoming: bool,
    pub details: Option<String>,
    pub article_url: Option<String>,
    pub wikipedia_url: Option<String>,
    pub video_url: Option<String>,
    pub payload: Option<PayloadSummary>,
}
