//! Data models for SpaceX resources.
//!
//! Each resource exists in three shapes:
//!
//! - wire DTOs (`LaunchDto`, `CompanyDto`) matching the REST API JSON
//! - storage records (`LaunchRecord`, `CompanyRecord`) persisted by the cache
//! - domain models (`Launch`, `Company`) handed to consumers
//!
//! Conversions run DTO -> record -> domain and live next to the types.

pub mod company;
pub mod launch;

pub use company::{Company, CompanyDto, CompanyRecord, COMPANY_RECORD_ID};
pub use launch::{
    Launch, LaunchDto, LaunchOutcome, LaunchRecord, LaunchSiteDto, LinksDto, PayloadDto,
    PayloadSummary, RocketDto, SecondStageDto,
};
