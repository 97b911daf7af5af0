use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{CompanyRecord, LaunchRecord};

use super::{CacheError, CachedData};

/// Persistence seam for the repository layer.
///
/// A store owns one snapshot per resource. Replacing a snapshot is a single
/// operation: concurrent readers see either the old snapshot or the new
/// one, never an empty collection in between.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn load_launches(&self) -> Result<Option<CachedData<Vec<LaunchRecord>>>, CacheError>;

    /// Delete every cached launch and insert `launches` in its place
    async fn replace_launches(&self, launches: Vec<LaunchRecord>) -> Result<(), CacheError>;

    async fn load_company(&self) -> Result<Option<CachedData<CompanyRecord>>, CacheError>;

    async fn save_company(&self, company: CompanyRecord) -> Result<(), CacheError>;
}

/// Enforce the flight-number key on a batch about to be stored: a later row
/// replaces an earlier one with the same flight number. Rows come back
/// newest first, the order readers expect.
pub fn normalize_launches(launches: Vec<LaunchRecord>) -> Vec<LaunchRecord> {
    let mut by_flight: HashMap<i64, LaunchRecord> = HashMap::with_capacity(launches.len());
    for launch in launches {
        by_flight.insert(launch.flight_number, launch);
    }

    let mut rows: Vec<LaunchRecord> = by_flight.into_values().collect();
    rows.sort_by(|a, b| {
        b.launch_date_unix
            .cmp(&a.launch_date_unix)
            .then(b.flight_number.cmp(&a.flight_number))
    });
    rows
}
