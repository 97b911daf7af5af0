use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{CompanyRecord, LaunchRecord};

use super::{normalize_launches, CacheError, CachedData, LocalStore};

#[derive(Debug, Default)]
struct Snapshots {
    launches: Option<CachedData<Vec<LaunchRecord>>>,
    company: Option<CachedData<CompanyRecord>>,
}

/// In-process store for ephemeral runs and tests. A replace swaps the whole
/// snapshot under one write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: RwLock<Snapshots>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the launch snapshot with an explicit write time
    pub fn with_launches(mut self, launches: Vec<LaunchRecord>, cached_at: DateTime<Utc>) -> Self {
        self.snapshots.get_mut().launches =
            Some(CachedData::at(normalize_launches(launches), cached_at));
        self
    }

    /// Seed the company snapshot with an explicit write time
    pub fn with_company(mut self, company: CompanyRecord, cached_at: DateTime<Utc>) -> Self {
        self.snapshots.get_mut().company = Some(CachedData::at(company, cached_at));
        self
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn load_launches(&self) -> Result<Option<CachedData<Vec<LaunchRecord>>>, CacheError> {
        Ok(self.snapshots.read().await.launches.clone())
    }

    async fn replace_launches(&self, launches: Vec<LaunchRecord>) -> Result<(), CacheError> {
        let snapshot = CachedData::new(normalize_launches(launches));
        self.snapshots.write().await.launches = Some(snapshot);
        Ok(())
    }

    async fn load_company(&self) -> Result<Option<CachedData<CompanyRecord>>, CacheError> {
        Ok(self.snapshots.read().await.company.clone())
    }

    async fn save_company(&self, company: CompanyRecord) -> Result<(), CacheError> {
        self.snapshots.write().await.company = Some(CachedData::new(company));
        Ok(())
    }
}
