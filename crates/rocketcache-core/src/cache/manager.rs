use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{CompanyRecord, LaunchRecord};

use super::{normalize_launches, CacheError, LocalStore};

const LAUNCHES_CACHE: &str = "launches";
const COMPANY_CACHE: &str = "company";

/// A resource snapshot together with the time it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self::at(data, Utc::now())
    }

    pub fn at(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Includes clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    /// True once more than `max_age` has passed since the write
    pub fn is_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.cached_at > max_age
    }
}

/// JSON-file store. Each resource lives in `<cache_dir>/<name>.json`.
pub struct CacheManager {
    cache_dir: PathBuf,
    /// Serializes writers so two replaces never share a temp file
    write_lock: Mutex<()>,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_dir).map_err(|source| CacheError::Io {
            path: cache_dir.clone(),
            source,
        })?;
        Ok(Self {
            cache_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>, CacheError> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .map_err(|source| CacheError::Corrupt { path, source })?;

        Ok(Some(cached))
    }

    /// Write to a sibling temp file and rename it over the old snapshot,
    /// so readers only ever see a complete file.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), CacheError> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached).map_err(|source| {
            CacheError::Serialize {
                name: name.to_string(),
                source,
            }
        })?;

        let path = self.cache_path(name);
        let tmp_path = self.cache_dir.join(format!(".{}.json.tmp", name));

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        std::fs::write(&tmp_path, contents).map_err(|source| CacheError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|source| CacheError::Io { path, source })?;

        debug!(cache = name, "Snapshot written");
        Ok(())
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>, CacheError>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            launches: self.load_age(LAUNCHES_CACHE, || {
                self.load::<Vec<LaunchRecord>>(LAUNCHES_CACHE)
            }),
            company: self.load_age(COMPANY_CACHE, || self.load::<CompanyRecord>(COMPANY_CACHE)),
        }
    }
}

#[async_trait]
impl LocalStore for CacheManager {
    async fn load_launches(&self) -> Result<Option<CachedData<Vec<LaunchRecord>>>, CacheError> {
        self.load(LAUNCHES_CACHE)
    }

    async fn replace_launches(&self, launches: Vec<LaunchRecord>) -> Result<(), CacheError> {
        let rows = normalize_launches(launches);
        self.save(LAUNCHES_CACHE, &rows)
    }

    async fn load_company(&self) -> Result<Option<CachedData<CompanyRecord>>, CacheError> {
        self.load(COMPANY_CACHE)
    }

    async fn save_company(&self, company: CompanyRecord) -> Result<(), CacheError> {
        self.save(COMPANY_CACHE, &company)
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub launches: Option<String>,
    pub company: Option<String>,
}

impl CacheAges {
    pub fn launches_age(&self) -> String {
        self.launches.clone().unwrap_or_else(|| "never".to_string())
    }

    pub fn company_age(&self) -> String {
        self.company.clone().unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
