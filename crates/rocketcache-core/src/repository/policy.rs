use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::api::{ApiError, RemoteFetcher};
use crate::cache::{CacheError, CachedData, LocalStore};
use crate::models::{Company, CompanyRecord, Launch, LaunchRecord};

use super::{Observation, RepositoryResult};

/// One pass emits the cached snapshot and then, at most, one refreshed result.
const MAX_EMISSIONS_PER_PASS: usize = 2;

/// Launch data goes stale after a day.
const DEFAULT_LAUNCHES_MAX_AGE_HOURS: i64 = 24;

/// The company profile barely changes; refresh it weekly.
const DEFAULT_COMPANY_MAX_AGE_DAYS: i64 = 7;

/// How old a snapshot may get before a pass refreshes it. An empty launch
/// list or a missing company profile is always stale.
#[derive(Debug, Clone, Copy)]
pub struct StalenessPolicy {
    pub launches_max_age: Duration,
    pub company_max_age: Duration,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            launches_max_age: Duration::hours(DEFAULT_LAUNCHES_MAX_AGE_HOURS),
            company_max_age: Duration::days(DEFAULT_COMPANY_MAX_AGE_DAYS),
        }
    }
}

/// Tracks the newest pass for one resource kind. Starting a pass bumps the
/// generation; a pass that is no longer the newest must not write.
#[derive(Debug, Default)]
struct PassTracker {
    generation: AtomicU64,
    /// Held across the generation check and the store write
    write_gate: Mutex<()>,
}

impl PassTracker {
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// The per-kind half of a reconciliation pass: how to read, fetch and write
/// one resource, and what counts as having data.
#[async_trait]
trait Resource: Send + Sync + 'static {
    type Stored: Send + Sync + 'static;
    type Output: Send + 'static;

    fn name(&self) -> &'static str;

    fn max_age(&self, policy: &StalenessPolicy) -> Duration;

    fn has_data(&self, stored: &Self::Stored) -> bool;

    fn to_output(&self, stored: &Self::Stored) -> Self::Output;

    async fn load(
        &self,
        store: &dyn LocalStore,
    ) -> Result<Option<CachedData<Self::Stored>>, CacheError>;

    async fn fetch(&self, remote: &dyn RemoteFetcher) -> Result<Self::Stored, ApiError>;

    async fn persist(
        &self,
        store: &dyn LocalStore,
        stored: Self::Stored,
    ) -> Result<(), CacheError>;
}

struct Launches;

#[async_trait]
impl Resource for Launches {
    type Stored = Vec<LaunchRecord>;
    type Output = Vec<Launch>;

    fn name(&self) -> &'static str {
        "launches"
    }

    fn max_age(&self, policy: &StalenessPolicy) -> Duration {
        policy.launches_max_age
    }

    fn has_data(&self, stored: &Self::Stored) -> bool {
        !stored.is_empty()
    }

    fn to_output(&self, stored: &Self::Stored) -> Self::Output {
        stored.iter().map(LaunchRecord::to_launch).collect()
    }

    async fn load(
        &self,
        store: &dyn LocalStore,
    ) -> Result<Option<CachedData<Self::Stored>>, CacheError> {
        store.load_launches().await
    }

    async fn fetch(&self, remote: &dyn RemoteFetcher) -> Result<Self::Stored, ApiError> {
        let launches = remote.fetch_launches().await?;
        Ok(launches.iter().map(|dto| dto.to_record()).collect())
    }

    async fn persist(
        &self,
        store: &dyn LocalStore,
        stored: Self::Stored,
    ) -> Result<(), CacheError> {
        store.replace_launches(stored).await
    }
}

struct CompanyInfo;

#[async_trait]
impl Resource for CompanyInfo {
    type Stored = CompanyRecord;
    type Output = Company;

    fn name(&self) -> &'static str {
        "company"
    }

    fn max_age(&self, policy: &StalenessPolicy) -> Duration {
        policy.company_max_age
    }

    fn has_data(&self, _stored: &Self::Stored) -> bool {
        true
    }

    fn to_output(&self, stored: &Self::Stored) -> Self::Output {
        stored.to_company()
    }

    async fn load(
        &self,
        store: &dyn LocalStore,
    ) -> Result<Option<CachedData<Self::Stored>>, CacheError> {
        store.load_company().await
    }

    async fn fetch(&self, remote: &dyn RemoteFetcher) -> Result<Self::Stored, ApiError> {
        Ok(remote.fetch_company().await?.to_record())
    }

    async fn persist(
        &self,
        store: &dyn LocalStore,
        stored: Self::Stored,
    ) -> Result<(), CacheError> {
        store.save_company(stored).await
    }
}

/// Offline-first access to launches and company data.
///
/// Clone is cheap; clones share the fetcher, the store and the pass
/// bookkeeping, so a pass started from any clone supersedes older passes
/// of the same kind started from any other.
#[derive(Clone)]
pub struct Repository {
    remote: Arc<dyn RemoteFetcher>,
    store: Arc<dyn LocalStore>,
    staleness: StalenessPolicy,
    launches: Arc<PassTracker>,
    company: Arc<PassTracker>,
}

impl Repository {
    pub fn new(remote: Arc<dyn RemoteFetcher>, store: Arc<dyn LocalStore>) -> Self {
        Self::with_staleness(remote, store, StalenessPolicy::default())
    }

    pub fn with_staleness(
        remote: Arc<dyn RemoteFetcher>,
        store: Arc<dyn LocalStore>,
        staleness: StalenessPolicy,
    ) -> Self {
        Self {
            remote,
            store,
            staleness,
            launches: Arc::new(PassTracker::default()),
            company: Arc::new(PassTracker::default()),
        }
    }

    /// Start a launches pass. Must be called from within a Tokio runtime.
    pub fn observe_launches(&self) -> Observation<Vec<Launch>> {
        self.observe(Launches, &self.launches)
    }

    /// Start a company pass. Must be called from within a Tokio runtime.
    pub fn observe_company(&self) -> Observation<Company> {
        self.observe(CompanyInfo, &self.company)
    }

    /// Fetch and replace the launch snapshot regardless of its age.
    /// Supersedes any launches pass still in flight.
    pub async fn refresh_launches(&self) -> RepositoryResult<()> {
        let generation = self.launches.begin();
        info!("Manual launches refresh");
        self.refresh(&Launches, &self.launches, generation).await.map(|_| ())
    }

    /// Fetch and replace the company snapshot regardless of its age
    pub async fn refresh_company(&self) -> RepositoryResult<()> {
        let generation = self.company.begin();
        info!("Manual company refresh");
        self.refresh(&CompanyInfo, &self.company, generation).await.map(|_| ())
    }

    fn observe<R: Resource>(&self, kind: R, tracker: &Arc<PassTracker>) -> Observation<R::Output> {
        let generation = tracker.begin();
        let (tx, rx) = mpsc::channel(MAX_EMISSIONS_PER_PASS);
        let repository = self.clone();
        let tracker = Arc::clone(tracker);

        let task = tokio::spawn(async move {
            repository.reconcile(kind, tracker, generation, tx).await;
        });

        Observation::new(rx, task)
    }

    /// Helper to send a pass result; false when the consumer has gone away
    async fn send_result<T>(
        tx: &mpsc::Sender<RepositoryResult<T>>,
        result: RepositoryResult<T>,
    ) -> bool {
        if tx.send(result).await.is_err() {
            debug!("Observation dropped before pass finished");
            return false;
        }
        true
    }

    async fn reconcile<R: Resource>(
        self,
        kind: R,
        tracker: Arc<PassTracker>,
        generation: u64,
        tx: mpsc::Sender<RepositoryResult<R::Output>>,
    ) {
        let snapshot = match kind.load(self.store.as_ref()).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    resource = kind.name(),
                    error = %e,
                    "Failed to read cached snapshot, treating as absent"
                );
                None
            }
        };

        let local = snapshot.as_ref().filter(|cached| kind.has_data(&cached.data));

        if let Some(cached) = local {
            debug!(resource = kind.name(), age = %cached.age_display(), "Emitting cached snapshot");
            if !Self::send_result(&tx, Ok(kind.to_output(&cached.data))).await {
                return;
            }
        }

        let stale = match local {
            Some(cached) => cached.is_older_than(kind.max_age(&self.staleness), Utc::now()),
            None => true,
        };

        if !stale {
            debug!(resource = kind.name(), "Cached snapshot is fresh, skipping fetch");
            return;
        }

        match self.refresh(&kind, &tracker, generation).await {
            Ok(Some(fresh)) => {
                Self::send_result(&tx, Ok(kind.to_output(&fresh))).await;
            }
            Ok(None) => {
                debug!(
                    resource = kind.name(),
                    generation,
                    "Pass superseded, dropping fetched data"
                );
            }
            Err(e) if local.is_some() => {
                warn!(
                    resource = kind.name(),
                    error = %e,
                    "Refresh failed, keeping cached snapshot"
                );
            }
            Err(e) => {
                warn!(resource = kind.name(), error = %e, "Refresh failed with nothing cached");
                Self::send_result(&tx, Err(e)).await;
            }
        }
    }

    /// Fetch, then replace the snapshot and read it back. `Ok(None)` when a
    /// newer pass started while the fetch was in flight; nothing is written.
    async fn refresh<R: Resource>(
        &self,
        kind: &R,
        tracker: &PassTracker,
        generation: u64,
    ) -> RepositoryResult<Option<R::Stored>> {
        let fetched = kind.fetch(self.remote.as_ref()).await?;

        let _gate = tracker.write_gate.lock().await;
        if !tracker.is_current(generation) {
            return Ok(None);
        }

        kind.persist(self.store.as_ref(), fetched).await?;

        let persisted = kind.load(self.store.as_ref()).await?.ok_or_else(|| {
            CacheError::Unavailable(format!("{} snapshot missing after write", kind.name()))
        })?;

        info!(resource = kind.name(), "Snapshot refreshed from remote");
        Ok(Some(persisted.data))
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("staleness", &self.staleness)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration as StdDuration;

    use tokio::sync::Notify;
    use tokio::time::timeout;

    use super::*;
    use crate::cache::MemoryStore;
    use crate::models::{CompanyDto, LaunchDto, LaunchOutcome};
    use crate::repository::RepositoryError;
    use crate::test_support::{company_dto, company_record, launch_dto, launch_record};

    const WAIT: StdDuration = StdDuration::from_secs(5);

    struct Scripted<T> {
        gate: Option<Arc<Notify>>,
        result: Result<T, ApiError>,
    }

    /// Remote fake that replays queued responses, optionally waiting on a
    /// gate first to simulate a slow network.
    #[derive(Default)]
    struct FakeRemote {
        launches: std::sync::Mutex<VecDeque<Scripted<Vec<LaunchDto>>>>,
        company: std::sync::Mutex<VecDeque<Scripted<CompanyDto>>>,
        launch_calls: AtomicUsize,
        company_calls: AtomicUsize,
    }

    impl FakeRemote {
        fn launches_ok(self, launches: Vec<LaunchDto>) -> Self {
            self.push_launches(None, Ok(launches))
        }

        fn launches_err(self, message: &str) -> Self {
            self.launches_failing(ApiError::ServerError(message.to_string()))
        }

        fn launches_failing(self, error: ApiError) -> Self {
            self.push_launches(None, Err(error))
        }

        fn launches_gated(self, gate: Arc<Notify>, launches: Vec<LaunchDto>) -> Self {
            self.push_launches(Some(gate), Ok(launches))
        }

        fn push_launches(
            self,
            gate: Option<Arc<Notify>>,
            result: Result<Vec<LaunchDto>, ApiError>,
        ) -> Self {
            self.launches.lock().unwrap().push_back(Scripted { gate, result });
            self
        }

        fn company_ok(self, company: CompanyDto) -> Self {
            self.company.lock().unwrap().push_back(Scripted { gate: None, result: Ok(company) });
            self
        }

        fn company_err(self, message: &str) -> Self {
            self.company_failing(ApiError::ServerError(message.to_string()))
        }

        fn company_failing(self, error: ApiError) -> Self {
            self.company
                .lock()
                .unwrap()
                .push_back(Scripted { gate: None, result: Err(error) });
            self
        }

        fn launch_calls(&self) -> usize {
            self.launch_calls.load(Ordering::SeqCst)
        }

        fn company_calls(&self) -> usize {
            self.company_calls.load(Ordering::SeqCst)
        }
    }

    async fn play<T>(next: Option<Scripted<T>>) -> Result<T, ApiError> {
        let Some(step) = next else {
            return Err(ApiError::InvalidResponse("no scripted response".to_string()));
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        step.result
    }

    /// What `ApiClient` reports when the body is not the expected JSON
    fn decode_error(resource: &str) -> ApiError {
        let source = serde_json::from_str::<Vec<LaunchDto>>("<html>maintenance</html>")
            .expect_err("html is not a launch list");
        ApiError::Decode {
            resource: resource.to_string(),
            source,
        }
    }

    #[async_trait]
    impl RemoteFetcher for FakeRemote {
        async fn fetch_launches(&self) -> Result<Vec<LaunchDto>, ApiError> {
            self.launch_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.launches.lock().unwrap().pop_front();
            play(next).await
        }

        async fn fetch_company(&self) -> Result<CompanyDto, ApiError> {
            self.company_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.company.lock().unwrap().pop_front();
            play(next).await
        }
    }

    /// Store whose writes always fail; reads come from a seeded snapshot.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl LocalStore for ReadOnlyStore {
        async fn load_launches(&self) -> Result<Option<CachedData<Vec<LaunchRecord>>>, CacheError> {
            self.0.load_launches().await
        }

        async fn replace_launches(&self, _launches: Vec<LaunchRecord>) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("disk full".to_string()))
        }

        async fn load_company(&self) -> Result<Option<CachedData<CompanyRecord>>, CacheError> {
            self.0.load_company().await
        }

        async fn save_company(&self, _company: CompanyRecord) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("disk full".to_string()))
        }
    }

    fn cached_launches(count: i64) -> Vec<LaunchRecord> {
        (1..=count)
            .map(|n| launch_record(n, 1_500_000_000 + n * 1000, LaunchOutcome::Succeeded))
            .collect()
    }

    fn remote_launches(range: std::ops::RangeInclusive<i64>) -> Vec<LaunchDto> {
        range.map(|n| launch_dto(n, 1_600_000_000 + n * 1000, Some(true))).collect()
    }

    fn hours_ago(hours: i64) -> chrono::DateTime<Utc> {
        Utc::now() - Duration::hours(hours)
    }

    fn flights(launches: &[Launch]) -> Vec<i64> {
        launches.iter().map(|l| l.flight_number).collect()
    }

    fn repository(remote: &Arc<FakeRemote>, store: Arc<dyn LocalStore>) -> Repository {
        Repository::new(Arc::clone(remote) as Arc<dyn RemoteFetcher>, store)
    }

    #[tokio::test]
    async fn test_cached_launches_emitted_before_fetch_completes() {
        let gate = Arc::new(Notify::new());
        let remote = Arc::new(
            FakeRemote::default().launches_gated(Arc::clone(&gate), remote_launches(10..=11)),
        );
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(3), hours_ago(48)));
        let repo = repository(&remote, store);

        let mut observation = repo.observe_launches();

        let first = timeout(WAIT, observation.next())
            .await
            .expect("cached emission")
            .expect("item");
        assert_eq!(flights(&first.expect("cached launches")), vec![3, 2, 1]);

        gate.notify_one();
        let second = timeout(WAIT, observation.next())
            .await
            .expect("fresh emission")
            .expect("item");
        assert_eq!(flights(&second.expect("fresh launches")), vec![11, 10]);

        assert!(timeout(WAIT, observation.next()).await.expect("end of pass").is_none());
        assert_eq!(remote.launch_calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_fetch() {
        let remote = Arc::new(FakeRemote::default());
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(2), hours_ago(1)));
        let repo = repository(&remote, store);

        let results = repo.observe_launches().collect_all().await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
        assert_eq!(remote.launch_calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_with_failed_fetch_keeps_cached_data() {
        let remote = Arc::new(FakeRemote::default().launches_err("503 upstream"));
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(4), hours_ago(30)));
        let repo = repository(&remote, store);

        let results = repo.observe_launches().collect_all().await;

        assert_eq!(results.len(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 0);
        assert_eq!(results[0].as_ref().expect("cached").len(), 4);
        assert_eq!(remote.launch_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_cache_with_failed_fetch_surfaces_error() {
        let remote = Arc::new(FakeRemote::default().launches_err("connection reset"));
        let store = Arc::new(MemoryStore::new().with_launches(Vec::new(), hours_ago(0)));
        let repo = repository(&remote, store);

        let results = repo.observe_launches().collect_all().await;

        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(RepositoryError::Remote(ApiError::ServerError(msg))) => {
                assert_eq!(msg, "connection reset")
            }
            other => panic!("expected remote failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_response_with_cache_keeps_cached_data() {
        let remote = Arc::new(FakeRemote::default().launches_failing(decode_error("launches")));
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(1), hours_ago(30)));
        let repo = repository(&remote, store.clone());

        let results = repo.observe_launches().collect_all().await;

        assert_eq!(results.len(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 0);
        assert_eq!(flights(results[0].as_ref().expect("cached")), vec![1]);
        let stored = store.load_launches().await.expect("load").expect("snapshot");
        assert_eq!(stored.data.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_response_without_cache_is_surfaced() {
        let remote = Arc::new(
            FakeRemote::default()
                .launches_failing(decode_error("launches"))
                .company_failing(decode_error("info")),
        );
        let repo = repository(&remote, Arc::new(MemoryStore::new()));

        let launches = repo.observe_launches().collect_all().await;
        assert_eq!(launches.len(), 1);
        match &launches[0] {
            Err(RepositoryError::Remote(ApiError::Decode { resource, .. })) => {
                assert_eq!(resource, "launches")
            }
            other => panic!("expected decode failure, got {other:?}"),
        }

        let company = repo.observe_company().collect_all().await;
        assert_eq!(company.len(), 1);
        assert!(matches!(
            company[0],
            Err(RepositoryError::Remote(ApiError::Decode { .. }))
        ));
    }

    #[tokio::test]
    async fn test_empty_cache_with_successful_fetch_emits_once() {
        let remote = Arc::new(FakeRemote::default().launches_ok(remote_launches(1..=3)));
        let store = Arc::new(MemoryStore::new());
        let repo = repository(&remote, store.clone());

        let results = repo.observe_launches().collect_all().await;

        assert_eq!(results.len(), 1);
        assert_eq!(flights(results[0].as_ref().expect("fresh")), vec![3, 2, 1]);
        let stored = store.load_launches().await.expect("load").expect("snapshot");
        assert_eq!(stored.data.len(), 3);
    }

    #[tokio::test]
    async fn test_no_pass_emits_more_than_two() {
        let cases: Vec<(Option<i64>, bool)> = vec![
            (None, true),
            (None, false),
            (Some(1), true),
            (Some(1), false),
            (Some(48), true),
            (Some(48), false),
        ];

        for (cache_age_hours, fetch_ok) in cases {
            let remote = if fetch_ok {
                FakeRemote::default().launches_ok(remote_launches(5..=6))
            } else {
                FakeRemote::default().launches_err("offline")
            };
            let store = match cache_age_hours {
                Some(age) => MemoryStore::new().with_launches(cached_launches(2), hours_ago(age)),
                None => MemoryStore::new(),
            };
            let repo = repository(&Arc::new(remote), Arc::new(store));

            let results = repo.observe_launches().collect_all().await;
            assert!(
                (1..=2).contains(&results.len()),
                "age {cache_age_hours:?}, fetch_ok {fetch_ok}: {} emissions",
                results.len()
            );
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_without_transient_empty_or_merged_state() {
        let remote = Arc::new(FakeRemote::default().launches_ok(remote_launches(100..=102)));
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(5), hours_ago(1)));
        let repo = repository(&remote, store.clone());

        let reader_store = store.clone();
        let reader = tokio::spawn(async move {
            let mut seen = Vec::new();
            for _ in 0..200 {
                let len = reader_store
                    .load_launches()
                    .await
                    .expect("load")
                    .map(|s| s.data.len())
                    .unwrap_or(0);
                seen.push(len);
                tokio::task::yield_now().await;
            }
            seen
        });

        repo.refresh_launches().await.expect("refresh");
        let seen = reader.await.expect("reader task");

        assert!(seen.iter().all(|len| *len == 5 || *len == 3), "observed {seen:?}");
        let stored = store.load_launches().await.expect("load").expect("snapshot");
        assert_eq!(stored.data.len(), 3);
        assert_eq!(remote.launch_calls(), 1);
    }

    #[tokio::test]
    async fn test_manual_refresh_reports_failure() {
        let remote = Arc::new(FakeRemote::default().launches_err("timeout"));
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(2), hours_ago(1)));
        let repo = repository(&remote, store.clone());

        let err = repo.refresh_launches().await.expect_err("refresh should fail");
        assert!(matches!(err, RepositoryError::Remote(_)));

        let stored = store.load_launches().await.expect("load").expect("snapshot");
        assert_eq!(stored.data.len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_pass_does_not_write() {
        let slow_gate = Arc::new(Notify::new());
        let remote = Arc::new(
            FakeRemote::default()
                .launches_gated(Arc::clone(&slow_gate), remote_launches(1..=1))
                .launches_ok(remote_launches(20..=22)),
        );
        let store = Arc::new(MemoryStore::new());
        let repo = repository(&remote, store.clone());

        // Keep the first observation alive so only supersession stops it.
        let mut first = repo.observe_launches();
        while remote.launch_calls() == 0 {
            tokio::task::yield_now().await;
        }

        let second = repo.observe_launches().collect_all().await;
        assert_eq!(flights(second[0].as_ref().expect("fresh")), vec![22, 21, 20]);

        slow_gate.notify_one();
        assert!(timeout(WAIT, first.next()).await.expect("first pass ends").is_none());

        let stored = store.load_launches().await.expect("load").expect("snapshot");
        assert_eq!(stored.data.len(), 3);
    }

    #[tokio::test]
    async fn test_write_failure_with_cache_is_swallowed() {
        let remote = Arc::new(FakeRemote::default().launches_ok(remote_launches(1..=2)));
        let seeded = MemoryStore::new().with_launches(cached_launches(3), hours_ago(72));
        let repo = repository(&remote, Arc::new(ReadOnlyStore(seeded)));

        let results = repo.observe_launches().collect_all().await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().expect("cached").len(), 3);
    }

    #[tokio::test]
    async fn test_write_failure_without_cache_is_surfaced() {
        let remote = Arc::new(FakeRemote::default().company_ok(company_dto()));
        let repo = repository(&remote, Arc::new(ReadOnlyStore(MemoryStore::new())));

        let results = repo.observe_company().collect_all().await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(RepositoryError::Storage(_))));
    }

    #[tokio::test]
    async fn test_company_absent_fetches_and_persists() {
        let remote = Arc::new(FakeRemote::default().company_ok(company_dto()));
        let store = Arc::new(MemoryStore::new());
        let repo = repository(&remote, store.clone());

        let results = repo.observe_company().collect_all().await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().expect("company").name, "SpaceX");
        assert!(store.load_company().await.expect("load").is_some());
    }

    #[tokio::test]
    async fn test_company_uses_weekly_threshold() {
        let remote = Arc::new(FakeRemote::default());
        let store = Arc::new(
            MemoryStore::new().with_company(company_record(), Utc::now() - Duration::days(6)),
        );
        let repo = repository(&remote, store);

        let results = repo.observe_company().collect_all().await;
        assert_eq!(results.len(), 1);
        assert_eq!(remote.company_calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_company_refreshes_and_emits_twice() {
        let mut updated = company_dto();
        updated.employees = 9500;
        let remote = Arc::new(FakeRemote::default().company_ok(updated));
        let store = Arc::new(
            MemoryStore::new().with_company(company_record(), Utc::now() - Duration::days(8)),
        );
        let repo = repository(&remote, store);

        let results = repo.observe_company().collect_all().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().expect("cached").employees, 7000);
        assert_eq!(results[1].as_ref().expect("fresh").employees, 9500);
    }

    #[tokio::test]
    async fn test_stale_company_with_failed_fetch_keeps_cached() {
        let remote = Arc::new(FakeRemote::default().company_err("offline"));
        let store = Arc::new(
            MemoryStore::new().with_company(company_record(), Utc::now() - Duration::days(30)),
        );
        let repo = repository(&remote, store);

        let results = repo.observe_company().collect_all().await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[tokio::test]
    async fn test_custom_staleness_policy() {
        let remote = Arc::new(FakeRemote::default().launches_ok(remote_launches(9..=9)));
        let store = Arc::new(MemoryStore::new().with_launches(cached_launches(1), hours_ago(2)));
        let policy = StalenessPolicy {
            launches_max_age: Duration::hours(1),
            ..StalenessPolicy::default()
        };
        let repo = Repository::with_staleness(
            Arc::clone(&remote) as Arc<dyn RemoteFetcher>,
            store,
            policy,
        );

        let results = repo.observe_launches().collect_all().await;
        assert_eq!(results.len(), 2);
    }
}
