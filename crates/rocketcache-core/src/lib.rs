//! Core library for rocketcache.
//!
//! Fetches SpaceX launch and company data from the public v3 REST API, keeps
//! a local snapshot of each resource, and reconciles the two offline-first:
//! cached data is always handed out before the network is consulted, and a
//! failed refresh never replaces good cached data with an error.
//!
//! Layers, leaves first:
//!
//! - [`api`]: the remote fetcher (`ApiClient`) and its error type
//! - [`cache`]: local snapshot stores (`CacheManager` on disk, `MemoryStore`)
//! - [`repository`]: the reconciliation policy producing result streams
//! - [`view`]: pure presentation transforms (status, filter/sort, formatting)
//! - [`feed`]: the consumer-facing query surface tying it all together

pub mod api;
pub mod cache;
pub mod config;
pub mod feed;
pub mod models;
pub mod repository;
pub mod utils;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, ApiError, RemoteFetcher};
pub use cache::{CacheError, CacheManager, CachedData, LocalStore, MemoryStore};
pub use config::Config;
pub use feed::{LaunchFeed, LaunchPage};
pub use repository::{Observation, Repository, RepositoryError, StalenessPolicy};
