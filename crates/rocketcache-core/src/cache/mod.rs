//! Local caching module for offline data access.
//!
//! This module provides the `LocalStore` seam and two stores behind it:
//! `CacheManager`, which keeps each resource as a JSON file on disk, and
//! `MemoryStore`, which keeps them in process. Every snapshot is wrapped in
//! `CachedData` so its last-write time travels with it.
//!
//! Cached resources:
//! - Launches (one row per flight number)
//! - Company profile (singleton)

pub mod error;
pub mod manager;
pub mod memory;
pub mod store;

pub use error::CacheError;
pub use manager::{CacheAges, CacheManager, CachedData};
pub use memory::MemoryStore;
pub use store::{normalize_launches, LocalStore};
