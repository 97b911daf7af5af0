//! REST API client module for the SpaceX v3 API.
//!
//! This module provides the `RemoteFetcher` seam used by the repository
//! layer and `ApiClient`, its `reqwest` implementation. The API is public
//! and read-only; no authentication is involved.

pub mod client;
pub mod error;

pub use client::{ApiClient, RemoteFetcher, DEFAULT_BASE_URL};
pub use error::ApiError;
