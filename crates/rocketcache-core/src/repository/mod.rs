//! Offline-first reconciliation of the local cache with the remote API.
//!
//! `Repository` hands out one `Observation` per pass. A pass emits the
//! cached snapshot first (when there is one), refreshes it from the network
//! when it is stale, and emits the fresh data second. A failed refresh is
//! only reported when there was nothing cached to show instead.

pub mod error;
pub mod observation;
pub mod policy;

pub use error::{RepositoryError, RepositoryResult};
pub use observation::Observation;
pub use policy::{Repository, StalenessPolicy};
