//! Presentation transforms.
//!
//! Everything here is synchronous and side-effect free: the caller supplies
//! "now" so results are reproducible.

pub mod company;
pub mod filter;
pub mod launch;

pub use company::{format_valuation, CompanyView};
pub use filter::{LaunchFilter, OutcomeFilter, SortOrder};
pub use launch::{
    available_years, filter_and_sort, launch_status, launch_year, LaunchStatus, LaunchView,
};
