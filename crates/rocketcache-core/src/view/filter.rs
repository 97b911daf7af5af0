use serde::{Deserialize, Serialize};

use crate::models::LaunchOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeFilter {
    #[default]
    All,
    SuccessOnly,
    FailureOnly,
}

impl OutcomeFilter {
    /// Launches with an unknown outcome only pass `All`
    pub fn matches(&self, outcome: LaunchOutcome) -> bool {
        match self {
            OutcomeFilter::All => true,
            OutcomeFilter::SuccessOnly => outcome == LaunchOutcome::Succeeded,
            OutcomeFilter::FailureOnly => outcome == LaunchOutcome::Failed,
        }
    }
}

/// Direction of the scheduled-time ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// What the launch list should show. Defaults to every launch, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchFilter {
    pub selected_year: Option<String>,
    pub outcome: OutcomeFilter,
    pub sort: SortOrder,
}

impl LaunchFilter {
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.selected_year = Some(year.into());
        self
    }

    pub fn with_outcome(mut self, outcome: OutcomeFilter) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches_year(&self, year: &str) -> bool {
        self.selected_year.as_deref().map_or(true, |selected| selected == year)
    }
}
