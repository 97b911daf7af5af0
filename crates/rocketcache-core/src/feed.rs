//! Consumer-facing query surface.
//!
//! `LaunchFeed` is what a screen (or the CLI) talks to. It turns repository
//! passes into presentation-ready views and makes sure that starting a new
//! launches query, for example after the filter changed, cancels the one
//! still running.

use chrono::Utc;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use tracing::debug;

use crate::repository::{Repository, RepositoryResult};
use crate::view::{available_years, filter_and_sort, CompanyView, LaunchFilter, LaunchView};

/// One rendering of the launch list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPage {
    pub launches: Vec<LaunchView>,
    /// Every year present in the unfiltered data, for the year picker
    pub available_years: Vec<String>,
}

pub struct LaunchFeed {
    repository: Repository,
    launches_pass: Option<AbortHandle>,
    company_pass: Option<AbortHandle>,
}

impl LaunchFeed {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            launches_pass: None,
            company_pass: None,
        }
    }

    fn supersede_launches(&mut self) {
        if let Some(handle) = self.launches_pass.take() {
            debug!("Cancelling previous launches pass");
            handle.abort();
        }
    }

    /// Launch list plus year picker contents, filtered and sorted per `filter`
    pub fn observe_launch_page(
        &mut self,
        filter: LaunchFilter,
    ) -> impl Stream<Item = RepositoryResult<LaunchPage>> + Send + Unpin {
        self.supersede_launches();
        let observation = self.repository.observe_launches();
        self.launches_pass = Some(observation.abort_handle());

        observation.map(move |result| {
            result.map(|launches| LaunchPage {
                launches: filter_and_sort(&launches, &filter, Utc::now().timestamp()),
                available_years: available_years(&launches),
            })
        })
    }

    pub fn observe_launches(
        &mut self,
        filter: LaunchFilter,
    ) -> impl Stream<Item = RepositoryResult<Vec<LaunchView>>> + Send + Unpin {
        self.observe_launch_page(filter)
            .map(|result| result.map(|page| page.launches))
    }

    pub fn observe_company(
        &mut self,
    ) -> impl Stream<Item = RepositoryResult<CompanyView>> + Send + Unpin {
        if let Some(handle) = self.company_pass.take() {
            handle.abort();
        }
        let observation = self.repository.observe_company();
        self.company_pass = Some(observation.abort_handle());

        observation.map(|result| result.map(|company| CompanyView::new(&company)))
    }

    /// Force a launches fetch, cancelling any launches pass in flight
    pub async fn refresh_launches(&mut self) -> RepositoryResult<()> {
        self.supersede_launches();
        self.repository.refresh_launches().await
    }
}

impl Drop for LaunchFeed {
    fn drop(&mut self) {
        self.supersede_launches();
        if let Some(handle) = self.company_pass.take() {
            handle.abort();
        }
    }
}
