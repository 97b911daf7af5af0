use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};

use super::RepositoryResult;

/// The result stream of one reconciliation pass.
///
/// Yields at most two items, in the order the pass produced them, then
/// ends. Dropping an observation aborts its pass; whatever the pass was
/// still waiting on is abandoned.
pub struct Observation<T> {
    rx: mpsc::Receiver<RepositoryResult<T>>,
    task: JoinHandle<()>,
}

impl<T> Observation<T> {
    pub(crate) fn new(rx: mpsc::Receiver<RepositoryResult<T>>, task: JoinHandle<()>) -> Self {
        Self { rx, task }
    }

    /// Wait for the next result; `None` once the pass has finished
    pub async fn next(&mut self) -> Option<RepositoryResult<T>> {
        self.rx.recv().await
    }

    /// Drain the pass to completion
    pub async fn collect_all(mut self) -> Vec<RepositoryResult<T>> {
        let mut results = Vec::new();
        while let Some(result) = self.rx.recv().await {
            results.push(result);
        }
        results
    }

    /// Handle for cancelling the pass without owning the stream
    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }
}

impl<T> Stream for Observation<T> {
    type Item = RepositoryResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<T> Drop for Observation<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
