use std::{
    collections::VecDeque,
    fmt::{Display, Formatter, Result},
    future::Future,
    sync::Arc,
};

use tokio::task::{JoinError, JoinSet};

use crate::report::{CrawlReport, PageOutcome};

use super::{visited::VisitedSet, WorkerResult};

/// Per-run crawl state. Owned by the coordinator; only the visited set is
/// shared with workers.
pub struct Trace {
    report: CrawlReport,
    visited: Arc<VisitedSet>,
    frontier: VecDeque<String>,
    in_flight: JoinSet<WorkerResult>,
    outstanding: usize,
    capacity: usize,
}

impl Trace {
    pub fn new(seed: &str, worker_pool_size: u16) -> Self {
        Trace {
            report: CrawlReport::new(seed.to_string()),
            visited: Arc::new(VisitedSet::new()),
            frontier: VecDeque::from([seed.to_string()]),
            in_flight: JoinSet::new(),
            outstanding: 0,
            capacity: worker_pool_size.max(1) as usize,
        }
    }

    pub fn visited(&self) -> Arc<VisitedSet> {
        self.visited.clone()
    }

    pub fn into_result(self) -> CrawlReport {
        self.report
    }

    pub fn queue_to_process(&mut self, url: &str) {
        if self.visited.contains(url) {
            return;
        }
        self.frontier.push_back(url.to_string());
    }

    /// Pops the frontier until it finds a URL nobody has fetched yet and
    /// claims it.
    pub fn next_to_process(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            if self.visited.insert(&url) {
                return Some(url);
            }
        }
        None
    }

    pub fn has_process_capacity(&self) -> bool {
        self.outstanding < self.capacity
    }

    pub fn push_processor<F>(&mut self, worker: F)
    where
        F: Future<Output = WorkerResult> + Send + 'static,
    {
        self.in_flight.spawn(worker);
        self.outstanding += 1;
    }

    /// Waits for any in-flight worker. Cancel safe: the counter only moves
    /// once a result has actually been taken.
    pub async fn next_finished(&mut self) -> Option<std::result::Result<WorkerResult, JoinError>> {
        let finished = self.in_flight.join_next().await;
        if finished.is_some() {
            self.outstanding -= 1;
        }
        finished
    }

    pub fn add_result(&mut self, url: String, outcome: PageOutcome) {
        self.report.add(url, outcome);
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_empty() && self.outstanding == 0
    }

    pub async fn cancel(&mut self) {
        self.in_flight.shutdown().await;
        self.outstanding = 0;
        self.frontier.clear();
        self.report.cancelled = true;
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{} visited, {} queued, {} in flight",
            self.visited.len(),
            self.frontier.len(),
            self.outstanding
        )
    }
}
