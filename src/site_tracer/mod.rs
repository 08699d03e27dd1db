use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use trace::Trace;
use tracing::Instrument;
use url::Url;

mod scope;
mod trace;
mod visited;

pub use scope::Scope;
use visited::VisitedSet;

use crate::link_gatherer::LinkGatherer;
use crate::report::{CrawlReport, PageOutcome};
use crate::resolver::{is_web_url, resolve};

pub struct SiteTracer<T: LinkGatherer + Clone + 'static> {
    pub link_getter: T,
    pub worker_pool_size: u16,
    pub same_origin: bool,
}

pub type WorkerResult = (String, PageOutcome);

/// Turns the raw hrefs of `page_url` into the absolute URLs worth queueing.
fn follow_links(
    hrefs: Vec<String>,
    page_url: &str,
    scope: &Scope,
    visited: &VisitedSet,
) -> Vec<String> {
    let mut seen = HashSet::new();
    hrefs
        .iter()
        .filter_map(|href| match resolve(href, page_url) {
            Some(url) => Some(url),
            None => {
                tracing::debug!("Skipping unresolvable link {:?}", href);
                None
            }
        })
        .filter(|url| is_web_url(url))
        .filter(|url| scope.allows(url))
        .filter(|url| !visited.contains(url))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

impl<T: LinkGatherer + Clone + 'static> SiteTracer<T> {
    fn worker(
        &self,
        url: String,
        scope: Scope,
        visited: Arc<VisitedSet>,
    ) -> impl Future<Output = WorkerResult> + Send + 'static {
        let mut link_getter = self.link_getter.clone();
        let span = tracing::info_span!("page", url = url.as_str());
        async move {
            tracing::debug!("fetching");
            let outcome = match link_getter.get_links(&url).await {
                Ok(hrefs) => {
                    let links = follow_links(hrefs, &url, &scope, &visited);
                    tracing::debug!("{} new links", links.len());
                    PageOutcome::Links(links)
                }
                Err(err) => PageOutcome::Broken(err),
            };
            (url, outcome)
        }
        .instrument(span)
    }

    fn fill_workers(&self, trace: &mut Trace, scope: &Scope) {
        while trace.has_process_capacity() {
            match trace.next_to_process() {
                Some(url) => {
                    let worker = self.worker(url, scope.clone(), trace.visited());
                    trace.push_processor(worker);
                }
                None => break,
            }
        }
    }

    /// Crawls everything reachable from `seed` and reports what broke.
    ///
    /// Returns once nothing is queued and no fetch is in flight, or as soon as
    /// `cancel` fires, in which case in-flight fetches are aborted and the
    /// report is marked cancelled.
    #[tracing::instrument(skip_all, fields(seed = seed.as_str()))]
    pub async fn trace(&self, seed: &Url, cancel: CancellationToken) -> CrawlReport {
        tracing::info!("Checking links on {}", seed);
        let scope = Scope::for_seed(seed, self.same_origin);
        let mut trace = Trace::new(seed.as_str(), self.worker_pool_size);

        loop {
            self.fill_workers(&mut trace, &scope);
            if trace.is_done() {
                break;
            }

            let finished = tokio::select! {
                _ = cancel.cancelled() => None,
                finished = trace.next_finished() => Some(finished),
            };

            match finished {
                None => {
                    tracing::warn!("Crawl cancelled");
                    trace.cancel().await;
                    break;
                }
                Some(Some(Ok((url, outcome)))) => {
                    match &outcome {
                        PageOutcome::Links(links) => {
                            for link in links {
                                trace.queue_to_process(link);
                            }
                        }
                        PageOutcome::Broken(err) => {
                            tracing::warn!("Detected broken link {}: {}", url, err);
                        }
                    }
                    trace.add_result(url, outcome);
                    tracing::debug!("{}", trace);
                }
                Some(Some(Err(err))) => tracing::error!("Worker failed: {}", err),
                Some(None) => (),
            }
        }

        trace.into_result()
    }
}
