use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result};

use jiff::{SignedDuration, Timestamp};

use crate::link_gatherer::FetchError;

#[derive(Debug, PartialEq, Clone)]
pub enum PageOutcome {
    Links(Vec<String>),
    Broken(FetchError),
}

/// Everything a single crawl run found, keyed by the URL that was fetched.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,
    pub pages: HashMap<String, PageOutcome>,
    pub cancelled: bool,
    started: Timestamp,
}

impl CrawlReport {
    pub fn new(seed: String) -> Self {
        CrawlReport {
            seed,
            pages: HashMap::new(),
            cancelled: false,
            started: Timestamp::now(),
        }
    }

    pub fn add(&mut self, url: String, outcome: PageOutcome) {
        self.pages.insert(url, outcome);
    }

    pub fn visited_count(&self) -> usize {
        self.pages.len()
    }

    pub fn broken(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.pages.iter().filter_map(|(url, outcome)| match outcome {
            PageOutcome::Broken(err) => Some((url.as_str(), err)),
            PageOutcome::Links(_) => None,
        })
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.started)
    }
}

impl Display for CrawlReport {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{} pages checked, {} broken links in {:.2}s",
            self.visited_count(),
            self.broken().count(),
            self.elapsed().as_secs_f64()
        )
    }
}
