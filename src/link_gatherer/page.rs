use std::future::Future;
use std::sync::LazyLock;

use super::{body_getter::FetchError, BodyGetter};
use scraper::{Html, Selector};

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("`a` is a valid selector"));

pub trait LinkGatherer: Send + Sync + Clone {
    fn get_links(
        &mut self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct Page<T = reqwest::Client> {
    client: T,
}

impl<T: BodyGetter + Clone> Page<T> {
    pub fn new(client: T) -> Self {
        Page { client }
    }
}

/// Every `href` on an anchor, in document order, duplicates included.
///
/// The parser recovers from broken markup, so a truncated or malformed page
/// simply yields the anchors seen before the damage.
pub fn extract_links(html: &str) -> Vec<String> {
    Html::parse_document(html)
        .select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

impl<T: BodyGetter + Clone + Send + Sync> LinkGatherer for Page<T> {
    #[tracing::instrument(skip(self))]
    fn get_links(
        &mut self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send {
        async move {
            let text = self.client.get_body(url).await?;
            let links = extract_links(&text);
            tracing::debug!("Found {} links", links.len());
            tracing::trace!("Links {:?}", links);
            Ok(links)
        }
    }
}
