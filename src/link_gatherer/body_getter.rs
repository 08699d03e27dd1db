use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Why a page could not be fetched. Every variant makes the URL a broken link.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("unreadable body: {0}")]
    Content(String),
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

pub trait BodyGetter {
    fn get_body(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

// The response is owned by the future, so the connection goes back to the
// pool (or is closed) on every return path.
impl BodyGetter for reqwest::Client {
    #[tracing::instrument(skip(self))]
    fn get_body(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            let resp = match self.get(url).send().await {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::debug!("{}", err);
                    return Err(FetchError::Request(err.to_string()));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                tracing::debug!("Unsuccessful status {}", status);
                return Err(FetchError::Status(status.as_u16()));
            }

            // A reachable image or archive is a working link, but there is
            // nothing to scan in it, so leave its body unread.
            if let Some(content_type) = resp.headers().get(CONTENT_TYPE) {
                let content_type = content_type.to_str().unwrap_or_default();
                if !is_html(content_type) {
                    tracing::debug!("Not scanning {} body", content_type);
                    return Ok(String::new());
                }
            }

            match resp.text().await {
                Ok(content) => Ok(content),
                Err(err) => {
                    tracing::debug!("{}", err);
                    Err(FetchError::Content(err.to_string()))
                }
            }
        }
    }
}
