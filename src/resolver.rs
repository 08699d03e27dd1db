use url::Url;

/// Resolves `href` as found on `page_url` into an absolute URL string.
///
/// Returns `None` when either side cannot be parsed, so the caller can skip
/// the link instead of queueing something malformed.
pub fn resolve(href: &str, page_url: &str) -> Option<String> {
    if !is_reference(href) {
        return None;
    }
    let base = Url::parse(page_url).ok()?;
    let absolute = base.join(href).ok()?.to_string();
    if absolute.is_empty() {
        return None;
    }
    Some(absolute)
}

fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// RFC 3986 relative references may not carry a `:` in their first path
/// segment, e.g. `::not a url::`.
fn is_reference(href: &str) -> bool {
    let href = href.trim();
    if has_scheme(href) {
        return true;
    }
    let first_segment = href.split(['/', '?', '#']).next().unwrap_or("");
    !first_segment.contains(':')
}

/// Only http(s) links point at pages we can fetch.
pub fn is_web_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
