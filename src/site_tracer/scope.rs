use url::Url;

/// Which discovered links the crawl is allowed to follow.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Follow every link reachable from the seed.
    Everywhere,
    /// Follow only links on the seed's origin inside the seed's directory,
    /// e.g. `http://x.com/docs/` for a seed of `http://x.com/docs/index.html`.
    UnderSeed(String),
}

/// The seed with its query, fragment and last path segment dropped.
fn seed_directory(seed: &Url) -> String {
    let mut dir = seed.clone();
    dir.set_query(None);
    dir.set_fragment(None);
    let path = match dir.path().rfind('/') {
        Some(idx) => dir.path()[..=idx].to_string(),
        None => "/".to_string(),
    };
    dir.set_path(&path);
    dir.to_string()
}

impl Scope {
    pub fn for_seed(seed: &Url, same_origin: bool) -> Self {
        if same_origin {
            Scope::UnderSeed(seed_directory(seed))
        } else {
            Scope::Everywhere
        }
    }

    pub fn allows(&self, url: &str) -> bool {
        match self {
            Scope::Everywhere => true,
            Scope::UnderSeed(prefix) => url.starts_with(prefix.as_str()),
        }
    }
}
