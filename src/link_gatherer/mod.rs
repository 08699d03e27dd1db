mod body_getter;
mod page;

pub use body_getter::{BodyGetter, FetchError};
pub use page::{LinkGatherer, Page};

#[cfg(test)]
pub(crate) use body_getter::tests::serve;
