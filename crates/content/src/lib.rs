//! Deck content: fetching the HTML fragment and preparing it for injection.

mod error;
mod fetch;
mod fragment;

pub use error::ContentError;
pub use fetch::{ContentFetcher, HttpContentFetcher, StaticContentFetcher, CONTENT_FRAGMENT_PATH};
pub use fragment::{
    FragmentSanitizer, SanitizedFragment, DEFAULT_TITLE, DOCUMENT_TITLE_SUFFIX, FALLBACK_MESSAGE,
};
