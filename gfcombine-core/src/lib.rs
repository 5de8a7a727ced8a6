//! gfcombine-core: one stylesheet request where there used to be many
//!
//! Themes and plugins love to each pull their own Google Fonts stylesheet.
//! Every one of those is another round trip before text can render. This
//! library gathers all of them from a page, folds them into a single
//! request, and hands back something the page can use instead.
//!
//! ## How a page gets combined
//!
//! **Parsing**: every candidate URL is read for its `family`, `subset` and
//! `text` parameters
//! - `family` may list several fonts separated by `|`
//! - each font is `name[:sizes[:subsets]]`
//! - requests with `text` are kept apart; they cannot be merged
//!
//! **Collecting**: a [`FontCollection`] merges what was parsed
//! - sizes per family are deduplicated and sorted
//! - families come out in name order
//! - subsets keep the order they were first seen in
//!
//! **Rendering**: the merged data goes back out
//! - as one combined URL (plus one URL per `text` request)
//! - as `<link>` markup or as a WebFont loader `<script>` block
//! - as a rewritten HTML document, or a plan for named stylesheet handles
//!
//! ## A quick example
//!
//! ```rust
//! use gfcombine_core::collection::FontCollection;
//!
//! let collection = FontCollection::from_urls([
//!     "//fonts.googleapis.com/css?family=Open+Sans:700,400",
//!     "http://fonts.googleapis.com/css?family=Ubuntu:400&subset=latin,cyrillic",
//! ])?;
//!
//! assert_eq!(
//!     collection.combined_url().as_deref(),
//!     Some("https://fonts.googleapis.com/css?family=Open+Sans%3A400%2C700%7CUbuntu%3A400&subset=latin%2Ccyrillic"),
//! );
//! # Ok::<(), gfcombine_core::error::Error>(())
//! ```
//!
//! Nothing here touches the network or the filesystem. Each page render
//! should build its own collection; there is no shared state to worry about.
//!
//! ## The cast
//!
//! - [`FontSpec`]: one family with its sizes and subsets
//! - [`QueryParams`]: the interesting bits of a request URL
//! - [`FontCollection`]: everything requested by one page
//! - [`markup::rewrite`]: the whole job for an HTML document

pub mod collection;
pub mod config;
pub mod error;
pub mod font;
pub mod markup;
pub mod output;
pub mod plan;
pub mod query;
pub mod urls;

pub use collection::FontCollection;
pub use font::FontSpec;
pub use query::QueryParams;
