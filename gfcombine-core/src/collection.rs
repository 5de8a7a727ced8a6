//! Aggregation of font requests found on one page.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::font::{dedup_in_order, sort_sizes, FontSpec};
use crate::query::{parse_request, ParsedRequest};
use crate::urls::build_url;

/// Which list a parsed font ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Mergeable into the combined request.
    Complete,
    /// Limited to a `text` sample; emitted on its own.
    Text,
}

/// A `text`-limited request: the family name and its secure URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntry {
    pub name: String,
    pub url: String,
}

/// Every font request gathered during one page render.
///
/// Build a fresh collection per page; it owns all specs and only hands out
/// read-only views.
#[derive(Debug, Clone, Default)]
pub struct FontCollection {
    links: Vec<String>,
    complete: Vec<FontSpec>,
    text: Vec<FontSpec>,
    subsets_map: BTreeMap<String, IndexSet<String>>,
    named_sizes: BTreeMap<String, Vec<String>>,
    text_entries: Vec<TextEntry>,
}

impl FontCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from candidate URLs in encounter order.
    pub fn from_urls<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collection = Self::new();
        for url in urls {
            collection.add(url.as_ref())?;
        }
        Ok(collection)
    }

    /// Record `url` and merge the fonts it requests.
    pub fn add(&mut self, url: &str) -> Result<()> {
        self.links.push(url.to_string());

        match parse_request(url)? {
            ParsedRequest::Complete(specs) => {
                for spec in specs {
                    self.add_complete(spec);
                }
                self.rebuild_named_sizes();
            }
            ParsedRequest::Text { spec, url } => {
                self.text_entries.push(TextEntry {
                    name: spec.name().to_string(),
                    url,
                });
                self.text.push(spec);
            }
            ParsedRequest::Empty => {
                debug!(url, "font request contributed no families");
            }
        }

        Ok(())
    }

    fn add_complete(&mut self, spec: FontSpec) {
        self.subsets_map
            .entry(spec.name().to_string())
            .or_default()
            .extend(spec.subsets().iter().cloned());
        self.complete.push(spec);
    }

    fn rebuild_named_sizes(&mut self) {
        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for spec in &self.complete {
            merged
                .entry(spec.name().to_string())
                .or_default()
                .extend(spec.sizes().iter().cloned());
        }

        for sizes in merged.values_mut() {
            let mut deduped = dedup_in_order(std::mem::take(sizes));
            sort_sizes(&mut deduped);
            *sizes = deduped;
        }

        self.named_sizes = merged;
    }

    /// Original candidate URLs, in the order they were added.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn fonts(&self, bucket: Bucket) -> &[FontSpec] {
        match bucket {
            Bucket::Complete => &self.complete,
            Bucket::Text => &self.text,
        }
    }

    /// Family name to sorted sizes, iterated in ascending name order.
    pub fn named_sizes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.named_sizes
    }

    /// Family name to its requested subsets, in first-seen order.
    pub fn subsets_map(&self) -> &BTreeMap<String, IndexSet<String>> {
        &self.subsets_map
    }

    /// All subsets requested by complete fonts, deduplicated, first-seen order.
    pub fn subsets(&self) -> Vec<String> {
        let unique: IndexSet<&String> = self
            .complete
            .iter()
            .flat_map(|spec| spec.subsets())
            .collect();
        unique.into_iter().cloned().collect()
    }

    pub fn text_entries(&self) -> &[TextEntry] {
        &self.text_entries
    }

    pub fn text_urls(&self) -> Vec<&str> {
        self.text_entries.iter().map(|e| e.url.as_str()).collect()
    }

    pub fn text_names(&self) -> Vec<&str> {
        self.text_entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn has_text(&self) -> bool {
        !self.text_entries.is_empty()
    }

    pub fn has_complete(&self) -> bool {
        !self.complete.is_empty()
    }

    /// Number of candidate URLs added so far.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The single request covering every complete font, if there are any.
    pub fn combined_url(&self) -> Option<String> {
        if !self.has_complete() {
            return None;
        }
        Some(build_url(&self.named_sizes, self.subsets()))
    }

    /// Data needed to render a script-loader configuration.
    pub fn script_data(
        &self,
    ) -> (
        &BTreeMap<String, Vec<String>>,
        &BTreeMap<String, IndexSet<String>>,
    ) {
        (&self.named_sizes, &self.subsets_map)
    }
}
