//! Query parsing for font request URLs

use std::collections::HashMap;

use tracing::debug;
use url::form_urlencoded;

use crate::error::Result;
use crate::font::FontSpec;
use crate::urls::secure_upgrade;

/// HTML spellings of `&` that show up in hrefs copied out of markup.
const ENCODED_AMPERSANDS: [&str; 3] = ["&amp;", "&#038;", "&#38;"];

/// The query parameters of a font request that matter for combining.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    family: Option<String>,
    subset: Option<String>,
    text: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_subset(mut self, subset: impl Into<String>) -> Self {
        self.subset = Some(subset.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Decode the query string of `url` (form encoding, last value wins).
    pub fn from_url(url: &str) -> Self {
        let mut normalized = url.to_string();
        for encoded in ENCODED_AMPERSANDS {
            normalized = normalized.replace(encoded, "&");
        }

        let query = match normalized.split_once('?') {
            Some((_, rest)) => rest.split('#').next().unwrap_or_default(),
            None => return Self::default(),
        };

        let mut pairs: HashMap<String, String> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            family: pairs.remove("family"),
            subset: pairs.remove("subset"),
            text: pairs.remove("text"),
        }
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn subset(&self) -> Option<&str> {
        self.subset.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Requests scoped to a `text` sample cannot be merged with others.
    pub fn is_text_request(&self) -> bool {
        self.text.is_some()
    }

    /// Expand the `family` value into one spec per `|`-separated token.
    ///
    /// Tokens with an empty name are dropped; everything else degrades by
    /// omission.
    pub fn font_specs(&self) -> Vec<FontSpec> {
        let Some(family) = self.family.as_deref() else {
            return Vec::new();
        };

        let subset_override = self.subset.as_deref().filter(|s| !s.trim().is_empty());

        family
            .split('|')
            .filter_map(|token| match parse_family_token(token, subset_override) {
                Ok(spec) => Some(spec),
                Err(err) => {
                    debug!(token, %err, "dropping family token");
                    None
                }
            })
            .collect()
    }
}

/// What a single candidate URL contributes to a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRequest {
    /// Mergeable families, in encounter order.
    Complete(Vec<FontSpec>),
    /// A `text`-limited request, kept as its own secure URL.
    Text { spec: FontSpec, url: String },
    /// Nothing usable (no family, or only empty names).
    Empty,
}

/// Parse one font request URL into the specs it asks for.
pub fn parse_request(url: &str) -> Result<ParsedRequest> {
    let params = QueryParams::from_url(url);

    if params.is_text_request() {
        let first = params
            .family()
            .and_then(|family| family.split('|').next())
            .unwrap_or_default();

        return match parse_family_token(first, None) {
            Ok(spec) => Ok(ParsedRequest::Text {
                spec,
                url: secure_upgrade(url)?,
            }),
            Err(err) => {
                debug!(url, %err, "text request without a family name");
                Ok(ParsedRequest::Empty)
            }
        };
    }

    let specs = params.font_specs();
    if specs.is_empty() {
        Ok(ParsedRequest::Empty)
    } else {
        Ok(ParsedRequest::Complete(specs))
    }
}

/// Parse one `name[:sizes[:subsets]]` token.
///
/// `subset_override` (the URL-level `subset` parameter) wins over the
/// inline third segment.
pub fn parse_family_token(token: &str, subset_override: Option<&str>) -> Result<FontSpec> {
    let mut parts = token.split(':');
    let name = parts.next().unwrap_or_default();
    let sizes = parts.next().unwrap_or_default();
    let inline_subsets = parts.next().unwrap_or_default();

    let subsets = subset_override.unwrap_or(inline_subsets);
    FontSpec::new(name, sizes, subsets)
}
