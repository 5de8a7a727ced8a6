//! Font request URL helpers: detection, synthesis and scheme upgrades.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::font::dedup_in_order;

/// Stylesheet endpoint every combined request points at.
pub const GOOGLE_FONTS_CSS_URL: &str = "https://fonts.googleapis.com/css";

const FONT_REQUEST_MARKER: &str = "fonts.googleapis.com/css";
const DEFAULT_AMPERSAND: &str = "&amp;";

static AMPERSAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#?\w+;)?").expect("static ampersand pattern"));

/// Case-insensitive substring check for the Google Fonts stylesheet endpoint.
///
/// Anything containing `fonts.googleapis.com/css` qualifies, host or not.
pub fn is_font_request_url(url: &str) -> bool {
    url.to_ascii_lowercase().contains(FONT_REQUEST_MARKER)
}

/// Build a single combined stylesheet URL.
///
/// `fonts` yields `(name, sizes)` pairs in the order they should appear;
/// `subsets` is deduplicated keeping first-seen order and omitted when empty.
pub fn build_url<I, N, V, J>(fonts: I, subsets: J) -> String
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: IntoIterator,
    V::Item: AsRef<str>,
    J: IntoIterator,
    J::Item: AsRef<str>,
{
    let families: Vec<String> = fonts
        .into_iter()
        .map(|(name, sizes)| {
            let sizes: Vec<String> = sizes
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            format!("{}:{}", name.as_ref().trim(), sizes.join(","))
                .trim_matches(':')
                .to_string()
        })
        .collect();

    let subsets = dedup_in_order(
        subsets
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    );

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("family", &families.join("|"));
    if !subsets.is_empty() {
        query.append_pair("subset", &subsets.join(","));
    }

    format!("{GOOGLE_FONTS_CSS_URL}?{}", query.finish())
}

/// Rewrite a protocol-relative or plain-HTTP URL into an explicit `https://` one.
pub fn secure_upgrade(url: &str) -> Result<String> {
    if url.trim().chars().count() < 2 {
        return Err(Error::MalformedUrl {
            url: url.to_string(),
        });
    }

    if url.starts_with("//") {
        return Ok(format!("https:{url}"));
    }

    let rest = strip_prefix_ignore_case(url, "https://")
        .or_else(|| strip_prefix_ignore_case(url, "http://"))
        .unwrap_or(url);
    Ok(format!("https://{rest}"))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Replace every `&` that does not open an entity (`&name;`, `&#123;`).
///
/// A blank `replacement` falls back to `&amp;`.
pub fn encode_bare_ampersands(text: &str, replacement: &str) -> String {
    let replacement = match replacement.trim() {
        "" => DEFAULT_AMPERSAND,
        other => other,
    };

    AMPERSAND_RE
        .replace_all(text, |caps: &Captures| {
            if caps.get(1).is_some() {
                caps[0].to_string()
            } else {
                replacement.to_string()
            }
        })
        .into_owned()
}
