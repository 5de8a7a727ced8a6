//! Rewriting of raw HTML: find font stylesheet links, drop them, and inject
//! the combined replacement at the top of `<head>`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::collection::FontCollection;
use crate::config::CombineOptions;
use crate::error::Result;
use crate::output::{render_markup, CollectionSummary};
use crate::urls::is_font_request_url;

static LINK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("static link pattern"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("static attribute pattern")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static comment pattern"));

static HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").expect("static head pattern"));

static HTML5_DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<!DOCTYPE.+html>").expect("static doctype pattern"));

/// Result of [`rewrite`].
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub markup: String,
    pub changed: bool,
    /// Present when the markup was rewritten.
    pub summary: Option<CollectionSummary>,
}

impl Rewrite {
    fn unchanged(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            changed: false,
            summary: None,
        }
    }
}

/// Whether `markup` looks like an HTML document worth touching.
///
/// Fragments without an `<html>` tag or HTML5 doctype are skipped, and so
/// are XSL stylesheets.
pub fn is_markup_doable(markup: &str) -> bool {
    let lower = markup.to_ascii_lowercase();
    let has_html_tag = lower.contains("<html");
    let has_xsl_stylesheet = lower.contains("<xsl:stylesheet");
    let has_html5_doctype = HTML5_DOCTYPE_RE.is_match(markup);

    (has_html_tag || has_html5_doctype) && !has_xsl_stylesheet
}

/// A font stylesheet `<link>` found in markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Entity-decoded `href`.
    pub href: String,
    /// Byte range of the whole `<link>` tag.
    pub span: Range<usize>,
}

/// Every font stylesheet `<link>` outside HTML comments, in document order.
pub fn find_candidate_tags(markup: &str) -> Vec<LinkCandidate> {
    let comments: Vec<Range<usize>> = COMMENT_RE.find_iter(markup).map(|m| m.range()).collect();

    LINK_TAG_RE
        .find_iter(markup)
        .filter(|tag| !comments.iter().any(|c| c.contains(&tag.start())))
        .filter_map(|tag| {
            let href = stylesheet_href(tag.as_str())?;
            is_font_request_url(&href).then(|| LinkCandidate {
                href,
                span: tag.range(),
            })
        })
        .collect()
}

/// Entity-decoded hrefs of every live font stylesheet `<link>`.
pub fn find_candidates(markup: &str) -> Vec<String> {
    find_candidate_tags(markup)
        .into_iter()
        .map(|candidate| candidate.href)
        .collect()
}

fn stylesheet_href(tag: &str) -> Option<String> {
    let mut rel = None;
    let mut kind = None;
    let mut href = None;

    for caps in ATTR_RE.captures_iter(tag) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match caps[1].to_ascii_lowercase().as_str() {
            "rel" => rel = Some(value.to_ascii_lowercase()),
            "type" => kind = Some(value.trim().to_ascii_lowercase()),
            "href" => href = Some(html_escape::decode_html_entities(value.trim()).into_owned()),
            _ => {}
        }
    }

    let is_stylesheet = rel
        .as_deref()
        .is_some_and(|rel| rel.split_whitespace().any(|token| token == "stylesheet"));
    let is_css = kind.as_deref().map_or(true, |kind| kind == "text/css");

    if is_stylesheet && is_css {
        href
    } else {
        None
    }
}

/// Remove the font stylesheet `<link>` elements pointing at `links`, with
/// trailing whitespace.
///
/// Hrefs are compared after entity decoding on both sides, so `&`, `&amp;`,
/// `&#038;` or `&#x26;` spellings all match. Commented-out tags are kept.
pub fn remove_links<S: AsRef<str>>(markup: &str, links: &[S]) -> String {
    let wanted: Vec<String> = links
        .iter()
        .map(|link| html_escape::decode_html_entities(link.as_ref().trim()).into_owned())
        .collect();

    let spans: Vec<Range<usize>> = find_candidate_tags(markup)
        .into_iter()
        .filter(|candidate| wanted.contains(&candidate.href))
        .map(|candidate| candidate.span)
        .collect();

    remove_spans(markup, &spans)
}

/// Cut each of the ascending `spans` together with the whitespace after it.
fn remove_spans(markup: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut cursor = 0;

    for span in spans {
        if span.start < cursor {
            continue;
        }
        out.push_str(&markup[cursor..span.start]);
        let rest = &markup[span.end..];
        cursor = span.end + (rest.len() - rest.trim_start().len());
    }

    out.push_str(&markup[cursor..]);
    out
}

/// Insert `fragment` right after the first `<head>` tag of the trimmed markup.
///
/// Returns `None` when there is no `<head>` to inject into.
pub fn inject_into_head(markup: &str, fragment: &str) -> Option<String> {
    let markup = markup.trim();
    let head = HEAD_RE.find(markup)?;

    let mut out = String::with_capacity(markup.len() + fragment.len());
    out.push_str(&markup[..head.end()]);
    out.push_str(fragment);
    out.push_str(&markup[head.end()..]);
    Some(out)
}

/// Combine every font stylesheet request of `markup` into one.
///
/// The markup comes back untouched when it is not a document, when there
/// are not enough candidates, or when it has no `<head>`.
pub fn rewrite(markup: &str, options: &CombineOptions) -> Result<Rewrite> {
    if !is_markup_doable(markup) {
        debug!("markup is not an html document, skipping");
        return Ok(Rewrite::unchanged(markup));
    }

    let candidates = find_candidate_tags(markup);
    if !options.has_enough_candidates(candidates.len()) {
        debug!(
            candidates = candidates.len(),
            "not enough font requests to combine"
        );
        return Ok(Rewrite::unchanged(markup));
    }

    let collection = FontCollection::from_urls(candidates.iter().map(|c| c.href.as_str()))?;
    if !collection.has_complete() && !collection.has_text() {
        return Ok(Rewrite::unchanged(markup));
    }

    let fragment = render_markup(&collection, options.markup_type);
    let spans: Vec<Range<usize>> = candidates.into_iter().map(|c| c.span).collect();
    let stripped = remove_spans(markup, &spans);
    let Some(rewritten) = inject_into_head(&stripped, &fragment) else {
        debug!("markup has no <head>, skipping");
        return Ok(Rewrite::unchanged(markup));
    };

    Ok(Rewrite {
        markup: rewritten,
        changed: true,
        summary: Some(CollectionSummary::from(&collection)),
    })
}
