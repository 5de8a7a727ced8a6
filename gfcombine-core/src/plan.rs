//! Planning replacements for stylesheets registered under named handles.

use indexmap::IndexMap;
use serde::Serialize;

use crate::collection::FontCollection;
use crate::config::CombineOptions;
use crate::error::Result;
use crate::urls::is_font_request_url;

/// What a host should enqueue and dequeue to combine its font stylesheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlePlan {
    /// Final handle order: untouched handles first, then the new ones.
    pub handles: Vec<String>,
    /// New handles and the URL each one loads.
    pub enqueue: IndexMap<String, String>,
    /// Candidate handles that were folded into the new ones.
    pub removed: IndexMap<String, String>,
}

/// Compute the handle list that replaces every font request with combined ones.
///
/// `handles` are `(handle, url)` pairs in print order. Returns `None` when
/// there are too few font requests to bother.
pub fn plan_handles<H, U>(handles: &[(H, U)], options: &CombineOptions) -> Result<Option<HandlePlan>>
where
    H: AsRef<str>,
    U: AsRef<str>,
{
    let removed: IndexMap<String, String> = handles
        .iter()
        .filter(|(_, url)| is_font_request_url(url.as_ref()))
        .map(|(handle, url)| (handle.as_ref().to_string(), url.as_ref().to_string()))
        .collect();

    if !options.has_enough_candidates(removed.len()) {
        return Ok(None);
    }

    let collection = FontCollection::from_urls(removed.values())?;

    let mut enqueue = IndexMap::new();
    if let Some(url) = collection.combined_url() {
        enqueue.insert(options.handle_prefix.clone(), url);
    }
    for (idx, url) in collection.text_urls().into_iter().enumerate() {
        enqueue.insert(
            format!("{}-txt-{}", options.handle_prefix, idx + 1),
            url.to_string(),
        );
    }

    let handles = handles
        .iter()
        .map(|(handle, _)| handle.as_ref())
        .filter(|handle| !removed.contains_key(*handle))
        .map(str::to_string)
        .chain(enqueue.keys().cloned())
        .collect();

    Ok(Some(HandlePlan {
        handles,
        enqueue,
        removed,
    }))
}
