//! Font family specs: one `name[:sizes[:subsets]]` unit of a font request.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// One requested font family with its styles and character subsets.
///
/// Sizes are kept deduplicated and sorted with [`compare_sizes`]; subsets are
/// deduplicated but stay in the order they were first given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontSpec {
    name: String,
    sizes: Vec<String>,
    subsets: Vec<String>,
}

impl FontSpec {
    /// Build a spec, rejecting names that are empty once trimmed.
    pub fn new(name: &str, sizes: impl IntoTokens, subsets: impl IntoTokens) -> Result<Self> {
        let mut font = Self {
            name: String::new(),
            sizes: Vec::new(),
            subsets: Vec::new(),
        };
        font.set_name(name)?;
        font.set_sizes(sizes);
        font.set_subsets(subsets);
        Ok(font)
    }

    /// Build a name-only spec (default weight, no subsets).
    pub fn named(name: &str) -> Result<Self> {
        Self::new(name, Vec::<String>::new(), Vec::<String>::new())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "font name must not be empty".to_string(),
            ));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the sizes with `sizes`, trimming, deduplicating and sorting them.
    pub fn set_sizes(&mut self, sizes: impl IntoTokens) {
        let mut sizes = dedup_in_order(sizes.into_tokens());
        sort_sizes(&mut sizes);
        self.sizes = sizes;
    }

    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    pub fn sizes_string(&self) -> String {
        self.sizes.join(",")
    }

    /// Replace the subsets with `subsets`, trimming and deduplicating them.
    pub fn set_subsets(&mut self, subsets: impl IntoTokens) {
        self.subsets = dedup_in_order(subsets.into_tokens());
    }

    pub fn subsets(&self) -> &[String] {
        &self.subsets
    }

    pub fn subsets_string(&self) -> String {
        self.subsets.join(",")
    }

    /// Parse the compact `name[:sizes[:subsets]]` grammar.
    pub fn from_string(text: &str) -> Result<Self> {
        let mut parts = text.split(':');
        let name = parts.next().unwrap_or_default();
        let sizes = parts.next().unwrap_or_default();
        let subsets = parts.next().unwrap_or_default();
        Self::new(name, sizes, subsets)
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.sizes.is_empty() && self.subsets.is_empty() {
            return Ok(());
        }
        write!(f, ":{}", self.sizes_string())?;
        if !self.subsets.is_empty() {
            write!(f, ":{}", self.subsets_string())?;
        }
        Ok(())
    }
}

impl FromStr for FontSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

/// Values accepted by the size and subset setters.
///
/// A single string is treated as a comma-joined list; a sequence is taken
/// element by element. Every element is trimmed and empty ones are dropped.
pub trait IntoTokens {
    fn into_tokens(self) -> Vec<String>;
}

impl IntoTokens for &str {
    fn into_tokens(self) -> Vec<String> {
        clean(self.split(','))
    }
}

impl IntoTokens for String {
    fn into_tokens(self) -> Vec<String> {
        self.as_str().into_tokens()
    }
}

impl IntoTokens for &String {
    fn into_tokens(self) -> Vec<String> {
        self.as_str().into_tokens()
    }
}

impl IntoTokens for Vec<String> {
    fn into_tokens(self) -> Vec<String> {
        clean(self.iter().map(String::as_str))
    }
}

impl IntoTokens for Vec<&str> {
    fn into_tokens(self) -> Vec<String> {
        clean(self.into_iter())
    }
}

impl IntoTokens for &[String] {
    fn into_tokens(self) -> Vec<String> {
        clean(self.iter().map(String::as_str))
    }
}

impl IntoTokens for &[&str] {
    fn into_tokens(self) -> Vec<String> {
        clean(self.iter().copied())
    }
}

impl<const N: usize> IntoTokens for [&str; N] {
    fn into_tokens(self) -> Vec<String> {
        clean(self.into_iter())
    }
}

fn clean<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop repeated values, keeping the first occurrence of each.
pub(crate) fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

pub(crate) fn sort_sizes(sizes: &mut [String]) {
    sizes.sort_by(|a, b| compare_sizes(a, b));
}

/// Ordering used for style/weight tokens.
///
/// Tokens starting with digits compare by that number first, then by the
/// rest of the token (`100` < `100italic` < `300` < `1000`). Tokens without a
/// leading number sort after numbered ones, lexicographically.
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    let (a_num, a_rest) = split_number(a);
    let (b_num, b_rest) = split_number(b);

    let ordering = match (a_num, b_num) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a_rest.cmp(b_rest)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    };
    ordering.then_with(|| a.cmp(b))
}

fn split_number(token: &str) -> (Option<u64>, &str) {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if end == 0 {
        return (None, token);
    }
    (token[..end].parse().ok(), &token[end..])
}
