//! Options shared by the markup rewriter and the handle planner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How the combined request is put back into the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupType {
    /// `<link rel="stylesheet">` elements.
    #[default]
    Link,
    /// A WebFont loader `<script>` block.
    Script,
}

impl FromStr for MarkupType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(Self::Link),
            "script" => Ok(Self::Script),
            other => Err(Error::InvalidArgument(format!(
                "unknown markup type: {other} (expected link or script)"
            ))),
        }
    }
}

impl fmt::Display for MarkupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => f.write_str("link"),
            Self::Script => f.write_str("script"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineOptions {
    pub markup_type: MarkupType,
    /// Fewer candidate requests than this leaves the page untouched.
    pub min_candidates: usize,
    /// Handle name of the combined stylesheet; text requests get `-txt-N`.
    pub handle_prefix: String,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            markup_type: MarkupType::Link,
            min_candidates: 2,
            handle_prefix: "gfcombine-combined".to_string(),
        }
    }
}

impl CombineOptions {
    pub fn with_markup_type(mut self, markup_type: MarkupType) -> Self {
        self.markup_type = markup_type;
        self
    }

    pub fn with_min_candidates(mut self, min: usize) -> Self {
        self.min_candidates = min;
        self
    }

    pub fn with_handle_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.handle_prefix = prefix.into();
        self
    }

    /// Whether `count` candidates are enough to bother combining.
    pub fn has_enough_candidates(&self, count: usize) -> bool {
        count > 0 && count >= self.min_candidates
    }
}
