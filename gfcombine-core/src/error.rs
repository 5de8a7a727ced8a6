//! Error types for gfcombine-core

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A font family was given without a usable name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A URL too short to inspect was handed to [`crate::urls::secure_upgrade`].
    #[error("malformed url: {url:?} is too short to upgrade")]
    MalformedUrl { url: String },

    #[error("serializing output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("writing output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
