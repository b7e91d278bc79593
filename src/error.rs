use thiserror::Error;

/// Contract-level failures surfaced to the caller.
///
/// Malformed *data* never produces these: missing fields, bad dates and
/// unreadable assets all degrade inside the pipeline. Only violations of
/// the calling contract fail fast.
#[derive(Debug, Error)]
pub enum Error {
    #[error("template is empty")]
    EmptyTemplate,
    #[error("agreement record is not a JSON object")]
    MalformedRecord,
}

/// Why a scanned-document asset could not be materialized.
///
/// Never escapes the embedding resolver: each variant maps to an inline
/// placeholder for the one affected field.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset is empty: {0}")]
    Empty(String),
    #[error("asset exceeds size ceiling ({size} bytes): {source_ref}")]
    TooLarge { source_ref: String, size: u64 },
    #[error("asset unreadable: {0}")]
    Unreadable(String),
    #[error("unsupported asset source: {0}")]
    Unsupported(String),
}
