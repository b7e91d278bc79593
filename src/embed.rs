//! Document Embedding Resolver: turns whitelisted URL/path fields into
//! embeddable markup (inline image or labeled placeholder).
//!
//! Every failure is absorbed here. A missing, oversized or unreadable
//! scan degrades that one field to a placeholder block; the rest of the
//! render proceeds.

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AssetError;
use crate::fields::{FieldKind, FieldTable, field_mappings};
use crate::record::AgreementRecord;

/// Hard admission-control ceiling for a single scanned document.
pub const MAX_ASSET_BYTES: u64 = 50 * 1024 * 1024;

/// The fixed whitelist of embeddable fields and their humanized labels.
pub const EMBED_FIELDS: [(&str, &str); 5] = [
    ("OWNER_AADHAAR_DOCUMENT", "Owner Aadhaar Card"),
    ("OWNER_PAN_DOCUMENT", "Owner PAN Card"),
    ("TENANT_AADHAAR_DOCUMENT", "Tenant Aadhaar Card"),
    ("TENANT_PAN_DOCUMENT", "Tenant PAN Card"),
    ("PROPERTY_DOCUMENTS", "Property Documents"),
];

static CLOUD_HOST: Lazy<Regex> = Lazy::new(|| {
    // Known object-storage host shapes: S3-style, GCS, Azure blobs,
    // generic "storage." subdomains.
    Regex::new(r"^https?://[^/]*(\bs3[.-]|storage\.|\.blob\.|objectstorage)[^/]*/").unwrap()
});

#[derive(Clone, Debug, PartialEq)]
pub enum AssetSource {
    /// Object-storage URL, downloaded by the external collaborator.
    Cloud(String),
    /// `/uploads/...` path or bare filename on local disk.
    Local(String),
    Unsupported(String),
}

impl AssetSource {
    pub fn classify(value: &str) -> Self {
        let v = value.trim();
        if CLOUD_HOST.is_match(v) {
            AssetSource::Cloud(v.to_string())
        } else if v.starts_with("/uploads/") || (!v.contains('/') && v.contains('.')) {
            AssetSource::Local(v.to_string())
        } else {
            AssetSource::Unsupported(v.to_string())
        }
    }

    fn describe(&self) -> &str {
        match self {
            AssetSource::Cloud(s) | AssetSource::Local(s) | AssetSource::Unsupported(s) => s,
        }
    }
}

/// Binary format decided by signature bytes, never by file extension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AssetFormat {
    Pdf,
    Jpeg,
    Png,
    Unknown,
}

impl AssetFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF") {
            AssetFormat::Pdf
        } else if bytes.starts_with(&[0xFF, 0xD8]) {
            AssetFormat::Jpeg
        } else if bytes.starts_with(&[0x89, 0x50]) {
            AssetFormat::Png
        } else {
            AssetFormat::Unknown
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            AssetFormat::Pdf => "application/pdf",
            AssetFormat::Jpeg => "image/jpeg",
            AssetFormat::Png => "image/png",
            AssetFormat::Unknown => "application/octet-stream",
        }
    }
}

/// External collaborator that materializes raw bytes for an asset source.
/// Cloud implementations may cache downloads in a scratch directory;
/// cleanup of that scratch space is theirs.
pub trait AssetFetcher: Sync {
    fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, AssetError>;
}

/// Optional external facility converting the first PDF page to PNG bytes.
/// Absent or failing conversion degrades to a textual placeholder.
pub trait PdfPreviewer: Sync {
    fn first_page_png(&self, pdf: &[u8]) -> Option<Vec<u8>>;
}

/// Filesystem-backed fetcher for locally uploaded scans. Cloud URLs are
/// rejected; wiring in a downloader is the surrounding application's job.
pub struct FsAssetFetcher {
    root: PathBuf,
}

impl FsAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFetcher for FsAssetFetcher {
    fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, AssetError> {
        match source {
            AssetSource::Local(path) => {
                let rel = path.strip_prefix("/uploads/").unwrap_or(path);
                let full = self.root.join(rel);
                let meta = std::fs::metadata(&full)
                    .map_err(|_| AssetError::NotFound(path.clone()))?;
                if meta.len() > MAX_ASSET_BYTES {
                    return Err(AssetError::TooLarge { source_ref: path.clone(), size: meta.len() });
                }
                std::fs::read(&full).map_err(|_| AssetError::Unreadable(path.clone()))
            }
            AssetSource::Cloud(url) => Err(AssetError::Unsupported(format!(
                "no storage collaborator configured for {url}"
            ))),
            AssetSource::Unsupported(s) => Err(AssetError::Unsupported(s.clone())),
        }
    }
}

pub(crate) fn is_sentinel(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "undefined" || v == "null" || v == "[object Object]" || v.len() < 4
}

/// Replace whitelisted document fields with embeddable markup.
///
/// Independent fields resolve concurrently (the whitelist bounds the
/// fan-out); one failed resolution never blocks the others. Fields whose
/// value is absent or a sentinel are left untouched.
pub fn embed_documents(
    fields: FieldTable,
    record: &AgreementRecord,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
) -> FieldTable {
    let candidates: Vec<(&str, &str, String)> = EMBED_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            let value = fields
                .get(key)
                .map(str::to_string)
                .or_else(|| source_from_record(record, key))?;
            if is_sentinel(&value) {
                return None;
            }
            Some((*key, *label, value))
        })
        .collect();

    let mut resolved: Vec<(&str, String)> = Vec::with_capacity(candidates.len());
    std::thread::scope(|scope| {
        let handles: Vec<_> = candidates
            .iter()
            .map(|(key, label, value)| {
                scope.spawn(move || (*key, resolve_one(label, value, fetcher, previewer)))
            })
            .collect();
        for handle in handles {
            // A panicking resolution degrades like any other failure.
            if let Ok(pair) = handle.join() {
                resolved.push(pair);
            }
        }
    });

    let mut out = fields;
    for (key, markup) in resolved {
        out.set(key, markup);
    }
    out
}

/// Fall back to the raw record when the field table was built without the
/// document rows (callers sometimes hand over a pruned table).
pub(crate) fn source_from_record(record: &AgreementRecord, key: &str) -> Option<String> {
    field_mappings()
        .iter()
        .filter(|row| row.key == key && row.kind == FieldKind::Url)
        .find_map(|row| record.path_str(&row.source))
}

/// Materialize one whitelisted field into markup. Infallible by design.
fn resolve_one(
    label: &str,
    value: &str,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
) -> String {
    let source = AssetSource::classify(value);
    let bytes = match fetcher.fetch(&source).and_then(|bytes| admit(bytes, &source)) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("{label}: {err}");
            return placeholder(label, "preview unavailable");
        }
    };

    match AssetFormat::sniff(&bytes) {
        format @ (AssetFormat::Jpeg | AssetFormat::Png) => {
            image_container(label, format.mime(), &bytes)
        }
        AssetFormat::Pdf => match previewer.and_then(|p| p.first_page_png(&bytes)) {
            Some(png) => image_container(label, "image/png", &png),
            None => {
                log::warn!("{label}: no PDF preview facility, attaching placeholder");
                placeholder(label, "preview unavailable")
            }
        },
        AssetFormat::Unknown => placeholder(label, "attached"),
    }
}

/// Fetchers are external, so their results are re-checked on the way in.
fn admit(bytes: Vec<u8>, source: &AssetSource) -> Result<Vec<u8>, AssetError> {
    if bytes.is_empty() {
        return Err(AssetError::Empty(source.describe().to_string()));
    }
    if bytes.len() as u64 > MAX_ASSET_BYTES {
        return Err(AssetError::TooLarge {
            source_ref: source.describe().to_string(),
            size: bytes.len() as u64,
        });
    }
    Ok(bytes)
}

/// Paginated output renders each embedded document as its own section,
/// hence the page-break hint on every container.
fn image_container(label: &str, mime: &str, bytes: &[u8]) -> String {
    format!(
        "<div class=\"embedded-document\" style=\"page-break-before: always;\">\
         <p class=\"document-label\"><strong>{label}</strong></p>\
         <img src=\"data:{mime};base64,{}\" style=\"max-width: 100%; max-height: 880px;\"/>\
         </div>",
        BASE64.encode(bytes)
    )
}

fn placeholder(label: &str, note: &str) -> String {
    format!(
        "<div class=\"embedded-document\" style=\"page-break-before: always;\">\
         <p class=\"document-label\"><strong>{label}</strong></p>\
         <p class=\"document-placeholder\">Document {note}</p>\
         </div>"
    )
}
