//! Document generation pipeline for rental agreements.
//!
//! Turns a structured agreement record into a rendered legal document:
//! HTML ready for a PDF renderer, or an ordered document model ready for
//! a word-processing file serializer. Persistence, auth, storage access
//! and UI are external; this crate is a pure transformation library.

mod convert;
mod embed;
mod error;
mod fields;
mod locale;
mod mapper;
mod model;
mod record;
mod template;

pub use convert::to_document_model;
pub use embed::{
    AssetFetcher, AssetFormat, AssetSource, EMBED_FIELDS, FsAssetFetcher, MAX_ASSET_BYTES,
    PdfPreviewer, embed_documents,
};
pub use error::{AssetError, Error};
pub use fields::{FieldKind, FieldTable, MappingEntry, field_mappings};
pub use locale::{
    format_date_dmy, format_gujarati_date, number_to_gujarati_words, number_to_words,
    to_gujarati_numerals,
};
pub use mapper::build_fields;
pub use model::{
    Alignment, DocumentElement, ImageBlock, ImageFormat, Paragraph, Table, TableCell, TableRow,
    TextRun, VerticalAlignment,
};
pub use record::{AgreementRecord, Language};
pub use template::render as render_template;

use std::time::Instant;

/// Run the full pipeline: map fields, resolve embedded documents, render
/// the template. The returned HTML is safe to hand to a PDF renderer; no
/// `{{...}}` placeholder syntax survives.
pub fn render_html(
    record: &AgreementRecord,
    template: &str,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
) -> Result<String, Error> {
    if template.trim().is_empty() {
        return Err(Error::EmptyTemplate);
    }
    if !record.is_object() {
        return Err(Error::MalformedRecord);
    }

    let t0 = Instant::now();
    let fields = mapper::build_fields(record);
    let t_map = t0.elapsed();

    let fields = embed::embed_documents(fields, record, fetcher, previewer);
    let t_embed = t0.elapsed();

    let html = template::render(template, &fields);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: map={:.1}ms, embed={:.1}ms, render={:.1}ms (output {} bytes)",
        t_map.as_secs_f64() * 1000.0,
        (t_embed - t_map).as_secs_f64() * 1000.0,
        (t_total - t_embed).as_secs_f64() * 1000.0,
        html.len(),
    );

    Ok(html)
}

/// Render straight to the document model for native word-processing
/// output: the HTML path of [`render_html`] followed by the structural
/// re-parse of [`to_document_model`].
pub fn render_document_model(
    record: &AgreementRecord,
    template: &str,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
) -> Result<Vec<DocumentElement>, Error> {
    let html = render_html(record, template, fetcher, previewer)?;
    let t0 = Instant::now();
    let elements = convert::to_document_model(&html, record, fetcher, previewer);
    log::info!(
        "Timing: convert={:.1}ms ({} elements)",
        t0.elapsed().as_secs_f64() * 1000.0,
        elements.len(),
    );
    Ok(elements)
}
