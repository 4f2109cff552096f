//! Text extraction: read the text layer of a PDF via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a C++ library behind a global lock (`thread_safe` feature) and
//! every call blocks. [`Extractor::extract_async`] moves the work onto
//! tokio's blocking pool so the summarisation futures polled alongside it
//! keep making progress while a large PDF is parsed.
//!
//! ## Placeholder mode
//!
//! With [`ExtractionMode::Placeholder`] the file is never opened: every call
//! returns the same one-segment document. The async variant sleeps for
//! [`PLACEHOLDER_DELAY`] first so tests exercise real suspension points.

use crate::config::ExtractionMode;
use crate::error::SummarizeError;
use crate::output::word_count;
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Join string used in combined mode when the caller passes `None`.
pub const DEFAULT_PAGE_DELIMITER: &str = "\n-----\n\n";

/// Content of the placeholder document.
pub const PLACEHOLDER_TEXT: &str = "This is a fake document";

/// Title recorded in the placeholder document's metadata.
pub const PLACEHOLDER_TITLE: &str = "Fake document";

/// Simulated latency of [`Extractor::extract_async`] in placeholder mode.
pub const PLACEHOLDER_DELAY: Duration = Duration::from_millis(250);

/// One contiguous run of text: a single page, or the whole file when pages
/// are combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub content: String,
    /// 1-indexed page number; `None` for a combined segment.
    pub page: Option<usize>,
}

/// What we know about the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: PathBuf,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub page_count: usize,
}

/// Extracted text of one PDF, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub segments: Vec<TextSegment>,
    pub metadata: DocumentMetadata,
}

impl ExtractedDocument {
    /// All segments joined by a blank line; this is what gets rendered into
    /// the prompt.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total whitespace-delimited words across all segments.
    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| word_count(&s.content)).sum()
    }

    /// Short display name for logs and error messages.
    pub fn source_name(&self) -> String {
        self.metadata
            .source
            .file_name()
            .unwrap_or(self.metadata.source.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    fn placeholder(path: &Path) -> Self {
        Self {
            segments: vec![TextSegment {
                content: PLACEHOLDER_TEXT.to_string(),
                page: None,
            }],
            metadata: DocumentMetadata {
                source: path.to_path_buf(),
                title: Some(PLACEHOLDER_TITLE.to_string()),
                page_count: 1,
                ..Default::default()
            },
        }
    }
}

/// Produces [`ExtractedDocument`]s from PDF paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    mode: ExtractionMode,
}

impl Extractor {
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Extract `path`, blocking the current thread.
    ///
    /// With `combine` every page is joined into one segment using
    /// `delimiter` (or [`DEFAULT_PAGE_DELIMITER`]); otherwise each page
    /// becomes its own segment.
    pub fn extract(
        &self,
        path: &Path,
        combine: bool,
        delimiter: Option<&str>,
    ) -> Result<ExtractedDocument, SummarizeError> {
        match self.mode {
            ExtractionMode::Placeholder => Ok(ExtractedDocument::placeholder(path)),
            ExtractionMode::Real => {
                extract_blocking(path, combine, delimiter.unwrap_or(DEFAULT_PAGE_DELIMITER))
            }
        }
    }

    /// Async variant of [`Extractor::extract`] with the same contract.
    pub async fn extract_async(
        &self,
        path: &Path,
        combine: bool,
        delimiter: Option<&str>,
    ) -> Result<ExtractedDocument, SummarizeError> {
        match self.mode {
            ExtractionMode::Placeholder => {
                tokio::time::sleep(PLACEHOLDER_DELAY).await;
                Ok(ExtractedDocument::placeholder(path))
            }
            ExtractionMode::Real => {
                let path = path.to_path_buf();
                let delimiter = delimiter.unwrap_or(DEFAULT_PAGE_DELIMITER).to_string();
                tokio::task::spawn_blocking(move || extract_blocking(&path, combine, &delimiter))
                    .await
                    .map_err(|e| SummarizeError::Internal(format!("Extract task panicked: {}", e)))?
            }
        }
    }
}

/// Bind to pdfium through pdfium-auto: `PDFIUM_LIB_PATH` if it exists,
/// else the cached library, downloading it on first use.
fn bind_pdfium() -> Result<Pdfium, SummarizeError> {
    pdfium_auto::bind_pdfium_silent()
        .map_err(|e| SummarizeError::PdfiumBindingFailed(e.to_string()))
}

/// Blocking implementation of text extraction.
fn extract_blocking(
    path: &Path,
    combine: bool,
    delimiter: &str,
) -> Result<ExtractedDocument, SummarizeError> {
    if !path.is_file() {
        return Err(SummarizeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| SummarizeError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

    let metadata = document.metadata();
    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("{}: {} pages", path.display(), page_count);

    let mut page_texts = Vec::with_capacity(page_count);
    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| SummarizeError::ExtractionFailed {
                path: path.to_path_buf(),
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Page {}: {} chars", idx + 1, text.len());
        page_texts.push(text);
    }

    if page_texts.iter().all(|t| t.trim().is_empty()) {
        warn!("{}: no text layer found (scanned PDF?)", path.display());
    }

    let segments = if combine {
        vec![TextSegment {
            content: page_texts.join(delimiter),
            page: None,
        }]
    } else {
        page_texts
            .into_iter()
            .enumerate()
            .map(|(idx, content)| TextSegment {
                content,
                page: Some(idx + 1),
            })
            .collect()
    };

    Ok(ExtractedDocument {
        segments,
        metadata: DocumentMetadata {
            source: path.to_path_buf(),
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            page_count,
        },
    })
}
