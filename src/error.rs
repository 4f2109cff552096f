//! Error types for the pdfsumm library.
//!
//! Every failure in a batch is fatal for that batch: the drivers do not
//! collect per-file errors, they stop at the first one and hand it back as a
//! [`SummarizeError`]. Variants are grouped by the stage that raises them so
//! the binary can print an actionable hint without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfsumm library.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Input path points at a directory.
    #[error("'{path}' is a directory, expected a PDF file")]
    NotAFile { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error while reading the text layer of a page.
    #[error("Text extraction failed for '{path}' page {page}: {detail}")]
    ExtractionFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be initialised.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error for a document.
    #[error("LLM API error while summarising '{source_name}': {message}")]
    LlmApiError {
        source_name: String,
        message: String,
    },

    /// A prompt template without exactly one `{context}` placeholder.
    #[error("Invalid prompt template: expected exactly one {{context}} placeholder, found {found}")]
    InvalidPrompt { found: usize },

    // ── Precondition errors ───────────────────────────────────────────────
    /// The API key for the selected provider is not in the environment.
    #[error(
        "Missing API key. Make sure {var} is set or that a .env file containing \
the variable is present in the current directory."
    )]
    MissingCredential { var: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write a summary file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SummarizeError>;
