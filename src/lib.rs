//! # pdfsumm
//!
//! Batch-summarise PDF documents with an LLM, one `.txt` summary per PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Input      validate paths (exists, file, %PDF magic)
//!  ├─ 2. Extract    page text via pdfium, all pages combined
//!  ├─ 3. Summarize  prompt template + LLM call (edgequake-llm)
//!  └─ 4. Output     {output_dir}/{stem}[-{suffix}].txt
//! ```
//!
//! Two drivers share that shape. [`BatchDriver::run`] processes one file at
//! a time; [`BatchDriver::run_async`] runs extract-all, summarize-all and
//! write-all as three concurrent stages. Both keep `records[i]` matched to
//! input `i` and stop at the first failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsumm::{build_summarizer_from_config, BatchDriver, SummarizeConfig};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummarizeConfig::builder().output_dir("summaries").build()?;
//!     let summarizer = build_summarizer_from_config(&config)?;
//!     let files = vec![PathBuf::from("paper.pdf")];
//!     let report = BatchDriver::from_config(&config)
//!         .run_async(&summarizer, &files, &config.output_dir, &config.suffix)
//!         .await?;
//!     for record in &report.records {
//!         println!("{} → {}", record.source.display(), record.output.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsumm` binary (clap + anyhow + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod credentials;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::BatchDriver;
pub use config::{ExecutionMode, ExtractionMode, SummarizeConfig, SummarizeConfigBuilder, SummaryType};
pub use credentials::{check_credential, credential_var};
pub use error::SummarizeError;
pub use output::{output_file_name, output_path, BatchReport, SummaryRecord};
pub use pipeline::extract::{DocumentMetadata, ExtractedDocument, Extractor, TextSegment};
pub use pipeline::input::{validate_input, validate_inputs};
pub use pipeline::summarize::{build_summarizer, build_summarizer_from_config, LlmSummarizer, Summarizer};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
