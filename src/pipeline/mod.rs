//! Per-document pipeline stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ summarize ──▶ (batch writes the .txt)
//! (checks)  (pdfium)    (LLM)
//! ```
//!
//! 1. [`input`]     — reject paths that are missing, directories or not PDFs
//! 2. [`extract`]   — read page text, combined or per page; placeholder mode
//!    for offline runs
//! 3. [`summarize`] — render the prompt and call the provider; the only
//!    stage with network I/O

pub mod extract;
pub mod input;
pub mod summarize;
