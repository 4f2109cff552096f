//! Output naming, directory setup and summary persistence.
//!
//! Summaries land at `{output_dir}/{stem}[-{suffix}].txt`. File names are
//! derived from distinct input stems, so no two files of one run share an
//! output path; writers never need to coordinate beyond the directory.

use crate::error::SummarizeError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of every summary file.
pub const OUTPUT_EXTENSION: &str = "txt";

/// `{stem}-{suffix}.txt`, or `{stem}.txt` when `suffix` is empty.
pub fn output_file_name(source: &Path, suffix: &str) -> String {
    let stem = source
        .file_stem()
        .unwrap_or(source.as_os_str())
        .to_string_lossy();

    if suffix.is_empty() {
        format!("{stem}.{OUTPUT_EXTENSION}")
    } else {
        format!("{stem}-{suffix}.{OUTPUT_EXTENSION}")
    }
}

/// Full output path for `source` under `output_dir`.
pub fn output_path(output_dir: &Path, source: &Path, suffix: &str) -> PathBuf {
    output_dir.join(output_file_name(source, suffix))
}

/// Create `dir` and any missing parents. Succeeds if it already exists,
/// including when another run creates it concurrently.
pub fn ensure_output_dir(dir: &Path) -> Result<(), SummarizeError> {
    std::fs::create_dir_all(dir).map_err(|e| SummarizeError::OutputDirFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;
    debug!("Output directory ready: {}", dir.display());
    Ok(())
}

/// Write `text` to `path`, replacing any existing file.
///
/// The text goes to a temp file in the same directory first and is renamed
/// into place, so a reader never sees a half-written summary.
pub fn write_summary(path: &Path, text: &str) -> Result<(), SummarizeError> {
    let write_err = |source: std::io::Error| SummarizeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// One written summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// The input PDF.
    pub source: PathBuf,
    /// Where its summary was written.
    pub output: PathBuf,
    /// Words in the summary.
    pub word_count: usize,
}

/// Result of a batch run. `records[i]` always belongs to input `i`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub records: Vec<SummaryRecord>,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Output paths in input order.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.records.iter().map(|r| r.output.as_path())
    }
}
