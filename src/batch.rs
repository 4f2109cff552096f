//! Batch drivers: summarise a list of PDFs into one text file each.
//!
//! ## Sync vs. async
//!
//! [`BatchDriver::run`] handles one file at a time: extract, summarise,
//! write, then the next file. A failure stops the loop; summaries already
//! written stay on disk.
//!
//! [`BatchDriver::run_async`] runs three stages back to back, each one
//! fully concurrent inside the calling task:
//!
//! ```text
//! extract-all ──join──▶ summarize-all ──join──▶ mkdir + write-all
//! ```
//!
//! Every future in a stage is polled to completion before the stage
//! returns. If any of them failed, the first failure in input order is
//! returned and nothing is written. Results keep input order no matter
//! which future finishes first.

use crate::config::SummarizeConfig;
use crate::error::SummarizeError;
use crate::output::{
    ensure_output_dir, output_path, word_count, write_summary, BatchReport, SummaryRecord,
};
use crate::pipeline::extract::{ExtractedDocument, Extractor};
use crate::pipeline::summarize::Summarizer;
use crate::progress::{ProgressCallback, Stage};
use futures::future::join_all;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Drives extraction, summarisation and persistence over a batch of files.
#[derive(Clone)]
pub struct BatchDriver {
    extractor: Extractor,
    progress: Option<ProgressCallback>,
    page_delimiter: String,
}

impl BatchDriver {
    /// Driver with no progress reporting that joins pages with no delimiter.
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor,
            progress: None,
            page_delimiter: String::new(),
        }
    }

    /// Driver using the config's extraction mode and delimiter override.
    pub fn from_config(config: &SummarizeConfig) -> Self {
        let mut driver = Self::new(Extractor::new(config.extraction));
        if let Some(ref delim) = config.page_delimiter {
            driver.page_delimiter = delim.clone();
        }
        driver
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_page_delimiter(mut self, delim: impl Into<String>) -> Self {
        self.page_delimiter = delim.into();
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Summarise `files` one after another, writing each summary to
    /// `output_dir/{stem}[-{suffix}].txt` before starting the next file.
    pub fn run(
        &self,
        summarizer: &dyn Summarizer,
        files: &[PathBuf],
        output_dir: &Path,
        suffix: &str,
    ) -> Result<BatchReport, SummarizeError> {
        let start = Instant::now();
        let total = files.len();
        info!("Summarising {} files into {}", total, output_dir.display());

        ensure_output_dir(output_dir)?;
        self.notify(|cb| {
            cb.on_batch_start(total);
            cb.on_stage_start(Stage::Write, total);
        });

        let mut records = Vec::with_capacity(total);
        for (index, file) in files.iter().enumerate() {
            debug!("[{}/{}] {}", index + 1, total, file.display());
            let document =
                self.extractor
                    .extract(file, true, Some(self.page_delimiter.as_str()))?;
            let summary = summarizer.summarize(&document)?;
            records.push(persist(output_dir, file, suffix, &summary)?);
            self.notify(|cb| cb.on_file_complete(index, total, file));
        }

        Ok(self.finish(records, start))
    }

    /// Staged concurrent variant of [`BatchDriver::run`].
    pub async fn run_async(
        &self,
        summarizer: &dyn Summarizer,
        files: &[PathBuf],
        output_dir: &Path,
        suffix: &str,
    ) -> Result<BatchReport, SummarizeError> {
        let start = Instant::now();
        let total = files.len();
        self.notify(|cb| cb.on_batch_start(total));

        // ── Stage 1: extract ───────────────────────────────────────────────
        info!("Extracting {} files", total);
        self.notify(|cb| cb.on_stage_start(Stage::Extract, total));
        let delimiter = self.page_delimiter.as_str();
        let documents: Vec<ExtractedDocument> =
            join_stage(files.iter().enumerate().map(|(index, file)| async move {
                let document = self
                    .extractor
                    .extract_async(file, true, Some(delimiter))
                    .await?;
                self.notify(|cb| cb.on_file_complete(index, total, file));
                Ok::<_, SummarizeError>(document)
            }))
            .await?;

        // ── Stage 2: summarise ─────────────────────────────────────────────
        info!("Summarising {} documents", documents.len());
        self.notify(|cb| cb.on_stage_start(Stage::Summarize, total));
        let summaries: Vec<String> =
            join_stage(documents.iter().enumerate().map(|(index, document)| async move {
                let summary = summarizer.summarize_async(document).await?;
                self.notify(|cb| cb.on_file_complete(index, total, &document.metadata.source));
                Ok::<_, SummarizeError>(summary)
            }))
            .await?;

        // ── Stage 3: write ─────────────────────────────────────────────────
        ensure_output_dir(output_dir)?;
        self.notify(|cb| cb.on_stage_start(Stage::Write, total));
        let mut records = Vec::with_capacity(total);
        for (index, (file, summary)) in files.iter().zip(&summaries).enumerate() {
            records.push(persist(output_dir, file, suffix, summary)?);
            self.notify(|cb| cb.on_file_complete(index, total, file));
        }

        Ok(self.finish(records, start))
    }

    fn finish(&self, records: Vec<SummaryRecord>, start: Instant) -> BatchReport {
        let report = BatchReport {
            records,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Wrote {} summaries in {}ms",
            report.records.len(),
            report.duration_ms
        );
        self.notify(|cb| cb.on_batch_complete(report.records.len()));
        report
    }

    fn notify(&self, f: impl FnOnce(&ProgressCallback)) {
        if let Some(ref cb) = self.progress {
            f(cb);
        }
    }
}

/// Await every future, then return their outputs in submission order, or
/// the first error in submission order.
async fn join_stage<T, F>(tasks: impl IntoIterator<Item = F>) -> Result<Vec<T>, SummarizeError>
where
    F: Future<Output = Result<T, SummarizeError>>,
{
    join_all(tasks).await.into_iter().collect()
}

fn persist(
    output_dir: &Path,
    source: &Path,
    suffix: &str,
    summary: &str,
) -> Result<SummaryRecord, SummarizeError> {
    let output = output_path(output_dir, source, suffix);
    write_summary(&output, summary)?;
    Ok(SummaryRecord {
        source: source.to_path_buf(),
        output,
        word_count: word_count(summary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionMode;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Echoes the source file name; fails on the `fail_at`-th call.
    struct EchoSummarizer {
        calls: AtomicUsize,
        fail_at: Option<usize>,
    }

    impl EchoSummarizer {
        fn new(fail_at: Option<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_at,
            }
        }

        fn next(&self, document: &ExtractedDocument) -> Result<String, SummarizeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(n) == self.fail_at {
                return Err(SummarizeError::LlmApiError {
                    source_name: document.source_name(),
                    message: "boom".into(),
                });
            }
            Ok(format!("summary of {}", document.source_name()))
        }
    }

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        fn summarize(&self, document: &ExtractedDocument) -> Result<String, SummarizeError> {
            self.next(document)
        }

        async fn summarize_async(
            &self,
            document: &ExtractedDocument,
        ) -> Result<String, SummarizeError> {
            self.next(document)
        }
    }

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("pdfs/{n}.pdf"))).collect()
    }

    fn driver() -> BatchDriver {
        BatchDriver::new(Extractor::new(ExtractionMode::Placeholder))
    }

    #[test]
    fn from_config_carries_mode_and_delimiter() {
        let config = SummarizeConfig::builder()
            .extraction(ExtractionMode::Placeholder)
            .page_delimiter("\n==\n")
            .build()
            .unwrap();
        let driver = BatchDriver::from_config(&config);
        assert_eq!(driver.extractor().mode(), ExtractionMode::Placeholder);
        assert_eq!(driver.page_delimiter, "\n==\n");

        let driver = driver.with_page_delimiter("");
        assert_eq!(driver.page_delimiter, "");
        assert_eq!(
            BatchDriver::new(Extractor::default()).extractor().mode(),
            ExtractionMode::Real
        );
    }

    #[test]
    fn sync_run_writes_one_file_per_input() {
        let tmp = TempDir::new().unwrap();
        let inputs = files(&["a", "b", "c"]);
        let report = driver()
            .run(&EchoSummarizer::new(None), &inputs, tmp.path(), "summary")
            .unwrap();

        assert_eq!(report.records.len(), 3);
        for (record, input) in report.records.iter().zip(&inputs) {
            assert_eq!(&record.source, input);
            let text = std::fs::read_to_string(&record.output).unwrap();
            assert_eq!(
                text,
                format!("summary of {}", input.file_name().unwrap().to_string_lossy())
            );
        }
    }

    #[test]
    fn sync_run_keeps_files_written_before_a_failure() {
        let tmp = TempDir::new().unwrap();
        let err = driver()
            .run(&EchoSummarizer::new(Some(1)), &files(&["a", "b", "c"]), tmp.path(), "s")
            .unwrap_err();

        assert!(matches!(err, SummarizeError::LlmApiError { .. }));
        assert!(tmp.path().join("a-s.txt").exists());
        assert!(!tmp.path().join("b-s.txt").exists());
        assert!(!tmp.path().join("c-s.txt").exists());
    }

    #[tokio::test]
    async fn async_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let summarizer = EchoSummarizer::new(Some(2));
        let err = driver()
            .run_async(&summarizer, &files(&["a", "b", "c", "d"]), &out, "s")
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizeError::LlmApiError { .. }));
        // Every sibling was still polled to completion.
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 4);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn empty_batch_still_creates_the_directory() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("empty");
        let report = driver()
            .run_async(&EchoSummarizer::new(None), &[], &out, "s")
            .await
            .unwrap();
        assert!(report.records.is_empty());
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn join_stage_reports_first_error_in_input_order() {
        let tasks = (0..4).map(|i| async move {
            // Later tasks finish first.
            tokio::time::sleep(std::time::Duration::from_millis(40 - i * 10)).await;
            if i == 1 || i == 3 {
                Err(SummarizeError::Internal(format!("task {i}")))
            } else {
                Ok(i)
            }
        });
        let err = join_stage(tasks).await.unwrap_err();
        assert_eq!(err.to_string(), "Internal error: task 1");
    }
}
