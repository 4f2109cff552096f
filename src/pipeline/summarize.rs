//! Summarisation: render an extracted document into a prompt and ask the LLM.
//!
//! The batch drivers only see the [`Summarizer`] trait. [`LlmSummarizer`]
//! is the production adapter over an edgequake-llm provider; tests plug in
//! their own implementations with canned responses.
//!
//! There is deliberately no retry, chunking or streaming here. A provider
//! error fails the document, and with it the batch.

use crate::config::SummarizeConfig;
use crate::error::SummarizeError;
use crate::pipeline::extract::ExtractedDocument;
use crate::prompts::{prompt_for, render_prompt, validate_template, DEFAULT_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tracing::debug;

/// Turns an extracted document into a summary.
///
/// Both methods have the same contract; the drivers call `summarize` in
/// sync mode and `summarize_async` in async mode.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarise `document`, blocking the current thread.
    fn summarize(&self, document: &ExtractedDocument) -> Result<String, SummarizeError>;

    /// Summarise `document` without blocking.
    async fn summarize_async(&self, document: &ExtractedDocument)
        -> Result<String, SummarizeError>;
}

/// [`Summarizer`] backed by an LLM provider.
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
    template: String,
    temperature: f32,
    max_tokens: Option<usize>,
    /// Only built on the first blocking call made outside a multi-thread
    /// runtime.
    runtime: OnceLock<Runtime>,
}

impl LlmSummarizer {
    /// Wrap `provider`, rejecting templates without exactly one `{context}`.
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        template: impl Into<String>,
    ) -> Result<Self, SummarizeError> {
        let template = template.into();
        validate_template(&template)?;
        Ok(Self {
            provider,
            template,
            temperature: 0.0,
            max_tokens: None,
            runtime: OnceLock::new(),
        })
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, n: usize) -> Self {
        self.max_tokens = Some(n);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn build_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: self.max_tokens,
            ..Default::default()
        }
    }

    async fn call(&self, document: &ExtractedDocument) -> Result<String, SummarizeError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(render_document(&self.template, document))];
        let options = self.build_options();

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| SummarizeError::LlmApiError {
                source_name: document.source_name(),
                message: format!("{}", e),
            })?;

        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            document.source_name(),
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }

    fn runtime(&self) -> Result<&Runtime, SummarizeError> {
        if let Some(rt) = self.runtime.get() {
            return Ok(rt);
        }
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SummarizeError::Internal(format!("Failed to create tokio runtime: {}", e)))?;
        let _ = self.runtime.set(rt);
        self.runtime
            .get()
            .ok_or_else(|| SummarizeError::Internal("summariser runtime vanished".into()))
    }
}

impl Drop for LlmSummarizer {
    fn drop(&mut self) {
        // A plain runtime drop panics when it happens inside another runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    /// Blocks on the provider call from any context. Inside a multi-thread
    /// runtime the worker is handed off with `block_in_place`; a
    /// current-thread runtime cannot block in place, so the call runs on a
    /// scoped thread driving the adapter's own runtime.
    fn summarize(&self, document: &ExtractedDocument) -> Result<String, SummarizeError> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.call(document)))
            }
            Ok(_) => {
                let runtime = self.runtime()?;
                std::thread::scope(|scope| {
                    scope
                        .spawn(|| runtime.block_on(self.call(document)))
                        .join()
                })
                .map_err(|_| SummarizeError::Internal("summarise thread panicked".into()))?
            }
            Err(_) => self.runtime()?.block_on(self.call(document)),
        }
    }

    async fn summarize_async(
        &self,
        document: &ExtractedDocument,
    ) -> Result<String, SummarizeError> {
        self.call(document).await
    }
}

/// Render the whole document into `template`.
pub fn render_document(template: &str, document: &ExtractedDocument) -> String {
    render_prompt(template, &document.full_text())
}

/// Build a summariser for `model_name` on `model_provider`.
///
/// `prompt_template` defaults to [`DEFAULT_PROMPT`] and must contain exactly
/// one `{context}` placeholder.
pub fn build_summarizer(
    model_name: &str,
    model_provider: &str,
    prompt_template: Option<&str>,
) -> Result<LlmSummarizer, SummarizeError> {
    let template = prompt_template.unwrap_or(DEFAULT_PROMPT);
    validate_template(template)?;
    let provider = create_provider(model_provider, model_name)?;
    LlmSummarizer::new(provider, template)
}

/// Build a summariser from a full config: a pre-built provider wins over
/// the provider name, and the summary type selects the template.
pub fn build_summarizer_from_config(
    config: &SummarizeConfig,
) -> Result<LlmSummarizer, SummarizeError> {
    let provider = match config.provider {
        Some(ref provider) => Arc::clone(provider),
        None => create_provider(&config.provider_name, &config.model)?,
    };

    let mut summarizer = LlmSummarizer::new(provider, prompt_for(config.summary_type))?
        .with_temperature(config.temperature);
    if let Some(n) = config.max_tokens {
        summarizer = summarizer.with_max_tokens(n);
    }
    Ok(summarizer)
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, SummarizeError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SummarizeError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
