//! The four generation operations, wired through the dispatcher.
//!
//! Every externally observable failure is one of the fixed fallback strings;
//! raw backend errors only reach the tracing output.

use crate::backends::{GenerateOptions, GenerateRequest, GenerativeBackend};
use crate::backends::gemini::GeminiClient;
use crate::classify::{classify, FailureKind};
use crate::config::GenConfig;
use crate::dispatch::Dispatcher;
use crate::models::ModelList;
use crate::pool::CredentialPool;
use crate::postprocess::{parse_quiz, strip_emphasis, text_or_default};
use crate::prompts;
use std::sync::Arc;
use std::time::Duration;
use studyforge_core::{
    AnswerRequest, DocumentRequest, PaperRequest, QuizQuestion, QuizRequest, StudyError,
    StudyResult,
};
use tracing::warn;

/// User-facing message for rate-limited/busy failures.
pub const FALLBACK_BUSY: &str =
    "The study assistant is temporarily overloaded. Please try again in a moment.";

/// User-facing message for configuration/credential failures.
pub const FALLBACK_CONFIG: &str =
    "The study assistant is not configured correctly. Please check the API key setup.";

/// User-facing message for everything else.
pub const FALLBACK_GENERIC: &str =
    "Something went wrong while generating a response. Please try again.";

/// Maps a final classified error to its fixed user-facing string.
pub fn fallback_for(err: &StudyError) -> &'static str {
    match classify(err) {
        FailureKind::RateLimited => FALLBACK_BUSY,
        FailureKind::CredentialInvalid => FALLBACK_CONFIG,
        FailureKind::ModelUnavailable | FailureKind::Unknown => match err {
            StudyError::Config(_) => FALLBACK_CONFIG,
            _ => FALLBACK_GENERIC,
        },
    }
}

/// Entry point for answer, quiz, document, and paper generation.
pub struct StudyService {
    backend: Arc<dyn GenerativeBackend>,
    dispatcher: Dispatcher,
    options: GenerateOptions,
}

impl StudyService {
    /// Creates a service from pre-built parts (tests inject fakes here).
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        dispatcher: Dispatcher,
        options: GenerateOptions,
    ) -> Self {
        Self {
            backend,
            dispatcher,
            options,
        }
    }

    /// Builds the full stack from configuration plus raw credential sources
    /// (environment values; `extra_keys` from the config are appended).
    pub fn from_config(config: &GenConfig, sources: &[String]) -> StudyResult<Self> {
        let mut all_sources: Vec<String> = sources.to_vec();
        all_sources.extend(config.extra_keys.iter().cloned());

        let pool = Arc::new(CredentialPool::from_sources(&all_sources, &config.key_format));
        let models = ModelList::new(config.models.clone())?;
        let dispatcher = Dispatcher::new(pool, models, config.retry.clone());
        let backend = GeminiClient::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let options = GenerateOptions {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            json_output: false,
        };
        Ok(Self::new(Arc::new(backend), dispatcher, options))
    }

    /// Answers a free-form question.
    pub async fn answer(&self, req: &AnswerRequest) -> Result<String, String> {
        self.text_op("answer", prompts::answer(req)).await
    }

    /// Generates structured document/project content.
    pub async fn document(&self, req: &DocumentRequest) -> Result<String, String> {
        self.text_op("document", prompts::document(req)).await
    }

    /// Generates a practice exam paper.
    pub async fn paper(&self, req: &PaperRequest) -> Result<String, String> {
        self.text_op("paper", prompts::paper(req)).await
    }

    /// Generates a multiple-choice quiz. A payload the backend mangled
    /// parses to an empty list, not an error.
    pub async fn quiz(&self, req: &QuizRequest) -> Result<Vec<QuizQuestion>, String> {
        let mut options = self.options.clone();
        options.json_output = true;
        self.run_op("quiz", prompts::quiz(req), options, |raw| parse_quiz(&raw))
            .await
    }

    async fn text_op(&self, op: &'static str, prompt: String) -> Result<String, String> {
        self.run_op(op, prompt, self.options.clone(), |text| {
            text_or_default(strip_emphasis(&text))
        })
        .await
    }

    /// Shared guard/dispatch/fallback sequence for every operation; `finish`
    /// is the operation-specific post-processing step.
    async fn run_op<T>(
        &self,
        op: &'static str,
        prompt: String,
        options: GenerateOptions,
        finish: impl FnOnce(String) -> T,
    ) -> Result<T, String> {
        if self.dispatcher.pool().is_missing() {
            warn!(op, "no credentials configured, skipping dispatch");
            return Err(FALLBACK_CONFIG.to_string());
        }
        match self.generate(prompt, options).await {
            Ok(text) => Ok(finish(text)),
            Err(e) => {
                warn!(op, error = %e, "generation failed");
                Err(fallback_for(&e).to_string())
            }
        }
    }

    async fn generate(&self, prompt: String, options: GenerateOptions) -> StudyResult<String> {
        let request = GenerateRequest {
            prompt,
            system: prompts::SYSTEM_INSTRUCTION.to_string(),
            options,
        };
        let backend = Arc::clone(&self.backend);
        self.dispatcher
            .dispatch(move |credential, model| {
                let backend = Arc::clone(&backend);
                let request = request.clone();
                async move { backend.generate(&credential, &model, &request).await }
            })
            .await
    }
}
