//! Generative backend abstraction.

pub mod gemini;

use crate::pool::Credential;
use async_trait::async_trait;
use studyforge_core::StudyResult;

/// Tuning knobs forwarded with every generation call.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Ask the backend for a JSON payload instead of prose (quiz mode).
    pub json_output: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 4096,
            json_output: false,
        }
    }
}

/// One prompt plus the fixed system instruction and tuning options.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The request-specific prompt body.
    pub prompt: String,
    /// The fixed system instruction (output constraints, syllabus framing).
    pub system: String,
    /// Tuning options for this call.
    pub options: GenerateOptions,
}

/// Trait for text-generation backends.
///
/// The credential is passed per call rather than bound at construction so
/// one client can serve every entry in the pool. The returned string is the
/// raw body text; an empty string means the backend produced no text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Runs one generation call against the named model variant.
    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateRequest,
    ) -> StudyResult<String>;
}
