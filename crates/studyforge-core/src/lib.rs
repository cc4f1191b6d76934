//! Core types and error definitions for studyforge.
//!
//! This crate provides the foundational types shared across all studyforge
//! crates: the unified error enum, the request types for the four generation
//! operations, and the structured quiz record.
//!
//! # Main types
//!
//! - [`StudyError`] — Unified error enum for all studyforge subsystems.
//! - [`StudyResult`] — Convenience alias for `Result<T, StudyError>`.
//! - [`AnswerRequest`] / [`QuizRequest`] / [`DocumentRequest`] /
//!   [`PaperRequest`] — Caller parameters for the generation operations.
//! - [`QuizQuestion`] — One multiple-choice record produced by the quiz
//!   operation.

use serde::{Deserialize, Serialize};

// --- Error types ---

/// Top-level error type for studyforge.
///
/// Backend failures carry enough structure for classification: an HTTP
/// status when the backend answered, or a bare message when the request
/// never produced a response.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// The generation backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Backend {
        /// HTTP status code reported by the backend.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The request failed before a status was available (DNS, connect,
    /// timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// An error in configuration parsing or validation.
    #[error("config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudyError {
    /// The HTTP status code carried by this error, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A convenience `Result` alias using [`StudyError`].
pub type StudyResult<T> = Result<T, StudyError>;

// --- Request types ---

/// How much detail the answer operation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// A full explanation with worked reasoning.
    Detailed,
    /// A short paragraph covering only the essentials.
    Succinct,
    /// A single-line answer, no elaboration.
    OneLine,
}

/// The kind of document the document operation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A structured report with headings and findings.
    Report,
    /// A continuous-prose essay.
    Essay,
    /// A project outline with objectives, materials, and steps.
    ProjectOutline,
}

/// Parameters for the free-form answer operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// The subject the question belongs to (e.g. "Physics").
    pub subject: String,
    /// The student's level or grade (e.g. "Class 10").
    pub level: String,
    /// How detailed the answer should be.
    pub mode: AnswerMode,
    /// Optional topic to anchor the answer to.
    #[serde(default)]
    pub topic: Option<String>,
    /// The question itself.
    pub question: String,
}

/// Parameters for the multiple-choice quiz operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    /// The subject the quiz covers.
    pub subject: String,
    /// The student's level or grade.
    pub level: String,
    /// Optional topic restriction.
    #[serde(default)]
    pub topic: Option<String>,
    /// Number of questions to generate.
    pub count: u32,
}

/// Parameters for the document/project-content operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// The subject the document belongs to.
    pub subject: String,
    /// The student's level or grade.
    pub level: String,
    /// The kind of document to produce.
    pub kind: DocumentKind,
    /// What the document should be about.
    pub topic: String,
}

/// Parameters for the exam-paper operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRequest {
    /// The subject the paper examines.
    pub subject: String,
    /// The student's level or grade.
    pub level: String,
    /// Optional topic restriction; a full-syllabus paper when absent.
    #[serde(default)]
    pub topic: Option<String>,
}

// --- Quiz record ---

/// One multiple-choice question produced by the quiz operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// The question text.
    pub question: String,
    /// The answer options, in presentation order.
    pub options: Vec<String>,
    /// The correct option; must exactly match one entry in `options`.
    pub correct_answer: String,
    /// A short explanation of why the correct option is correct.
    pub explanation: String,
}

impl QuizQuestion {
    /// Whether `correct_answer` exactly matches one of `options`.
    pub fn has_valid_answer(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }
}
