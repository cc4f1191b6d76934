//! Response post-processing: markup stripping, empty-response defaults, and
//! tolerant parsing of structured quiz payloads.

use studyforge_core::QuizQuestion;
use tracing::debug;

/// The emphasis marker the backend's markup dialect uses for bold/italic.
/// The system instruction forbids it, but models leak it anyway.
pub const EMPHASIS_MARKER: &str = "**";

/// Fixed text substituted when the backend returned no text at all.
pub const DEFAULT_TEXT: &str = "No response was generated. Please try again.";

/// Removes every occurrence of the emphasis marker. Idempotent: text
/// without markers passes through unchanged.
pub fn strip_emphasis(text: &str) -> String {
    if text.contains(EMPHASIS_MARKER) {
        text.replace(EMPHASIS_MARKER, "")
    } else {
        text.to_string()
    }
}

/// Substitutes the fixed default for an effectively empty response.
pub fn text_or_default(text: String) -> String {
    if text.trim().is_empty() {
        DEFAULT_TEXT.to_string()
    } else {
        text
    }
}

/// Strips a surrounding markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses a structured quiz payload.
///
/// Malformed payloads (not a well-formed JSON array of records) yield an
/// empty list rather than an error. Individual records with a dangling
/// `correct_answer` or the wrong option count are dropped. Emphasis markers
/// are stripped from every field before validation so stripping can never
/// break the answer/option match.
pub fn parse_quiz(raw: &str) -> Vec<QuizQuestion> {
    let cleaned = strip_code_fence(raw);
    let parsed: Vec<QuizQuestion> = match serde_json::from_str(cleaned) {
        Ok(records) => records,
        Err(e) => {
            debug!(error = %e, "quiz payload was not a well-formed array, treating as empty");
            return Vec::new();
        }
    };

    parsed
        .into_iter()
        .map(|q| QuizQuestion {
            question: strip_emphasis(&q.question),
            options: q.options.iter().map(|o| strip_emphasis(o)).collect(),
            correct_answer: strip_emphasis(&q.correct_answer),
            explanation: strip_emphasis(&q.explanation),
        })
        .filter(|q| {
            let keep = q.options.len() == 4 && q.has_valid_answer();
            if !keep {
                debug!(question = %q.question, "dropping inconsistent quiz record");
            }
            keep
        })
        .collect()
}
