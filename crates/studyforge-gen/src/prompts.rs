//! Prompt construction for the four generation operations.
//!
//! The wording here is configuration data for the backend, not logic; the
//! core only guarantees that every prompt carries the caller's parameters
//! and that the system instruction forbids markup the post-processor would
//! otherwise have to strip.

use studyforge_core::{AnswerMode, AnswerRequest, DocumentKind, DocumentRequest, PaperRequest, QuizRequest};

/// Fixed system instruction sent with every call.
pub const SYSTEM_INSTRUCTION: &str = "You are a patient study assistant for school students. \
Answer strictly within the student's stated subject, level, and syllabus. \
Write plain text only: no bold or italic markers, no markdown headings. \
Keep language appropriate for the student's level.";

fn topic_clause(topic: Option<&str>) -> String {
    match topic {
        Some(t) => format!(" Focus on the topic \"{t}\"."),
        None => String::new(),
    }
}

/// Builds the prompt for the free-form answer operation.
pub fn answer(req: &AnswerRequest) -> String {
    let style = match req.mode {
        AnswerMode::Detailed => "Give a detailed answer with worked reasoning.",
        AnswerMode::Succinct => "Give a short answer covering only the essentials.",
        AnswerMode::OneLine => "Answer in exactly one line.",
    };
    format!(
        "Subject: {subject}. Level: {level}.{topic} {style}\n\nQuestion: {question}",
        subject = req.subject,
        level = req.level,
        topic = topic_clause(req.topic.as_deref()),
        question = req.question,
    )
}

/// Builds the prompt for the multiple-choice quiz operation.
///
/// Asks for a JSON array so the structured-output mode can parse it into
/// quiz records; the shape matches `QuizQuestion`'s serde names.
pub fn quiz(req: &QuizRequest) -> String {
    format!(
        "Create {count} multiple-choice questions for {subject}, {level}.{topic} \
Respond with a JSON array only. Each element must have exactly these fields: \
\"question\" (string), \"options\" (array of exactly 4 strings), \
\"correctAnswer\" (string, must exactly match one of the options), \
\"explanation\" (string).",
        count = req.count,
        subject = req.subject,
        level = req.level,
        topic = topic_clause(req.topic.as_deref()),
    )
}

/// Builds the prompt for the document/project-content operation.
pub fn document(req: &DocumentRequest) -> String {
    let shape = match req.kind {
        DocumentKind::Report => "a structured report with an introduction, findings, and conclusion",
        DocumentKind::Essay => "a continuous-prose essay with an introduction and conclusion",
        DocumentKind::ProjectOutline => {
            "a project outline with objectives, materials needed, step-by-step method, and expected outcome"
        }
    };
    format!(
        "Write {shape} on \"{topic}\" for {subject}, {level}.",
        topic = req.topic,
        subject = req.subject,
        level = req.level,
    )
}

/// Builds the prompt for the exam-paper operation.
pub fn paper(req: &PaperRequest) -> String {
    format!(
        "Create a practice exam paper for {subject}, {level}.{topic} \
Structure it in sections of increasing difficulty, state the marks for each \
question, and end with a total-marks line. Do not include answers.",
        subject = req.subject,
        level = req.level,
        topic = topic_clause(req.topic.as_deref()),
    )
}
