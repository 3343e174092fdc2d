//! Core data types and error definitions for the study guide pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while splitting text into word chunks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkingError {
    /// Caller requested an impossible word budget.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the summary pipeline.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Normalized input is below the minimum viable length.
    #[error("document text is too short to summarize ({length} characters, need {minimum})")]
    InsufficientText {
        /// Character count of the normalized input.
        length: usize,
        /// Minimum character count accepted by the pipeline.
        minimum: usize,
    },
    /// Every chunk's condensation attempt failed.
    #[error("unable to generate a summary: all {attempted} chunk condensations failed")]
    SummaryUnavailable {
        /// Number of chunks that were sent for condensation.
        attempted: usize,
    },
    /// Chunking step rejected its parameters.
    #[error("failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
}

/// Errors emitted by the question pipeline.
#[derive(Debug, Error)]
pub enum QuestionError {
    /// Requested type is not one of the supported identifiers.
    #[error("unsupported question type: {0}")]
    UnsupportedType(String),
    /// Caller asked for zero questions.
    #[error("question count must be greater than zero")]
    InvalidCount,
    /// A generator could not run to completion for its type.
    #[error("failed to generate {question_type} questions: {reason}")]
    Generation {
        /// Type whose generator failed.
        question_type: QuestionType,
        /// Underlying failure description.
        reason: String,
    },
    /// Chunking step rejected its parameters.
    #[error("failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
}

/// Errors surfaced by the text extraction collaborator.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PDF parser rejected the input.
    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),
    /// Extraction task did not complete.
    #[error("text extraction task failed: {0}")]
    Task(String),
}

/// Errors emitted by the end-to-end study guide service.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// No question types were requested.
    #[error("select at least one question type")]
    NoQuestionTypes,
    /// Summary generation failed.
    #[error(transparent)]
    Summary(#[from] SummaryError),
    /// Question generation failed.
    #[error(transparent)]
    Question(#[from] QuestionError),
    /// The uploaded document could not be read.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// The six supported question categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Conceptual questions about underlying principles.
    #[serde(rename = "theoretical")]
    Theoretical,
    /// Real-world application questions.
    #[serde(rename = "application")]
    Application,
    /// Calculation problems with a step-by-step solution.
    #[serde(rename = "numerical")]
    Numerical,
    /// Four-option multiple-choice questions.
    #[serde(rename = "mcq")]
    MultipleChoice,
    /// Single-word cloze questions.
    #[serde(rename = "fillblanks")]
    FillBlank,
    /// True/false statements with an explanation.
    #[serde(rename = "truefalse")]
    TrueFalse,
}

impl QuestionType {
    /// Every supported type in display order.
    pub const ALL: [QuestionType; 6] = [
        QuestionType::Theoretical,
        QuestionType::Application,
        QuestionType::Numerical,
        QuestionType::MultipleChoice,
        QuestionType::FillBlank,
        QuestionType::TrueFalse,
    ];

    /// Wire identifier accepted in requests.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Theoretical => "theoretical",
            QuestionType::Application => "application",
            QuestionType::Numerical => "numerical",
            QuestionType::MultipleChoice => "mcq",
            QuestionType::FillBlank => "fillblanks",
            QuestionType::TrueFalse => "truefalse",
        }
    }

    /// Section heading used in rendered documents.
    pub fn title(self) -> &'static str {
        match self {
            QuestionType::Theoretical => "Theoretical Questions",
            QuestionType::Application => "Application-Based Questions",
            QuestionType::Numerical => "Numerical Problems",
            QuestionType::MultipleChoice => "Multiple Choice Questions",
            QuestionType::FillBlank => "Fill in the Blanks",
            QuestionType::TrueFalse => "True/False Questions",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| QuestionError::UnsupportedType(s.trim().to_string()))
    }
}

/// A single generated question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Question text, always ending in a sentence terminator.
    pub question: String,
    /// Expected answer.
    pub answer: String,
    /// Labeled options (`A) ...` to `D) ...`), multiple-choice only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Optional rationale for the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// Build an open-ended record with no options or explanation.
    pub(crate) fn open(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            options: None,
            explanation: None,
        }
    }
}

/// All questions generated for one requested type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSection {
    /// Question category of every record in this section.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Generated records in generation order.
    pub questions: Vec<QuestionRecord>,
}

/// Input for one study guide generation.
#[derive(Debug, Clone)]
pub struct GuideRequest {
    /// Name of the uploaded document.
    pub filename: String,
    /// Raw extracted document text.
    pub text: String,
    /// Requested question type identifiers, in request order.
    pub selected_types: Vec<String>,
}

/// Completed, stored study guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGuide {
    /// Identifier assigned by the guide store.
    pub id: u64,
    /// Name of the source document.
    pub filename: String,
    /// Long-form summary.
    pub summary: String,
    /// One section per requested type, in request order.
    pub questions: Vec<QuestionSection>,
    /// Requested types after validation and de-duplication.
    pub selected_types: Vec<QuestionType>,
    /// Sum of all section lengths.
    pub total_questions: usize,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// SHA-256 of the normalized source text.
    pub source_digest: String,
}
