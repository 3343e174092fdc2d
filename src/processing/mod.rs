//! Study guide pipeline: chunking, summarization, question generation, and orchestration.

pub mod chunking;
pub mod questions;
pub mod sanitize;
mod service;
pub mod summarize;
pub mod types;

pub use questions::{QuestionOptions, generate_questions};
pub use service::{GuideSettings, StudyGuideApi, StudyGuideService};
pub use summarize::{Expansion, SummaryOptions, SummaryOutcome, summarize};
pub use types::{
    ChunkingError, ExtractionError, GuideRequest, ProcessingError, QuestionError, QuestionRecord,
    QuestionSection, QuestionType, StudyGuide, SummaryError,
};
