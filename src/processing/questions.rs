//! Question pipeline: template-based generators for the six question types.
//!
//! Every generator partitions the text (word chunks or `.`-split sentences), walks
//! `i in 0..count` picking partition `i % partitions`, and builds a record from the partition's
//! leading sentences. A partition that yields no usable material gets the type's fixed fallback
//! record, so one bad partition never shortens or aborts the batch. Fill-in-the-blank is the one
//! generator that consumes a sentence per question and may return fewer than `count` records.
//!
//! Randomness (blank position, true/false polarity, option order) comes from the caller's RNG so
//! tests can seed it.

mod choice;
mod fill_blank;
mod open;
mod true_false;

use rand::Rng;

use super::types::{QuestionError, QuestionRecord, QuestionType};

/// Tunables shared by the question generators.
#[derive(Debug, Clone, Copy)]
pub struct QuestionOptions {
    /// Probability that a true/false item is emitted verbatim as a true statement.
    pub true_bias: f64,
    /// Shuffle multiple-choice options; otherwise option A is always correct.
    pub shuffle_choices: bool,
}

impl Default for QuestionOptions {
    fn default() -> Self {
        Self {
            true_bias: 0.7,
            shuffle_choices: false,
        }
    }
}

/// Generate `count` questions of one type from document text.
pub fn generate_questions<R: Rng + ?Sized>(
    text: &str,
    question_type: QuestionType,
    count: usize,
    rng: &mut R,
    options: &QuestionOptions,
) -> Result<Vec<QuestionRecord>, QuestionError> {
    if count == 0 {
        return Err(QuestionError::InvalidCount);
    }

    let questions = match question_type {
        QuestionType::Theoretical => open::theoretical(text, count)?,
        QuestionType::Application => open::application(text, count)?,
        QuestionType::Numerical => open::numerical(text, count)?,
        QuestionType::MultipleChoice => {
            choice::multiple_choice(text, count, rng, options.shuffle_choices)?
        }
        QuestionType::FillBlank => fill_blank::fill_blank(text, count, rng),
        QuestionType::TrueFalse => true_false::true_false(text, count, rng, options.true_bias),
    };

    tracing::debug!(
        question_type = %question_type,
        requested = count,
        generated = questions.len(),
        "Generated questions"
    );
    Ok(questions)
}

/// Pick partition `index % len`; partitions are never empty.
fn cyclic<T>(partitions: &[T], index: usize) -> &T {
    &partitions[index % partitions.len()]
}

/// Fixed record substituted when a partition yields no usable material.
pub(crate) fn fallback_record(question_type: QuestionType) -> QuestionRecord {
    match question_type {
        QuestionType::Theoretical => QuestionRecord::open(
            "What are the main theoretical concepts covered in this academic material?",
            "The material covers important theoretical frameworks and foundational principles that are essential for understanding the subject matter.",
        ),
        QuestionType::Application => QuestionRecord::open(
            "How can the concepts from this material be applied in real-world scenarios?",
            "These concepts can be applied in various practical situations as demonstrated in the text.",
        ),
        QuestionType::Numerical => QuestionRecord::open(
            "If numerical data were given for the concepts in this material, how would you calculate the key quantities they describe?",
            open::NUMERICAL_SOLUTION,
        ),
        QuestionType::MultipleChoice => choice::default_record(),
        QuestionType::FillBlank => QuestionRecord::open(
            "Fill in the blank: The ______ presented in this material are essential for understanding the subject.",
            "concepts",
        ),
        QuestionType::TrueFalse => QuestionRecord {
            question: "True or False: The material presents concepts that are essential for understanding the subject.".into(),
            answer: "True".into(),
            options: None,
            explanation: Some(
                "This statement is true based on the overall content provided in the document."
                    .into(),
            ),
        },
    }
}
