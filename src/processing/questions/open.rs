//! Theoretical, application, and numerical generators: open-ended questions built from chunks.

use crate::processing::chunking::{chunk_text, leading_fragments};
use crate::processing::sanitize::{ensure_terminated, truncate_chars};
use crate::processing::types::{QuestionError, QuestionRecord, QuestionType};

use super::{cyclic, fallback_record};

const THEORETICAL_CHUNK_WORDS: usize = 400;
const APPLICATION_CHUNK_WORDS: usize = 500;
const NUMERICAL_CHUNK_WORDS: usize = 500;
const TOPIC_CHARS: usize = 80;

pub(crate) const NUMERICAL_SOLUTION: &str = "Step 1: Identify the given values. Step 2: Apply the appropriate formula. Step 3: Calculate the result. Step 4: Verify the answer against the units and context of the problem.";

pub(super) fn theoretical(text: &str, count: usize) -> Result<Vec<QuestionRecord>, QuestionError> {
    let chunks = chunk_text(text, THEORETICAL_CHUNK_WORDS)?;
    Ok((0..count)
        .map(|index| {
            theoretical_item(cyclic(&chunks, index).as_str())
                .unwrap_or_else(|| fallback_record(QuestionType::Theoretical))
        })
        .collect())
}

fn theoretical_item(chunk: &str) -> Option<QuestionRecord> {
    let fragments = leading_fragments(chunk, 3);
    let topic = fragments.first()?;
    let question = format!(
        "What underlying principles explain the idea that \"{}\"?",
        truncate_chars(topic, TOPIC_CHARS)
    );
    let answer = format!(
        "Based on the content: {}. This demonstrates the key theoretical concepts that students should understand.",
        fragments.join(". ")
    );
    Some(QuestionRecord::open(question, answer))
}

pub(super) fn application(text: &str, count: usize) -> Result<Vec<QuestionRecord>, QuestionError> {
    let chunks = chunk_text(text, APPLICATION_CHUNK_WORDS)?;
    Ok((0..count)
        .map(|index| {
            application_item(cyclic(&chunks, index).as_str())
                .unwrap_or_else(|| fallback_record(QuestionType::Application))
        })
        .collect())
}

fn application_item(chunk: &str) -> Option<QuestionRecord> {
    let fragments = leading_fragments(chunk, 2);
    let topic = fragments.first()?;
    let question = format!(
        "How could the idea that \"{}\" be applied in a real-world scenario?",
        truncate_chars(topic, TOPIC_CHARS)
    );
    let answer = format!(
        "In practice: {}. These ideas apply wherever they shape concrete decisions and outcomes, so look for situations that match the conditions described.",
        fragments.join(". ")
    );
    Some(QuestionRecord::open(question, answer))
}

pub(super) fn numerical(text: &str, count: usize) -> Result<Vec<QuestionRecord>, QuestionError> {
    let chunks = chunk_text(text, NUMERICAL_CHUNK_WORDS)?;
    Ok((0..count)
        .map(|index| {
            numerical_item(cyclic(&chunks, index).as_str())
                .unwrap_or_else(|| fallback_record(QuestionType::Numerical))
        })
        .collect())
}

fn numerical_item(chunk: &str) -> Option<QuestionRecord> {
    let topic = leading_fragments(chunk, 1).into_iter().next()?;
    let topic = truncate_chars(topic, TOPIC_CHARS);
    let question = if chunk.chars().any(|c| c.is_ascii_digit()) {
        format!(
            "Calculate the key quantity described in this passage using the values it provides: \"{topic}\"."
        )
    } else {
        format!(
            "If numerical data were given for the idea that \"{topic}\", how would you calculate the quantity it describes?"
        )
    };
    Some(QuestionRecord::open(
        ensure_terminated(&question, '?'),
        NUMERICAL_SOLUTION,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DIGITS: &str = "Velocity describes how quickly an object changes its position. Acceleration describes how quickly the velocity itself changes.";

    #[test]
    fn theoretical_answer_uses_first_three_sentences() {
        let text = "Alpha is first. Beta is second. Gamma is third. Delta is fourth.";
        let records = theoretical(text, 1).unwrap();
        assert_eq!(
            records[0].answer,
            "Based on the content: Alpha is first. Beta is second. Gamma is third. This demonstrates the key theoretical concepts that students should understand."
        );
        assert!(records[0].question.contains("Alpha is first"));
    }

    #[test]
    fn application_answer_uses_first_two_sentences() {
        let records = application("Levers multiply force. Pulleys redirect it. Gears trade speed.", 2)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].answer.starts_with("In practice: Levers multiply force. Pulleys redirect it."));
        assert!(!records[0].answer.contains("Gears"));
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn numerical_without_digits_uses_hypothetical_framing() {
        let records = numerical(NO_DIGITS, 7).unwrap();
        assert_eq!(records.len(), 7);
        for record in &records {
            assert!(record.question.starts_with("If numerical data were given"));
            assert!(!record.question.starts_with("Calculate"));
            assert_eq!(record.answer, NUMERICAL_SOLUTION);
        }
    }

    #[test]
    fn numerical_with_digits_uses_calculate_framing() {
        let records = numerical("A car travels 120 km in 2 hours. Find its speed.", 1).unwrap();
        assert!(records[0].question.starts_with("Calculate"));
        assert!(records[0].question.ends_with('.'));
    }

    #[test]
    fn empty_text_falls_back_per_item() {
        let records = theoretical("", 3).unwrap();
        assert_eq!(records.len(), 3);
        assert!(
            records
                .iter()
                .all(|record| *record == fallback_record(QuestionType::Theoretical))
        );
        let records = numerical("  ", 2).unwrap();
        assert!(records[0].question.starts_with("If numerical data were given"));
    }

    #[test]
    fn chunks_are_reused_cyclically() {
        let text = format!(
            "Alpha leads the first chunk. {}Beta leads the second chunk. {}",
            "filler ".repeat(395),
            "filler ".repeat(395)
        );
        let records = theoretical(&text, 3).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].question.contains("Alpha leads the first chunk"));
        assert!(records[1].question.contains("Beta leads the second chunk"));
        assert_eq!(records[0], records[2]);

        let records = numerical(&text, 2).unwrap();
        assert!(records[1].question.contains("Beta leads the second chunk"));
    }

    #[test]
    fn long_topics_are_truncated_in_questions() {
        let long = "word ".repeat(60);
        let records = application(&long, 1).unwrap();
        let quoted = records[0]
            .question
            .split('"')
            .nth(1)
            .expect("quoted topic");
        assert!(quoted.chars().count() <= TOPIC_CHARS);
    }
}
