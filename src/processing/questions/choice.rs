//! Multiple-choice generator.
//!
//! Option A carries the chunk's key statement and B to D are fixed distractors. With shuffling
//! disabled the answer is therefore always `A`; enabling shuffling permutes the options with the
//! caller's RNG and relabels them, and the answer follows the key statement.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::processing::chunking::chunk_text;
use crate::processing::sanitize::truncate_chars;
use crate::processing::types::{QuestionError, QuestionRecord};

use super::cyclic;

const CHOICE_CHUNK_WORDS: usize = 300;
const KEY_MIN_CHARS: usize = 20;
const KEY_MAX_CHARS: usize = 100;
const OPTION_EXCERPT_CHARS: usize = 80;
const LABELS: [&str; 4] = ["A", "B", "C", "D"];

const QUESTION: &str =
    "Which of the following best describes the concept discussed in the material?";

const DISTRACTORS: [&str; 3] = [
    "The material focuses on practical applications and real-world scenarios",
    "The content primarily discusses theoretical frameworks and methodologies",
    "The information provides background context for advanced study",
];

pub(super) fn multiple_choice<R: Rng + ?Sized>(
    text: &str,
    count: usize,
    rng: &mut R,
    shuffle: bool,
) -> Result<Vec<QuestionRecord>, QuestionError> {
    let chunks = chunk_text(text, CHOICE_CHUNK_WORDS)?;
    Ok((0..count)
        .map(|index| match key_statement(cyclic(&chunks, index).as_str()) {
            Some(key) => build_record(&truncate_chars(key, OPTION_EXCERPT_CHARS), rng, shuffle),
            None => {
                tracing::debug!(item = index, "No key statement in chunk; using default question");
                default_record()
            }
        })
        .collect())
}

/// First `.`-delimited sentence of 20 to 100 characters, else the chunk's first 100 characters.
fn key_statement(chunk: &str) -> Option<&str> {
    let sentence = chunk.split('.').map(str::trim).find(|sentence| {
        let length = sentence.chars().count();
        length > KEY_MIN_CHARS && length < KEY_MAX_CHARS
    });
    let key = match sentence {
        Some(sentence) => sentence,
        None => {
            let end = chunk
                .char_indices()
                .nth(KEY_MAX_CHARS)
                .map(|(offset, _)| offset)
                .unwrap_or(chunk.len());
            chunk[..end].trim()
        }
    };
    (!key.is_empty()).then_some(key)
}

fn build_record<R: Rng + ?Sized>(key: &str, rng: &mut R, shuffle: bool) -> QuestionRecord {
    let texts = [key, DISTRACTORS[0], DISTRACTORS[1], DISTRACTORS[2]];
    let mut order = [0usize, 1, 2, 3];
    if shuffle {
        order.shuffle(rng);
    }

    let options = order
        .iter()
        .zip(LABELS)
        .map(|(&source, label)| format!("{label}) {}", texts[source]))
        .collect();
    let correct = order
        .iter()
        .position(|&source| source == 0)
        .map(|position| LABELS[position])
        .unwrap_or(LABELS[0]);

    QuestionRecord {
        question: QUESTION.into(),
        answer: correct.into(),
        options: Some(options),
        explanation: Some(format!(
            "Option {correct} is correct as it directly reflects the content discussed in the source material."
        )),
    }
}

pub(super) fn default_record() -> QuestionRecord {
    QuestionRecord {
        question:
            "Based on the academic content, which statement best represents the key concept discussed?"
                .into(),
        answer: "A".into(),
        options: Some(vec![
            "A) The material presents fundamental principles essential for understanding".into(),
            "B) The content focuses on practical applications in real-world contexts".into(),
            "C) The information covers theoretical frameworks and methodologies".into(),
            "D) The text provides background knowledge for advanced study".into(),
        ]),
        explanation: Some(
            "Option A correctly identifies the fundamental nature of the academic content presented."
                .into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const TEXT: &str = "Mitochondria produce most of the chemical energy in a cell. They have their own DNA.";

    fn answer_option<'a>(record: &'a QuestionRecord) -> &'a str {
        let options = record.options.as_ref().expect("options");
        options
            .iter()
            .find(|option| option.starts_with(&format!("{}) ", record.answer)))
            .expect("answer matches an option")
    }

    #[test]
    fn unshuffled_records_key_option_a() {
        let records = multiple_choice(TEXT, 7, &mut StdRng::seed_from_u64(1), false).unwrap();
        assert_eq!(records.len(), 7);
        for record in &records {
            let options = record.options.as_ref().unwrap();
            assert_eq!(options.len(), 4);
            for (option, label) in options.iter().zip(LABELS) {
                assert!(option.starts_with(&format!("{label}) ")));
            }
            assert_eq!(record.answer, "A");
            assert_eq!(
                answer_option(record),
                "A) Mitochondria produce most of the chemical energy in a cell"
            );
        }
    }

    #[test]
    fn shuffled_answer_tracks_key_statement() {
        let records = multiple_choice(TEXT, 20, &mut StdRng::seed_from_u64(9), true).unwrap();
        let mut answers = std::collections::HashSet::new();
        for record in &records {
            assert!(LABELS.contains(&record.answer.as_str()));
            assert!(answer_option(record).ends_with("Mitochondria produce most of the chemical energy in a cell"));
            answers.insert(record.answer.clone());
        }
        assert!(answers.len() > 1, "shuffling should move the key statement");
    }

    #[test]
    fn key_statement_falls_back_to_leading_characters() {
        let long = "x".repeat(150);
        assert_eq!(key_statement(&long).map(|key| key.len()), Some(100));
        assert_eq!(key_statement("tiny. bits."), Some("tiny. bits."));
        assert_eq!(key_statement("   "), None);
    }

    #[test]
    fn option_excerpt_is_bounded() {
        let long_sentence = format!("{}.", "concept ".repeat(12));
        let records = multiple_choice(&long_sentence, 1, &mut StdRng::seed_from_u64(3), false).unwrap();
        let option_a = &records[0].options.as_ref().unwrap()[0];
        assert!(option_a.trim_start_matches("A) ").chars().count() <= OPTION_EXCERPT_CHARS);
    }

    #[test]
    fn empty_text_uses_default_question() {
        let records = multiple_choice("", 2, &mut StdRng::seed_from_u64(3), true).unwrap();
        assert_eq!(records, vec![default_record(), default_record()]);
    }
}
