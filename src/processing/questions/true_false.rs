//! True/false generator.
//!
//! Sentences are reused cyclically. Each item is true with probability `true_bias`; false items
//! flip the polarity of the first matching word pair, or are prefixed with "It is not true that"
//! when no pair matches.

use rand::Rng;

use crate::processing::chunking::split_sentences;
use crate::processing::sanitize::{ensure_terminated, lowercase_first};
use crate::processing::types::{QuestionRecord, QuestionType};

use super::{QuestionOptions, cyclic, fallback_record};

const TRUE: &str = "True";
const FALSE: &str = "False";
const NEGATION_PREFIX: &str = "It is not true that ";

/// Word substitutions tried in order; the first pair found in the sentence is applied once.
const POLARITY_SWAPS: [(&str, &str); 18] = [
    ("is", "is not"),
    ("are", "are not"),
    ("was", "was not"),
    ("were", "were not"),
    ("can", "cannot"),
    ("will", "will not"),
    ("increases", "decreases"),
    ("decreases", "increases"),
    ("increase", "decrease"),
    ("decrease", "increase"),
    ("higher", "lower"),
    ("lower", "higher"),
    ("high", "low"),
    ("low", "high"),
    ("more", "less"),
    ("less", "more"),
    ("always", "never"),
    ("never", "always"),
];

pub(super) fn true_false<R: Rng + ?Sized>(
    text: &str,
    count: usize,
    rng: &mut R,
    true_bias: f64,
) -> Vec<QuestionRecord> {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        tracing::debug!("No eligible sentences; using default true/false questions");
        return vec![fallback_record(QuestionType::TrueFalse); count];
    }

    let bias = if true_bias.is_finite() {
        true_bias.clamp(0.0, 1.0)
    } else {
        tracing::warn!(true_bias, "Non-finite true/false bias; using default");
        QuestionOptions::default().true_bias
    };
    (0..count)
        .map(|index| {
            let sentence = *cyclic(&sentences, index);
            if rng.gen_bool(bias) {
                true_record(sentence)
            } else {
                false_record(sentence)
            }
        })
        .collect()
}

fn true_record(sentence: &str) -> QuestionRecord {
    QuestionRecord {
        question: ensure_terminated(&format!("True or False: {sentence}"), '.'),
        answer: TRUE.into(),
        options: None,
        explanation: Some(
            "This statement is true; it is taken directly from the source material.".into(),
        ),
    }
}

fn false_record(sentence: &str) -> QuestionRecord {
    let statement = flip_polarity(sentence);
    QuestionRecord {
        question: ensure_terminated(&format!("True or False: {statement}"), '.'),
        answer: FALSE.into(),
        options: None,
        explanation: Some(format!(
            "This statement is false; the source material states: \"{}\"",
            ensure_terminated(sentence, '.')
        )),
    }
}

/// Produce a false variant of `sentence`.
pub(super) fn flip_polarity(sentence: &str) -> String {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    for (from, to) in POLARITY_SWAPS {
        if let Some(position) = words.iter().position(|word| *word == from) {
            return words
                .iter()
                .enumerate()
                .map(|(index, word)| if index == position { to } else { *word })
                .collect::<Vec<_>>()
                .join(" ");
        }
    }
    format!("{NEGATION_PREFIX}{}", lowercase_first(sentence))
}
