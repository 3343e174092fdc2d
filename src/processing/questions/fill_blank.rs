//! Fill-in-the-blank generator: one question per eligible sentence, no reuse.

use rand::Rng;

use crate::processing::chunking::split_sentences;
use crate::processing::sanitize::ensure_terminated;
use crate::processing::types::QuestionRecord;

const BLANK: &str = "______";
const MIN_WORDS: usize = 6;

pub(super) fn fill_blank<R: Rng + ?Sized>(
    text: &str,
    count: usize,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    split_sentences(text)
        .into_iter()
        .map(|sentence| sentence.split_whitespace().collect::<Vec<_>>())
        .filter(|words| words.len() >= MIN_WORDS)
        .take(count)
        .map(|words| blank_one_word(&words, rng))
        .collect()
}

fn blank_one_word<R: Rng + ?Sized>(words: &[&str], rng: &mut R) -> QuestionRecord {
    // words.len() >= 6 keeps len/3 + 2 in bounds.
    let index = words.len() / 3 + rng.gen_range(0..3);
    let answer = words[index];
    let sentence = words
        .iter()
        .enumerate()
        .map(|(position, word)| if position == index { BLANK } else { *word })
        .collect::<Vec<_>>()
        .join(" ");

    QuestionRecord::open(
        ensure_terminated(&format!("Fill in the blank: {sentence}"), '.'),
        answer,
    )
}
