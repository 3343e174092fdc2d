//! Word-count chunking and sentence splitting shared by both pipelines.
//!
//! Chunks are runs of at most `chunk_size` whitespace-separated words joined by single spaces.
//! Chunking never returns an empty sequence: text without any words comes back as a single chunk
//! holding the raw input, so callers can always index partition `i % len`.

use super::types::ChunkingError;

/// Minimum trimmed length (in characters) of a `.`-delimited fragment to count as a sentence.
pub(crate) const MIN_SENTENCE_CHARS: usize = 20;

/// Split text into ordered word runs of at most `chunk_size` words.
///
/// Returns `[text]` unchanged when the input contains no words.
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(vec![text.to_string()]);
    }

    Ok(words
        .chunks(chunk_size)
        .map(|run| run.join(" "))
        .collect())
}

/// Split on `.` and keep trimmed fragments longer than [`MIN_SENTENCE_CHARS`] characters.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// First `limit` non-empty `.`-delimited fragments of `text`, trimmed.
pub(crate) fn leading_fragments(text: &str, limit: usize) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_text_respects_chunk_size() {
        let chunks = chunk_text("one two three four five", 2).unwrap();
        assert_eq!(chunks, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn chunks_rejoin_to_normalized_input() {
        let text = "  alpha\tbeta \n gamma   delta epsilon\n\nzeta eta ";
        for size in 1..=8 {
            let chunks = chunk_text(text, size).unwrap();
            assert!(!chunks.is_empty());
            assert!(
                chunks
                    .iter()
                    .all(|chunk| chunk.split_whitespace().count() <= size)
            );
            assert_eq!(chunks.join(" "), "alpha beta gamma delta epsilon zeta eta");
        }
    }

    #[test]
    fn chunk_text_falls_back_to_raw_input_without_words() {
        assert_eq!(chunk_text("", 4).unwrap(), vec![String::new()]);
        assert_eq!(chunk_text(" \n\t", 4).unwrap(), vec![" \n\t".to_string()]);
    }

    #[test]
    fn chunk_text_is_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog again and again.";
        assert_eq!(chunk_text(text, 3).unwrap(), chunk_text(text, 3).unwrap());
    }

    #[test]
    fn chunk_text_rejects_zero_chunk_size() {
        assert_eq!(chunk_text("hello", 0), Err(ChunkingError::InvalidChunkSize));
    }

    #[test]
    fn split_sentences_drops_short_fragments() {
        let text = "Short one. This sentence is long enough to keep. Tiny. Another long sentence survives here.";
        assert_eq!(
            split_sentences(text),
            vec![
                "This sentence is long enough to keep",
                "Another long sentence survives here"
            ]
        );
    }

    #[test]
    fn leading_fragments_skips_empty_pieces() {
        assert_eq!(
            leading_fragments("A. . B.C. D", 3),
            vec!["A", "B", "C"]
        );
    }
}
