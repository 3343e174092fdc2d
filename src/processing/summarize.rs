//! Summary pipeline: chunk, condense each chunk, concatenate, then expand toward a word target.
//!
//! Condensation failures are tolerated per chunk; only a run where every chunk fails is an
//! error. Expansion is attempted once and replaced by a fixed paragraph when the provider cannot
//! produce text, so the word target is attempted but not guaranteed.

use crate::generation::GenerationClient;

use super::chunking::chunk_text;
use super::sanitize::{ensure_terminated, normalize_whitespace};
use super::types::SummaryError;

/// Minimum normalized character count accepted by the pipeline.
pub const MIN_TEXT_CHARS: usize = 100;

const SUMMARY_CHUNK_WORDS: usize = 800;
const MIN_CHUNK_CHARS: usize = 50;
const CONDENSE_EXCERPT_CHARS: usize = 1000;
const CONDENSE_MIN_LEN: usize = 30;
const CONDENSE_MAX_LEN: usize = 150;
const EXPANSION_SEED_CHARS: usize = 500;
const EXPANSION_MAX_TOKENS: usize = 400;
const EXPANSION_TEMPERATURE: f32 = 0.3;
const SEPARATOR: &str = ". ";

const FILLER_PARAGRAPH: &str = "This document contains important academic content covering key concepts, theoretical frameworks, and practical applications relevant to the subject matter. The material presents comprehensive information that students should understand and remember for academic success.";

/// Tunables for [`summarize`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    /// Maximum number of chunks sent for condensation.
    pub max_chunks: usize,
    /// Word count below which expansion is attempted.
    pub target_words: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_chunks: 5,
            target_words: 500,
        }
    }
}

/// How the summary reached its final length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Condensed text already met the word target.
    NotNeeded,
    /// The provider generated additional text.
    Generated,
    /// The fixed filler paragraph was appended.
    Filler,
}

/// Result of a successful summary run.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// Final summary text.
    pub text: String,
    /// Number of chunks whose condensation succeeded.
    pub condensed_chunks: usize,
    /// Expansion path taken.
    pub expansion: Expansion,
}

/// Summarize document text through the generation capability.
pub async fn summarize(
    client: &dyn GenerationClient,
    text: &str,
    options: SummaryOptions,
) -> Result<SummaryOutcome, SummaryError> {
    let normalized = normalize_whitespace(text);
    let length = normalized.chars().count();
    if length < MIN_TEXT_CHARS {
        return Err(SummaryError::InsufficientText {
            length,
            minimum: MIN_TEXT_CHARS,
        });
    }

    let chunks = chunk_text(&normalized, SUMMARY_CHUNK_WORDS)?;
    let mut condensed = Vec::new();
    let mut attempted = 0usize;

    for (index, chunk) in chunks.iter().take(options.max_chunks.max(1)).enumerate() {
        if chunk.chars().count() < MIN_CHUNK_CHARS {
            tracing::debug!(chunk = index, "Skipping short chunk");
            continue;
        }
        attempted += 1;
        let excerpt: String = chunk.chars().take(CONDENSE_EXCERPT_CHARS).collect();
        match client
            .condense(&excerpt, CONDENSE_MIN_LEN, CONDENSE_MAX_LEN)
            .await
        {
            Ok(output) => {
                let output = strip_trailing_period(&output);
                if output.is_empty() {
                    tracing::warn!(chunk = index, "Condensation returned no text; skipping chunk");
                } else {
                    condensed.push(output.to_string());
                }
            }
            Err(error) => {
                tracing::warn!(chunk = index, %error, "Condensation failed; skipping chunk");
            }
        }
    }

    if condensed.is_empty() {
        return Err(SummaryError::SummaryUnavailable { attempted });
    }

    let condensed_chunks = condensed.len();
    let mut summary = condensed.join(SEPARATOR);
    let mut expansion = Expansion::NotNeeded;

    if word_count(&summary) < options.target_words {
        let seed: String = summary.chars().take(EXPANSION_SEED_CHARS).collect();
        let prompt = format!(
            "Based on this summary, provide a detailed academic explanation with key concepts, principles, and important details: {seed}"
        );
        let generated = client
            .generate_text(&prompt, EXPANSION_MAX_TOKENS, EXPANSION_TEMPERATURE)
            .await
            .map(|output| output.trim().to_string());

        match generated {
            Ok(output) if !output.is_empty() => {
                summary.push_str(SEPARATOR);
                summary.push_str(&output);
                expansion = Expansion::Generated;
            }
            Ok(_) => {
                tracing::debug!("Expansion returned no text; appending filler paragraph");
                append_filler(&mut summary);
                expansion = Expansion::Filler;
            }
            Err(error) => {
                tracing::debug!(%error, "Expansion unavailable; appending filler paragraph");
                append_filler(&mut summary);
                expansion = Expansion::Filler;
            }
        }
    }

    if expansion == Expansion::NotNeeded {
        summary = ensure_terminated(&summary, '.');
    }

    tracing::debug!(
        condensed_chunks,
        words = word_count(&summary),
        expansion = ?expansion,
        "Summary assembled"
    );

    Ok(SummaryOutcome {
        text: summary,
        condensed_chunks,
        expansion,
    })
}

fn append_filler(summary: &mut String) {
    summary.push_str(SEPARATOR);
    summary.push_str(FILLER_PARAGRAPH);
}

/// Drop a single trailing period so joins with `". "` never double it.
fn strip_trailing_period(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
