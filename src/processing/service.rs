//! Study guide service coordinating the summary pipeline, question generation, and storage.

use crate::{
    config::Config,
    generation::{GenerationClient, get_generation_client},
    metrics::{GuideMetrics, MetricsSnapshot},
    processing::{
        questions::{QuestionOptions, generate_questions},
        sanitize::{compute_digest, normalize_whitespace, parse_question_types},
        summarize::{Expansion, SummaryOptions, summarize},
        types::{
            GuideRequest, ProcessingError, QuestionError, QuestionSection, QuestionType,
            StudyGuide,
        },
    },
    store::GuideStore,
};
use async_trait::async_trait;
use futures_util::future::join_all;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Generation tunables derived from configuration.
#[derive(Debug, Clone, Copy)]
pub struct GuideSettings {
    /// Questions generated per requested type.
    pub question_count: usize,
    /// Fixed RNG seed; each type task derives its own stream from it.
    pub seed: Option<u64>,
    /// Summary pipeline options.
    pub summary: SummaryOptions,
    /// Question generator options.
    pub questions: QuestionOptions,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self {
            question_count: 7,
            seed: None,
            summary: SummaryOptions::default(),
            questions: QuestionOptions::default(),
        }
    }
}

impl GuideSettings {
    /// Build settings from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            question_count: config.question_count,
            seed: config.generation_seed,
            summary: SummaryOptions {
                max_chunks: config.summary_max_chunks,
                target_words: config.summary_target_words,
            },
            questions: QuestionOptions {
                true_bias: config.true_false_bias,
                shuffle_choices: config.shuffle_choices,
            },
        }
    }
}

/// Produces study guides from extracted document text.
///
/// The service holds only injected collaborators: the generation client, the guide store, and
/// the metrics registry. Construct it once near process start and share it through an `Arc`.
pub struct StudyGuideService {
    client: Arc<dyn GenerationClient>,
    store: GuideStore,
    metrics: Arc<GuideMetrics>,
    settings: GuideSettings,
}

/// Abstraction over the study guide pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait StudyGuideApi: Send + Sync {
    /// Summarize the text, generate every requested question type, and store the result.
    async fn generate(&self, request: GuideRequest) -> Result<StudyGuide, ProcessingError>;

    /// Fetch a previously generated guide.
    async fn get_guide(&self, id: u64) -> Option<StudyGuide>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl StudyGuideService {
    /// Build a service using the provider selected in `config`.
    pub fn new(config: &Config) -> Self {
        tracing::info!(provider = ?config.generation_provider, "Initializing generation client");
        Self::with_client(get_generation_client(config), GuideSettings::from_config(config))
    }

    /// Build a service around an explicit generation client.
    pub fn with_client(client: Arc<dyn GenerationClient>, settings: GuideSettings) -> Self {
        Self {
            client,
            store: GuideStore::new(),
            metrics: Arc::new(GuideMetrics::new()),
            settings,
        }
    }

    /// Generate and store a study guide.
    pub async fn generate(&self, request: GuideRequest) -> Result<StudyGuide, ProcessingError> {
        let GuideRequest {
            filename,
            text,
            selected_types,
        } = request;

        let types = parse_question_types(&selected_types)?;
        if types.is_empty() {
            return Err(ProcessingError::NoQuestionTypes);
        }

        let normalized = normalize_whitespace(&text);
        tracing::info!(
            filename = %filename,
            characters = normalized.chars().count(),
            types = ?types,
            "Generating study guide"
        );

        let summary = summarize(self.client.as_ref(), &normalized, self.settings.summary).await?;
        if summary.expansion == Expansion::Filler {
            self.metrics.record_filler_summary();
        }

        let source_digest = compute_digest(&normalized);
        let sections = self.generate_sections(Arc::from(normalized), &types).await?;
        let total_questions = sections
            .iter()
            .map(|section| section.questions.len())
            .sum();

        let guide = StudyGuide {
            id: self.store.allocate_id(),
            filename,
            summary: summary.text,
            questions: sections,
            selected_types: types,
            total_questions,
            created_at: timestamp(),
            source_digest,
        };
        let guide = self.store.insert(guide).await;
        self.metrics.record_guide(total_questions as u64);

        tracing::info!(
            id = guide.id,
            filename = %guide.filename,
            sections = guide.questions.len(),
            total_questions,
            condensed_chunks = summary.condensed_chunks,
            expansion = ?summary.expansion,
            "Study guide generated"
        );
        Ok(guide)
    }

    /// Fetch a stored guide by identifier.
    pub async fn get_guide(&self, id: u64) -> Option<StudyGuide> {
        self.store.get(id).await
    }

    /// Return a snapshot of the generation counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Run one task per requested type and collect the sections in request order.
    async fn generate_sections(
        &self,
        text: Arc<str>,
        types: &[QuestionType],
    ) -> Result<Vec<QuestionSection>, ProcessingError> {
        let GuideSettings {
            question_count,
            seed,
            questions: options,
            ..
        } = self.settings;

        let handles = types.iter().enumerate().map(|(index, &question_type)| {
            let text = Arc::clone(&text);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
                None => StdRng::from_entropy(),
            };
            tokio::spawn(async move {
                generate_questions(&text, question_type, question_count, &mut rng, &options)
            })
        });
        let joined = join_all(handles).await;

        let mut sections = Vec::with_capacity(types.len());
        for (&question_type, result) in types.iter().zip(joined) {
            let questions = result.map_err(|error| QuestionError::Generation {
                question_type,
                reason: error.to_string(),
            })??;
            sections.push(QuestionSection {
                question_type,
                questions,
            });
        }
        Ok(sections)
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[async_trait]
impl StudyGuideApi for StudyGuideService {
    async fn generate(&self, request: GuideRequest) -> Result<StudyGuide, ProcessingError> {
        StudyGuideService::generate(self, request).await
    }

    async fn get_guide(&self, id: u64) -> Option<StudyGuide> {
        StudyGuideService::get_guide(self, id).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        StudyGuideService::metrics_snapshot(self)
    }
}
