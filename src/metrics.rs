use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing study guide generation activity.
#[derive(Default)]
pub struct GuideMetrics {
    guides_generated: AtomicU64,
    questions_generated: AtomicU64,
    filler_summaries: AtomicU64,
}

impl GuideMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed study guide and the number of questions it carries.
    pub fn record_guide(&self, question_count: u64) {
        self.guides_generated.fetch_add(1, Ordering::Relaxed);
        self.questions_generated
            .fetch_add(question_count, Ordering::Relaxed);
    }

    /// Record a summary that fell back to the filler paragraph during expansion.
    pub fn record_filler_summary(&self) {
        self.filler_summaries.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            guides_generated: self.guides_generated.load(Ordering::Relaxed),
            questions_generated: self.questions_generated.load(Ordering::Relaxed),
            filler_summaries: self.filler_summaries.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of generation counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of study guides generated since startup.
    pub guides_generated: u64,
    /// Total questions produced across all generated guides.
    pub questions_generated: u64,
    /// Summaries that needed the filler paragraph because expansion was unavailable.
    pub filler_summaries: u64,
}
