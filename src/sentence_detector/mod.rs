// Sentence detection pipeline: segmentation (pluggable strategy with a
// heuristic fallback), sequential position mapping, and per-sentence
// metadata annotation.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod abbreviations;
pub mod heuristic;
pub mod metadata;
pub mod position;
pub mod strategy;

pub use abbreviations::AbbreviationChecker;
pub use heuristic::HeuristicSegmenter;
pub use strategy::{SegmentationError, SegmentationStrategy};

/// Language assumed when the caller does not pass one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language reported when the heuristic fallback produced the result
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// A detected sentence with position and playback metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// 0-based index in detection order
    pub id: usize,
    /// Trimmed sentence content, no other normalization
    pub text: String,
    /// Character offset of this occurrence in the original text
    pub start_position: usize,
    /// `start_position` plus the sentence's character length
    pub end_position: usize,
    /// Whitespace-delimited non-empty tokens
    pub word_count: usize,
    /// Estimated reading duration, always at least 1 ms
    pub estimated_duration_ms: u64,
    /// Mark name at the sentence start, `"s{id}"`
    pub start_mark: String,
    /// Mark name at the sentence end, `"s{id+1}"`
    pub end_mark: String,
}

/// Which strategy produced a detection result. Observability only; both
/// paths satisfy the same contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Library,
    Fallback,
}

/// Ordered sentences plus detection provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub sentences: Vec<Sentence>,
    pub method: DetectionMethod,
    pub language: String,
}

/// A detection result extended with aggregate totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceMetadata {
    pub sentences: Vec<Sentence>,
    pub method: DetectionMethod,
    pub language: String,
    pub total_words: usize,
    pub total_estimated_duration_ms: u64,
}

/// Main detector. Holds an optional injected strategy and the always-ready
/// heuristic fallback.
pub struct SentenceDetector {
    strategy: Option<Box<dyn SegmentationStrategy>>,
    fallback: HeuristicSegmenter,
}

impl SentenceDetector {
    /// Create a detector that uses the heuristic fallback only
    pub fn new() -> Result<Self> {
        Ok(Self {
            strategy: None,
            fallback: HeuristicSegmenter::new()?,
        })
    }

    /// Create a detector with an injected strategy, awaiting its one-time
    /// initialization. An initialization failure is not fatal: the detector
    /// comes up fallback-only.
    pub async fn with_strategy(mut strategy: Box<dyn SegmentationStrategy>) -> Result<Self> {
        let strategy = match strategy.initialize().await {
            Ok(()) => {
                debug!(strategy = strategy.name(), "Segmentation strategy initialized");
                Some(strategy)
            }
            Err(error) => {
                warn!(
                    strategy = strategy.name(),
                    %error,
                    "Strategy initialization failed, using heuristic fallback only"
                );
                None
            }
        };

        Ok(Self {
            strategy,
            fallback: HeuristicSegmenter::new()?,
        })
    }

    /// Detect sentences in `text`, assigning positions and metadata.
    /// `language` defaults to [`DEFAULT_LANGUAGE`] and is forwarded to the
    /// injected strategy; the fallback path reports [`UNKNOWN_LANGUAGE`].
    pub fn detect_sentences(&self, text: &str, language: Option<&str>) -> DetectionResult {
        let requested = language.unwrap_or(DEFAULT_LANGUAGE);

        let (segments, method, language) = match self.segment_with_strategy(text, requested) {
            Some(segments) => (segments, DetectionMethod::Library, requested.to_string()),
            None => (
                self.fallback.segment(text),
                DetectionMethod::Fallback,
                UNKNOWN_LANGUAGE.to_string(),
            ),
        };

        let spans = position::map_positions(text, &segments);
        let sentences = metadata::annotate(segments, spans);

        debug!(
            count = sentences.len(),
            ?method,
            "Sentence detection complete"
        );

        DetectionResult {
            sentences,
            method,
            language,
        }
    }

    /// Detect sentences and fold in aggregate word and duration totals
    pub fn sentence_metadata(&self, text: &str, language: Option<&str>) -> SentenceMetadata {
        let result = self.detect_sentences(text, language);

        let total_words = result.sentences.iter().map(|s| s.word_count).sum();
        let total_estimated_duration_ms = result
            .sentences
            .iter()
            .map(|s| s.estimated_duration_ms)
            .sum();

        SentenceMetadata {
            sentences: result.sentences,
            method: result.method,
            language: result.language,
            total_words,
            total_estimated_duration_ms,
        }
    }

    /// Run the injected strategy if one is present and willing; any failure
    /// is logged and absorbed so the caller only ever sees a usable result.
    fn segment_with_strategy(&self, text: &str, language: &str) -> Option<Vec<String>> {
        let strategy = self.strategy.as_ref()?;

        if !strategy.supports_language(language) {
            debug!(
                strategy = strategy.name(),
                language, "Strategy does not support language, using fallback"
            );
            return None;
        }

        match strategy.segment(text, language) {
            Ok(segments) => {
                // Strategy output is held to the same trim/non-empty
                // contract as the fallback
                let cleaned: Vec<String> = segments
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                Some(cleaned)
            }
            Err(error) => {
                warn!(
                    strategy = strategy.name(),
                    %error,
                    "Strategy segmentation failed, using heuristic fallback"
                );
                None
            }
        }
    }
}
