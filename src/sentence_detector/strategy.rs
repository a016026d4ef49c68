// Pluggable segmentation strategy seam. A host may provide a higher-quality
// segmenter (a natural-language library, a platform service); the heuristic
// fallback never goes away and absorbs every strategy failure.

use async_trait::async_trait;
use thiserror::Error;

/// Failures raised by an external segmentation strategy. These never escape
/// the detector: each one is logged and recovered by the heuristic fallback.
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("strategy initialization failed: {0}")]
    Initialization(String),

    #[error("segmentation failed: {0}")]
    Segmentation(String),

    #[error("language {0:?} is not supported by this strategy")]
    UnsupportedLanguage(String),
}

/// A sentence segmentation capability selected at call time. Implementations
/// must be side-effect-free per call; `initialize` is the one-time async
/// setup point (loading a model, warming a service connection).
#[async_trait]
pub trait SegmentationStrategy: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// One-time setup awaited before the strategy is first used
    async fn initialize(&mut self) -> Result<(), SegmentationError> {
        Ok(())
    }

    /// Whether the strategy handles the given language tag
    fn supports_language(&self, _language: &str) -> bool {
        true
    }

    /// Split `text` into ordered sentence strings
    fn segment(&self, text: &str, language: &str) -> Result<Vec<String>, SegmentationError>;
}
