pub mod sentence_detector;
pub mod ssml;

// Re-export main types for convenient access
pub use sentence_detector::{
    DetectionMethod, DetectionResult, Sentence, SentenceDetector, SentenceMetadata,
    SegmentationError, SegmentationStrategy,
};

// Re-export markup operations and their result types
pub use ssml::{
    assemble, assemble_sentences, extract_marks, extract_plain_text, validate, MarkDescriptor,
    MarkPosition, MarkType, Markup, ValidationOutcome,
};
