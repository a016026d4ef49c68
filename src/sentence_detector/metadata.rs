// Per-sentence metadata: word counts, estimated reading duration, and the
// mark identifiers that tie sentences to SSML playback marks.

use super::position::SentenceSpan;
use super::Sentence;

/// Reading rate assumed when estimating per-sentence audio duration
pub const WORDS_PER_MINUTE: u64 = 200;

/// Count whitespace-delimited non-empty tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading duration at [`WORDS_PER_MINUTE`], floored at 1 ms so no
/// sentence ever reports a zero duration
pub fn estimated_duration_ms(word_count: usize) -> u64 {
    let exact = (word_count as f64 / WORDS_PER_MINUTE as f64) * 60_000.0;
    (exact.round() as u64).max(1)
}

/// Mark name for the start of sentence `id`
pub fn start_mark(id: usize) -> String {
    format!("s{id}")
}

/// Mark name for the end of sentence `id`; identical to the start mark of the
/// following sentence, so consecutive marks chain
pub fn end_mark(id: usize) -> String {
    format!("s{}", id + 1)
}

/// Combine segmented text and mapped spans into fully annotated sentences.
/// Ids are assigned in detection order.
pub fn annotate(segments: Vec<String>, spans: Vec<SentenceSpan>) -> Vec<Sentence> {
    segments
        .into_iter()
        .zip(spans)
        .enumerate()
        .map(|(id, (text, span))| {
            let words = word_count(&text);
            Sentence {
                id,
                start_position: span.start_position,
                end_position: span.end_position,
                word_count: words,
                estimated_duration_ms: estimated_duration_ms(words),
                start_mark: start_mark(id),
                end_mark: end_mark(id),
                text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("One two three."), 3);
        assert_eq!(word_count("  spaced   out \t tokens \n here "), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_duration_scales_with_word_count() {
        // 200 words/minute works out to 300 ms per word
        assert_eq!(estimated_duration_ms(1), 300);
        assert_eq!(estimated_duration_ms(10), 3000);
        assert_eq!(estimated_duration_ms(200), 60_000);

        let mut previous = 0;
        for words in 0..50 {
            let duration = estimated_duration_ms(words);
            assert!(duration >= previous, "duration must be monotone");
            previous = duration;
        }
    }

    #[test]
    fn test_duration_floor() {
        assert_eq!(estimated_duration_ms(0), 1);
    }

    #[test]
    fn test_mark_names_chain() {
        assert_eq!(start_mark(0), "s0");
        assert_eq!(end_mark(0), "s1");
        assert_eq!(end_mark(4), start_mark(5));
    }

    #[test]
    fn test_annotate() {
        let segments = vec!["One two three.".to_string(), "Four five.".to_string()];
        let spans = vec![
            SentenceSpan {
                start_position: 0,
                end_position: 14,
            },
            SentenceSpan {
                start_position: 15,
                end_position: 25,
            },
        ];

        let sentences = annotate(segments, spans);
        assert_eq!(sentences.len(), 2);

        assert_eq!(sentences[0].id, 0);
        assert_eq!(sentences[0].word_count, 3);
        assert_eq!(sentences[0].start_mark, "s0");
        assert_eq!(sentences[0].end_mark, "s1");

        assert_eq!(sentences[1].id, 1);
        assert_eq!(sentences[1].word_count, 2);
        assert_eq!(sentences[1].start_mark, "s1");
        assert_eq!(sentences[1].end_mark, "s2");

        assert!(sentences.iter().all(|s| s.estimated_duration_ms > 0));
    }
}
