// Sequential position mapping: locate each detected sentence in the source
// text with a monotonically advancing cursor so repeated identical sentences
// never collide.

use tracing::warn;

/// Incremental byte-to-char cursor over the source text. Both coordinates
/// advance together in a single forward pass; targets never move backwards.
struct PositionCursor<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> PositionCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    /// Advance to `target` byte offset, returning the char offset there.
    /// Targets always come from substring matches, so they sit on char
    /// boundaries at or after the current position.
    fn advance_to_byte(&mut self, target: usize) -> usize {
        self.char_pos += self.text[self.byte_pos..target].chars().count();
        self.byte_pos = target;
        self.char_pos
    }

    /// Degraded advance used when a sentence could not be located: move the
    /// char coordinate by the sentence's full length and the byte coordinate
    /// as far as the source allows, keeping later searches forward-only.
    fn skip_unlocated(&mut self, byte_len: usize, char_len: usize) {
        self.char_pos += char_len;
        self.byte_pos = usize::min(self.text.len(), self.byte_pos + byte_len);
    }
}

/// Character-offset span of one sentence within the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSpan {
    pub start_position: usize,
    pub end_position: usize,
}

/// Assign start/end character offsets to each sentence, in order. Each
/// sentence is searched for at or after the cursor; a missing occurrence
/// (a segmentation or normalization mismatch upstream) degrades to placement
/// at the cursor rather than failing the whole detection.
pub fn map_positions(text: &str, sentences: &[String]) -> Vec<SentenceSpan> {
    let mut spans = Vec::with_capacity(sentences.len());
    let mut cursor = PositionCursor::new(text);

    for sentence in sentences {
        let char_len = sentence.chars().count();

        match text[cursor.byte_pos..].find(sentence.as_str()) {
            Some(relative) => {
                let start_byte = cursor.byte_pos + relative;
                let start_position = cursor.advance_to_byte(start_byte);
                let end_position = cursor.advance_to_byte(start_byte + sentence.len());
                spans.push(SentenceSpan {
                    start_position,
                    end_position,
                });
            }
            None => {
                warn!(
                    sentence = sentence.as_str(),
                    position = cursor.char_pos,
                    "Sentence not found in source text, using cursor position"
                );
                let start_position = cursor.char_pos;
                spans.push(SentenceSpan {
                    start_position,
                    end_position: start_position + char_len,
                });
                cursor.skip_unlocated(sentence.len(), char_len);
            }
        }
    }

    spans
}
