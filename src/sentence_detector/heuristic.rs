// Heuristic fallback segmenter: regex boundary scan plus dictionary
// post-processing for abbreviations. Always available, no external state.

use anyhow::Result;
use regex_automata::{meta::Regex, Input};
use tracing::debug;

use super::AbbreviationChecker;

/// Splits text into candidate sentences at `[.!?]` + whitespace + capital,
/// then merges back candidates whose predecessor ends in a known abbreviation.
pub struct HeuristicSegmenter {
    boundary: Regex,
    checker: AbbreviationChecker,
}

impl HeuristicSegmenter {
    /// Compile the boundary pattern once at construction
    pub fn new() -> Result<Self> {
        // Break before a capital letter that follows whitespace that follows
        // terminal punctuation. Over-segments at abbreviations; the merge
        // pass repairs those.
        let boundary = Regex::new(r"[.!?]\s+\p{Lu}")?;
        Ok(Self {
            boundary,
            checker: AbbreviationChecker::new(),
        })
    }

    /// Segment `text` into trimmed, non-empty sentence strings.
    /// Empty or whitespace-only input yields no sentences; text without any
    /// terminal punctuation yields exactly one.
    pub fn segment(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let candidates = self.split_candidates(text);
        let merged = self.merge_abbreviations(candidates);

        debug!("Heuristic segmentation produced {} sentences", merged.len());
        merged
    }

    /// Primary split rule. Each candidate ends just after its terminal
    /// punctuation; the following capital starts the next candidate.
    fn split_candidates<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut candidates = Vec::new();
        let mut start = 0;

        for mat in self.boundary.find_iter(Input::new(text)) {
            // The punctuation is a single ASCII byte at the match start
            let end = mat.start() + 1;
            candidates.push(&text[start..end]);

            // The next candidate begins at the capital letter, which is the
            // final (possibly multi-byte) character of the match
            let capital_len = text[mat.start()..mat.end()]
                .chars()
                .last()
                .map(char::len_utf8)
                .unwrap_or(1);
            start = mat.end() - capital_len;
        }

        if start < text.len() {
            candidates.push(&text[start..]);
        }

        candidates
    }

    /// Abbreviation-merge pass: a candidate whose predecessor ends with a
    /// known abbreviation was a false split, so the two are rejoined with a
    /// single space. Merging runs left to right, so chained abbreviations
    /// ("the U.S. Dr. Smith visited") collapse into one sentence.
    fn merge_abbreviations(&self, candidates: Vec<&str>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();

        for candidate in candidates {
            let candidate = candidate.trim();
            if candidate.is_empty() {
                continue;
            }

            if let Some(previous) = merged.last_mut() {
                if self.checker.ends_with_abbreviation(previous) {
                    previous.push(' ');
                    previous.push_str(candidate);
                    continue;
                }
            }

            merged.push(candidate.to_string());
        }

        merged
    }
}
