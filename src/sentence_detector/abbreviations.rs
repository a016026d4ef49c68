// Centralized abbreviation handling for sentence boundary detection.
// The primary split rule over-segments at tokens like "Dr." and "U.S.";
// the merge pass consults this table to undo those splits.

use std::collections::HashSet;

/// Honorifics that precede proper nouns ("Dr. Smith", "Mrs. Johnson")
pub const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "dr", "prof", "sr", "jr", "rev", "hon"];

/// Organizational suffixes ("Acme Inc. announced")
pub const ORGANIZATIONAL: &[&str] = &["inc", "ltd", "corp", "co", "llc"];

/// Month and day abbreviations ("Jan. 5th", "Mon. morning")
pub const CALENDAR: &[&str] = &[
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "mon", "tue", "tues", "wed", "thu", "thurs", "fri", "sat", "sun",
];

/// Street abbreviations ("Baker St. was crowded")
pub const STREET: &[&str] = &["st", "ave", "blvd", "rd", "ln", "ct"];

/// Multi-letter acronyms with internal periods; stored without the final period
/// so that stripping the trailing "." from "U.S." yields a table entry
pub const DOTTED_ACRONYMS: &[&str] = &["u.s", "u.k", "u.n", "e.u", "u.s.a", "d.c", "a.m", "p.m"];

/// Latin abbreviations ("vs. the champion", "etc. and so on")
pub const LATIN: &[&str] = &["vs", "etc", "i.e", "e.g", "cf", "al", "et al"];

/// Quote characters removed from both ends of a token before lookup
const QUOTE_CHARS: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Punctuation stripped from the end of a token before lookup
const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// Case-insensitive abbreviation lookup backed by a HashSet
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    /// Create a checker over the full default abbreviation table
    pub fn new() -> Self {
        let abbreviations = HONORIFICS
            .iter()
            .chain(ORGANIZATIONAL)
            .chain(CALENDAR)
            .chain(STREET)
            .chain(DOTTED_ACRONYMS)
            .chain(LATIN)
            .copied()
            .collect();
        Self { abbreviations }
    }

    /// Check whether a raw token matches a known abbreviation.
    /// Surrounding quotes and trailing punctuation are ignored, matching is
    /// case-insensitive; "U.S." and "'Dr.'" both match.
    pub fn is_abbreviation(&self, token: &str) -> bool {
        let clean = token
            .trim_matches(|c: char| QUOTE_CHARS.contains(&c))
            .trim_end_matches(|c: char| TRAILING_PUNCT.contains(&c));
        if clean.is_empty() {
            return false;
        }
        self.abbreviations.contains(clean.to_lowercase().as_str())
    }

    /// Check whether the last whitespace-delimited token of `text` is a known
    /// abbreviation. This is the question the merge pass asks about the
    /// candidate preceding a split point.
    pub fn ends_with_abbreviation(&self, text: &str) -> bool {
        match text.split_whitespace().last() {
            Some(last_word) => self.is_abbreviation(last_word),
            None => false,
        }
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}
