// SSML assembly and inversion: wrap text in <speak> markup with named marks,
// recover plain text from markup, validate structure, and scan mark offsets
// for correlating playback progress with sentence boundaries.

use quick_xml::events::Event;
use quick_xml::Reader;
use regex_automata::{meta::Regex, Input};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::sentence_detector::Sentence;

/// Root element required of all markup handled here
pub const ROOT_ELEMENT: &str = "speak";

/// Structural problems found while validating markup. Reported to callers as
/// a [`ValidationOutcome`], never thrown.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup is not well-formed: {0}")]
    Malformed(String),

    #[error("missing <speak> root element")]
    MissingRoot,
}

/// Role a mark plays relative to its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkType {
    HighlightStart,
    HighlightEnd,
}

/// A named mark emitted into markup, carrying the original unescaped text it
/// brackets for the highlighting collaborator's reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDescriptor {
    pub name: String,
    pub mark_type: MarkType,
    pub text: String,
}

/// Generated markup plus descriptors for every mark referenced in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markup {
    pub markup: String,
    pub marks: Vec<MarkDescriptor>,
}

/// Result of structural validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub error: Option<String>,
}

/// A mark name and its byte offset within the markup string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkPosition {
    pub name: String,
    pub position: usize,
}

/// Escape the five XML special characters. `&` goes first so already-inserted
/// entities are not escaped twice.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Invert [`escape_text`]. `&amp;` goes last, mirroring the escape order.
fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Wrap plain text in a `<speak>` element with a `start` mark immediately
/// before the text and an `end` mark immediately after
pub fn assemble(text: &str) -> Markup {
    let markup = format!(
        r#"<{root}><mark name="start"/>{content}<mark name="end"/></{root}>"#,
        root = ROOT_ELEMENT,
        content = escape_text(text),
    );

    let marks = vec![
        MarkDescriptor {
            name: "start".to_string(),
            mark_type: MarkType::HighlightStart,
            text: text.to_string(),
        },
        MarkDescriptor {
            name: "end".to_string(),
            mark_type: MarkType::HighlightEnd,
            text: text.to_string(),
        },
    ];

    Markup { markup, marks }
}

/// Chain per-sentence marks: `s0 text0 s1 text1 … sN`. Consecutive sentences
/// share a mark name, so one mark closes a sentence and opens the next.
pub fn assemble_sentences(sentences: &[Sentence]) -> Markup {
    let mut markup = format!("<{ROOT_ELEMENT}>");
    let mut marks = Vec::with_capacity(sentences.len() + 1);

    for sentence in sentences {
        markup.push_str(&format!(r#"<mark name="{}"/>"#, sentence.start_mark));
        markup.push_str(&escape_text(&sentence.text));
        markup.push(' ');
        marks.push(MarkDescriptor {
            name: sentence.start_mark.clone(),
            mark_type: MarkType::HighlightStart,
            text: sentence.text.clone(),
        });
    }

    if let Some(last) = sentences.last() {
        markup.push_str(&format!(r#"<mark name="{}"/>"#, last.end_mark));
        marks.push(MarkDescriptor {
            name: last.end_mark.clone(),
            mark_type: MarkType::HighlightEnd,
            text: last.text.clone(),
        });
    }

    markup.push_str(&format!("</{ROOT_ELEMENT}>"));

    Markup { markup, marks }
}

fn tag_strip_regex() -> &'static Regex {
    static TAG_STRIP: OnceLock<Regex> = OnceLock::new();
    TAG_STRIP.get_or_init(|| {
        Regex::new(r"</?(?:speak|mark)[^>]*>").expect("tag strip pattern is valid")
    })
}

fn mark_tag_regex() -> &'static Regex {
    static MARK_TAG: OnceLock<Regex> = OnceLock::new();
    MARK_TAG.get_or_init(|| Regex::new(r"<mark[^>]*/>").expect("mark tag pattern is valid"))
}

/// Strip root and mark tags (self-closing or paired), unescape the five
/// entities, and trim. Left inverse of [`assemble`] for escape-free input.
pub fn extract_plain_text(markup: &str) -> String {
    let mut stripped = String::with_capacity(markup.len());
    let mut last = 0;

    for mat in tag_strip_regex().find_iter(Input::new(markup)) {
        stripped.push_str(&markup[last..mat.start()]);
        last = mat.end();
    }
    stripped.push_str(&markup[last..]);

    unescape_text(&stripped).trim().to_string()
}

/// Structurally validate markup: parseable as XML, balanced tags, and a
/// `<speak>` root element. Failures come back in the outcome, never as `Err`.
pub fn validate(markup: &str) -> ValidationOutcome {
    match parse_markup(markup) {
        Ok(()) => ValidationOutcome {
            valid: true,
            error: None,
        },
        Err(error) => ValidationOutcome {
            valid: false,
            error: Some(error.to_string()),
        },
    }
}

fn parse_markup(markup: &str) -> Result<(), MarkupError> {
    let mut reader = Reader::from_str(markup);
    let mut buf = Vec::new();
    let mut open_elements: Vec<String> = Vec::new();
    let mut root: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if root.is_none() {
                    root = Some(name.clone());
                }
                open_elements.push(name);
            }
            Ok(Event::Empty(e)) => {
                if root.is_none() {
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match open_elements.pop() {
                    Some(open) if open == name => {}
                    _ => {
                        return Err(MarkupError::Malformed(format!(
                            "unexpected closing tag </{name}>"
                        )))
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(MarkupError::Malformed(e.to_string())),
        }
        buf.clear();
    }

    if let Some(unclosed) = open_elements.last() {
        return Err(MarkupError::Malformed(format!("unclosed element <{unclosed}>")));
    }

    match root {
        Some(name) if name == ROOT_ELEMENT => Ok(()),
        _ => Err(MarkupError::MissingRoot),
    }
}

/// Scan for self-closing mark tags, returning each mark's name and the byte
/// offset of its tag in the markup string, in document order
pub fn extract_marks(markup: &str) -> Vec<MarkPosition> {
    let mut marks = Vec::new();

    for mat in mark_tag_regex().find_iter(Input::new(markup)) {
        let tag = &markup[mat.range()];
        if let Some(name) = attribute_value(tag, "name") {
            marks.push(MarkPosition {
                name,
                position: mat.start(),
            });
        }
    }

    marks
}

/// Pull a double-quoted attribute value out of a single tag's text
fn attribute_value(tag: &str, attribute: &str) -> Option<String> {
    let needle = format!("{attribute}=\"");
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence_detector::SentenceDetector;

    #[test]
    fn test_assemble_basic() {
        let result = assemble("Hello world");

        assert_eq!(
            result.markup,
            r#"<speak><mark name="start"/>Hello world<mark name="end"/></speak>"#
        );
        assert_eq!(result.marks.len(), 2);
        assert_eq!(result.marks[0].name, "start");
        assert_eq!(result.marks[0].mark_type, MarkType::HighlightStart);
        assert_eq!(result.marks[1].name, "end");
        assert_eq!(result.marks[1].mark_type, MarkType::HighlightEnd);
        assert_eq!(result.marks[0].text, "Hello world");
    }

    #[test]
    fn test_escape_order_ampersand_first() {
        let result = assemble("A & B <tag> \"q\" 'a'");
        assert!(result.markup.contains("A &amp; B &lt;tag&gt; &quot;q&quot; &apos;a&apos;"));
        // No double escaping
        assert!(!result.markup.contains("&amp;lt;"));
    }

    #[test]
    fn test_round_trip() {
        let original = "A & B <tag>";
        let assembled = assemble(original);
        assert_eq!(extract_plain_text(&assembled.markup), original);
    }

    #[test]
    fn test_round_trip_plain() {
        let original = "Nothing special here.";
        let assembled = assemble(original);
        assert_eq!(extract_plain_text(&assembled.markup), original);
    }

    #[test]
    fn test_empty_text_has_start_and_end_marks() {
        let assembled = assemble("");
        let marks = extract_marks(&assembled.markup);

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].name, "start");
        assert_eq!(marks[1].name, "end");
    }

    #[test]
    fn test_extract_strips_paired_mark_tags() {
        let markup = r#"<speak><mark name="a">wrapped</mark> tail</speak>"#;
        assert_eq!(extract_plain_text(markup), "wrapped tail");
    }

    #[test]
    fn test_validate_well_formed() {
        let outcome = validate(r#"<speak><mark name="x"/>hi</speak>"#);
        assert!(outcome.valid);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_validate_unclosed() {
        let outcome = validate("<speak>unclosed");
        assert!(!outcome.valid);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_validate_wrong_root() {
        let outcome = validate("<voice>hi</voice>");
        assert!(!outcome.valid);
    }

    #[test]
    fn test_validate_empty_input() {
        let outcome = validate("");
        assert!(!outcome.valid);
    }

    #[test]
    fn test_validate_assembled_output() {
        let assembled = assemble("Quotes \"inside\" & <angles>");
        assert!(validate(&assembled.markup).valid);
    }

    #[test]
    fn test_extract_marks_positions() {
        let assembled = assemble("hi");
        let marks = extract_marks(&assembled.markup);

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].position, assembled.markup.find("<mark").unwrap());
        assert!(marks[0].position < marks[1].position);
        // Positions index into the markup string itself
        assert!(assembled.markup[marks[1].position..].starts_with(r#"<mark name="end"/>"#));
    }

    #[test]
    fn test_assemble_sentences_chains_marks() {
        let detector = SentenceDetector::new().unwrap();
        let result = detector.detect_sentences("One here. Two here.", None);
        let assembled = assemble_sentences(&result.sentences);

        // Marks s0, s1 open the sentences; s2 closes the last one
        let marks = extract_marks(&assembled.markup);
        let names: Vec<&str> = marks.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["s0", "s1", "s2"]);

        // Every emitted mark has a descriptor and vice versa
        assert_eq!(assembled.marks.len(), marks.len());
        for (descriptor, scanned) in assembled.marks.iter().zip(&marks) {
            assert_eq!(descriptor.name, scanned.name);
        }

        assert!(validate(&assembled.markup).valid);
        assert_eq!(extract_plain_text(&assembled.markup), "One here. Two here.");
    }

    #[test]
    fn test_assemble_sentences_empty() {
        let assembled = assemble_sentences(&[]);
        assert!(assembled.marks.is_empty());
        assert!(extract_marks(&assembled.markup).is_empty());
        assert!(validate(&assembled.markup).valid);
    }

    #[test]
    fn test_attribute_value() {
        assert_eq!(
            attribute_value(r#"<mark name="s3"/>"#, "name"),
            Some("s3".to_string())
        );
        assert_eq!(attribute_value("<mark/>", "name"), None);
    }
}
