//! Lenient parser for the two-section completion format requested by
//! [`crate::prompt`].
//!
//! The input is free-form model output, so nothing here fails: a reply that
//! drifts from the template degrades to an improved-text-only report.
//!
//! ```text
//! IMPROVED TEXT:
//! She doesn't like going to school.
//!
//! ISSUES FOUND:
//! Grammar:
//! - "dont" should be "doesn't"
//! Spelling:
//! None
//! ```

use improver_core::types::{CategoryKind, IssueCategory, IssueSection, ParsedIssueReport};

use crate::prompt::{IMPROVED_TEXT_LABEL, ISSUES_DELIMITER, NO_ISSUES_TOKEN};

/// Which section issue lines are currently being collected into.
#[derive(Clone, Copy)]
enum Cursor {
    /// Before the first header; lines here are dropped.
    Preamble,
    Known(IssueCategory),
    Other(usize),
}

/// Parse a raw completion into a [`ParsedIssueReport`].
///
/// - Without an `ISSUES FOUND:` delimiter the whole input is the improved text
///   and `categories` is empty.
/// - With it, all five known categories are present in canonical order
///   (empty when the model wrote `None` or omitted them), followed by any
///   unrecognized headers in the order they appeared.
pub fn parse(raw: &str) -> ParsedIssueReport {
    let (improved_block, issues_block) = match raw.split_once(ISSUES_DELIMITER) {
        Some((head, tail)) => (head, Some(tail)),
        None => (raw, None),
    };

    ParsedIssueReport {
        improved_text: strip_improved_label(improved_block),
        categories: issues_block.map(parse_issues).unwrap_or_default(),
    }
}

fn strip_improved_label(block: &str) -> String {
    let trimmed = block.trim();
    trimmed
        .strip_prefix(IMPROVED_TEXT_LABEL)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

fn parse_issues(block: &str) -> Vec<IssueSection> {
    let mut known: Vec<IssueSection> = IssueCategory::ALL
        .iter()
        .map(|c| IssueSection::empty(CategoryKind::Known(*c)))
        .collect();
    let mut other: Vec<IssueSection> = Vec::new();
    let mut cursor = Cursor::Preamble;

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(label) = header_label(line) {
            cursor = match IssueCategory::from_label(label) {
                Some(category) => Cursor::Known(category),
                None => {
                    let existing = other
                        .iter()
                        .position(|s| s.kind.label().eq_ignore_ascii_case(label));
                    match existing {
                        Some(idx) => Cursor::Other(idx),
                        None => {
                            other.push(IssueSection::empty(CategoryKind::Other(label.to_string())));
                            Cursor::Other(other.len() - 1)
                        }
                    }
                }
            };
            continue;
        }

        if is_no_issues(line) {
            continue;
        }

        match cursor {
            Cursor::Preamble => {}
            // ALL is declared in the same order as the enum.
            Cursor::Known(category) => known[category as usize].items.push(line.to_string()),
            Cursor::Other(idx) => other[idx].items.push(line.to_string()),
        }
    }

    known.extend(other);
    known
}

/// A header ends with `:` and is not a bullet. Returns the label without the colon.
///
/// A bare `:` has no label and is treated as an ordinary line.
fn header_label(line: &str) -> Option<&str> {
    if line.starts_with('-') {
        return None;
    }
    let label = line.strip_suffix(':')?.trim();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// `None`, `- None`, `None.` and case variants all mean "no issues".
fn is_no_issues(line: &str) -> bool {
    let token = line
        .trim_start_matches('-')
        .trim()
        .trim_end_matches('.')
        .trim_end();
    token.eq_ignore_ascii_case(NO_ISSUES_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOOL: &str = "IMPROVED TEXT:\nShe doesn't like going to school.\n\nISSUES FOUND:\nGrammar:\n- \"dont\" should be \"doesn't\"\n- \"like go\" should be \"like going\"\nSpelling:\nNone";

    #[test]
    fn parses_well_formed_reply() {
        let report = parse(SCHOOL);
        assert_eq!(report.improved_text, "She doesn't like going to school.");
        assert_eq!(
            report.items(IssueCategory::Grammar).unwrap(),
            [
                "- \"dont\" should be \"doesn't\"",
                "- \"like go\" should be \"like going\""
            ]
        );
        assert!(report.items(IssueCategory::Spelling).unwrap().is_empty());
        assert_eq!(report.issue_count(), 2);
    }

    #[test]
    fn missing_delimiter_yields_text_only_report() {
        let report = parse("IMPROVED TEXT:\n  Hello, world.  \n");
        assert_eq!(report.improved_text, "Hello, world.");
        assert!(report.categories.is_empty());
    }

    #[test]
    fn missing_label_keeps_whole_text() {
        let report = parse("Just a sentence.");
        assert_eq!(report.improved_text, "Just a sentence.");
        assert!(report.categories.is_empty());
    }

    #[test]
    fn categories_come_out_in_canonical_order() {
        let raw = "IMPROVED TEXT:\nx\nISSUES FOUND:\nSemantics:\n- s\nStyle:\n- st\nPunctuation:\n- p\nSpelling:\n- sp\nGrammar:\n- g\n";
        let report = parse(raw);
        let labels: Vec<_> = report.categories.iter().map(|s| s.kind.label()).collect();
        assert_eq!(labels, ["Grammar", "Spelling", "Punctuation", "Style", "Semantics"]);
        assert_eq!(report.items(IssueCategory::Grammar).unwrap(), ["- g"]);
        assert_eq!(report.items(IssueCategory::Spelling).unwrap(), ["- sp"]);
        assert_eq!(report.items(IssueCategory::Punctuation).unwrap(), ["- p"]);
        assert_eq!(report.items(IssueCategory::Style).unwrap(), ["- st"]);
        assert_eq!(report.items(IssueCategory::Semantics).unwrap(), ["- s"]);
    }

    #[test]
    fn omitted_categories_are_synthesized_empty() {
        let report = parse("IMPROVED TEXT:\nx\nISSUES FOUND:\nStyle:\n- wordy\n");
        assert_eq!(report.categories.len(), 5);
        for category in IssueCategory::ALL {
            let items = report.items(category).unwrap();
            if category == IssueCategory::Style {
                assert_eq!(items, ["- wordy"]);
            } else {
                assert!(items.is_empty(), "{category} should be empty");
            }
        }
    }

    #[test]
    fn unknown_headers_are_kept_after_known_ones() {
        let raw = "ISSUES FOUND:\nTone:\n- too casual\nGrammar:\n- g\nVocabulary:\n- v\ntone:\n- slangy\n";
        let report = parse(raw);
        assert_eq!(report.categories.len(), 7);
        assert_eq!(report.categories[5].kind, CategoryKind::Other("Tone".to_string()));
        assert_eq!(report.categories[5].items, ["- too casual", "- slangy"]);
        assert_eq!(report.categories[6].kind, CategoryKind::Other("Vocabulary".to_string()));
    }

    #[test]
    fn blank_lines_do_not_close_a_category() {
        let raw = "ISSUES FOUND:\nGrammar:\n- one\n\n\n- two\n";
        assert_eq!(parse(raw).items(IssueCategory::Grammar).unwrap(), ["- one", "- two"]);
    }

    #[test]
    fn lines_before_first_header_are_dropped() {
        let raw = "ISSUES FOUND:\nHere is what I found\n- stray\nGrammar:\n- g\n";
        let report = parse(raw);
        assert_eq!(report.issue_count(), 1);
        assert_eq!(report.items(IssueCategory::Grammar).unwrap(), ["- g"]);
    }

    #[test]
    fn bullet_ending_in_colon_is_an_item() {
        let raw = "ISSUES FOUND:\nStyle:\n- consider rephrasing:\n";
        assert_eq!(
            parse(raw).items(IssueCategory::Style).unwrap(),
            ["- consider rephrasing:"]
        );
    }

    #[test]
    fn no_issues_variants_are_recognized() {
        let raw = "ISSUES FOUND:\nGrammar:\nNone\nSpelling:\n- None\nPunctuation:\nnone.\nStyle:\n- Nonetheless, fine\n";
        let report = parse(raw);
        assert!(report.items(IssueCategory::Grammar).unwrap().is_empty());
        assert!(report.items(IssueCategory::Spelling).unwrap().is_empty());
        assert!(report.items(IssueCategory::Punctuation).unwrap().is_empty());
        assert_eq!(report.items(IssueCategory::Style).unwrap(), ["- Nonetheless, fine"]);
    }

    #[test]
    fn repeated_header_appends() {
        let raw = "ISSUES FOUND:\nGrammar:\n- a\nSpelling:\n- b\nGrammar:\n- c\n";
        assert_eq!(parse(raw).items(IssueCategory::Grammar).unwrap(), ["- a", "- c"]);
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let raw = "IMPROVED TEXT:\r\nHi.\r\n\r\nISSUES FOUND:\r\nGrammar:\r\n- g\r\n";
        let report = parse(raw);
        assert_eq!(report.improved_text, "Hi.");
        assert_eq!(report.items(IssueCategory::Grammar).unwrap(), ["- g"]);
    }

    #[test]
    fn empty_input_is_an_empty_report() {
        assert_eq!(parse(""), ParsedIssueReport::default());
    }

    #[test]
    fn parse_is_deterministic() {
        assert_eq!(parse(SCHOOL), parse(SCHOOL));
    }
}
