//! Instruction payload sent to the completion provider.
//!
//! The template asks for a two-section reply that [`crate::parse`] reads back:
//! an `IMPROVED TEXT:` block followed by an `ISSUES FOUND:` block with one
//! header per category. Changing the wording here means bumping
//! [`PROMPT_VERSION`] and re-checking the parser tests.

/// Revision of the template below, logged with every request.
pub const PROMPT_VERSION: u32 = 1;

/// Label that opens the improved-text section of the reply.
pub const IMPROVED_TEXT_LABEL: &str = "IMPROVED TEXT:";

/// Delimiter between the improved text and the issues block.
pub const ISSUES_DELIMITER: &str = "ISSUES FOUND:";

/// Token the model writes for a category without issues.
pub const NO_ISSUES_TOKEN: &str = "None";

const PROMPT_HEAD: &str = "You are an English language assistant. Improve the following text to B2 level, semiformal American English.

Original text:
";

const PROMPT_TAIL: &str = r#"

Please provide:
1. The improved version of the text
2. A categorized list of issues found:
   - Grammar issues
   - Spelling issues
   - Punctuation issues
   - Style issues
   - Semantic issues

Format your response as:
IMPROVED TEXT:
[improved text here]

ISSUES FOUND:
Grammar:
- [issue 1]
- [issue 2]

Spelling:
- [issue 1]

Punctuation:
- [issue 1]

Style:
- [issue 1]

Semantics:
- [issue 1]

If a category has no issues, write "None""#;

/// Build the instruction payload for `user_text`.
///
/// The text is inserted verbatim at a single point; the provider treats the
/// whole payload as plain text, so nothing is escaped.
pub fn build(user_text: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_HEAD.len() + user_text.len() + PROMPT_TAIL.len());
    prompt.push_str(PROMPT_HEAD);
    prompt.push_str(user_text);
    prompt.push_str(PROMPT_TAIL);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_interpolated_verbatim() {
        let prompt = build("She dont like go to school");
        assert!(prompt.contains("Original text:\nShe dont like go to school\n\nPlease provide:"));
    }

    #[test]
    fn template_names_both_sections_and_all_categories() {
        let prompt = build("x");
        assert!(prompt.contains(IMPROVED_TEXT_LABEL));
        assert!(prompt.contains(ISSUES_DELIMITER));
        for label in ["Grammar:", "Spelling:", "Punctuation:", "Style:", "Semantics:"] {
            assert!(prompt.contains(label), "missing {label}");
        }
        assert!(prompt.ends_with(r#"write "None""#));
    }

    #[test]
    fn placeholder_like_text_is_not_expanded() {
        let prompt = build("{text} %s {}");
        assert!(prompt.contains("Original text:\n{text} %s {}\n"));
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(build("Hello there"), build("Hello there"));
    }
}
