//! Telegram HTML helpers.
//!
//! Telegram's HTML parse mode only treats `<`, `>` and `&` as markup, so
//! those are the only characters escaped. Quotes are left readable.

/// Escape text for embedding in a Telegram HTML message.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `<b>…</b>` around escaped `text`.
pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", escape_html(text))
}

/// `<i>…</i>` around escaped `text`.
pub fn italic(text: &str) -> String {
    format!("<i>{}</i>", escape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<b>Tom & Jerry</b>"),
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_and_quotes_alone() {
        let input = "\"dont\" should be \"doesn't\" — ok!";
        assert_eq!(escape_html(input), input);
    }

    #[test]
    fn existing_entities_are_escaped_again() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn wrappers_escape_their_content() {
        assert_eq!(bold("a<b"), "<b>a&lt;b</b>");
        assert_eq!(italic("x>y"), "<i>x&gt;y</i>");
    }
}
