//! Data model shared by the prompt, parser, renderer and orchestrator.

use std::fmt;

/// Inbound chat text, created once per update and dropped after processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub chat_id: i64,
    /// Message being answered. `None` sends the reply as a plain chat message.
    pub message_id: Option<i32>,
    pub text: String,
}

impl UserMessage {
    pub fn new(chat_id: i64, message_id: Option<i32>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            text: text.into(),
        }
    }
}

/// What the completion provider is asked to do for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
}

/// The closed set of issue categories the prompt asks for, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueCategory {
    Grammar,
    Spelling,
    Punctuation,
    Style,
    Semantics,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 5] = [
        IssueCategory::Grammar,
        IssueCategory::Spelling,
        IssueCategory::Punctuation,
        IssueCategory::Style,
        IssueCategory::Semantics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IssueCategory::Grammar => "Grammar",
            IssueCategory::Spelling => "Spelling",
            IssueCategory::Punctuation => "Punctuation",
            IssueCategory::Style => "Style",
            IssueCategory::Semantics => "Semantics",
        }
    }

    /// Case-insensitive lookup. `Semantic` is accepted for `Semantics`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("semantic") {
            return Some(IssueCategory::Semantics);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A section heading from the issues block: one of the known categories, or
/// an unrecognized label kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKind {
    Known(IssueCategory),
    Other(String),
}

impl CategoryKind {
    pub fn label(&self) -> &str {
        match self {
            CategoryKind::Known(c) => c.label(),
            CategoryKind::Other(label) => label,
        }
    }
}

/// One category and the issue lines listed under it.
///
/// An empty `items` vector means the model reported no issues for the
/// category; the "None" sentinel itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSection {
    pub kind: CategoryKind,
    pub items: Vec<String>,
}

impl IssueSection {
    pub fn empty(kind: CategoryKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Structured form of a model completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedIssueReport {
    pub improved_text: String,
    /// Known categories in canonical order, then unrecognized ones in source
    /// order. Empty when the completion had no issues block at all.
    pub categories: Vec<IssueSection>,
}

impl ParsedIssueReport {
    /// Items listed under a known category, or `None` if the section is absent.
    pub fn items(&self, category: IssueCategory) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|s| s.kind == CategoryKind::Known(category))
            .map(|s| s.items.as_slice())
    }

    /// Total number of issue lines across all categories.
    pub fn issue_count(&self) -> usize {
        self.categories.iter().map(|s| s.items.len()).sum()
    }
}

/// Markup dialect of a rendered reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupMode {
    Html,
}

/// Chat-ready reply text plus the parse mode it must be sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub markup_text: String,
    pub parse_mode: MarkupMode,
}

impl RenderedMessage {
    pub fn html(markup_text: impl Into<String>) -> Self {
        Self {
            markup_text: markup_text.into(),
            parse_mode: MarkupMode::Html,
        }
    }
}
