//! Renders a [`ParsedIssueReport`] as a Telegram HTML reply.
//!
//! Every output line is tag-balanced (multi-line improved text gets one
//! `<i>` per line), so [`crate::send::split_html_chunks`] can cut between any two
//! lines without breaking the markup.

use improver_core::types::{
    CategoryKind, IssueCategory, IssueSection, ParsedIssueReport, RenderedMessage,
};

use crate::html::{bold, escape_html, italic};

pub const IMPROVED_HEADING: &str = "✅ Improved Text:";
pub const ISSUES_HEADING: &str = "📋 Issues Found:";
/// Shown under a category with no issues.
pub const NO_ISSUES_LINE: &str = "None";

/// Render `report` as HTML.
///
/// A report without an issues block still shows the five categories, each
/// marked as having no issues.
pub fn render(report: &ParsedIssueReport) -> RenderedMessage {
    let mut out = String::new();

    out.push_str(&bold(IMPROVED_HEADING));
    out.push('\n');
    for line in report.improved_text.lines() {
        if !line.trim().is_empty() {
            out.push_str(&italic(line));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&bold(ISSUES_HEADING));
    out.push('\n');

    let placeholder: Vec<IssueSection>;
    let sections = if report.categories.is_empty() {
        placeholder = IssueCategory::ALL
            .iter()
            .map(|c| IssueSection::empty(CategoryKind::Known(*c)))
            .collect();
        &placeholder
    } else {
        &report.categories
    };

    for section in sections {
        out.push('\n');
        out.push_str(&bold(&format!("{}:", section.kind.label())));
        out.push('\n');
        if section.is_empty() {
            out.push_str(NO_ISSUES_LINE);
            out.push('\n');
        }
        for item in &section.items {
            out.push_str(&escape_html(item));
            out.push('\n');
        }
    }

    RenderedMessage::html(out)
}
