//! Text transforms for rendering user-provided markup.

pub mod jira;

use std::borrow::Cow;

/// Converts Jira wiki markup to Markdown for display.
///
/// Stateless and deterministic; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JiraToMarkdown;

impl JiraToMarkdown {
    /// Returns empty or absent input unchanged, converts everything else.
    pub fn transform<'a>(&self, value: Option<&'a str>) -> Option<Cow<'a, str>> {
        match value {
            None => None,
            Some("") => Some(Cow::Borrowed("")),
            Some(text) => Some(Cow::Owned(jira::to_markdown(text))),
        }
    }
}
