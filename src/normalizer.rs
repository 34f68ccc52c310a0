//! Outline markup removal.
//!
//! Outline pages encode nesting with a leading `- ` bullet or tabs. Publishing
//! wants plain paragraphs, so every page is promoted by exactly one level:
//!
//! - a top-level item (`- text`) loses its bullet and any following blanks,
//! - a nested item loses one leading tab and nothing else,
//! - every other line is kept verbatim.
//!
//! The run's [`VersionTag`] is then stamped as a trailing HTML comment.

use std::fmt;

/// Provenance identifier stamped onto every document of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Builds the default tag for a run: `<date>-uid<epoch seconds>`.
    pub fn from_timestamp(now: chrono::DateTime<chrono::Utc>) -> Self {
        Self(format!("{}-uid{}", now.format("%Y-%m-%d"), now.timestamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty tag disables stamping; a blank but non-empty tag does not.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The trailing comment written after a document's content.
    pub fn comment(&self) -> String {
        format!("<!-- UID: {} -->", self.0)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Promotes a single line by one outline level.
pub fn normalize_line(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ") {
        rest.trim_start()
    } else if let Some(rest) = line.strip_prefix('\t') {
        rest
    } else {
        line
    }
}

/// Strips outline markup from `content` and appends the version tag comment.
///
/// The result has no leading or trailing whitespace and, when a tag is
/// given, ends with exactly one `<!-- UID: ... -->` line.
pub fn clean_markdown(content: &str, tag: Option<&VersionTag>) -> String {
    let body = content
        .lines()
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n");

    let mut cleaned = body.trim_end().to_string();

    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        cleaned.push_str("\n\n");
        cleaned.push_str(&tag.comment());
    }

    cleaned.trim().to_string()
}
