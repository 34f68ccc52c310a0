//! Document roles and per-document outcomes.
//!
//! Recoverable conditions (reserved names, non-markdown files, binary pages)
//! are carried as values here. Only environment failures travel as errors.

use std::fmt;
use std::path::{Path, PathBuf};

/// Directory under the source root holding the outline pages.
pub const PAGES_DIR: &str = "pages";
/// Directory under the source root holding the referenced assets.
pub const ASSETS_DIR: &str = "assets";
/// The single course document, written to the destination root.
pub const COURSE_FILE: &str = "course.md";
/// File name every unit-mode document is written as.
pub const TOPIC_FILE: &str = "topic.md";
/// Pages that are never turned into units.
pub const RESERVED_FILES: [&str; 2] = ["contents.md", "template.md"];

/// How a document lands in the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// `pages/course.md`, written to `<destination>/course.md`.
    Course,
    /// A plain page, written to `<destination>/<stem>/topic.md`.
    Unit,
    /// A `___`-separated page, written to `<destination>/<a>/<b>/<last>.md`.
    NestedPart,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentRole::Course => "course",
            DocumentRole::Unit => "unit",
            DocumentRole::NestedPart => "nested-part",
        };
        f.write_str(name)
    }
}

/// Why a discovered page produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `contents.md` or `template.md`.
    Reserved,
    /// `course.md` goes through the course step instead.
    CourseHandledSeparately,
    NotMarkdown,
    BinaryContent,
    /// The name would decode to an empty or escaping path.
    InvalidName(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Reserved => f.write_str("reserved file name"),
            SkipReason::CourseHandledSeparately => f.write_str("course file is handled separately"),
            SkipReason::NotMarkdown => f.write_str("not a markdown file"),
            SkipReason::BinaryContent => f.write_str("binary content"),
            SkipReason::InvalidName(why) => write!(f, "invalid name: {why}"),
        }
    }
}

/// A document whose destination has been computed.
///
/// The destination is fixed once the document is planned; the pipeline only
/// reads it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: PathBuf,
    pub role: DocumentRole,
    destination: PathBuf,
}

impl Document {
    pub fn new(source: PathBuf, role: DocumentRole, destination: PathBuf) -> Self {
        Self {
            source,
            role,
            destination,
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Result of processing one discovered page.
#[derive(Debug)]
pub enum DocumentOutcome {
    Written {
        document: Document,
        assets_copied: usize,
        assets_missing: usize,
    },
    Skipped {
        source: PathBuf,
        reason: SkipReason,
    },
}
