//! Filename to destination path decoding.
//!
//! A page name either encodes a nested destination (`a___b___c.md` becomes
//! `<destination>/a/b/c.md`) or names a unit (`topic1.md` becomes
//! `<destination>/topic1/topic.md`). Decoding is pure: directories are created
//! by the pipeline once a page is known to be written.

use crate::document::{COURSE_FILE, DocumentRole, RESERVED_FILES, SkipReason, TOPIC_FILE};
use crate::utils::is_markdown;
use std::path::{Path, PathBuf};

/// Separator that stands in for a directory boundary inside a page name.
pub const NESTED_SEPARATOR: &str = "___";

/// Where a page should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub role: DocumentRole,
    /// Directory to create before writing, also the parent of the `img` folder.
    pub dir: PathBuf,
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Place(Placement),
    Skip(SkipReason),
}

/// Decodes a page's file name into a placement under `destination`.
pub fn decode_filename(file_name: &str, destination: &Path) -> Decoded {
    if RESERVED_FILES.contains(&file_name) {
        return Decoded::Skip(SkipReason::Reserved);
    }

    if !is_markdown(file_name) {
        return Decoded::Skip(SkipReason::NotMarkdown);
    }

    if file_name == COURSE_FILE {
        return Decoded::Skip(SkipReason::CourseHandledSeparately);
    }

    let stem = &file_name[..file_name.len() - ".md".len()];

    if stem.contains(NESTED_SEPARATOR) {
        decode_nested(stem, destination)
    } else {
        decode_unit(stem, destination)
    }
}

fn decode_nested(stem: &str, destination: &Path) -> Decoded {
    let parts: Vec<&str> = stem.split(NESTED_SEPARATOR).collect();

    if let Some(bad) = parts.iter().find(|p| is_escaping(p)) {
        return Decoded::Skip(SkipReason::InvalidName(format!(
            "path component '{bad}' is not allowed"
        )));
    }

    let (last, dirs) = parts
        .split_last()
        .map(|(last, dirs)| (*last, dirs))
        .unwrap_or(("", &[][..]));

    // Empty components (`a______b`) collapse, matching a path join of "".
    // An empty last component still names a file: `a___.md` is `a/.md`.
    let dir = dirs
        .iter()
        .filter(|p| !p.is_empty())
        .fold(destination.to_path_buf(), |acc, part| acc.join(part));
    let file = dir.join(format!("{last}.md"));

    Decoded::Place(Placement {
        role: DocumentRole::NestedPart,
        dir,
        file,
    })
}

fn decode_unit(stem: &str, destination: &Path) -> Decoded {
    if is_escaping(stem) {
        return Decoded::Skip(SkipReason::InvalidName(format!(
            "'{stem}' cannot be a unit directory"
        )));
    }

    // `.md` has an empty stem; its topic lands at the destination root.
    let dir = if stem.is_empty() {
        destination.to_path_buf()
    } else {
        destination.join(stem)
    };
    let file = dir.join(TOPIC_FILE);

    Decoded::Place(Placement {
        role: DocumentRole::Unit,
        dir,
        file,
    })
}

/// Components that would leave the destination or alias it.
fn is_escaping(part: &str) -> bool {
    part == "." || part == ".." || part.contains('/') || part.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str) -> Placement {
        match decode_filename(name, Path::new("/dest")) {
            Decoded::Place(p) => p,
            Decoded::Skip(reason) => panic!("{name} was skipped: {reason}"),
        }
    }

    fn skip(name: &str) -> SkipReason {
        match decode_filename(name, Path::new("/dest")) {
            Decoded::Skip(reason) => reason,
            Decoded::Place(p) => panic!("{name} was placed at {}", p.file.display()),
        }
    }

    #[test]
    fn test_nested_name() {
        let p = place("a___b___c.md");
        assert_eq!(p.role, DocumentRole::NestedPart);
        assert_eq!(p.dir, PathBuf::from("/dest/a/b"));
        assert_eq!(p.file, PathBuf::from("/dest/a/b/c.md"));
    }

    #[test]
    fn test_single_separator() {
        let p = place("unit1___intro.md");
        assert_eq!(p.dir, PathBuf::from("/dest/unit1"));
        assert_eq!(p.file, PathBuf::from("/dest/unit1/intro.md"));
    }

    #[test]
    fn test_unit_name() {
        let p = place("topic1.md");
        assert_eq!(p.role, DocumentRole::Unit);
        assert_eq!(p.dir, PathBuf::from("/dest/topic1"));
        assert_eq!(p.file, PathBuf::from("/dest/topic1/topic.md"));
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        assert_eq!(skip("contents.md"), SkipReason::Reserved);
        assert_eq!(skip("template.md"), SkipReason::Reserved);
        assert_eq!(skip("course.md"), SkipReason::CourseHandledSeparately);
    }

    #[test]
    fn test_non_markdown_is_skipped() {
        assert_eq!(skip("notes.txt"), SkipReason::NotMarkdown);
        assert_eq!(skip("a___b.org"), SkipReason::NotMarkdown);
        assert_eq!(skip("README"), SkipReason::NotMarkdown);
    }

    #[test]
    fn test_empty_components_collapse() {
        let p = place("a______b.md");
        assert_eq!(p.file, PathBuf::from("/dest/a/b.md"));

        let p = place("___b.md");
        assert_eq!(p.dir, PathBuf::from("/dest"));
        assert_eq!(p.file, PathBuf::from("/dest/b.md"));
    }

    #[test]
    fn test_empty_last_component_still_decodes() {
        let p = place("a___.md");
        assert_eq!(p.role, DocumentRole::NestedPart);
        assert_eq!(p.dir, PathBuf::from("/dest/a"));
        assert_eq!(p.file, PathBuf::from("/dest/a/.md"));

        let p = place("___.md");
        assert_eq!(p.dir, PathBuf::from("/dest"));
        assert_eq!(p.file, PathBuf::from("/dest/.md"));

        let p = place(".md");
        assert_eq!(p.role, DocumentRole::Unit);
        assert_eq!(p.dir, PathBuf::from("/dest"));
        assert_eq!(p.file, PathBuf::from("/dest/topic.md"));
    }

    #[test]
    fn test_escaping_names_are_skipped() {
        assert!(matches!(skip("..___x.md"), SkipReason::InvalidName(_)));
        assert!(matches!(skip("a___..___x.md"), SkipReason::InvalidName(_)));
        assert!(matches!(skip("a___...md"), SkipReason::InvalidName(_)));
        assert!(matches!(skip("...md"), SkipReason::InvalidName(_)));
    }

    #[test]
    fn test_choice_depends_only_on_separator() {
        for name in ["x.md", "x__y.md", "x_y_z.md", "x___y.md", "x___y___z.md"] {
            let p = place(name);
            let expected = if name.contains(NESTED_SEPARATOR) {
                DocumentRole::NestedPart
            } else {
                DocumentRole::Unit
            };
            assert_eq!(p.role, expected, "{name}");
        }
    }
}
