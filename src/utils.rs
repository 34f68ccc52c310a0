use std::ffi::OsStr;
use std::path::Path;

/// Markdown pages are recognized by a literal `.md` suffix.
pub fn is_markdown(file_name: &str) -> bool {
    file_name.ends_with(".md")
}

/// The final component of `path` as UTF-8, if it has one.
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(OsStr::to_str)
}

/// `path` relative to `root` for log output, or `path` itself.
pub fn display_relative<'a>(path: &'a Path, root: &Path) -> std::path::Display<'a> {
    path.strip_prefix(root).unwrap_or(path).display()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown("page.md"));
        assert!(is_markdown("a___b.md"));
        assert!(!is_markdown("page.MD"));
        assert!(!is_markdown("page.markdown"));
        assert!(!is_markdown("image.png"));
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/src/pages");
        let path = Path::new("/src/pages/unit.md");
        assert_eq!(display_relative(path, root).to_string(), "unit.md");
        assert_eq!(
            display_relative(Path::new("/other/x.md"), root).to_string(),
            "/other/x.md"
        );
    }
}
