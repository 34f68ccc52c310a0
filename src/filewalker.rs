use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Collects every file under `pages_dir`, recursively, in file-name order.
///
/// Nothing is filtered here: hidden files and ignore files are treated like
/// any other entry so the decoder sees every candidate exactly once. Symlinks
/// to files count as files; symlinked directories are not descended into.
pub fn collect_pages(pages_dir: &Path) -> Result<Vec<PathBuf>> {
    if !pages_dir.is_dir() {
        anyhow::bail!("Pages directory not found: {}", pages_dir.display());
    }

    let mut builder = WalkBuilder::new(pages_dir);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut pages = Vec::new();

    for result in builder.build() {
        match result {
            Ok(entry) => {
                if entry.path().is_file() {
                    debug!("Discovered: {}", entry.path().display());
                    pages.push(entry.into_path());
                }
            }
            Err(err) => {
                warn!("Error walking path: {err}");
            }
        }
    }

    Ok(pages)
}
