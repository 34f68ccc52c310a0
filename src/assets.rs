//! Asset relocation for written pages.
//!
//! Pages link images as `![alt](../assets/<path>)`. Once a page has moved, each
//! referenced file is copied from the assets root into an `img` folder beside
//! the page and the link is rewritten to `img/<basename>`. Only the basename
//! of a target is used to find the source file.

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Folder, next to the page, that receives relocated assets.
pub const ASSET_FOLDER: &str = "img";

static ASSET_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[.*?\]\((\.\./assets/.*?)\)").expect("valid regex"));

/// An image link target found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// The link target exactly as written, e.g. `../assets/pic.png`.
    pub target: String,
    pub basename: String,
}

impl AssetReference {
    fn new(target: &str) -> Self {
        let basename = target.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            target: target.to_string(),
            basename,
        }
    }

    /// The link target after relocation.
    pub fn relocated_target(&self) -> String {
        format!("{ASSET_FOLDER}/{}", self.basename)
    }
}

/// What a relocation pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RelocationReport {
    /// Copies created under the page's asset folder.
    pub copied: Vec<PathBuf>,
    /// Targets whose source file was not found; their links are unchanged.
    pub missing: Vec<String>,
}

/// Finds asset link targets in order of first appearance, without duplicates.
pub fn find_asset_references(text: &str) -> Vec<AssetReference> {
    let mut refs: Vec<AssetReference> = Vec::new();

    for caps in ASSET_REF_RE.captures_iter(text) {
        let target = &caps[1];
        if !refs.iter().any(|r| r.target == target) {
            refs.push(AssetReference::new(target));
        }
    }

    refs
}

/// Copies the assets referenced by `text` next to `document` and rewrites the
/// links, then writes the rewritten text to `document`.
pub async fn relocate_assets(
    document: &Path,
    text: &str,
    assets_root: &Path,
) -> Result<RelocationReport> {
    let doc_dir = document
        .parent()
        .with_context(|| format!("Document has no parent directory: {}", document.display()))?;
    let asset_dir = doc_dir.join(ASSET_FOLDER);

    let mut content = text.to_string();
    let mut report = RelocationReport::default();
    let mut seen_basenames: HashMap<String, String> = HashMap::new();

    for reference in find_asset_references(text) {
        if reference.basename.is_empty() {
            warn!("Asset link '{}' has no file name, leaving it", reference.target);
            report.missing.push(reference.target);
            continue;
        }

        let source = assets_root.join(&reference.basename);
        let source_meta = match fs::metadata(&source).await {
            Ok(meta) if meta.is_file() => meta,
            _ => {
                warn!(
                    "Asset {} referenced by {} not found",
                    source.display(),
                    document.display()
                );
                report.missing.push(reference.target);
                continue;
            }
        };

        if let Some(previous) = seen_basenames.get(&reference.basename) {
            warn!(
                "Asset links '{}' and '{}' in {} both resolve to {}",
                previous,
                reference.target,
                document.display(),
                reference.relocated_target()
            );
        } else {
            seen_basenames.insert(reference.basename.clone(), reference.target.clone());
        }

        fs::create_dir_all(&asset_dir)
            .await
            .with_context(|| format!("Failed to create dir: {}", asset_dir.display()))?;

        let target = asset_dir.join(&reference.basename);
        copy_preserving_mtime(&source, &target, &source_meta).await?;
        debug!("Copied {} -> {}", source.display(), target.display());

        content = content.replace(&reference.target, &reference.relocated_target());
        report.copied.push(target);
    }

    fs::write(document, &content)
        .await
        .with_context(|| format!("Failed to write {}", document.display()))?;

    Ok(report)
}

/// Copies a file; permissions come along with the copy, the mtime is set after.
async fn copy_preserving_mtime(
    source: &Path,
    target: &Path,
    source_meta: &std::fs::Metadata,
) -> Result<()> {
    fs::copy(source, target)
        .await
        .with_context(|| format!("Failed to copy {} -> {}", source.display(), target.display()))?;

    if let Ok(modified) = source_meta.modified() {
        let file = fs::OpenOptions::new()
            .write(true)
            .open(target)
            .await
            .with_context(|| format!("Failed to open {}", target.display()))?
            .into_std()
            .await;
        file.set_modified(modified)
            .with_context(|| format!("Failed to set mtime on {}", target.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_finds_references_in_order() {
        let text = "![b](../assets/b.png) text ![a](../assets/sub/a.jpg)\n![again](../assets/b.png)";
        let refs = find_asset_references(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].target, "../assets/b.png");
        assert_eq!(refs[0].basename, "b.png");
        assert_eq!(refs[1].target, "../assets/sub/a.jpg");
        assert_eq!(refs[1].basename, "a.jpg");
        assert_eq!(refs[1].relocated_target(), "img/a.jpg");
    }

    #[test]
    fn test_ignores_other_links() {
        let text = "[link](../assets/doc.pdf) ![remote](https://x/y.png) ![rel](assets/z.png) ![done](img/pic.png)";
        assert!(find_asset_references(text).is_empty());
    }

    #[tokio::test]
    async fn test_relocates_and_rewrites() -> Result<()> {
        let dir = tempdir()?;
        let assets = dir.path().join("assets");
        let unit = dir.path().join("dest/unitA");
        std::fs::create_dir_all(&assets)?;
        std::fs::create_dir_all(&unit)?;
        std::fs::write(assets.join("pic.png"), b"png-bytes")?;

        let doc = unit.join("topic.md");
        let text = "See ![x](../assets/pic.png) and ![y](../assets/nested/pic.png)";
        std::fs::write(&doc, text)?;

        let report = relocate_assets(&doc, text, &assets).await?;

        assert_eq!(report.copied.len(), 2);
        assert!(report.missing.is_empty());
        assert_eq!(std::fs::read(unit.join("img/pic.png"))?, b"png-bytes");
        assert_eq!(
            std::fs::read_to_string(&doc)?,
            "See ![x](img/pic.png) and ![y](img/pic.png)"
        );
        // Sources are copied, not moved.
        assert!(assets.join("pic.png").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_asset_is_left_untouched() -> Result<()> {
        let dir = tempdir()?;
        let assets = dir.path().join("assets");
        let unit = dir.path().join("unit");
        std::fs::create_dir_all(&assets)?;
        std::fs::create_dir_all(&unit)?;

        let doc = unit.join("topic.md");
        let text = "![gone](../assets/gone.png)";
        std::fs::write(&doc, text)?;

        let report = relocate_assets(&doc, text, &assets).await?;

        assert!(report.copied.is_empty());
        assert_eq!(report.missing, vec!["../assets/gone.png".to_string()]);
        assert_eq!(std::fs::read_to_string(&doc)?, text);
        assert!(!unit.join(ASSET_FOLDER).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_second_pass_is_a_no_op() -> Result<()> {
        let dir = tempdir()?;
        let assets = dir.path().join("assets");
        let unit = dir.path().join("unit");
        std::fs::create_dir_all(&assets)?;
        std::fs::create_dir_all(&unit)?;
        std::fs::write(assets.join("pic.png"), b"png")?;

        let doc = unit.join("topic.md");
        let text = "![x](../assets/pic.png)";
        std::fs::write(&doc, text)?;

        relocate_assets(&doc, text, &assets).await?;
        let rewritten = std::fs::read_to_string(&doc)?;

        let second = relocate_assets(&doc, &rewritten, &assets).await?;
        assert_eq!(second, RelocationReport::default());
        assert_eq!(std::fs::read_to_string(&doc)?, rewritten);
        Ok(())
    }

    #[tokio::test]
    async fn test_copy_keeps_modification_time() -> Result<()> {
        let dir = tempdir()?;
        let assets = dir.path().join("assets");
        let unit = dir.path().join("unit");
        std::fs::create_dir_all(&assets)?;
        std::fs::create_dir_all(&unit)?;
        let source = assets.join("old.png");
        std::fs::write(&source, b"old")?;
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        std::fs::File::options()
            .write(true)
            .open(&source)?
            .set_modified(past)?;

        let doc = unit.join("topic.md");
        let text = "![o](../assets/old.png)";
        std::fs::write(&doc, text)?;
        relocate_assets(&doc, text, &assets).await?;

        let copied = std::fs::metadata(unit.join("img/old.png"))?.modified()?;
        assert_eq!(copied, past);
        Ok(())
    }
}
