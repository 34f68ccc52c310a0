//! Run orchestration: reset, seed, course, then every other page.
//!
//! Pages are handled one at a time in discovery order. Each page's outcome is
//! a [`DocumentOutcome`]; only filesystem failures abort the run.

use crate::assets::relocate_assets;
use crate::decoder::{Decoded, decode_filename};
use crate::destination::{reset_destination, seed_from_template};
use crate::document::{
    ASSETS_DIR, COURSE_FILE, Document, DocumentOutcome, DocumentRole, PAGES_DIR, SkipReason,
};
use crate::filewalker::collect_pages;
use crate::normalizer::{VersionTag, clean_markdown};
use crate::reader::{LoadedDocument, read_document};
use crate::utils::{display_relative, file_name_str};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Paths and tag shared by every step of a run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub pages_dir: PathBuf,
    pub assets_root: PathBuf,
    pub destination: PathBuf,
    pub version_tag: VersionTag,
}

impl RunContext {
    pub fn new(source_root: &Path, destination: &Path, version_tag: VersionTag) -> Self {
        Self {
            pages_dir: source_root.join(PAGES_DIR),
            assets_root: source_root.join(ASSETS_DIR),
            destination: destination.to_path_buf(),
            version_tag,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub template_seeded: bool,
    pub course_written: bool,
    pub documents_written: usize,
    pub documents_skipped: usize,
    pub assets_copied: usize,
    pub assets_missing: usize,
}

impl RunReport {
    fn record(&mut self, outcome: &DocumentOutcome) {
        match outcome {
            DocumentOutcome::Written {
                assets_copied,
                assets_missing,
                ..
            } => {
                self.documents_written += 1;
                self.assets_copied += assets_copied;
                self.assets_missing += assets_missing;
            }
            DocumentOutcome::Skipped { .. } => self.documents_skipped += 1,
        }
    }
}

/// Runs every step against `source_root`, rebuilding `destination` from scratch.
pub async fn run(
    source_root: &Path,
    destination: &Path,
    template: &Path,
    version_tag: VersionTag,
) -> Result<RunReport> {
    let ctx = RunContext::new(source_root, destination, version_tag);
    let mut report = RunReport::default();

    reset_destination(&ctx.destination).await?;
    report.template_seeded = seed_from_template(template, &ctx.destination).await?;
    report.course_written = process_course(&ctx).await?;

    for page in collect_pages(&ctx.pages_dir)? {
        let outcome = process_page(&ctx, &page).await?;
        report.record(&outcome);
    }

    info!(
        "Done: course {}, {} written, {} skipped, {} assets copied, {} assets missing",
        if report.course_written { "written" } else { "missing" },
        report.documents_written,
        report.documents_skipped,
        report.assets_copied,
        report.assets_missing
    );

    Ok(report)
}

/// Writes `pages/course.md` to `<destination>/course.md`.
///
/// A missing course page is tolerated and returns `false`. Assets are not
/// relocated for the course.
pub async fn process_course(ctx: &RunContext) -> Result<bool> {
    let source = ctx.pages_dir.join(COURSE_FILE);

    if !source.is_file() {
        warn!("File {} not found.", source.display());
        return Ok(false);
    }

    let content = match read_document(&source)? {
        LoadedDocument::Text(text) => text,
        LoadedDocument::Binary => {
            warn!("Skipping {}: {}", source.display(), SkipReason::BinaryContent);
            return Ok(false);
        }
    };

    let document = Document::new(
        source,
        DocumentRole::Course,
        ctx.destination.join(COURSE_FILE),
    );
    let cleaned = clean_markdown(&content, Some(&ctx.version_tag));
    write_document(&document, &cleaned).await?;

    info!(
        "Processed {} -> {} (cleaned content, UID added)",
        document.source.display(),
        document.destination().display()
    );
    Ok(true)
}

/// Decodes, transforms and writes one discovered page, then relocates its assets.
pub async fn process_page(ctx: &RunContext, page: &Path) -> Result<DocumentOutcome> {
    let rel = display_relative(page, &ctx.pages_dir);

    let Some(file_name) = file_name_str(page) else {
        let reason = SkipReason::InvalidName("file name is not valid UTF-8".into());
        warn!("Skipping file: {rel} ({reason})");
        return Ok(skipped(page, reason));
    };

    let placement = match decode_filename(file_name, &ctx.destination) {
        Decoded::Place(placement) => placement,
        Decoded::Skip(reason) => {
            match reason {
                SkipReason::CourseHandledSeparately | SkipReason::NotMarkdown => {
                    debug!("Skipping file: {rel} ({reason})")
                }
                _ => info!("Skipping file: {rel} ({reason})"),
            }
            return Ok(skipped(page, reason));
        }
    };

    let content = match read_document(page)? {
        LoadedDocument::Text(text) => text,
        LoadedDocument::Binary => {
            warn!("Skipping file: {rel} ({})", SkipReason::BinaryContent);
            return Ok(skipped(page, SkipReason::BinaryContent));
        }
    };

    fs::create_dir_all(&placement.dir)
        .await
        .with_context(|| format!("Failed to create dir: {}", placement.dir.display()))?;

    let document = Document::new(page.to_path_buf(), placement.role, placement.file);
    let cleaned = clean_markdown(&content, Some(&ctx.version_tag));
    write_document(&document, &cleaned).await?;

    info!(
        "Processed {} -> {} ({}, UID added)",
        document.source.display(),
        document.destination().display(),
        document.role
    );

    let relocation = relocate_assets(document.destination(), &cleaned, &ctx.assets_root).await?;

    Ok(DocumentOutcome::Written {
        document,
        assets_copied: relocation.copied.len(),
        assets_missing: relocation.missing.len(),
    })
}

async fn write_document(document: &Document, content: &str) -> Result<()> {
    let target = document.destination();
    fs::write(target, content)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))
}

fn skipped(page: &Path, reason: SkipReason) -> DocumentOutcome {
    DocumentOutcome::Skipped {
        source: page.to_path_buf(),
        reason,
    }
}
