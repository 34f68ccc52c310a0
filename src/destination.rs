//! Destination tree reset and template seeding.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tokio::fs;

/// Deletes `destination` if it exists and recreates it empty.
pub async fn reset_destination(destination: &Path) -> Result<()> {
    if fs::try_exists(destination)
        .await
        .with_context(|| format!("Failed to check destination: {}", destination.display()))?
    {
        debug!("Removing existing destination: {}", destination.display());
        fs::remove_dir_all(destination).await.with_context(|| {
            format!("Failed to remove destination: {}", destination.display())
        })?;
    }

    fs::create_dir_all(destination)
        .await
        .with_context(|| format!("Failed to create destination: {}", destination.display()))?;

    info!("Reset destination: {}", destination.display());
    Ok(())
}

/// Copies the contents of `template` into `destination`, overwriting collisions.
///
/// Returns `false` when there is no template directory to copy.
pub async fn seed_from_template(template: &Path, destination: &Path) -> Result<bool> {
    if !fs::metadata(template)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        warn!("Template directory {} not found, skipping seed", template.display());
        return Ok(false);
    }

    copy_directory(template, destination).await?;
    info!(
        "Seeded {} from template {}",
        destination.display(),
        template.display()
    );
    Ok(true)
}

/// Recursively copies `from` into `to`.
/// Uses Box::pin for async recursion.
fn copy_directory<'a>(
    from: &'a Path,
    to: &'a Path,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        fs::create_dir_all(to)
            .await
            .with_context(|| format!("Failed to create dir: {}", to.display()))?;

        let mut entries = fs::read_dir(from)
            .await
            .with_context(|| format!("Failed to read directory: {}", from.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list directory: {}", from.display()))?
        {
            let source = entry.path();
            let target = to.join(entry.file_name());
            let file_type = entry
                .file_type()
                .await
                .with_context(|| format!("Failed to stat: {}", source.display()))?;

            if file_type.is_dir() {
                copy_directory(&source, &target).await?;
            } else {
                debug!("Copying {} -> {}", source.display(), target.display());
                fs::copy(&source, &target).await.with_context(|| {
                    format!("Failed to copy {} -> {}", source.display(), target.display())
                })?;
            }
        }

        Ok(())
    })
}
