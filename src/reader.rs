use anyhow::{Context, Result};
use content_inspector::{ContentType, inspect};
use log::debug;
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;
use std::str;

/// Contents of a page as read from disk.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadedDocument {
    Text(String),
    /// The file looks binary; it is not transformed.
    Binary,
}

/// Reads a page, detecting binary content before decoding it as text.
pub fn read_document(path: &Path) -> Result<LoadedDocument> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file: {}", path.display()))?
        .len();

    // Zero-length files cannot be mapped on every platform.
    if len == 0 {
        debug!("Empty page: {}", path.display());
        return Ok(LoadedDocument::Text(String::new()));
    }

    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .with_context(|| format!("Failed to mmap file: {}", path.display()))?
    };

    let sample_size = std::cmp::min(8192, mmap.len());
    if inspect(&mmap[..sample_size]) == ContentType::BINARY {
        return Ok(LoadedDocument::Binary);
    }

    let text = match str::from_utf8(&mmap) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Invalid UTF-8 in {}, decoding lossily", path.display());
            String::from_utf8_lossy(&mmap).into_owned()
        }
    };

    Ok(LoadedDocument::Text(text))
}
