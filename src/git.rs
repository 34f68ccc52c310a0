//! Cloning a notes graph kept in a git repository.
//!
//! Only available with the `git` feature. The clone lives in a temporary
//! directory that is removed when the returned [`ClonedGraph`] is dropped, so
//! the graph must be held for the whole pipeline run.

use anyhow::{Context, Result};
use git2::{FetchOptions, RemoteCallbacks, build::RepoBuilder};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A graph cloned into a temporary directory.
pub struct ClonedGraph {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl ClonedGraph {
    /// Root of the clone; used as the pipeline's source root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Shallow-clones `url`, optionally at `branch`.
pub fn clone_graph(url: &str, branch: Option<&str>) -> Result<ClonedGraph> {
    let name = graph_name_from_url(url).unwrap_or_else(|| "graph".to_string());
    info!("Cloning graph '{}' from {}", name, url);

    let temp_dir = TempDir::new().context("Failed to create temporary directory for git clone")?;
    let root = temp_dir.path().join(&name);
    debug!("Clone target: {}", root.display());

    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|progress| {
        debug!(
            "Receiving objects: {}/{}",
            progress.received_objects(),
            progress.total_objects()
        );
        true
    });

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);
    fetch_opts.depth(1);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_opts);

    if let Some(branch_name) = branch {
        debug!("Checking out branch: {}", branch_name);
        builder.branch(branch_name);
    }

    builder
        .clone(url, &root)
        .with_context(|| format!("Failed to clone repository: {}", url))?;

    info!("Clone complete: {}", root.display());

    Ok(ClonedGraph {
        _temp_dir: temp_dir,
        root,
    })
}

/// Repository name from an HTTPS or SSH git URL, without `.git`.
pub fn graph_name_from_url(url: &str) -> Option<String> {
    let tail = if url.contains("://") {
        url.trim_end_matches('/').rsplit('/').next()?
    } else if url.contains(':') {
        url.rsplit(':').next()?.rsplit('/').next()?
    } else {
        return None;
    };

    let name = tail.strip_suffix(".git").unwrap_or(tail);
    (!name.is_empty()).then(|| name.to_string())
}
