//! # logseq2course Library
//!
//! Reorganizes a graph of outline-style markdown pages into a course tree:
//!
//! - `pages/course.md` becomes `<destination>/course.md`
//! - `pages/unit.md` becomes `<destination>/unit/topic.md`
//! - `pages/a___b___c.md` becomes `<destination>/a/b/c.md`
//! - images linked as `../assets/<name>` are copied to an `img/` folder next
//!   to the page that links them
//!
//! Every run wipes the destination and seeds it from a template first.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logseq2course::{Config, run_pipeline};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(
//!         PathBuf::from("graph"),
//!         PathBuf::from("site/course"),
//!         PathBuf::from("site/template"),
//!     );
//!
//!     let report = run_pipeline(config).await?;
//!     println!("{} pages written", report.documents_written);
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod cli;
pub mod decoder;
pub mod destination;
pub mod document;
pub mod filewalker;
#[cfg(feature = "git")]
pub mod git;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod utils;

pub use assets::{AssetReference, find_asset_references, relocate_assets};
pub use cli::Config;
pub use decoder::{Decoded, Placement, decode_filename};
pub use document::{Document, DocumentOutcome, DocumentRole, SkipReason};
pub use normalizer::{VersionTag, clean_markdown};
pub use pipeline::RunReport;

use anyhow::Result;

/// Rebuilds the destination tree described by `config`.
pub async fn run_pipeline(config: Config) -> Result<RunReport> {
    #[cfg(feature = "git")]
    if let Some(url) = config.git_url.as_deref() {
        let graph = git::clone_graph(url, config.git_branch.as_deref())?;
        return pipeline::run(
            graph.root(),
            &config.destination,
            &config.template,
            config.version_tag,
        )
        .await;
    }

    pipeline::run(
        &config.source_root,
        &config.destination,
        &config.template,
        config.version_tag,
    )
    .await
}
