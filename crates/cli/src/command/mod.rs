pub mod anchor;
pub mod headers;
pub mod sections;
pub mod toc;

use anyhow::Result;
use clap::Parser;
use mdtoc_markdown::{Document, PlatformMode, TocOptions};
use std::io::Write;
use std::path::Path;

/// Overrides of the configured TOC options.
#[derive(Parser, Debug, Clone, Default)]
pub struct TocOpts {
    /// Shallowest header level included.
    #[clap(long)]
    depth_from: Option<usize>,

    /// Deepest header level included.
    #[clap(long)]
    depth_to: Option<usize>,

    /// Anchor naming to emulate: github, bitbucket, gitlab, nodejs or ghost.
    #[clap(long)]
    anchor_mode: Option<PlatformMode>,

    /// Module prefix of the anchors in nodejs mode.
    #[clap(long)]
    module_name: Option<String>,

    /// Render a numbered list.
    #[clap(long)]
    ordered_list: bool,

    /// Render the rows as plain text instead of links.
    #[clap(long)]
    no_links: bool,

    /// Insert an explicit anchor above each header.
    #[clap(long)]
    insert_anchor: bool,
}

impl TocOpts {
    pub fn apply(&self, base: &TocOptions) -> TocOptions {
        let mut options = base.clone();
        if let Some(depth_from) = self.depth_from {
            options.depth_from = depth_from;
        }
        if let Some(depth_to) = self.depth_to {
            options.depth_to = depth_to;
        }
        if let Some(anchor_mode) = self.anchor_mode {
            options.anchor_mode = anchor_mode;
        }
        if let Some(module_name) = &self.module_name {
            options.module_name.replace(module_name.clone());
        }
        if self.ordered_list {
            options.ordered_list = true;
        }
        if self.no_links {
            options.with_links = false;
        }
        if self.insert_anchor {
            options.insert_anchor = true;
        }
        options
    }
}

pub(crate) fn read_document(input: &Path) -> Result<Document> {
    Ok(Document::new(std::fs::read_to_string(input)?))
}

/// Writes the document back to `input` or prints it to stdout.
pub(crate) fn write_document(input: &Path, document: Document, in_place: bool) -> Result<()> {
    if in_place {
        std::fs::write(input, document.into_text())?;
        tracing::debug!(?input, "Updated markdown file");
    } else {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(document.text().as_bytes())?;
    }
    Ok(())
}
