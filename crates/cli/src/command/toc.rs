use super::{read_document, write_document, TocOpts};
use anyhow::Result;
use clap::Parser;
use mdtoc_config::Config;
use mdtoc_markdown::Position;
use std::path::PathBuf;

/// Create or refresh the TOC of a markdown file.
#[derive(Parser, Debug, Clone)]
pub struct Toc {
    /// Markdown file.
    #[clap(index = 1)]
    input: PathBuf,

    /// Line the TOC is inserted at if the file has none yet, 1-based.
    #[clap(long, default_value_t = 1)]
    line: usize,

    /// Behave as a save hook: only refresh an existing TOC whose
    /// `updateOnSave` is on.
    #[clap(long)]
    on_save: bool,

    /// Overwrite the file instead of printing the result.
    #[clap(long)]
    in_place: bool,

    #[clap(flatten)]
    toc_opts: TocOpts,
}

impl Toc {
    pub fn run(self, config: &Config) -> Result<()> {
        let options = self.toc_opts.apply(&config.toc);
        let mut document = read_document(&self.input)?;

        let cursor = Position::new(self.line.saturating_sub(1), 0);
        let updated = mdtoc_markdown::update_toc(&mut document, &options, cursor, self.on_save)?;

        if !updated {
            tracing::debug!(input = ?self.input, "TOC left untouched");
        }

        write_document(&self.input, document, self.in_place)
    }
}

/// Remove the TOC and the inserted anchors of a markdown file.
#[derive(Parser, Debug, Clone)]
pub struct DeleteToc {
    /// Markdown file.
    #[clap(index = 1)]
    input: PathBuf,

    /// Overwrite the file instead of printing the result.
    #[clap(long)]
    in_place: bool,
}

impl DeleteToc {
    pub fn run(self) -> Result<()> {
        let mut document = read_document(&self.input)?;

        if !mdtoc_markdown::delete_toc(&mut document) {
            tracing::debug!(input = ?self.input, "No TOC found");
        }

        write_document(&self.input, document, self.in_place)
    }
}
