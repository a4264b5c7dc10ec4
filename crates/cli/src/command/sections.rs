use super::{read_document, write_document, TocOpts};
use anyhow::Result;
use clap::Parser;
use mdtoc_config::Config;
use std::path::PathBuf;

/// Prefix each header with its section number, e.g. `## 1.2. Usage`.
#[derive(Parser, Debug, Clone)]
pub struct Sections {
    /// Markdown file.
    #[clap(index = 1)]
    input: PathBuf,

    /// Strip the section numbers instead.
    #[clap(long)]
    delete: bool,

    /// Overwrite the file instead of printing the result.
    #[clap(long)]
    in_place: bool,

    #[clap(flatten)]
    toc_opts: TocOpts,
}

impl Sections {
    pub fn run(self, config: &Config) -> Result<()> {
        let options = self.toc_opts.apply(&config.toc);
        let mut document = read_document(&self.input)?;

        if self.delete {
            mdtoc_markdown::delete_sections(&mut document, &options)?;
        } else {
            mdtoc_markdown::update_sections(&mut document, &options)?;
        }

        write_document(&self.input, document, self.in_place)
    }
}
