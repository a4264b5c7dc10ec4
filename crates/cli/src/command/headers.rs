use super::{read_document, TocOpts};
use anyhow::Result;
use clap::Parser;
use mdtoc_config::Config;
use mdtoc_markdown::{Header, TextBuffer};
use std::io::Write;
use std::path::PathBuf;

/// Print the headers of a markdown file in JSON.
#[derive(Parser, Debug, Clone)]
pub struct Headers {
    /// Markdown file.
    #[clap(index = 1)]
    input: PathBuf,

    #[clap(flatten)]
    toc_opts: TocOpts,
}

impl Headers {
    pub fn run(self, config: &Config) -> Result<()> {
        let headers = self.headers(config)?;

        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        writeln!(lock, "{}", serde_json::to_string_pretty(&headers)?)?;

        Ok(())
    }

    pub fn headers(&self, config: &Config) -> Result<Vec<Header>> {
        let options = self.toc_opts.apply(&config.toc);
        let lines = read_document(&self.input)?.lines();
        Ok(mdtoc_markdown::extract_headers(&lines, &options)?)
    }
}
