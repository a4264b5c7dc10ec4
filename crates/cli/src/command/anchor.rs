use anyhow::Result;
use clap::Parser;
use mdtoc_config::Config;
use mdtoc_markdown::PlatformMode;

/// Print the anchor of a header text.
#[derive(Parser, Debug, Clone)]
pub struct Anchor {
    /// Header text, without the leading `#`.
    #[clap(index = 1)]
    text: String,

    /// Anchor naming to emulate, defaults to the configured one.
    #[clap(long)]
    mode: Option<String>,

    /// Number of previous headers with the same text.
    #[clap(long, default_value_t = 0)]
    repetition: usize,

    /// Module prefix of the anchor in nodejs mode.
    #[clap(long)]
    module_name: Option<String>,
}

impl Anchor {
    pub fn run(self, config: &Config) -> Result<()> {
        println!("{}", self.anchor(config)?);
        Ok(())
    }

    /// Returns the anchor of the header text.
    pub fn anchor(&self, config: &Config) -> Result<String> {
        let mode = match &self.mode {
            Some(mode) => mode.parse::<PlatformMode>()?,
            None => config.toc.anchor_mode,
        };
        let module_name = self.module_name.as_deref().or(config.toc.module_name.as_deref());

        Ok(mdtoc_markdown::anchor_id(
            &self.text,
            mode,
            self.repetition,
            module_name,
        )?)
    }
}
