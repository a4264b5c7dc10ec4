use crate::command;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub enum RunCmd {
    /// Create or refresh the TOC of a markdown file.
    #[clap(name = "toc")]
    Toc(command::toc::Toc),
    /// Remove the TOC and the inserted anchors of a markdown file.
    #[clap(name = "delete-toc")]
    DeleteToc(command::toc::DeleteToc),
    /// Number the headers of a markdown file, or strip their numbers.
    #[clap(name = "sections")]
    Sections(command::sections::Sections),
    /// Print the headers of a markdown file in JSON.
    #[clap(name = "headers")]
    Headers(command::headers::Headers),
    /// Print the anchor of a header text.
    #[clap(name = "anchor")]
    Anchor(command::anchor::Anchor),
}

/// mdtoc CLI arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Enable the logging system.
    #[clap(long)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    #[clap(long)]
    pub config_file: Option<PathBuf>,
}

impl RunCmd {
    pub fn run(self, args: Args) -> Result<()> {
        let (config, config_err) =
            mdtoc_config::load_config_on_startup(args.config_file.clone());

        let _guard = crate::init_logging(args.log, &config.log)?;

        if let Some(err) = config_err {
            tracing::warn!(
                config_file = ?mdtoc_config::config_file(),
                %err,
                "Invalid config file, falling back to the defaults"
            );
        }

        match self {
            Self::Toc(toc) => toc.run(config),
            Self::DeleteToc(delete_toc) => delete_toc.run(),
            Self::Sections(sections) => sections.run(config),
            Self::Headers(headers) => headers.run(config),
            Self::Anchor(anchor) => anchor.run(config),
        }
    }
}
