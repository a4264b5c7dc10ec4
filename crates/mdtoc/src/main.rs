use clap::Parser;
use cli::{Args, RunCmd};

#[derive(Parser, Debug)]
pub enum Cmd {
    /// Display the current version.
    #[clap(name = "version")]
    Version,

    /// Run the mdtoc.
    #[clap(flatten)]
    Run(Box<RunCmd>),
}

#[derive(Parser, Debug)]
#[clap(name = "mdtoc", disable_version_flag = true)]
pub struct Mdtoc {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

fn main() {
    let mdtoc = Mdtoc::parse();

    match mdtoc.cmd {
        Cmd::Version => {
            println!(
                "version {}, built for {} {}.",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH,
            );
        }
        Cmd::Run(run_cmd) => {
            if let Err(e) = run_cmd.run(mdtoc.args) {
                eprintln!("error: {e:?}");
                std::process::exit(1);
            }
        }
    }
}
