use std::path::PathBuf;

use structopt::StructOpt;

use fabsim::utils::prelude::*;

use crate::commands::{Cmd, Run, ShowConfig};

#[derive(StructOpt)]
#[structopt(name = "fabsim", about = "Factory what-if scheduling simulator")]
pub struct Opts {
    /// Set a custom config file
    #[structopt(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Apply a named preset from the configuration
    #[structopt(short, long, value_name = "NAME")]
    preset: Option<String>,
    #[structopt(subcommand)]
    cmd: SubCommand,
}

#[derive(StructOpt)]
pub enum SubCommand {
    /// Evaluate the configured factory under the default what-if scenarios
    Run(Run),
    /// Show the effective configuration
    Config(ShowConfig),
}

pub fn execute() -> Result<()> {
    let opts = Opts::from_args();

    // merge CLI-level config sources before anything reads the config
    if let Some(path) = &opts.config {
        config_mut().use_file(path)?;
    }
    if let Some(name) = &opts.preset {
        config_mut().use_preset(name)?;
    }

    // the guard must outlive the command for logs to be flushed
    let _guard = fabsim::utils::logging::setup()?;
    trace!("start cli execution");

    match opts.cmd {
        SubCommand::Run(cmd) => cmd.run(),
        SubCommand::Config(cmd) => cmd.run(),
    }
}
