use structopt::StructOpt;

use fabsim::config::AppConfigExt;
use fabsim::utils::prelude::*;

/// Should be implemented by individual subcommand
pub trait Cmd {
    fn run(self) -> Result<()>;
}

/// Evaluate the configured factory and render the report and briefing
#[derive(StructOpt)]
pub struct Run {}

impl Cmd for Run {
    fn run(self) -> Result<()> {
        fabsim::run_whatif()
    }
}

/// Show the effective, validated configuration
#[derive(StructOpt)]
pub struct ShowConfig {}

impl Cmd for ShowConfig {
    fn run(self) -> Result<()> {
        let cfg = config().whatif()?;
        println!("{}", serde_json::to_string_pretty(&cfg)?);

        Ok(())
    }
}
