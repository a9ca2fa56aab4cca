use fabsim::utils::prelude::*;

mod cli;
mod commands;

fn main() -> Result<()> {
    // panic setup should be done early
    fabsim::utils::panic::setup();

    // initialize configuration; CLI flags may still merge overrides on top
    fabsim::utils::app_config::setup()?;

    // Match commands
    cli::execute()
}
