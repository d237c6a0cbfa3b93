use clap::{CommandFactory, FromArgMatches};
use simplified3d::cli::{load_config, run, Cli};
use simplified3d::{init_logging, LONG_VERSION};

fn main() -> anyhow::Result<()> {
    let matches = Cli::command().version(LONG_VERSION).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let config = load_config(&cli)?;

    // Initialize logging
    init_logging(&config.logging)?;

    let summary = run(&cli, &config)?;
    eprintln!("{}", summary);
    Ok(())
}
