use anyhow::Result;
use clap::Parser;
use screen_spots::cli::{self, Cli};

fn main() -> Result<()> {
    // Parse first so --help and --version never touch the config file
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // CLI --log-level takes precedence, then RUST_LOG, then the config file
    screen_spots::debug::init_log_bridge(
        cli.log_level.map(|l| l.to_level_filter()),
        config.log_level.to_level_filter(),
    );
    log::info!("Starting screen-spots {}", screen_spots::VERSION);

    let code = cli::commands::execute(cli, config)?;
    if code != cli::commands::EXIT_OK {
        std::process::exit(code);
    }
    Ok(())
}
