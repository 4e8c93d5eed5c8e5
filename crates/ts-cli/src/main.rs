use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ts_cli::commands::{matters, parse, resolve, units};
use ts_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Units { minutes } => units::run(&mut out, *minutes)?,
        Commands::Parse(args) => {
            let config = load_config(&cli)?;
            let runtime =
                tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
            runtime.block_on(parse::run(&mut out, args, &config))?;
        }
        Commands::Match(args) => {
            let config = load_config(&cli)?;
            resolve::run(&mut out, args, &config)?;
        }
        Commands::Matters { json } => {
            let config = load_config(&cli)?;
            matters::run(&mut out, &config, *json)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
