use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vault_yield::cli::{Cli, Command};
use vault_yield::commands;
use vault_yield::config::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = RuntimeConfig::from_cli(&cli);

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        match cli.command {
            Command::Serve { host, port } => commands::serve(&config, &host, port).await,
            Command::Compute { vaults, days } => commands::compute(&config, &vaults, days).await,
            Command::Piecewise {
                vault,
                from_block,
                json,
            } => commands::piecewise(&config, &vault, from_block, json).await,
            Command::Watch {
                vault,
                poll_secs,
                from_block,
                once,
            } => commands::watch(&config, vault.as_deref(), poll_secs, from_block, once).await,
            Command::List => commands::list(&config),
            Command::Average => commands::average(&config),
        }
    })
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("vault_yield={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
