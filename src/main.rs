use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use gutenshelf::cli::{Cli, Command};
use gutenshelf::commands;
use gutenshelf::config::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    gutenshelf::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let settings = Settings::resolve(cli.global.overrides()).context("resolve settings")?;
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Command::Browse => commands::browse(&settings).await.context("browse")?,
        Command::List(args) => commands::list(&settings, args).await.context("list")?,
        Command::Genres => commands::genres(&settings).await.context("genres")?,
        Command::Favorite { command } => commands::favorite(&settings, command)
            .await
            .context("favorite")?,
        Command::Wishlist(args) => commands::wishlist(&settings, args)
            .await
            .context("wishlist")?,
    }

    Ok(())
}
