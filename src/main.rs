use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lifelog::{BackupAction, Cli, Commands, ImagesAction, TokenAction, commands};

fn main() -> Result<()> {
    // Quiet by default; RUST_LOG opts into diagnostics.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { tag } => commands::entries::list(tag.as_deref()),
        Commands::Add {
            date,
            title,
            description,
            kind,
            tag,
            image,
        } => commands::entries::add(date, title, description, kind, tag, image),
        Commands::Edit {
            id,
            date,
            title,
            description,
            kind,
            tag,
        } => commands::entries::edit(id, date, title, description, kind, tag),
        Commands::Rm { id, yes } => commands::entries::remove(id, yes),
        Commands::Import { file } => commands::data::import(&file),
        Commands::Export { dir } => commands::data::export(&dir),
        Commands::Sync { force, message } => commands::sync::execute(force, message.as_deref()),
        Commands::Status => commands::status::execute(),
        Commands::Backup { action } => match action {
            BackupAction::List => commands::backup::list(),
            BackupAction::Restore { id } => commands::backup::restore(id),
        },
        Commands::Token { action } => match action {
            TokenAction::Set { token } => commands::token::set(&token),
            TokenAction::Clear { yes } => commands::token::clear(yes),
            TokenAction::Validate => commands::token::validate(),
        },
        Commands::Images { action } => match action {
            ImagesAction::Upload { files } => commands::images::upload(&files),
            ImagesAction::List => commands::images::list(),
            ImagesAction::Rm { name, yes } => commands::images::remove(&name, yes),
        },
    }
}
