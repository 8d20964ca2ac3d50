//! wikimipt Telegram Bot: teacher search for wikimipt.org.
//!
//! Free-text messages search the alphabetical teacher listing; tapping a
//! result sends the teacher's card with photo, star ratings and biography.

mod commands;
mod format;
mod handlers;
mod startup;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use startup::resolve_bot_token;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::prelude::*;
use wikimipt_core::{Config, Rotation, WikiClient};

/// wikimipt Telegram Bot: teacher search for wikimipt.org
#[derive(Parser)]
#[command(name = "wikimipt-telegram", version)]
struct Args {
    /// Path to a custom config file (overrides default search locations)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

/// Default tracing directives enabling info-level logs for this crate and wikimipt-core.
const DEFAULT_DIRECTIVES: &[&str] = &["wikimipt_telegram=info", "wikimipt_core=info"];

/// Build the default `EnvFilter`: RUST_LOG (if set) plus our default directives.
fn default_env_filter() -> anyhow::Result<tracing_subscriber::EnvFilter> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Initialize the tracing subscriber.
///
/// When `config.logging` is `Some`, logs go to stdout and a rolling file.
/// Otherwise stdout only.
///
/// Returns the non-blocking writer guard that must be held for the process lifetime.
fn init_tracing(
    config: &Config,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(ref lc) = config.logging else {
        tracing_subscriber::fmt()
            .with_env_filter(default_env_filter()?)
            .init();
        return Ok(None);
    };

    // Fall back to stdout-only if the log directory cannot be created.
    if let Err(e) = std::fs::create_dir_all(&lc.directory) {
        eprintln!(
            "Warning: Failed to create log directory '{}': {}. Falling back to stdout-only.",
            lc.directory, e
        );
        tracing_subscriber::fmt()
            .with_env_filter(default_env_filter()?)
            .init();
        return Ok(None);
    }

    let rotation = match lc.rotation {
        Rotation::Daily => tracing_appender::rolling::Rotation::DAILY,
        Rotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
        Rotation::Never => tracing_appender::rolling::Rotation::NEVER,
    };

    let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix("wikimipt-telegram")
        .filename_suffix("log")
        .max_log_files(lc.max_files)
        .build(&lc.directory)
        .context("Failed to create rolling file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(default_env_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1. Load configuration first; tracing setup depends on it.
    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;

    // 2. Initialize tracing.
    let _guard = init_tracing(&config)?;

    tracing::info!("Starting wikimipt Telegram Bot");

    // 3. Resolve bot token (env var > config file). Token is never logged.
    let token = resolve_bot_token(&config).context("Failed to obtain bot token")?;
    let bot = Bot::new(token);

    // 4. Build the wiki client shared by all handlers.
    let wiki = Arc::new(WikiClient::from_config(&config).context("Failed to create wiki client")?);
    tracing::info!("Using wiki at {}", wiki.site().host());

    // 5. Fetch the bot's own identity (required for filter_command parsing).
    let me = bot.get_me().await.context("Failed to fetch bot identity")?;

    // 6. Register slash commands with Telegram. Non-fatal on failure.
    if let Err(e) = bot
        .set_my_commands(commands::Command::bot_commands())
        .await
    {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    // 7. Commands and callback queries route separately from plain messages.
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<commands::Command>()
                        .endpoint(commands::handle_command),
                )
                .branch(dptree::entry().endpoint(handlers::handle_message)),
        )
        .branch(Update::filter_callback_query().endpoint(commands::handle_callback));

    tracing::info!("Dispatcher ready, polling for updates");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![me, wiki])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Dispatcher stopped, shutting down");
    Ok(())
}
