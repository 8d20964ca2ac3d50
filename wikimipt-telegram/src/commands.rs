//! Telegram bot slash-command handlers.
//!
//! Implements `/start` and `/help`. Profile cards are requested through the
//! inline keyboard attached to search replies; its builders and the callback
//! handler live in the [`keyboard`] submodule.

mod keyboard;

pub use keyboard::{build_results_keyboard, handle_callback};

use teloxide::prelude::*;
use teloxide::types::Message as TgMessage;
use teloxide::utils::command::BotCommands;


/// Greeting sent on `/start`.
const WELCOME: &str = "Привет! Я ищу преподавателей на wikimipt.org. \
    Попробуй написать мне фамилию преподавателя.";

/// All slash commands supported by the bot.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    /// Welcome message for first-time users.
    #[command(description = "Начать работу с ботом")]
    Start,
    /// Show available commands.
    #[command(description = "Список команд")]
    Help,
}

/// Entry-point handler for all slash commands.
pub async fn handle_command(bot: Bot, msg: TgMessage, cmd: Command) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, WELCOME).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}
