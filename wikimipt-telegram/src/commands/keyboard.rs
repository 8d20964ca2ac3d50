//! Inline keyboard builders and callback logic for profile selection.
//!
//! - `build_results_keyboard`: one button per search result
//! - `parse_callback_data`: parses `"p:<name>"` and `"t:<prefix>"` callback data
//! - `handle_callback`: looks up the tapped teacher and sends the card
//! - `send_profile`: delivers a card as photo, caption and/or text

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatAction, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode,
};
use wikimipt_core::{Site, TeacherProfile, WikiClient, WikiError};

use crate::format::{fits_caption, fits_message, format_profile, format_profile_brief};

/// Prefix of callback data carrying a whole teacher name.
const PROFILE_PREFIX: &str = "p:";

/// Prefix of callback data carrying a cut name, resolved against the listing.
const TRUNCATED_PREFIX: &str = "t:";

/// Telegram's limit on callback data, in bytes.
const CALLBACK_DATA_LIMIT: usize = 64;

/// Reply when a profile cannot be fetched, parsed or delivered.
pub const LOOKUP_FAILED_REPLY: &str = "Не удалось загрузить страницу преподавателя.";

/// Teacher requested by a keyboard button.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ProfileRequest<'a> {
    /// The full page title.
    Exact(&'a str),
    /// Leading part of a title too long for callback data.
    Prefix(&'a str),
}

/// Build an inline keyboard with one button per name.
///
/// Each button's callback data is `"p:<name>"`. Names too long for Telegram's
/// callback data limit are cut at a character boundary and sent as
/// `"t:<prefix>"` instead.
pub fn build_results_keyboard(names: &[String]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = names
        .iter()
        .map(|name| vec![InlineKeyboardButton::callback(name.clone(), callback_data(name))])
        .collect();
    InlineKeyboardMarkup::new(buttons)
}

fn callback_data(name: &str) -> String {
    let data = format!("{}{}", PROFILE_PREFIX, name);
    if data.len() <= CALLBACK_DATA_LIMIT {
        return data;
    }
    let budget = CALLBACK_DATA_LIMIT - TRUNCATED_PREFIX.len();
    let end = name
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= budget)
        .last()
        .unwrap_or(0);
    format!("{}{}", TRUNCATED_PREFIX, &name[..end])
}

/// Parse callback data in the format `"p:<name>"` or `"t:<prefix>"`.
pub(crate) fn parse_callback_data(data: &str) -> Option<ProfileRequest<'_>> {
    let request = if let Some(name) = data.strip_prefix(PROFILE_PREFIX) {
        ProfileRequest::Exact(name)
    } else {
        ProfileRequest::Prefix(data.strip_prefix(TRUNCATED_PREFIX)?)
    };
    match request {
        ProfileRequest::Exact(s) | ProfileRequest::Prefix(s) if s.is_empty() => None,
        request => Some(request),
    }
}

/// Look a requested teacher up, resolving cut names first.
async fn lookup(
    wiki: &WikiClient,
    request: ProfileRequest<'_>,
) -> Result<TeacherProfile, WikiError> {
    match request {
        ProfileRequest::Exact(name) => wiki.profile(name).await,
        ProfileRequest::Prefix(prefix) => {
            let name = wiki.resolve_name(prefix).await?;
            wiki.profile(&name).await
        }
    }
}

/// Handle inline keyboard button taps (CallbackQuery updates).
///
/// Looks the teacher up and sends the card to the chat the keyboard was in.
/// Lookup failures are logged and answered with a generic notice.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    wiki: Arc<WikiClient>,
) -> ResponseResult<()> {
    // Answer immediately to dismiss Telegram's loading spinner.
    bot.answer_callback_query(q.id.clone()).await?;

    let request = match q.data.as_deref().and_then(parse_callback_data) {
        Some(request) => request,
        None => {
            tracing::warn!("Invalid callback data: {:?}", q.data);
            return Ok(());
        }
    };

    let chat_id = match q.regular_message() {
        Some(m) => m.chat.id,
        None => {
            tracing::warn!("Callback query without regular message, skipping");
            return Ok(());
        }
    };

    bot.send_chat_action(chat_id, ChatAction::UploadPhoto)
        .await
        .ok(); // Non-critical.

    let profile = match lookup(&wiki, request).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Profile lookup for {:?} failed: {}", q.data, e);
            bot.send_message(chat_id, LOOKUP_FAILED_REPLY).await?;
            return Ok(());
        }
    };

    if let Err(e) = send_profile(&bot, chat_id, &profile, wiki.site()).await {
        tracing::error!("Failed to send profile of '{}': {}", profile.name, e);
        bot.send_message(chat_id, LOOKUP_FAILED_REPLY).await?;
    }

    Ok(())
}

/// How a card is split between a photo caption and a text message.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// Photo with the whole card as caption.
    Captioned(String),
    /// Photo (if any) followed by the card as a message.
    Separate(String),
}

/// Decide how to deliver a card given whether a photo will be sent.
pub(crate) fn plan_delivery(profile: &TeacherProfile, site: &Site, has_photo: bool) -> Delivery {
    let full = format_profile(profile, site);
    if has_photo && fits_caption(&full) {
        return Delivery::Captioned(full);
    }
    if fits_message(&full) {
        Delivery::Separate(full)
    } else {
        tracing::warn!(
            "Card for '{}' exceeds the message limit, sending without biography",
            profile.name
        );
        Delivery::Separate(format_profile_brief(profile, site))
    }
}

/// Send a teacher card.
///
/// Uses a single captioned photo when the card fits a caption; otherwise the
/// photo goes first and the card follows as a MarkdownV2 message.
async fn send_profile(
    bot: &Bot,
    chat_id: ChatId,
    profile: &TeacherProfile,
    site: &Site,
) -> ResponseResult<()> {
    let photo = profile
        .photo
        .as_deref()
        .and_then(|link| match site.absolute_url(link) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Ignoring photo of '{}': {}", profile.name, e);
                None
            }
        });

    match plan_delivery(profile, site, photo.is_some()) {
        Delivery::Captioned(caption) => {
            if let Some(url) = photo {
                bot.send_photo(chat_id, InputFile::url(url))
                    .caption(caption)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await?;
            }
        }
        Delivery::Separate(text) => {
            if let Some(url) = photo {
                bot.send_photo(chat_id, InputFile::url(url)).await?;
            }
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
    }
    Ok(())
}
