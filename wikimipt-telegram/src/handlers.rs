//! Telegram message handler for the wikimipt bot.
//!
//! Free text is treated as a teacher search query; the reply carries one
//! inline button per matching name.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, Message as TgMessage, ParseMode, ReplyParameters};
use wikimipt_core::{SearchResults, WikiClient, WikiError};

use crate::commands::build_results_keyboard;
use crate::format::search_header;

/// Reply to a query with characters the listing cannot contain.
pub const BAD_QUERY_REPLY: &str = "Неподдерживаемые символы в запросе";

/// Reply when no name starts with the query.
pub const NOT_FOUND_REPLY: &str = "Ничего не найдено";

/// Reply when the search itself failed.
pub const SEARCH_FAILED_REPLY: &str = "Не удалось выполнить поиск. Попробуйте позже.";

/// What to answer to a search query.
#[derive(Debug)]
pub enum SearchReply {
    /// The query has unsupported characters.
    BadQuery,
    /// Nothing matched.
    NotFound,
    /// Fetching or parsing the listing failed.
    Failed,
    /// MarkdownV2 header plus one button per name.
    Results {
        /// Header text.
        text: String,
        /// One button per name.
        keyboard: InlineKeyboardMarkup,
    },
}

impl SearchReply {
    /// Map a search outcome to a reply.
    pub fn from_outcome(outcome: Result<SearchResults, WikiError>) -> Self {
        match outcome {
            Ok(results) if results.names.is_empty() => SearchReply::NotFound,
            Ok(results) => SearchReply::Results {
                text: search_header(&results),
                keyboard: build_results_keyboard(&results.names),
            },
            Err(WikiError::BadQuery { .. }) => SearchReply::BadQuery,
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                SearchReply::Failed
            }
        }
    }
}

/// Handle an incoming non-command Telegram message.
///
/// Unknown slash commands get an error reply; any other text is searched for
/// and answered with a result keyboard.
pub async fn handle_message(bot: Bot, msg: TgMessage, wiki: Arc<WikiClient>) -> ResponseResult<()> {
    // Non-text updates are ignored.
    let text = match msg.text() {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(()),
    };

    if text.starts_with('/') {
        bot.send_message(msg.chat.id, format!("Неизвестная команда: {}", text))
            .await?;
        return Ok(());
    }

    let chat_id = msg.chat.id;
    tracing::info!("Search request in chat {}", chat_id.0);

    match SearchReply::from_outcome(wiki.search(text).await) {
        SearchReply::BadQuery => {
            bot.send_message(chat_id, BAD_QUERY_REPLY).await?;
        }
        SearchReply::NotFound => {
            bot.send_message(chat_id, NOT_FOUND_REPLY)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        SearchReply::Failed => {
            bot.send_message(chat_id, SEARCH_FAILED_REPLY).await?;
        }
        SearchReply::Results { text, keyboard } => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::MarkdownV2)
                .reply_parameters(ReplyParameters::new(msg.id))
                .reply_markup(keyboard)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_bad_query() {
        let outcome = Err(WikiError::BadQuery {
            query: "Ivanov".to_string(),
        });
        assert!(matches!(
            SearchReply::from_outcome(outcome),
            SearchReply::BadQuery
        ));
    }

    #[test]
    fn test_reply_not_found() {
        let outcome = Ok(SearchResults::default());
        assert!(matches!(
            SearchReply::from_outcome(outcome),
            SearchReply::NotFound
        ));
    }

    #[test]
    fn test_reply_failed_on_fetch_error() {
        let outcome = Err(WikiError::Fetch("timeout".to_string()));
        assert!(matches!(
            SearchReply::from_outcome(outcome),
            SearchReply::Failed
        ));
    }

    #[test]
    fn test_reply_failed_on_layout_change() {
        let outcome = Err(WikiError::StructuralMismatch("no group".to_string()));
        assert!(matches!(
            SearchReply::from_outcome(outcome),
            SearchReply::Failed
        ));
    }

    #[test]
    fn test_reply_long_names_keep_buttons() {
        let long = "Константинопольский Владимир Александрович".to_string();
        let outcome = Ok(SearchResults {
            names: vec![long.clone(), long],
            truncated: true,
        });
        match SearchReply::from_outcome(outcome) {
            SearchReply::Results { text, keyboard } => {
                assert!(text.contains("первые 2 результатов"));
                assert_eq!(keyboard.inline_keyboard.len(), 2);
            }
            other => panic!("expected Results, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_results() {
        let outcome = Ok(SearchResults {
            names: vec!["Иванов Иван".to_string(), "Иванова Анна".to_string()],
            truncated: true,
        });
        match SearchReply::from_outcome(outcome) {
            SearchReply::Results { text, keyboard } => {
                assert!(text.starts_with("Результаты поиска:"));
                assert!(text.contains("первые 2 результатов"));
                assert_eq!(keyboard.inline_keyboard.len(), 2);
                assert_eq!(keyboard.inline_keyboard[0][0].text, "Иванов Иван");
            }
            other => panic!("expected Results, got {:?}", other),
        }
    }
}
