//! wikimipt core library.
//!
//! Fetches teacher pages from wikimipt.org, extracts their ratings and renders
//! the biography markup into Telegram MarkdownV2.

pub mod client;
pub mod config;
pub mod error;
pub mod escape;
pub mod profile;
pub mod render;
pub mod search;
pub mod site;
pub mod source;

pub use client::WikiClient;
pub use config::{Config, ConfigError, LoggingConfig, Rotation, TelegramConfig};
pub use error::WikiError;
pub use escape::escape_markdown_v2;
pub use profile::{Axis, Mark, Stats, TeacherProfile};
pub use search::SearchResults;
pub use site::Site;
pub use source::{HttpPageSource, PageSource};
