//! Startup helpers: bot token resolution.

use wikimipt_core::Config;


/// Environment variable holding the bot token.
pub const TOKEN_ENV_VAR: &str = "WIKIMIPT_TGTOKEN";

/// Resolve the bot token with the following priority:
///
/// 1. `WIKIMIPT_TGTOKEN` environment variable (if set and non-empty).
/// 2. `telegram.token` in `config.toml`.
///
/// The token is **never** passed to any tracing macro.
///
/// # Errors
///
/// Returns an error if neither source provides a token.
pub fn resolve_bot_token(config: &Config) -> anyhow::Result<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        && !token.is_empty()
    {
        return Ok(token);
    }
    config
        .telegram
        .as_ref()
        .and_then(|t| t.token.clone())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Bot token required: set {} env var or telegram.token in config",
                TOKEN_ENV_VAR
            )
        })
}
