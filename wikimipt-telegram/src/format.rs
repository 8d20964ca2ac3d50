//! MarkdownV2 message text for teacher cards and search replies.
//!
//! Everything produced here is ready to send with `ParseMode::MarkdownV2`:
//! literal text goes through [`escape_markdown_v2`] exactly once and the
//! profile biography is embedded as already escaped.

use wikimipt_core::{Mark, SearchResults, Site, TeacherProfile, escape_markdown_v2};

/// Telegram's maximum photo caption length in characters.
pub const CAPTION_LIMIT: usize = 1024;

/// Telegram's maximum message length in characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Number of glyphs in a rating line.
const STARS: usize = 5;

const STAR_FILLED: &str = "\u{2B50}";
const STAR_EMPTY: &str = "\u{1F311}";
const STAR_NO_VOTES: &str = "\u{1F31A}";

/// Full teacher card: name, biography, ratings and a link to the page.
pub fn format_profile(profile: &TeacherProfile, site: &Site) -> String {
    render_card(profile, site, true)
}

/// Teacher card without the biography, for when the full card is too long.
pub fn format_profile_brief(profile: &TeacherProfile, site: &Site) -> String {
    render_card(profile, site, false)
}

fn render_card(profile: &TeacherProfile, site: &Site, with_desc: bool) -> String {
    let mut text = format!("*{}*\n\n", escape_markdown_v2(&profile.name));
    if with_desc {
        text.push_str(&profile.desc);
    }
    for (axis, mark) in profile.stats.iter() {
        text.push_str(&format!("_*{}*_:\n", escape_markdown_v2(axis.label())));
        text.push_str(&rating_line(mark));
    }
    text.push_str(&format!(
        "[_Страница на wikimipt_]({})",
        site.page_url(&profile.name).replace(')', "\\)")
    ));
    text
}

/// Star glyphs plus the escaped numeric summary, newline-terminated.
///
/// One filled star per whole point of the average; five "no votes" moons when
/// nobody has voted.
pub fn rating_line(mark: Mark) -> String {
    if !mark.has_votes() {
        let mut line = STAR_NO_VOTES.repeat(STARS);
        line.push_str(&escape_markdown_v2(" (нет голосов)\n"));
        return line;
    }

    let filled = (mark.value as usize).min(STARS);
    let mut line = STAR_FILLED.repeat(filled);
    line.push_str(&STAR_EMPTY.repeat(STARS - filled));
    line.push_str(&escape_markdown_v2(&format!(
        " {:4.2} ({} голосов)\n",
        mark.value, mark.votes
    )));
    line
}

/// Header for a non-empty search reply.
pub fn search_header(results: &SearchResults) -> String {
    let mut text = String::from("Результаты поиска:");
    if results.truncated {
        text.push_str(&format!(
            "\n_\\(первые {} результатов\\)_",
            results.names.len()
        ));
    }
    text
}

/// True if `text` can be sent as a photo caption.
pub fn fits_caption(text: &str) -> bool {
    text.chars().count() <= CAPTION_LIMIT
}

/// True if `text` can be sent as a single message.
pub fn fits_message(text: &str) -> bool {
    text.chars().count() <= MESSAGE_LIMIT
}
