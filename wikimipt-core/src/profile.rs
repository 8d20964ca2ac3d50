//! Teacher profile extraction from a wiki page.
//!
//! A profile page has a `wikitable card` table holding the photo and a nested
//! table of five star ratings. The biography follows the card as sibling
//! nodes and ends at the first `div`.

use std::ops::Index;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::WikiError;
use crate::render::{Mode, Renderer};
use crate::site::Site;

#[cfg(test)]
mod tests;

/// Rating summary text shown when nobody has voted.
pub const NO_VOTES_TEXT: &str = "( нет голосов )";

/// Sibling tag that ends the biography section.
pub const BIOGRAPHY_TERMINATOR: &str = "div";

static CARD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"table[class="wikitable card"]"#)
        .expect("Failed to parse card selector - this is a bug")
});

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table").expect("Failed to parse table selector - this is a bug")
});

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr").expect("Failed to parse row selector - this is a bug")
});

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("Failed to parse img selector - this is a bug")
});

static RATING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[class="starrating-avg"]"#)
        .expect("Failed to parse rating selector - this is a bug")
});

/// One rating axis on the profile card, in page row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Subject knowledge.
    Knowledge,
    /// Teaching skill.
    TeachingSkill,
    /// Communication with students.
    Communication,
    /// How easy the exams are.
    Easiness,
    /// Overall score.
    Overall,
}

impl Axis {
    /// All axes, in the order their rows appear on the page.
    pub const ALL: [Axis; 5] = [
        Axis::Knowledge,
        Axis::TeachingSkill,
        Axis::Communication,
        Axis::Easiness,
        Axis::Overall,
    ];

    /// Caption label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Axis::Knowledge => "Знания",
            Axis::TeachingSkill => "Умение преподавать",
            Axis::Communication => "В общении",
            Axis::Easiness => "«Халявность»",
            Axis::Overall => "Общая оценка",
        }
    }

    fn position(self) -> usize {
        match self {
            Axis::Knowledge => 0,
            Axis::TeachingSkill => 1,
            Axis::Communication => 2,
            Axis::Easiness => 3,
            Axis::Overall => 4,
        }
    }
}

/// Average score and vote count for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mark {
    /// Average score, `0.0..=5.0`. Meaningless when `votes == 0`.
    pub value: f64,
    /// Number of votes.
    pub votes: u32,
}

impl Mark {
    /// True if anyone has voted, i.e. `value` is worth showing.
    pub fn has_votes(&self) -> bool {
        self.votes > 0
    }
}

/// The five marks of a profile, addressed by [`Axis`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    marks: [Mark; 5],
}

impl Stats {
    /// Build from marks listed in [`Axis::ALL`] order.
    pub fn from_rows(marks: [Mark; 5]) -> Self {
        Self { marks }
    }

    /// Iterate `(axis, mark)` pairs in page order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, Mark)> + '_ {
        Axis::ALL.into_iter().map(move |axis| (axis, self[axis]))
    }
}

impl Index<Axis> for Stats {
    type Output = Mark;

    fn index(&self, axis: Axis) -> &Mark {
        &self.marks[axis.position()]
    }
}

/// Everything the bot shows about one teacher.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherProfile {
    /// Page title, also the lookup key.
    pub name: String,
    /// Host-qualified photo link, if the card has a photo.
    pub photo: Option<String>,
    /// Ratings.
    pub stats: Stats,
    /// Biography as MarkdownV2, already escaped.
    pub desc: String,
}

/// Parse a rating summary like `"4.50 ( 12 голосов )"` or `"( нет голосов )"`.
///
/// # Errors
///
/// Returns [`WikiError::NumericParse`] if the text has neither shape or the
/// score lies outside `0.0..=5.0`.
pub fn parse_mark(text: &str) -> Result<Mark, WikiError> {
    let trimmed = text.trim();
    if trimmed == NO_VOTES_TEXT {
        return Ok(Mark::default());
    }

    let parse_error = |reason: String| WikiError::NumericParse {
        text: text.to_string(),
        reason,
    };

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let (value_token, votes_token) = match tokens.as_slice() {
        [value, _, votes, ..] => (*value, *votes),
        _ => return Err(parse_error("expected \"<score> ( <votes> ... )\"".to_string())),
    };

    let value: f64 = value_token
        .parse()
        .map_err(|e| parse_error(format!("score {:?}: {}", value_token, e)))?;
    if !(0.0..=5.0).contains(&value) {
        return Err(parse_error(format!("score {} out of range", value)));
    }
    let votes: u32 = votes_token
        .parse()
        .map_err(|e| parse_error(format!("votes {:?}: {}", votes_token, e)))?;

    Ok(Mark { value, votes })
}

/// Build a profile from a parsed teacher page.
///
/// # Errors
///
/// - [`WikiError::StructuralMismatch`] if the card, its rating table, exactly
///   five rating rows or a row's summary are missing
/// - [`WikiError::NumericParse`] if a rating summary does not parse
/// - [`WikiError::UnterminatedSection`] if the biography is not followed by
///   the terminator tag
/// - any renderer error from the biography
pub fn assemble_profile(
    name: &str,
    document: &Html,
    renderer: &Renderer<'_>,
    site: &Site,
) -> Result<TeacherProfile, WikiError> {
    let card = document.select(&CARD_SELECTOR).next().ok_or_else(|| {
        WikiError::StructuralMismatch("ratings card `table.wikitable.card` not found".to_string())
    })?;

    let photo = find_photo(card).map(|src| site.qualify(src));
    if photo.is_none() {
        tracing::debug!("No photo on the card for '{}'", name);
    }

    let stats = read_stats(card)?;
    let desc = render_biography(card, renderer)?;

    Ok(TeacherProfile {
        name: name.to_string(),
        photo,
        stats,
        desc,
    })
}

/// `src` of the first image in the card's second row.
fn find_photo(card: ElementRef<'_>) -> Option<&str> {
    card.select(&ROW_SELECTOR)
        .nth(1)
        .and_then(|row| row.select(&IMG_SELECTOR).next())
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
}

fn read_stats(card: ElementRef<'_>) -> Result<Stats, WikiError> {
    let ratings = card.select(&TABLE_SELECTOR).next().ok_or_else(|| {
        WikiError::StructuralMismatch("ratings table inside the card not found".to_string())
    })?;

    let rows: Vec<ElementRef<'_>> = ratings.select(&ROW_SELECTOR).collect();
    if rows.len() != Axis::ALL.len() {
        return Err(WikiError::StructuralMismatch(format!(
            "expected {} rating rows, found {}",
            Axis::ALL.len(),
            rows.len()
        )));
    }

    let mut marks = [Mark::default(); 5];
    for (slot, (row, axis)) in marks.iter_mut().zip(rows.iter().zip(Axis::ALL)) {
        let summary = row.select(&RATING_SELECTOR).next().ok_or_else(|| {
            WikiError::StructuralMismatch(format!(
                "rating summary for '{}' not found",
                axis.label()
            ))
        })?;
        let text: String = summary.text().collect();
        *slot = parse_mark(&text)?;
    }
    Ok(Stats::from_rows(marks))
}

/// Render the card's following siblings up to the terminator tag.
fn render_biography(card: ElementRef<'_>, renderer: &Renderer<'_>) -> Result<String, WikiError> {
    let mut desc = String::new();
    let mut sibling = card.next_sibling();
    while let Some(node) = sibling {
        if let Node::Element(element) = node.value()
            && element.name() == BIOGRAPHY_TERMINATOR
        {
            return Ok(desc);
        }
        desc.push_str(&renderer.render(node, Mode::Permissive)?);
        sibling = node.next_sibling();
    }
    Err(WikiError::UnterminatedSection {
        terminator: BIOGRAPHY_TERMINATOR,
    })
}
