use scraper::Html;

use super::*;
use crate::render::TagTable;

const RATINGS: [&str; 5] = [
    "4.50 ( 12 голосов )",
    "3.00 ( 4 голоса )",
    "4.91 ( 11 голосов )",
    "( нет голосов )",
    "4.20 ( 15 голосов )",
];

const BIOGRAPHY: &str = "\n<h2>Биография</h2>\n\
    <p>Читает <b>матан</b> на <a href=\"/wiki/ФУПМ\">ФУПМ</a>.</p>\n\
    <!-- comment -->\n\
    <ul>\n<li>Строгий</li>\n<li>Справедливый</li>\n</ul>\n";

/// Build a teacher page shaped like the wiki's profile layout.
fn page(photo: bool, ratings: &[&str], biography: &str, terminated: bool) -> String {
    let photo_cell = if photo {
        "<a href=\"/wiki/Файл:Ivanov.jpg\"><img src=\"/images/a/ab/Ivanov.jpg\" width=\"200\"></a>"
    } else {
        ""
    };
    let rows: String = ratings
        .iter()
        .map(|r| {
            format!(
                "<tr><td>ось</td><td><span class=\"starrating-avg\">{}</span></td></tr>",
                r
            )
        })
        .collect();
    let terminator = if terminated {
        "<div class=\"printfooter\">Источник</div>"
    } else {
        ""
    };
    format!(
        "<html><head><title>x</title></head><body><div id=\"content\">\
         <table class=\"wikitable card\">\
         <tr><th>Иванов Иван Иванович</th></tr>\
         <tr><td>{}</td></tr>\
         <tr><td><table>{}</table></td></tr>\
         </table>{}{}</div></body></html>",
        photo_cell, rows, biography, terminator
    )
}

fn assemble(html: &str) -> Result<TeacherProfile, WikiError> {
    let document = Html::parse_document(html);
    let tags = TagTable::standard();
    let site = Site::default();
    let renderer = Renderer::new(&tags, &site, 64);
    assemble_profile("Иванов Иван Иванович", &document, &renderer, &site)
}

// --- parse_mark ---

#[test]
fn test_parse_mark_with_votes() {
    let mark = parse_mark("4.50 ( 12 голосов )").unwrap();
    assert_eq!(mark, Mark { value: 4.5, votes: 12 });
    assert!(mark.has_votes());
}

#[test]
fn test_parse_mark_no_votes() {
    let mark = parse_mark("( нет голосов )").unwrap();
    assert_eq!(mark, Mark { value: 0.0, votes: 0 });
    assert!(!mark.has_votes());
}

#[test]
fn test_parse_mark_surrounding_whitespace() {
    assert_eq!(parse_mark("  ( нет голосов )\n").unwrap(), Mark::default());
    assert_eq!(
        parse_mark(" 5.00 ( 1 голос ) ").unwrap(),
        Mark { value: 5.0, votes: 1 }
    );
}

#[test]
fn test_parse_mark_bad_score() {
    let err = parse_mark("много ( 3 голоса )").unwrap_err();
    assert!(matches!(err, WikiError::NumericParse { .. }));
}

#[test]
fn test_parse_mark_bad_votes() {
    assert!(matches!(
        parse_mark("4.00 ( -1 голос )"),
        Err(WikiError::NumericParse { .. })
    ));
    assert!(matches!(
        parse_mark("4.00 ( пять голосов )"),
        Err(WikiError::NumericParse { .. })
    ));
}

#[test]
fn test_parse_mark_too_few_tokens() {
    let err = parse_mark("4.50").unwrap_err();
    match err {
        WikiError::NumericParse { text, .. } => assert_eq!(text, "4.50"),
        other => panic!("expected NumericParse, got {:?}", other),
    }
}

#[test]
fn test_parse_mark_out_of_range() {
    assert!(matches!(
        parse_mark("7.10 ( 3 голоса )"),
        Err(WikiError::NumericParse { .. })
    ));
}

// --- Stats ---

#[test]
fn test_stats_indexed_by_axis() {
    let marks = [
        Mark { value: 1.0, votes: 1 },
        Mark { value: 2.0, votes: 2 },
        Mark { value: 3.0, votes: 3 },
        Mark { value: 4.0, votes: 4 },
        Mark { value: 5.0, votes: 5 },
    ];
    let stats = Stats::from_rows(marks);
    assert_eq!(stats[Axis::Knowledge].votes, 1);
    assert_eq!(stats[Axis::Easiness].votes, 4);
    assert_eq!(stats[Axis::Overall].value, 5.0);

    let axes: Vec<Axis> = stats.iter().map(|(axis, _)| axis).collect();
    assert_eq!(axes, Axis::ALL.to_vec());
}

#[test]
fn test_axis_labels() {
    assert_eq!(Axis::Knowledge.label(), "Знания");
    assert_eq!(Axis::Easiness.label(), "«Халявность»");
    assert_eq!(Axis::Overall.label(), "Общая оценка");
}

// --- assemble_profile ---

#[test]
fn test_assemble_full_profile() {
    let profile = assemble(&page(true, &RATINGS, BIOGRAPHY, true)).unwrap();

    assert_eq!(profile.name, "Иванов Иван Иванович");
    assert_eq!(
        profile.photo.as_deref(),
        Some("wikimipt.org/images/a/ab/Ivanov.jpg")
    );
    assert_eq!(
        profile.stats[Axis::Knowledge],
        Mark { value: 4.5, votes: 12 }
    );
    assert_eq!(
        profile.stats[Axis::TeachingSkill],
        Mark { value: 3.0, votes: 4 }
    );
    assert_eq!(profile.stats[Axis::Easiness], Mark::default());
    assert_eq!(
        profile.stats[Axis::Overall],
        Mark { value: 4.2, votes: 15 }
    );
    assert_eq!(
        profile.desc,
        "Биография\
         Читает *матан* на [ФУПМ](wikimipt.org/wiki/ФУПМ)\\.\n\
         \u{20}• Строгий\n • Справедливый\n"
    );
}

#[test]
fn test_assemble_without_photo() {
    let profile = assemble(&page(false, &RATINGS, BIOGRAPHY, true)).unwrap();
    assert_eq!(profile.photo, None);
}

#[test]
fn test_assemble_empty_biography() {
    let profile = assemble(&page(true, &RATINGS, "", true)).unwrap();
    assert_eq!(profile.desc, "");
}

#[test]
fn test_assemble_missing_card() {
    let html = "<html><body><p>Статья не найдена</p><div></div></body></html>";
    let err = assemble(html).unwrap_err();
    assert!(matches!(err, WikiError::StructuralMismatch(_)));
}

#[test]
fn test_assemble_card_class_must_match_exactly() {
    let html = page(true, &RATINGS, BIOGRAPHY, true).replace("wikitable card", "wikitable");
    let err = assemble(&html).unwrap_err();
    assert!(matches!(err, WikiError::StructuralMismatch(_)));
}

#[test]
fn test_assemble_wrong_row_count() {
    let err = assemble(&page(true, &RATINGS[..4], BIOGRAPHY, true)).unwrap_err();
    match err {
        WikiError::StructuralMismatch(msg) => assert!(msg.contains("found 4")),
        other => panic!("expected StructuralMismatch, got {:?}", other),
    }
}

#[test]
fn test_assemble_missing_rating_summary() {
    let html = page(true, &RATINGS, BIOGRAPHY, true).replacen("starrating-avg", "other", 1);
    let err = assemble(&html).unwrap_err();
    assert!(matches!(err, WikiError::StructuralMismatch(_)));
}

#[test]
fn test_assemble_bad_rating_is_fatal() {
    let mut ratings = RATINGS;
    ratings[2] = "N/A";
    let err = assemble(&page(true, &ratings, BIOGRAPHY, true)).unwrap_err();
    assert!(matches!(err, WikiError::NumericParse { .. }));
}

#[test]
fn test_assemble_unterminated_biography() {
    let err = assemble(&page(true, &RATINGS, BIOGRAPHY, false)).unwrap_err();
    assert!(matches!(
        err,
        WikiError::UnterminatedSection { terminator: "div" }
    ));
}
