use scraper::{Html, Selector};

use super::*;

/// Render the first element matching `selector` in an HTML fragment.
fn render_first(html: &str, selector: &str, mode: Mode) -> Result<String, WikiError> {
    render_first_with_depth(html, selector, mode, 64)
}

fn render_first_with_depth(
    html: &str,
    selector: &str,
    mode: Mode,
    max_depth: usize,
) -> Result<String, WikiError> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse(selector).unwrap();
    let element = fragment.select(&selector).next().unwrap();
    let tags = TagTable::standard();
    let site = Site::default();
    Renderer::new(&tags, &site, max_depth).render(*element, mode)
}

// --- TagTable ---

#[test]
fn test_tag_table_standard_entries() {
    let tags = TagTable::standard();
    assert_eq!(tags.get("i"), Some(Decoration::new("_", "_")));
    assert_eq!(tags.get("b"), Some(Decoration::new("*", "*")));
    assert_eq!(tags.get("p"), Some(Decoration::new("", "\n")));
    assert_eq!(tags.get("ul"), Some(Decoration::new("", "")));
    assert_eq!(tags.get("li"), Some(Decoration::new(" • ", "\n")));
    assert_eq!(tags.get("br"), Some(Decoration::new("\n", "")));
    assert_eq!(tags.get("table"), None);
    assert_eq!(tags.get("a"), None);
}

// --- text and comment nodes ---

#[test]
fn test_whitespace_only_text_is_dropped() {
    for blank in [" ", "\n", "  \n\t  ", "\r\n"] {
        let html = format!("<p>{}</p>", blank);
        let fragment = Html::parse_fragment(&html);
        let selector = Selector::parse("p").unwrap();
        let p = fragment.select(&selector).next().unwrap();
        let text = p.first_child().unwrap();
        assert!(matches!(text.value(), Node::Text(_)));

        let tags = TagTable::standard();
        let site = Site::default();
        let renderer = Renderer::new(&tags, &site, 64);
        assert_eq!(renderer.render(text, Mode::Strict).unwrap(), "");
        assert_eq!(renderer.render(text, Mode::Permissive).unwrap(), "");
    }
}

#[test]
fn test_text_is_escaped() {
    let result = render_first("<p>1+1=2. Done!</p>", "p", Mode::Strict).unwrap();
    assert_eq!(result, "1\\+1\\=2\\. Done\\!\n");
}

#[test]
fn test_text_keeps_surrounding_spaces() {
    let result = render_first("<p>Hello <b>world</b></p>", "p", Mode::Strict).unwrap();
    assert_eq!(result, "Hello *world*\n");
}

#[test]
fn test_comment_is_dropped() {
    let result = render_first("<p>a<!-- hidden -->b</p>", "p", Mode::Strict).unwrap();
    assert_eq!(result, "ab\n");
}

// --- anchors ---

#[test]
fn test_anchor_relative_href_is_qualified() {
    let result = render_first(
        "<a href=\"/Teacher_Name\">John</a>",
        "a",
        Mode::Strict,
    )
    .unwrap();
    assert_eq!(result, "[John](wikimipt.org/Teacher_Name)");
}

#[test]
fn test_anchor_closing_paren_is_escaped() {
    let result = render_first("<a href=\"/A)B\">x</a>", "a", Mode::Strict).unwrap();
    assert!(result.ends_with("](wikimipt.org/A\\)B)"));
    assert_eq!(result, "[x](wikimipt.org/A\\)B)");
}

#[test]
fn test_anchor_absolute_href_unchanged() {
    let result = render_first(
        "<a href=\"https://example.com/page\">site</a>",
        "a",
        Mode::Strict,
    )
    .unwrap();
    assert_eq!(result, "[site](https://example.com/page)");
}

#[test]
fn test_anchor_href_is_not_fully_escaped() {
    // Only ')' is touched in the link target; dots and dashes stay literal.
    let result = render_first(
        "<a href=\"/wiki/Иванов_И.-И.\">И. И.</a>",
        "a",
        Mode::Strict,
    )
    .unwrap();
    assert_eq!(result, "[И\\. И\\.](wikimipt.org/wiki/Иванов_И.-И.)");
}

#[test]
fn test_anchor_children_are_rendered() {
    let result = render_first(
        "<a href=\"/x\"><b>bold</b> link</a>",
        "a",
        Mode::Strict,
    )
    .unwrap();
    assert_eq!(result, "[*bold* link](wikimipt.org/x)");
}

#[test]
fn test_anchor_supported_in_strict_mode_inside_paragraph() {
    let result = render_first(
        "<p>See <a href=\"/wiki/Foo\">Foo</a>.</p>",
        "p",
        Mode::Strict,
    )
    .unwrap();
    assert_eq!(result, "See [Foo](wikimipt.org/wiki/Foo)\\.\n");
}

#[test]
fn test_anchor_without_href_renders_text_only() {
    let result = render_first("<p><a name=\"top\">Top</a></p>", "p", Mode::Strict).unwrap();
    assert_eq!(result, "Top\n");
}

// --- whitelisted tags ---

#[test]
fn test_nested_decorations_keep_order() {
    let result = render_first("<b><i>x</i></b>", "b", Mode::Strict).unwrap();
    assert_eq!(result, "*_x_*");
}

#[test]
fn test_list_items_get_bullets() {
    let result = render_first("<ul><li>one</li><li>two</li></ul>", "ul", Mode::Strict).unwrap();
    assert_eq!(result, " • one\n • two\n");
}

#[test]
fn test_list_with_formatting_whitespace() {
    let html = "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>";
    let result = render_first(html, "ul", Mode::Strict).unwrap();
    assert_eq!(result, " • one\n • two\n");
}

#[test]
fn test_line_break() {
    let result = render_first("<p>a<br>b</p>", "p", Mode::Strict).unwrap();
    assert_eq!(result, "a\nb\n");
}

// --- unknown tags ---

#[test]
fn test_unknown_tag_strict_fails() {
    let html = "<table><tr><td>cell</td></tr></table>";
    let err = render_first(html, "table", Mode::Strict).unwrap_err();
    match err {
        WikiError::UnsupportedTag { tag } => assert_eq!(tag, "table"),
        other => panic!("expected UnsupportedTag, got {:?}", other),
    }
}

#[test]
fn test_unknown_tag_permissive_renders_children_undecorated() {
    let html = "<table><tr><td>cell</td></tr></table>";
    let result = render_first(html, "table", Mode::Permissive).unwrap();
    assert_eq!(result, "cell");
}

#[test]
fn test_unknown_nested_tag_strict_fails() {
    let err = render_first("<p>a <span>b</span></p>", "p", Mode::Strict).unwrap_err();
    assert!(matches!(err, WikiError::UnsupportedTag { ref tag } if tag == "span"));
}

#[test]
fn test_permissive_mixes_known_and_unknown() {
    let html = "<div><h2>Title</h2><p><i>x</i></p></div>";
    let result = render_first(html, "div", Mode::Permissive).unwrap();
    assert_eq!(result, "Title_x_\n");
}

// --- depth limit ---

#[test]
fn test_depth_limit_exceeded() {
    let html = "<b><i><b><i>x</i></b></i></b>";
    let err = render_first_with_depth(html, "b", Mode::Strict, 3).unwrap_err();
    assert!(matches!(err, WikiError::TooDeep { limit: 3 }));
}

#[test]
fn test_depth_limit_not_reached() {
    let html = "<b><i><b><i>x</i></b></i></b>";
    let result = render_first_with_depth(html, "b", Mode::Strict, 4).unwrap();
    assert_eq!(result, "*_*_x_*_*");
}
