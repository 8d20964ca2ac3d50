//! MarkdownV2 escaping for literal text.

/// Characters with a meaning in Telegram MarkdownV2.
pub const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '=', '|', '{', '}', '.', '!', '-',
];

/// Escape every MarkdownV2 control character in `text` with a backslash.
///
/// Must be applied exactly once per literal segment: escaping already escaped
/// text doubles the backslashes.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
