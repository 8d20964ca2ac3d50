//! HTML-to-MarkdownV2 tag renderer.
//!
//! Walks a parsed HTML subtree and emits Telegram MarkdownV2. Only a small
//! whitelist of tags is understood; links are always supported. In strict
//! mode any other element is an error, in permissive mode its children are
//! emitted without decoration.

use std::collections::HashMap;

use ego_tree::NodeRef;
use scraper::Node;

use crate::error::WikiError;
use crate::escape::escape_markdown_v2;
use crate::site::Site;

#[cfg(test)]
mod tests;

/// The hyperlink tag, rendered as a MarkdownV2 link in every mode.
const ANCHOR_TAG: &str = "a";

/// Text emitted before and after a tag's rendered children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    /// Emitted before the children.
    pub head: &'static str,
    /// Emitted after the children.
    pub tail: &'static str,
}

impl Decoration {
    const fn new(head: &'static str, tail: &'static str) -> Self {
        Self { head, tail }
    }
}

/// Whitelist of supported tags and their decorations.
///
/// Built once at startup and shared read-only by every render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTable {
    entries: HashMap<&'static str, Decoration>,
}

impl TagTable {
    /// The tags found in biography prose on the wiki.
    ///
    /// - `i` → `_..._`, `b` → `*...*`
    /// - `p` → trailing newline
    /// - `ul` → nothing, `li` → ` • ` bullet and trailing newline
    /// - `br` → newline
    pub fn standard() -> Self {
        let entries = [
            ("i", Decoration::new("_", "_")),
            ("b", Decoration::new("*", "*")),
            ("p", Decoration::new("", "\n")),
            ("ul", Decoration::new("", "")),
            ("li", Decoration::new(" • ", "\n")),
            ("br", Decoration::new("\n", "")),
        ];
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Decoration for `tag`, or `None` if the tag is not whitelisted.
    pub fn get(&self, tag: &str) -> Option<Decoration> {
        self.entries.get(tag).copied()
    }
}

/// How to treat elements missing from the [`TagTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Unknown elements fail with [`WikiError::UnsupportedTag`].
    Strict,
    /// Unknown elements pass their children through undecorated.
    Permissive,
}

/// Renders HTML nodes into MarkdownV2 text.
///
/// Borrows the tag table and site; holds no mutable state, so one renderer can
/// be used for any number of subtrees.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    tags: &'a TagTable,
    site: &'a Site,
    max_depth: usize,
}

impl<'a> Renderer<'a> {
    /// Create a renderer that descends at most `max_depth` levels below the
    /// node it is given.
    pub fn new(tags: &'a TagTable, site: &'a Site, max_depth: usize) -> Self {
        Self {
            tags,
            site,
            max_depth,
        }
    }

    /// Render `node` and its whole subtree.
    ///
    /// Text is escaped, whitespace-only text and comments vanish, links become
    /// `[text](href)` and whitelisted elements are wrapped in their decoration.
    ///
    /// # Errors
    ///
    /// - [`WikiError::UnsupportedTag`] for an unknown element in [`Mode::Strict`]
    /// - [`WikiError::TooDeep`] if nesting exceeds the depth limit
    pub fn render(&self, node: NodeRef<'_, Node>, mode: Mode) -> Result<String, WikiError> {
        let mut out = String::new();
        self.render_into(node, mode, 0, &mut out)?;
        Ok(out)
    }

    fn render_into(
        &self,
        node: NodeRef<'_, Node>,
        mode: Mode,
        depth: usize,
        out: &mut String,
    ) -> Result<(), WikiError> {
        if depth > self.max_depth {
            return Err(WikiError::TooDeep {
                limit: self.max_depth,
            });
        }

        match node.value() {
            Node::Text(text) => {
                if !is_blank(text) {
                    out.push_str(&escape_markdown_v2(text));
                }
            }
            Node::Element(element) => {
                let name = element.name();
                if name == ANCHOR_TAG {
                    match element.attr("href") {
                        Some(href) if !href.is_empty() => {
                            out.push('[');
                            self.render_children(node, mode, depth, out)?;
                            out.push_str("](");
                            out.push_str(&self.link_target(href));
                            out.push(')');
                        }
                        // Named anchors carry no link; keep their text.
                        _ => self.render_children(node, mode, depth, out)?,
                    }
                } else if let Some(decoration) = self.tags.get(name) {
                    out.push_str(decoration.head);
                    self.render_children(node, mode, depth, out)?;
                    out.push_str(decoration.tail);
                } else if mode == Mode::Permissive {
                    self.render_children(node, mode, depth, out)?;
                } else {
                    return Err(WikiError::UnsupportedTag {
                        tag: name.to_string(),
                    });
                }
            }
            // Comments, doctypes and processing instructions never produce output.
            _ => {}
        }
        Ok(())
    }

    fn render_children(
        &self,
        node: NodeRef<'_, Node>,
        mode: Mode,
        depth: usize,
        out: &mut String,
    ) -> Result<(), WikiError> {
        for child in node.children() {
            self.render_into(child, mode, depth + 1, out)?;
        }
        Ok(())
    }

    /// Link target for an `href`: `)` is escaped so it cannot close the
    /// MarkdownV2 link early, and site-relative links get the host.
    fn link_target(&self, href: &str) -> String {
        self.site.qualify(&href.replace(')', "\\)"))
    }
}

/// True if `text` has no characters other than ASCII whitespace.
fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_whitespace())
}
