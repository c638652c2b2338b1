use super::utils::node_text;
use tree_sitter::Node;

/// Doc comment attached to a declaration node.
///
/// The comment is the block comment immediately preceding the declaration,
/// or one placed among its modifiers (after leading annotations).
pub(crate) fn doc_comment_for<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    if let Some(prev) = node.prev_named_sibling() {
        let text = node_text(prev, source);
        if prev.kind() == "block_comment" && text.starts_with("/**") {
            return Some(text);
        }
    }

    let modifiers = super::utils::child_of_kind(node, "modifiers")?;
    let mut cursor = modifiers.walk();
    let found = modifiers
        .children(&mut cursor)
        .filter(|c| c.kind() == "block_comment")
        .map(|c| node_text(c, source))
        .find(|t| t.starts_with("/**"));
    found
}

/// Description part of a `/** ... */` comment: comment delimiters and
/// leading `*` removed, block tags (`@param`, `@since`, ...) dropped.
pub fn javadoc_description(comment: &str) -> String {
    let body = comment
        .trim()
        .trim_start_matches("/**")
        .trim_end_matches("*/");

    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.starts_with('@') {
            break;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

/// Text before the first `.`, or the whole description.
pub fn short_description(description: &str) -> String {
    match description.find('.') {
        Some(pos) => description[..pos].to_string(),
        None => description.to_string(),
    }
}
