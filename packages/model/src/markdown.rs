//! Markdown → content tree
//!
//! Supports the subset the editor needs for prose around clauses: ATX
//! headings, paragraphs, `**bold**`, `*italic*`, `` `code` `` and
//! `[text](href)` links. Unclosed delimiters are kept as literal text.

use crate::node::Node;

#[derive(Clone, Copy, Default)]
struct Marks {
    bold: bool,
    italic: bool,
}

/// Parse markdown text into block nodes
pub fn from_markdown(source: &str) -> Vec<Node> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim_end();

        if trimmed.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some((level, title)) = heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Node::Heading {
                level,
                children: parse_inline(title),
            });
            continue;
        }

        paragraph.push(trimmed);
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Node>) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join("\n");
    lines.clear();
    blocks.push(Node::paragraph(parse_inline(&text)));
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    rest.strip_prefix(' ').map(|title| (hashes as u8, title.trim()))
}

/// Parse inline markdown into text and link nodes
pub fn parse_inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    parse_inline_into(text, Marks::default(), &mut nodes);
    nodes
}

fn parse_inline_into(text: &str, marks: Marks, nodes: &mut Vec<Node>) {
    let mut literal = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                push_text(&mut literal, marks, false, nodes);
                let inner = Marks {
                    bold: true,
                    ..marks
                };
                parse_inline_into(&after[..end], inner, nodes);
                rest = &after[end + 2..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('*') {
            if let Some(end) = after.find('*') {
                push_text(&mut literal, marks, false, nodes);
                let inner = Marks {
                    italic: true,
                    ..marks
                };
                parse_inline_into(&after[..end], inner, nodes);
                rest = &after[end + 1..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                push_text(&mut literal, marks, false, nodes);
                literal.push_str(&after[..end]);
                push_text(&mut literal, marks, true, nodes);
                rest = &after[end + 1..];
                continue;
            }
        } else if let Some((label, href, consumed)) = link(rest) {
            push_text(&mut literal, marks, false, nodes);
            let mut children = Vec::new();
            parse_inline_into(label, marks, &mut children);
            nodes.push(Node::Link {
                href: href.to_string(),
                children,
            });
            rest = &rest[consumed..];
            continue;
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    push_text(&mut literal, marks, false, nodes);
}

fn link(rest: &str) -> Option<(&str, &str, usize)> {
    let after = rest.strip_prefix('[')?;
    let label_end = after.find("](")?;
    let href_start = label_end + 2;
    let href_len = after[href_start..].find(')')?;
    let label = &after[..label_end];
    let href = &after[href_start..href_start + href_len];
    // '[' + label + '](' + href + ')'
    Some((label, href, 1 + href_start + href_len + 1))
}

fn push_text(literal: &mut String, marks: Marks, code: bool, nodes: &mut Vec<Node>) {
    if literal.is_empty() {
        return;
    }
    nodes.push(Node::Text {
        text: std::mem::take(literal),
        bold: marks.bold,
        italic: marks.italic,
        code,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{CiceroMarkdown, FragmentToText};

    const SAMPLE: &str = "# Heading One\nThis is text. This is *italic* text. This is **bold** text.\nThis is a [link](https://clause.io). This is `inline code`.\n";

    #[test]
    fn test_sample_document_blocks() {
        let nodes = from_markdown(SAMPLE);
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::Heading { level: 1, .. }));

        let Node::Paragraph { children } = &nodes[1] else {
            panic!("Expected paragraph");
        };
        assert!(children.iter().any(|n| matches!(n, Node::Link { href, .. } if href == "https://clause.io")));
        assert!(children.iter().any(|n| matches!(n, Node::Text { code: true, text, .. } if text == "inline code")));
        assert!(children.iter().any(|n| matches!(n, Node::Text { italic: true, text, .. } if text == "italic")));
        assert!(children.iter().any(|n| matches!(n, Node::Text { bold: true, text, .. } if text == "bold")));
    }

    #[test]
    fn test_renders_back_to_markdown() {
        let nodes = from_markdown(SAMPLE);
        let text = CiceroMarkdown::new().to_text(&nodes).unwrap();
        let expected = SAMPLE.trim_end().replacen('\n', "\n\n", 1);
        assert_eq!(text, expected);
    }

    #[test]
    fn test_unclosed_delimiters_are_literal() {
        let nodes = parse_inline("2 * 3 and `open");
        assert_eq!(nodes, vec![Node::text("2 * 3 and `open")]);
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let nodes = from_markdown("one\n\n\ntwo\nthree");
        assert_eq!(
            nodes,
            vec![
                Node::paragraph(vec![Node::text("one")]),
                Node::paragraph(vec![Node::text("two\nthree")]),
            ]
        );
    }
}
