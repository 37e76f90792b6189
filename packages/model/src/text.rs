//! # Fragment → Text
//!
//! Template engines consume clause content as text. [`FragmentToText`] is the
//! seam; [`CiceroMarkdown`] is the markdown rendering used by grammar
//! templates:
//!
//! - variables render their bound value
//! - formulas render as `{{% value %}}`
//! - blocks are separated by a blank line

use crate::error::{ModelError, ModelResult};
use crate::node::Node;

/// Converts a fragment's children to a template engine's input text
pub trait FragmentToText: Send + Sync {
    fn to_text(&self, children: &[Node]) -> ModelResult<String>;
}

/// Markdown rendering of clause content
#[derive(Debug, Default, Clone)]
pub struct CiceroMarkdown;

impl CiceroMarkdown {
    pub fn new() -> Self {
        Self
    }

    fn render_blocks(&self, nodes: &[Node], output: &mut Vec<String>) -> ModelResult<()> {
        let mut inline = String::new();

        for node in nodes {
            match node {
                Node::Paragraph { children } => {
                    flush(&mut inline, output);
                    output.push(self.render_inline(children)?);
                }
                Node::Heading { level, children } => {
                    flush(&mut inline, output);
                    if !(1..=6).contains(level) {
                        return Err(ModelError::conversion(format!(
                            "heading level {} is outside 1..=6",
                            level
                        )));
                    }
                    output.push(format!(
                        "{} {}",
                        "#".repeat(*level as usize),
                        self.render_inline(children)?
                    ));
                }
                Node::Clause(fragment) => {
                    flush(&mut inline, output);
                    self.render_blocks(&fragment.children, output)?;
                }
                _ => self.render_inline_node(node, &mut inline)?,
            }
        }

        flush(&mut inline, output);
        Ok(())
    }

    fn render_inline(&self, nodes: &[Node]) -> ModelResult<String> {
        let mut out = String::new();
        for node in nodes {
            self.render_inline_node(node, &mut out)?;
        }
        Ok(out)
    }

    fn render_inline_node(&self, node: &Node, out: &mut String) -> ModelResult<()> {
        match node {
            Node::Text {
                text,
                bold,
                italic,
                code,
            } => {
                if *code {
                    out.push('`');
                    out.push_str(text);
                    out.push('`');
                } else {
                    let marker = match (*bold, *italic) {
                        (true, true) => "***",
                        (true, false) => "**",
                        (false, true) => "*",
                        (false, false) => "",
                    };
                    out.push_str(marker);
                    out.push_str(text);
                    out.push_str(marker);
                }
            }
            Node::Variable { value, .. } => out.push_str(value),
            Node::Formula { value, .. } => {
                out.push_str("{{% ");
                out.push_str(value);
                out.push_str(" %}}");
            }
            Node::Link { href, children } => {
                out.push('[');
                out.push_str(&self.render_inline(children)?);
                out.push_str("](");
                out.push_str(href);
                out.push(')');
            }
            Node::Paragraph { .. } | Node::Heading { .. } | Node::Clause(_) => {
                return Err(ModelError::conversion(
                    "block node found inside inline content",
                ));
            }
        }
        Ok(())
    }
}

fn flush(inline: &mut String, output: &mut Vec<String>) {
    if !inline.is_empty() {
        output.push(std::mem::take(inline));
    }
}

impl FragmentToText for CiceroMarkdown {
    fn to_text(&self, children: &[Node]) -> ModelResult<String> {
        let mut blocks = Vec::new();
        self.render_blocks(children, &mut blocks)?;
        Ok(blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Fragment;

    #[test]
    fn test_variables_and_formulas() {
        let children = vec![Node::paragraph(vec![
            Node::text("Deliver "),
            Node::variable("deliverable", "Widgets"),
            Node::text(" within "),
            Node::formula("f1", "days * 2", "20"),
            Node::text(" days."),
        ])];

        let text = CiceroMarkdown::new().to_text(&children).unwrap();
        assert_eq!(text, "Deliver Widgets within {{% 20 %}} days.");
    }

    #[test]
    fn test_blocks_are_separated() {
        let children = vec![
            Node::Heading {
                level: 2,
                children: vec![Node::text("Title")],
            },
            Node::paragraph(vec![Node::text("One")]),
            Node::Clause(Fragment::new(
                "nested",
                vec![Node::paragraph(vec![Node::text("Two")])],
            )),
        ];

        let text = CiceroMarkdown::new().to_text(&children).unwrap();
        assert_eq!(text, "## Title\n\nOne\n\nTwo");
    }

    #[test]
    fn test_marks_and_links() {
        let children = vec![Node::paragraph(vec![
            Node::Text {
                text: "bold".to_string(),
                bold: true,
                italic: false,
                code: false,
            },
            Node::text(" and "),
            Node::Link {
                href: "https://clause.io".to_string(),
                children: vec![Node::text("link")],
            },
        ])];

        let text = CiceroMarkdown::new().to_text(&children).unwrap();
        assert_eq!(text, "**bold** and [link](https://clause.io)");
    }

    #[test]
    fn test_invalid_heading_level_fails() {
        let children = vec![Node::Heading {
            level: 9,
            children: vec![],
        }];
        let err = CiceroMarkdown::new().to_text(&children).unwrap_err();
        assert!(matches!(err, ModelError::Conversion { .. }));
    }
}
