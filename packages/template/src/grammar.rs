//! # Grammar Text
//!
//! A grammar is clause text with holes:
//!
//! - `{{name}}` binds a variable
//! - `{{% expression %}}` computes a value from the variables
//!
//! Blank lines separate paragraphs.

use crate::error::{TemplateError, TemplateResult};
use crate::formula::{parse_formula, Expr};

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Variable(String),
    Formula { name: String, code: String, expr: Expr },
}

/// Grammar split into paragraphs of segments
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    pub paragraphs: Vec<Vec<Segment>>,
}

impl Grammar {
    pub fn parse(source: &str) -> TemplateResult<Self> {
        let mut paragraphs = Vec::new();
        let mut formula_count = 0;

        for block in split_paragraphs(source) {
            paragraphs.push(parse_segments(&block, &mut formula_count)?);
        }

        if paragraphs.is_empty() {
            return Err(TemplateError::invalid_grammar("grammar is empty"));
        }

        Ok(Self { paragraphs })
    }

    /// Variable names in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in self.paragraphs.iter().flatten() {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn has_formulas(&self) -> bool {
        self.paragraphs
            .iter()
            .flatten()
            .any(|s| matches!(s, Segment::Formula { .. }))
    }
}

fn split_paragraphs(source: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in source.lines() {
        if line.trim().is_empty() {
            if !lines.is_empty() {
                paragraphs.push(lines.join("\n"));
                lines.clear();
            }
        } else {
            lines.push(line.trim_end());
        }
    }
    if !lines.is_empty() {
        paragraphs.push(lines.join("\n"));
    }

    paragraphs
}

fn parse_segments(block: &str, formula_count: &mut usize) -> TemplateResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = block;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_string()));
        }
        let after = &rest[open + 2..];

        if let Some(body) = after.strip_prefix('%') {
            let close = body
                .find("%}}")
                .ok_or_else(|| TemplateError::invalid_grammar("unclosed formula '{{%'"))?;
            let code = body[..close].trim().to_string();
            let expr = parse_formula(&code).map_err(|e| {
                TemplateError::invalid_grammar(format!("formula '{}': {}", code, e))
            })?;
            *formula_count += 1;
            segments.push(Segment::Formula {
                name: format!("formula-{}", formula_count),
                code,
                expr,
            });
            rest = &body[close + 3..];
        } else {
            let close = after
                .find("}}")
                .ok_or_else(|| TemplateError::invalid_grammar("unclosed variable '{{'"))?;
            let name = after[..close].trim();
            if !is_identifier(name) {
                return Err(TemplateError::invalid_grammar(format!(
                    "invalid variable name '{}'",
                    name
                )));
            }
            segments.push(Segment::Variable(name.to_string()));
            rest = &after[close + 2..];
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }

    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        let grammar = Grammar::parse("Pay {{amount}} within {{% days * 2 %}} days.").unwrap();
        assert_eq!(grammar.paragraphs.len(), 1);

        let segments = &grammar.paragraphs[0];
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], Segment::Text("Pay ".to_string()));
        assert_eq!(segments[1], Segment::Variable("amount".to_string()));
        assert!(matches!(
            &segments[3],
            Segment::Formula { name, code, .. } if name == "formula-1" && code == "days * 2"
        ));
        assert!(grammar.has_formulas());
    }

    #[test]
    fn test_paragraphs_and_variable_order() {
        let grammar = Grammar::parse("{{b}} and {{a}}\n\n\n  \n{{b}} again").unwrap();
        assert_eq!(grammar.paragraphs.len(), 2);
        assert_eq!(grammar.variables(), vec!["b", "a"]);
        assert!(!grammar.has_formulas());
    }

    #[test]
    fn test_invalid_grammars() {
        assert!(matches!(
            Grammar::parse("Hello {{name"),
            Err(TemplateError::InvalidGrammar { .. })
        ));
        assert!(matches!(
            Grammar::parse("{{% 1 + %}}"),
            Err(TemplateError::InvalidGrammar { .. })
        ));
        assert!(matches!(
            Grammar::parse("{{not valid}}"),
            Err(TemplateError::InvalidGrammar { .. })
        ));
        assert!(matches!(
            Grammar::parse("  \n"),
            Err(TemplateError::InvalidGrammar { .. })
        ));
    }
}
