//! # Grammar Templates
//!
//! [`GrammarTemplate`] implements [`TemplateDefinition`] over a grammar:
//!
//! - **parse**: the grammar compiles to one anchored regex. Each variable is a
//!   lazy capture, each formula accepts any rendered `{{% value %}}`, and
//!   paragraphs are joined by a blank line, mirroring `CiceroMarkdown`.
//! - **draft**: grammar + data → paragraphs of text, variable and formula
//!   nodes, with formulas evaluated against the data.

use async_trait::async_trait;
use clause_model::Node;
use regex::Regex;
use serde_json::{Map, Value};

use crate::archive::TemplateArchive;
use crate::definition::{DraftOptions, TemplateDefinition};
use crate::error::{TemplateError, TemplateResult};
use crate::formula::{display_value, evaluate};
use crate::grammar::{Grammar, Segment};

const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct GrammarTemplate {
    archive: TemplateArchive,
    grammar: Grammar,
    matcher: Regex,
    /// Variable name per capture group (group 1 is index 0)
    captures: Vec<String>,
}

impl GrammarTemplate {
    pub fn from_archive(archive: TemplateArchive) -> TemplateResult<Self> {
        let grammar = Grammar::parse(&archive.grammar)?;
        let (pattern, captures) = build_pattern(&grammar);
        let matcher = Regex::new(&pattern)
            .map_err(|e| TemplateError::invalid_grammar(format!("cannot compile grammar: {}", e)))?;

        Ok(Self {
            archive,
            grammar,
            matcher,
            captures,
        })
    }

    pub fn archive(&self) -> &TemplateArchive {
        &self.archive
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Render clause content from data
    pub fn draft(&self, data: &Value) -> TemplateResult<Vec<Node>> {
        let mut paragraphs = Vec::with_capacity(self.grammar.paragraphs.len());

        for segments in &self.grammar.paragraphs {
            let mut children = Vec::with_capacity(segments.len());
            for segment in segments {
                children.push(match segment {
                    Segment::Text(text) => Node::text(text.clone()),
                    Segment::Variable(name) => {
                        let value = data
                            .get(name)
                            .ok_or_else(|| TemplateError::MissingVariable { name: name.clone() })?;
                        Node::variable(name.clone(), display_value(value))
                    }
                    Segment::Formula { name, code, expr } => {
                        let value = evaluate(expr, data).map_err(|source| TemplateError::Formula {
                            name: name.clone(),
                            source,
                        })?;
                        Node::formula(name.clone(), code.clone(), display_value(&value))
                    }
                });
            }
            paragraphs.push(Node::paragraph(children));
        }

        Ok(paragraphs)
    }

    /// Draft a new clause from the archive's sample data
    pub fn draft_sample(&self) -> TemplateResult<Vec<Node>> {
        self.draft(&self.archive.sample)
    }

    fn explain_mismatch(&self, text: &str) -> TemplateError {
        let mut cursor = 0;
        for (index, segments) in self.grammar.paragraphs.iter().enumerate() {
            let literals = segments.iter().filter_map(|s| match s {
                Segment::Text(t) => Some(t.as_str()),
                _ => None,
            });
            let separator = (index > 0).then_some(PARAGRAPH_SEPARATOR);

            for literal in separator.into_iter().chain(literals) {
                match text[cursor..].find(literal) {
                    Some(found) => cursor += found + literal.len(),
                    None => {
                        return TemplateError::parse(cursor, format!("expected {:?}", literal));
                    }
                }
            }
        }
        TemplateError::parse(cursor, "text does not match the template grammar")
    }
}

fn build_pattern(grammar: &Grammar) -> (String, Vec<String>) {
    let mut pattern = String::from("(?s)^");
    let mut captures = Vec::new();

    for (index, segments) in grammar.paragraphs.iter().enumerate() {
        if index > 0 {
            pattern.push_str(&regex::escape(PARAGRAPH_SEPARATOR));
        }
        for segment in segments {
            match segment {
                Segment::Text(text) => pattern.push_str(&regex::escape(text)),
                Segment::Variable(name) => {
                    pattern.push_str("(.+?)");
                    captures.push(name.clone());
                }
                Segment::Formula { .. } => pattern.push_str(r"\{\{%.*?%\}\}"),
            }
        }
    }

    pattern.push('$');
    (pattern, captures)
}

/// Numbers whose canonical form is exactly `raw` become JSON numbers;
/// everything else (`007`, `1.50`, `+5`, `1e3`) stays text so drafting
/// reproduces what was typed
fn typed_value(raw: &str) -> Value {
    let number = match raw.parse::<i64>() {
        Ok(i) => Some(Value::from(i)),
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
    };

    match number {
        Some(value) if display_value(&value) == raw => value,
        _ => Value::String(raw.to_string()),
    }
}

#[async_trait]
impl TemplateDefinition for GrammarTemplate {
    fn name(&self) -> &str {
        &self.archive.name
    }

    fn parse(&self, text: &str) -> TemplateResult<Value> {
        let caps = self
            .matcher
            .captures(text)
            .ok_or_else(|| self.explain_mismatch(text))?;

        let mut data = Map::new();
        for (index, name) in self.captures.iter().enumerate() {
            let Some(m) = caps.get(index + 1) else {
                continue;
            };
            let value = typed_value(m.as_str());

            if let Some(existing) = data.get(name) {
                if *existing != value {
                    return Err(TemplateError::parse(
                        m.start(),
                        format!(
                            "variable '{}' has conflicting values {} and {}",
                            name, existing, value
                        ),
                    ));
                }
                continue;
            }
            data.insert(name.clone(), value);
        }

        tracing::debug!(template = %self.archive.name, fields = data.len(), "parsed clause text");
        Ok(Value::Object(data))
    }

    async fn regenerate_computed_values(&self, options: DraftOptions) -> TemplateResult<Vec<Node>> {
        self.draft(&options.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{acceptance_of_delivery, TemplateType};
    use clause_model::{CiceroMarkdown, FragmentToText};
    use serde_json::json;

    fn archive(grammar: &str) -> TemplateArchive {
        TemplateArchive {
            name: "test-clause".to_string(),
            version: "1.0.0".to_string(),
            template_type: TemplateType::Clause,
            display_name: None,
            grammar: grammar.to_string(),
            sample: json!({ "buyer": "Acme", "days": 5 }),
        }
    }

    #[test]
    fn test_parse_extracts_typed_variables() {
        let template =
            GrammarTemplate::from_archive(archive("{{buyer}} pays within {{days}} days.")).unwrap();

        let data = template.parse("Acme Corp pays within 30 days.").unwrap();
        assert_eq!(data, json!({ "buyer": "Acme Corp", "days": 30 }));
    }

    #[test]
    fn test_parse_keeps_non_canonical_numbers_as_typed() {
        let template =
            GrammarTemplate::from_archive(archive("{{buyer}} pays within {{days}} days.")).unwrap();

        for (typed, expected) in [
            ("007", json!("007")),
            ("1.50", json!("1.50")),
            ("+5", json!("+5")),
            ("1e3", json!("1e3")),
            ("1.5", json!(1.5)),
            ("-4", json!(-4)),
        ] {
            let data = template
                .parse(&format!("Acme pays within {} days.", typed))
                .unwrap();
            assert_eq!(data["days"], expected, "typed {:?}", typed);
        }
    }

    #[tokio::test]
    async fn test_regenerate_preserves_typed_variables() {
        let template = GrammarTemplate::from_archive(acceptance_of_delivery()).unwrap();
        let text = CiceroMarkdown::new()
            .to_text(&template.draft_sample().unwrap())
            .unwrap()
            .replace("Party A", "007")
            .replace("Attachment X", "1.50");

        let data = template.parse(&text).unwrap();
        let regenerated = template
            .regenerate_computed_values(DraftOptions::new(data))
            .await
            .unwrap();

        let text = CiceroMarkdown::new().to_text(&regenerated).unwrap();
        assert!(text.contains("Acceptance of Delivery. 007 will be deemed"));
        assert!(text.ends_with("detailed in 1.50."));
        assert!(text.contains("{{% 80 %}} business hours"));
    }

    #[test]
    fn test_parse_accepts_any_rendered_formula() {
        let template = GrammarTemplate::from_archive(archive(
            "{{buyer}} has {{days}} days ({{% days * 24 %}} hours).",
        ))
        .unwrap();

        let data = template.parse("Acme has 2 days ({{% 999 %}} hours).").unwrap();
        assert_eq!(data, json!({ "buyer": "Acme", "days": 2 }));
    }

    #[test]
    fn test_parse_mismatch_names_expected_text() {
        let template =
            GrammarTemplate::from_archive(archive("{{buyer}} pays within {{days}} days.")).unwrap();

        let err = template.parse("Acme pays eventually.").unwrap_err();
        assert_eq!(err, TemplateError::parse(0, "expected \" pays within \""));
    }

    #[test]
    fn test_repeated_variable_must_agree() {
        let template =
            GrammarTemplate::from_archive(archive("{{buyer}} and {{buyer}}.")).unwrap();

        assert!(template.parse("Acme and Acme.").is_ok());
        assert!(matches!(
            template.parse("Acme and Globex."),
            Err(TemplateError::Parse { .. })
        ));
    }

    #[test]
    fn test_draft_evaluates_formulas() {
        let template = GrammarTemplate::from_archive(archive(
            "{{buyer}} has {{days}} days.\n\nThat is {{% days * 24 %}} hours.",
        ))
        .unwrap();

        let nodes = template.draft(&json!({ "buyer": "Acme", "days": 3 })).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            nodes[1],
            Node::paragraph(vec![
                Node::text("That is "),
                Node::formula("formula-1", "days * 24", "72"),
                Node::text(" hours."),
            ])
        );
    }

    #[test]
    fn test_draft_missing_variable() {
        let template = GrammarTemplate::from_archive(archive("{{buyer}} pays.")).unwrap();
        assert_eq!(
            template.draft(&json!({})).unwrap_err(),
            TemplateError::MissingVariable {
                name: "buyer".to_string()
            }
        );
    }

    #[test]
    fn test_sample_round_trips_through_markdown() {
        let template = GrammarTemplate::from_archive(acceptance_of_delivery()).unwrap();
        let nodes = template.draft_sample().unwrap();

        let text = CiceroMarkdown::new().to_text(&nodes).unwrap();
        let data = template.parse(&text).unwrap();

        assert_eq!(data["shipper"], json!("Party A"));
        assert_eq!(data["businessDays"], json!(10));
        assert_eq!(data["attachment"], json!("Attachment X"));
    }

    #[tokio::test]
    async fn test_regenerate_uses_parsed_data() {
        let template = GrammarTemplate::from_archive(acceptance_of_delivery()).unwrap();
        let nodes = template.draft_sample().unwrap();
        let text = CiceroMarkdown::new()
            .to_text(&nodes)
            .unwrap()
            .replace("10 Business Days", "15 Business Days");

        let data = template.parse(&text).unwrap();
        let regenerated = template
            .regenerate_computed_values(DraftOptions::new(data))
            .await
            .unwrap();

        let text = CiceroMarkdown::new().to_text(&regenerated).unwrap();
        assert!(text.contains("{{% 120 %}} business hours"));
    }
}
