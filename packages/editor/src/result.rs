use clause_model::Fragment;
use serde::{Serialize, Serializer};

use crate::errors::ReparseError;

/// Follow-up the editing session should perform with a reparse result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Replace the clause with the returned node
    UpdateFormulas,
}

/// Outcome of one reparse attempt.
///
/// Exactly one of three shapes:
///
/// | node | operation | error | meaning |
/// |---|---|---|---|
/// | none | none | none | parsed, nothing visually changes |
/// | fragment | `update_formulas` | none | replace the clause |
/// | none | none | reason | failed, clause left as is |
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReparseResult {
    pub node: Option<Fragment>,
    pub operation: Option<Operation>,
    #[serde(serialize_with = "error_message")]
    pub error: Option<ReparseError>,
}

impl ReparseResult {
    pub fn unchanged() -> Self {
        Self {
            node: None,
            operation: None,
            error: None,
        }
    }

    pub fn updated(node: Fragment) -> Self {
        Self {
            node: Some(node),
            operation: Some(Operation::UpdateFormulas),
            error: None,
        }
    }

    pub fn failed(error: ReparseError) -> Self {
        Self {
            node: None,
            operation: None,
            error: Some(error),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.node.is_none() && self.operation.is_none() && self.error.is_none()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

fn error_message<S: Serializer>(error: &Option<ReparseError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_json_shape() {
        let fragment = Fragment::new("c1", vec![]);
        assert_eq!(
            serde_json::to_value(ReparseResult::updated(fragment)).unwrap(),
            json!({
                "node": { "id": "c1", "children": [] },
                "operation": "update_formulas",
                "error": null
            })
        );

        let failed = ReparseResult::failed(ReparseError::TemplateNotFound {
            name: "ipa".to_string(),
        });
        assert_eq!(
            serde_json::to_value(failed).unwrap(),
            json!({ "node": null, "operation": null, "error": "Template not found: ipa" })
        );
    }

    #[test]
    fn test_shapes_are_exclusive() {
        assert!(ReparseResult::unchanged().is_unchanged());
        assert!(!ReparseResult::updated(Fragment::new("c", vec![])).is_unchanged());
        assert!(ReparseResult::failed(ReparseError::Cancelled).is_failed());
    }
}
