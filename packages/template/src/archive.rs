//! Template archives: the metadata and grammar a template is built from

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_ARCHIVE_BASE: &str = "https://templates.accordproject.org/archives";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Contract,
    #[default]
    Clause,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateArchive {
    /// Package name; registry key and the name part of source references
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub template_type: TemplateType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    pub grammar: String,

    /// Sample data used to draft new clauses
    #[serde(default)]
    pub sample: Value,
}

impl TemplateArchive {
    /// Source reference of this archive under `base`
    pub fn uri(&self, base: &str) -> String {
        format!(
            "{}/{}@{}.cta",
            base.trim_end_matches('/'),
            self.name,
            self.version
        )
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// The acceptance-of-delivery clause bundled with the workbench
pub fn acceptance_of_delivery() -> TemplateArchive {
    TemplateArchive {
        name: "acceptance-of-delivery".to_string(),
        version: "0.14.0".to_string(),
        template_type: TemplateType::Clause,
        display_name: Some("Acceptance of Delivery".to_string()),
        grammar: concat!(
            "Acceptance of Delivery. {{shipper}} will be deemed to have completed its delivery obligations ",
            "if in {{receiver}}'s opinion, the {{deliverable}} satisfies the Acceptance Criteria, and ",
            "{{receiver}} notifies {{shipper}} in writing that it is accepting the {{deliverable}}.\n",
            "\n",
            "Inspection and Notice. {{receiver}} will have {{businessDays}} Business Days to inspect and ",
            "evaluate the {{deliverable}} on the delivery date before notifying {{shipper}} that it is ",
            "either accepting or rejecting the {{deliverable}}. The inspection window closes after ",
            "{{% businessDays * 8 %}} business hours.\n",
            "\n",
            "Acceptance Criteria. The \"Acceptance Criteria\" are the specifications the {{deliverable}} ",
            "must meet for the {{shipper}} to comply with its requirements and obligations under this ",
            "agreement, detailed in {{attachment}}."
        )
        .to_string(),
        sample: json!({
            "shipper": "Party A",
            "receiver": "Party B",
            "deliverable": "Widgets",
            "businessDays": 10,
            "attachment": "Attachment X"
        }),
    }
}
