use anyhow::{anyhow, Result};
use clause_editor::{EditorConfig, ReparseCoordinator, TemplateRegistry};
use clause_model::CiceroMarkdown;
use clause_template::{acceptance_of_delivery, GrammarTemplate, TemplateArchive, DEFAULT_ARCHIVE_BASE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_CONFIG_NAME: &str = "clause.config.json";
pub const DEFAULT_DOCUMENT_NAME: &str = "contract.json";

/// Workbench configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding contract documents
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,

    /// Base URI clause source references point under
    #[serde(default = "default_archive_base")]
    pub archive_base: String,

    /// Template archives available to the workbench
    #[serde(default = "default_templates")]
    pub templates: Vec<TemplateArchive>,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_documents_dir() -> String {
    "contracts".to_string()
}

fn default_archive_base() -> String {
    DEFAULT_ARCHIVE_BASE.to_string()
}

fn default_templates() -> Vec<TemplateArchive> {
    vec![acceptance_of_delivery()]
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the documents directory
    pub fn get_documents_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.documents_dir)
    }

    /// Path of `document`, or of the default document
    pub fn document_path(&self, cwd: &str, document: Option<&str>) -> PathBuf {
        self.get_documents_dir(cwd)
            .join(document.unwrap_or(DEFAULT_DOCUMENT_NAME))
    }

    /// Compile the configured archives
    pub fn templates(&self) -> Result<Vec<GrammarTemplate>> {
        self.templates
            .iter()
            .map(|archive| {
                GrammarTemplate::from_archive(archive.clone())
                    .map_err(|e| anyhow!("template '{}': {}", archive.name, e))
            })
            .collect()
    }

    pub fn template(&self, name: &str) -> Result<GrammarTemplate> {
        self.templates()?
            .into_iter()
            .find(|template| template.archive().name == name)
            .ok_or_else(|| anyhow!("Unknown template: {}", name))
    }

    pub fn registry(&self) -> Result<TemplateRegistry> {
        let registry = TemplateRegistry::new();
        for template in self.templates()? {
            registry.add_template(Arc::new(template));
        }
        Ok(registry)
    }

    pub fn coordinator(&self) -> Result<ReparseCoordinator> {
        Ok(ReparseCoordinator::new(
            Arc::new(self.registry()?),
            Arc::new(CiceroMarkdown::new()),
        )
        .with_regeneration_timeout(self.editor.regeneration_timeout()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            archive_base: default_archive_base(),
            templates: default_templates(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clause_editor::DebounceScope;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "documentsDir": "agreements",
            "templates": [
                {
                    "name": "payment-terms",
                    "version": "2.0.0",
                    "grammar": "{{buyer}} pays within {{days}} days.",
                    "sample": { "buyer": "Acme", "days": 30 }
                }
            ],
            "editor": { "debounceMs": 200, "debounceScope": "perFragment" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.documents_dir, "agreements");
        assert_eq!(config.archive_base, DEFAULT_ARCHIVE_BASE);
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.editor.debounce_ms, 200);
        assert_eq!(config.editor.debounce_scope, DebounceScope::PerFragment);

        let registry = config.registry().unwrap();
        assert_eq!(registry.names(), vec!["payment-terms"]);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.documents_dir, "contracts");
        assert_eq!(config.editor, EditorConfig::default());
        assert!(config.template("acceptance-of-delivery").is_ok());
        assert!(config.template("ipa").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(
            config.document_path(&cwd, None),
            dir.path().join("contracts").join("contract.json")
        );
    }
}
