use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use clause_editor::{new_clause, ContractDocument};
use clause_model::extract_template_name;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Template name, `name@version`, or archive URI
    pub template: String,

    /// Document inside the documents directory
    #[arg(short, long)]
    pub document: Option<String>,

    /// Markdown inserted after the clause
    #[arg(short, long, default_value = "")]
    pub trailing: String,
}

/// Template name a user-supplied reference points at
pub fn template_name(reference: &str) -> &str {
    if reference.contains('/') || reference.contains('@') {
        extract_template_name(reference)
    } else {
        reference
    }
}

pub fn insert(args: InsertArgs, cwd: &str) -> Result<String> {
    let config = Config::load(cwd)?;
    let path = config.document_path(cwd, args.document.as_deref());
    if !path.exists() {
        return Err(anyhow!(
            "Document does not exist: {} (run `clause init` first)",
            path.display()
        ));
    }

    let template = config.template(template_name(&args.template))?;
    let clause = new_clause(&template, &config.archive_base)?;
    let id = clause.id.clone();

    let mut document = ContractDocument::load(&path)?;
    document.insert_clause(clause, &args.trailing);
    document.save()?;

    println!(
        "  {} Inserted {} as {}",
        "✓".green(),
        template.archive().display_name().bright_white(),
        id.dimmed()
    );

    Ok(id)
}
