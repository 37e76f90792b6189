use crate::config::{Config, DEFAULT_CONFIG_NAME, DEFAULT_DOCUMENT_NAME};
use anyhow::Result;
use clap::Args;
use clause_editor::ContractDocument;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const SAMPLE_CONTRACT: &str = "# Supply Agreement

This agreement is made between **Party A** (the *Shipper*) and **Party B** (the *Receiver*).";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Documents directory
    #[arg(short, long, default_value = "contracts")]
    pub documents_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing clause workbench...".bright_blue().bold());

    let config = Config {
        documents_dir: args.documents_dir.clone(),
        ..Config::default()
    };

    let documents_dir = config.get_documents_dir(cwd);
    if !documents_dir.exists() {
        fs::create_dir_all(&documents_dir)?;
        println!("  {} Created {}/", "✓".green(), args.documents_dir);
    }

    let document_path = documents_dir.join(DEFAULT_DOCUMENT_NAME);
    if !document_path.exists() {
        let mut document = ContractDocument::create(
            &document_path,
            clause_model::from_markdown(SAMPLE_CONTRACT),
        );
        document.save()?;
        println!("  {} Created {}", "✓".green(), DEFAULT_DOCUMENT_NAME);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Workbench initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: clause insert acceptance-of-delivery");
    println!("  2. Edit {}/{}", args.documents_dir, DEFAULT_DOCUMENT_NAME);
    println!("  3. Run: clause reparse");

    Ok(())
}
