use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use clause_editor::{Applied, ContractDocument, EditSession};
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ReparseArgs {
    /// Document inside the documents directory
    #[arg(short, long)]
    pub document: Option<String>,

    /// Only reparse the clause with this id
    #[arg(short, long)]
    pub clause: Option<String>,
}

/// Counts of each outcome over one run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReparseSummary {
    pub replaced: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub async fn reparse(args: ReparseArgs, cwd: &str) -> Result<ReparseSummary> {
    let config = Config::load(cwd)?;
    let coordinator = config.coordinator()?;
    let path = config.document_path(cwd, args.document.as_deref());

    let document = ContractDocument::load(&path)?;
    let ids: Vec<String> = match &args.clause {
        Some(id) if document.find_clause(id).is_none() => {
            return Err(anyhow!("Clause not found: {}", id));
        }
        Some(id) => vec![id.clone()],
        None => document.clauses().iter().map(|c| c.id.clone()).collect(),
    };

    println!(
        "{}",
        format!("🔁 Reparsing {} clause(s)...", ids.len())
            .bright_blue()
            .bold()
    );

    let mut session = EditSession::new("cli", document).read_only(config.editor.read_only);
    let mut summary = ReparseSummary::default();

    for id in &ids {
        match session.reparse_clause(id, &coordinator).await? {
            Applied::Replaced { version } => {
                summary.replaced += 1;
                println!("  {} {} formulas updated (v{})", "✓".green(), id, version);
            }
            Applied::Unchanged => {
                summary.unchanged += 1;
                println!("  {} {} unchanged", "✓".green(), id);
            }
            Applied::Skipped => {
                summary.skipped += 1;
                println!("  {} {} read-only, update skipped", "-".yellow(), id);
            }
            Applied::Failed(error) => {
                summary.failed += 1;
                eprintln!("  {} {} - {}", "✗".red(), id, error);
            }
        }
    }

    if session.document.is_dirty() {
        session.document.save()?;
    }

    println!();
    if summary.failed > 0 {
        println!(
            "{}",
            format!("⚠️  {} clause(s) failed to parse", summary.failed).yellow()
        );
    } else {
        println!("{}", "✅ All clauses valid".green().bold());
    }

    Ok(summary)
}
