use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use clause_editor::{Debounced, DebouncedReparser};
use clause_model::Fragment;
use colored::Colorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON lines file of `{ "atMs": .., "fragment": .. }` edit events
    pub events: PathBuf,
}

/// One recorded edit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEvent {
    /// Offset from the start of the recording
    pub at_ms: u64,
    pub fragment: Fragment,
}

#[derive(Debug)]
pub struct ReplayOutcome {
    pub at_ms: u64,
    pub fragment_id: String,
    pub outcome: Debounced,
}

pub fn read_events(path: &Path) -> Result<Vec<ReplayEvent>> {
    let content = std::fs::read_to_string(path)?;
    let mut events = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: ReplayEvent = serde_json::from_str(line)
            .map_err(|e| anyhow!("{}:{}: {}", path.display(), index + 1, e))?;
        events.push(event);
    }

    events.sort_by_key(|event| event.at_ms);
    Ok(events)
}

/// Notify `reparser` at each event's offset and collect every outcome
pub async fn replay_events(
    events: Vec<ReplayEvent>,
    reparser: &DebouncedReparser,
) -> Vec<ReplayOutcome> {
    let start = Instant::now();
    let mut pending = Vec::with_capacity(events.len());

    for event in events {
        sleep_until(start + Duration::from_millis(event.at_ms)).await;
        tracing::debug!(at_ms = event.at_ms, fragment = %event.fragment.id, "replaying edit");
        pending.push((event.at_ms, reparser.notify(event.fragment)));
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for (at_ms, notification) in pending {
        let fragment_id = notification.fragment_id().to_string();
        outcomes.push(ReplayOutcome {
            at_ms,
            fragment_id,
            outcome: notification.outcome().await,
        });
    }
    outcomes
}

pub async fn replay(args: ReplayArgs, cwd: &str) -> Result<Vec<ReplayOutcome>> {
    let config = Config::load(cwd)?;
    let events = read_events(&args.events)?;

    println!(
        "{}",
        format!(
            "⏱  Replaying {} edit(s) with a {}ms quiet period ({:?} scope)...",
            events.len(),
            config.editor.debounce_ms,
            config.editor.debounce_scope
        )
        .bright_blue()
        .bold()
    );

    let reparser = DebouncedReparser::new(
        Arc::new(config.coordinator()?),
        config.editor.debounce_period(),
        config.editor.debounce_scope,
    )?;
    let outcomes = replay_events(events, &reparser).await;
    reparser.shutdown();

    for outcome in &outcomes {
        let label = format!("{:>6}ms {}", outcome.at_ms, outcome.fragment_id);
        match &outcome.outcome {
            Debounced::Superseded => {
                println!("  {} {} superseded", "·".dimmed(), label.dimmed());
            }
            Debounced::Completed(result) => match &result.error {
                Some(error) => eprintln!("  {} {} - {}", "✗".red(), label, error),
                None if result.node.is_some() => {
                    println!("  {} {} formulas updated", "✓".green(), label)
                }
                None => println!("  {} {} unchanged", "✓".green(), label),
            },
        }
    }

    Ok(outcomes)
}
