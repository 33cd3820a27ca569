use anyhow::Result;
use colored::Colorize;
use postcraft_interaction::{DocumentStoreProbe, ProbeOutcome};

use crate::bootstrap::AppContext;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let probe = DocumentStoreProbe::from_config(
        &ctx.config.document_store,
        ctx.config.webhook.timeout(),
    )?;
    let report = probe.run().await;

    println!("{} {}", "Collection:".bright_magenta(), report.collection);
    println!("  read:  {}", outcome_label(&report.read));
    println!("  write: {}", outcome_label(&report.write));
    Ok(())
}

fn outcome_label(outcome: &ProbeOutcome) -> String {
    let text = outcome.to_string();
    match outcome {
        ProbeOutcome::Allowed => text.green().to_string(),
        ProbeOutcome::Denied { .. } => text.yellow().to_string(),
        ProbeOutcome::Unreachable(_) => text.red().to_string(),
    }
}
