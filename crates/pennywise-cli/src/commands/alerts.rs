//! Fraud alert command implementations

use anyhow::{Context, Result};
use pennywise_core::{
    Config, Database, FraudAlertController, FraudClassifier, ResolveOutcome, ScoreOutcome,
};

use super::format_amount;

pub async fn cmd_alert_score(db: &Database, config: &Config, user: &str) -> Result<()> {
    let alerts = FraudAlertController::from_config(db, config)
        .context("Failed to set up fraud classifier")?;
    println!(
        "🔍 Scoring latest transaction ({} classifier)...",
        alerts.classifier().name()
    );

    match alerts.score(user).await? {
        ScoreOutcome::NoTransactions => println!("   No transactions to score."),
        ScoreOutcome::Clear => println!("   ✅ Looks fine."),
        ScoreOutcome::Flagged(flagged) => {
            println!(
                "   🚨 Transaction {} at {} for {} looks suspicious",
                flagged.id,
                flagged.merchant.as_deref().unwrap_or("(unknown merchant)"),
                format_amount(flagged.amount, false)
            );
            println!(
                "   Answer with: pennywise alert resolve --user {} yes|report",
                user
            );
        }
        ScoreOutcome::AlreadyPending(flagged) => {
            match flagged {
                Some(flagged) => println!(
                    "   ⏳ Transaction {} is still awaiting your answer",
                    flagged.id
                ),
                None => println!("   ⏳ An alert is still awaiting your answer"),
            }
        }
    }
    Ok(())
}

pub fn cmd_alert_resolve(db: &Database, config: &Config, user: &str, action: &str) -> Result<()> {
    let alerts = FraudAlertController::without_classifier(db, &config.fraud);

    match alerts.resolve(user, action)? {
        ResolveOutcome::Resolved => println!("✅ Thanks, transaction confirmed."),
        ResolveOutcome::Reported => println!("🚩 Transaction reported as fraud."),
        ResolveOutcome::AlreadyResolved { state } => {
            println!("Alert already resolved ({}).", state)
        }
        ResolveOutcome::NoActiveAlert => println!("No active alert for {}.", user),
    }
    Ok(())
}

pub fn cmd_alert_status(db: &Database, config: &Config, user: &str) -> Result<()> {
    let alerts = FraudAlertController::without_classifier(db, &config.fraud);
    let status = alerts.status(user)?;

    println!();
    println!("🔔 Alert status for {}", status.username);
    println!("   ─────────────────────────────");
    println!("   State: {}", status.state);
    if let Some(id) = status.flagged_transaction_id {
        println!("   Flagged transaction: {}", id);
    }
    if let Some(note) = &status.annotation {
        println!("   Note: {}", note);
    }
    Ok(())
}
