//! Transaction command implementations

use anyhow::{Context, Result};
use pennywise_core::{normalize, Database, TransactionFilter, TransactionStore};

use super::truncate;

pub fn cmd_transactions_list(db: &Database, limit: usize) -> Result<()> {
    let transactions = db.list(&TransactionFilter::all())?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  pennywise import --file transactions.json");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    // Listing is oldest first; show the newest `limit`
    for tx in transactions.iter().rev().take(limit) {
        let label = tx
            .merchant_name
            .as_deref()
            .or(tx.name.as_deref())
            .unwrap_or("(unnamed)");
        let categories = tx
            .category
            .as_ref()
            .map(|c| normalize(c).join(" › "))
            .unwrap_or_default();

        println!(
            "   {:>5} │ {} │ {:>10.2} │ {:<30} │ {}",
            tx.id,
            tx.date,
            tx.amount,
            truncate(label, 30),
            truncate(&categories, 40)
        );
    }

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    db.delete(id)
        .with_context(|| format!("Failed to delete transaction {}", id))?;
    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}
