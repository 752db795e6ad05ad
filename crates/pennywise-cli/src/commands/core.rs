//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `today_or` - Resolve an optional `--today` argument
//! - `cmd_init` - Initialize the database
//! - `cmd_import` - Import provider transactions

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pennywise_core::{import_transactions, parse_transactions, Database};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// The given reference date, or the local date
pub fn today_or(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: pennywise users add <name> --password <password>");
    println!("  2. Import transactions: pennywise import --file transactions.json");
    println!("  3. Compute insights: pennywise insights refresh --user <name>");

    Ok(())
}

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());

    let reader = File::open(file)
        .map(BufReader::new)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let transactions = parse_transactions(reader).context("Failed to parse transactions")?;

    let imported = import_transactions(db, &transactions).context("Failed to store transactions")?;
    println!("✅ Imported {} transactions", imported);

    Ok(())
}
