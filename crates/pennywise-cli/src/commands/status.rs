//! `pennywise status`: where the data lives and how scoring is configured

use std::path::Path;

use anyhow::Result;
use pennywise_core::{db::DB_KEY_ENV, Config};

use super::open_db;

fn file_size(path: &Path) -> Option<String> {
    let bytes = std::fs::metadata(path).ok()?.len() as f64;
    Some(if bytes < 1024.0 * 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else {
        format!("{:.1} MB", bytes / (1024.0 * 1024.0))
    })
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool, config: &Config) -> Result<()> {
    let key_set = std::env::var_os(DB_KEY_ENV).is_some();
    let encryption = match (no_encrypt, key_set) {
        (true, _) => "⚠️  off (--no-encrypt)".to_string(),
        (false, true) => format!("🔒 on ({} set)", DB_KEY_ENV),
        (false, false) => format!("❌ required, {} not set", DB_KEY_ENV),
    };
    let encoder = config
        .fraud
        .label_encoder
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none, all labels unknown)".to_string());

    println!();
    println!("📊 Pennywise");
    println!("   ─────────────────────────────");
    println!("   Database    {}", db_path.display());
    println!(
        "   Size        {}",
        file_size(db_path).unwrap_or_else(|| "(not initialized)".to_string())
    );
    println!("   Encryption  {}", encryption);
    println!("   Income sign {}", config.analytics.income_sign);
    println!(
        "   Classifier  {} at {}",
        config.classifier.backend, config.classifier.host
    );
    println!("   Encoder     {}", encoder);

    if db_path.exists() {
        match open_db(db_path, no_encrypt).and_then(|db| Ok(db.counts()?)) {
            Ok((users, transactions)) => {
                println!("   Users       {}", users);
                println!("   Transactions {}", transactions);
            }
            Err(e) => println!("   ❌ Cannot read database: {:#}", e),
        }
    }
    println!();
    Ok(())
}
