//! User command implementations

use anyhow::{Context, Result};
use pennywise_core::{Database, UserStore};

pub fn cmd_users_add(db: &Database, username: &str, password: &str) -> Result<()> {
    let user = db
        .create_user(username, password)
        .context("Failed to create user")?;
    println!("👤 Created user '{}' (id {})", user.username, user.id);
    Ok(())
}
