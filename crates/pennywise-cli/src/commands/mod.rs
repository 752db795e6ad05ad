//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `alerts` - Fraud alert commands (score, resolve, status)
//! - `core` - Core commands (init, import) and shared utilities (open_db)
//! - `goals` - Savings goal commands (set, show)
//! - `insights` - Top spenders, pay-day, series and flows
//! - `status` - Database and configuration status
//! - `transactions` - Transaction commands (list, delete)
//! - `users` - User registration

pub mod alerts;
pub mod core;
pub mod goals;
pub mod insights;
pub mod status;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use alerts::*;
pub use core::*;
pub use goals::*;
pub use insights::*;
pub use status::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount for terminal output, red for money out, green for money in
pub fn format_amount(amount: f64, incoming: bool) -> String {
    if incoming {
        format!("\x1b[32m+${:.2}\x1b[0m", amount.abs())
    } else {
        format!("\x1b[31m${:.2}\x1b[0m", amount.abs())
    }
}
