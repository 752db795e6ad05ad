//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Pennywise - spending insights and fraud alerts
#[derive(Parser)]
#[command(name = "pennywise")]
#[command(about = "Transaction analytics and fraud-alert engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "pennywise.db", global = true)]
    pub db: PathBuf,

    /// Config override file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set PENNYWISE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from a provider JSON file
    Import {
        /// JSON file: an array of transactions or a `{"transactions": [...]}` response
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List or delete transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Savings goal
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Top spending categories and pay-day detection
    Insights {
        #[command(subcommand)]
        action: InsightsAction,
    },

    /// Month-to-date cumulative spending
    Series {
        /// Only count transactions with this category label
        #[arg(short, long)]
        category: Option<String>,

        /// Reference date (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Month-to-date money in and out per day
    Flows {
        /// Reference date (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fraud alert workflow
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },

    /// Show database and configuration status
    Status,
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List the most recent transactions
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a user
    Add {
        username: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Set a savings target and compute the monthly figure
    Set {
        #[arg(short, long)]
        user: String,

        /// Amount to save
        #[arg(short, long)]
        amount: f64,

        /// Months to reach the target
        #[arg(short, long)]
        months: i64,
    },

    /// Show the stored goal
    Show {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Subcommand)]
pub enum InsightsAction {
    /// Rank the two most frequent categories
    TopSpenders {
        /// Store the ranking on this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Detect last month's pay-day
    PayDay {
        /// Store the pay-day on this user
        #[arg(short, long)]
        user: Option<String>,

        /// Reference date (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Recompute and store every insight for a user
    Refresh {
        #[arg(short, long)]
        user: String,

        /// Reference date (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum AlertAction {
    /// Score the latest transaction
    Score {
        #[arg(short, long)]
        user: String,
    },

    /// Answer a pending alert
    Resolve {
        #[arg(short, long)]
        user: String,

        /// `yes` (it was me) or `report` (fraud)
        action: String,
    },

    /// Show the user's alert state
    Status {
        #[arg(short, long)]
        user: String,
    },
}
