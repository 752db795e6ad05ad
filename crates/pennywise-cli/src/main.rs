//! Pennywise CLI - spending insights and fraud alerts
//!
//! Usage:
//!   pennywise init                          Initialize database
//!   pennywise import --file sync.json       Import provider transactions
//!   pennywise insights refresh --user ana   Recompute stored insights
//!   pennywise alert score --user ana        Score the latest transaction

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use pennywise_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt, &config),
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(&db, 20),
                Some(TransactionsAction::List { limit }) => {
                    commands::cmd_transactions_list(&db, limit)
                }
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, id)
                }
            }
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UsersAction::Add { username, password } => {
                    commands::cmd_users_add(&db, &username, &password)
                }
            }
        }
        Commands::Goal { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                GoalAction::Set {
                    user,
                    amount,
                    months,
                } => commands::cmd_goal_set(&db, &config, &user, amount, months),
                GoalAction::Show { user } => commands::cmd_goal_show(&db, &config, &user),
            }
        }
        Commands::Insights { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                InsightsAction::TopSpenders { user } => {
                    commands::cmd_insights_top_spenders(&db, &config, user.as_deref())
                }
                InsightsAction::PayDay { user, today } => commands::cmd_insights_pay_day(
                    &db,
                    &config,
                    user.as_deref(),
                    commands::today_or(today),
                ),
                InsightsAction::Refresh { user, today } => {
                    commands::cmd_insights_refresh(&db, &config, &user, commands::today_or(today))
                }
            }
        }
        Commands::Series {
            category,
            today,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_series(
                &db,
                &config,
                category.as_deref(),
                commands::today_or(today),
                json,
            )
        }
        Commands::Flows { today, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_flows(&db, &config, commands::today_or(today), json)
        }
        Commands::Alert { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                AlertAction::Score { user } => commands::cmd_alert_score(&db, &config, &user).await,
                AlertAction::Resolve { user, action } => {
                    commands::cmd_alert_resolve(&db, &config, &user, &action)
                }
                AlertAction::Status { user } => commands::cmd_alert_status(&db, &config, &user),
            }
        }
    }
}
