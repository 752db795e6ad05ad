//! Savings goal command implementations

use anyhow::Result;
use pennywise_core::{AnalyticsService, Config, Database};

pub fn cmd_goal_set(
    db: &Database,
    config: &Config,
    user: &str,
    amount: f64,
    months: i64,
) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());
    let goal = analytics.set_goal(user, amount, months)?;

    println!(
        "🎯 Saving ${:.2} over {} months means ${:.2} per month",
        goal.amount, goal.time_months, goal.saving_goal
    );
    Ok(())
}

pub fn cmd_goal_show(db: &Database, config: &Config, user: &str) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());

    match analytics.goal(user)? {
        Some(goal) => {
            println!();
            println!("🎯 Savings goal for {}", user);
            println!("   ─────────────────────────────");
            println!("   Target:   ${:.2}", goal.amount);
            println!("   Horizon:  {} months", goal.time_months);
            println!("   Monthly:  ${:.2}", goal.saving_goal);
        }
        None => {
            println!("No savings goal set. Set one with:");
            println!("  pennywise goal set --user {} --amount 1200 --months 12", user);
        }
    }
    Ok(())
}
