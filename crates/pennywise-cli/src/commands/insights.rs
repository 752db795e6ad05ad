//! Insight command implementations (top spenders, pay-day, series, flows)

use anyhow::Result;
use chrono::NaiveDate;
use pennywise_core::{
    AnalyticsService, Config, Database, PayDayOutcome, SeriesOutcome, TopSpendersOutcome,
};

use super::format_amount;

fn print_top_spenders(outcome: &TopSpendersOutcome) {
    match outcome {
        TopSpendersOutcome::Ranked(ranked) => {
            println!("   🥇 {} ({} transactions)", ranked.top.label, ranked.top.count);
            println!(
                "   🥈 {} ({} transactions)",
                ranked.second.label, ranked.second.count
            );
        }
        TopSpendersOutcome::InsufficientCategories { distinct } => {
            println!(
                "   Not enough categories to rank ({} distinct, need 2)",
                distinct
            );
        }
    }
}

fn print_pay_day(outcome: &PayDayOutcome) {
    match outcome {
        PayDayOutcome::Detected(pay_day) => {
            println!(
                "   💵 Paid on day {} (transaction {} on {}, ${:.2})",
                pay_day.day,
                pay_day.transaction_id,
                pay_day.date,
                pay_day.amount.abs()
            );
        }
        PayDayOutcome::NoTransactionFound => {
            println!("   No incoming transaction found last month");
        }
    }
}

pub fn cmd_insights_top_spenders(db: &Database, config: &Config, user: Option<&str>) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());
    let outcome = match user {
        Some(user) => analytics.refresh_top_spenders(user)?,
        None => analytics.top_spenders()?,
    };

    println!();
    println!("📊 Top Spending Categories");
    println!("   ─────────────────────────────");
    print_top_spenders(&outcome);
    Ok(())
}

pub fn cmd_insights_pay_day(
    db: &Database,
    config: &Config,
    user: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());
    let outcome = match user {
        Some(user) => analytics.refresh_pay_day(user, today)?,
        None => analytics.pay_day(today)?,
    };

    println!();
    println!("📅 Pay-day (income sign: {})", config.analytics.income_sign);
    println!("   ─────────────────────────────");
    print_pay_day(&outcome);
    Ok(())
}

/// Recompute top spenders and pay-day, storing both on the user
pub fn cmd_insights_refresh(
    db: &Database,
    config: &Config,
    user: &str,
    today: NaiveDate,
) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());
    let top = analytics.refresh_top_spenders(user)?;
    let pay_day = analytics.refresh_pay_day(user, today)?;

    println!();
    println!("🔄 Insights for {}", user);
    println!("   ─────────────────────────────");
    print_top_spenders(&top);
    print_pay_day(&pay_day);

    if let Some(goal) = analytics.goal(user)? {
        println!("   🎯 Saving ${:.2} per month", goal.saving_goal);
    }
    Ok(())
}

pub fn cmd_series(
    db: &Database,
    config: &Config,
    category: Option<&str>,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());
    let outcome = analytics.spending_series(category, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SeriesOutcome::Series(series) => {
            println!();
            println!(
                "📈 Spending since {}{}",
                series.from,
                category.map(|c| format!(" in {}", c)).unwrap_or_default()
            );
            println!("   ─────────────────────────────");
            for (date, total) in &series.points {
                println!("   {} │ {:>12.2}", date, total);
            }
        }
        SeriesOutcome::NoTransactions => {
            println!("No transactions this month.");
        }
    }
    Ok(())
}

pub fn cmd_flows(db: &Database, config: &Config, today: NaiveDate, json: bool) -> Result<()> {
    let analytics = AnalyticsService::new(db, config.analytics.clone());
    let flows = analytics.flows(today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&flows)?);
        return Ok(());
    }

    if flows.is_empty() {
        println!("No transactions this month.");
        return Ok(());
    }

    println!();
    println!("🗓️  Daily Money Flow");
    println!("   ─────────────────────────────────────────────────");
    for flow in &flows {
        println!(
            "   {} │ in {:>20} │ out {:>20} │ net {:>10.2}",
            flow.date,
            format_amount(flow.money_in, true),
            format_amount(flow.money_out, false),
            flow.net
        );
    }
    Ok(())
}
