//! Spending analytics
//!
//! Pure aggregation functions over transaction slices live in
//! [`aggregation`] and [`series`]. [`AnalyticsService`] reads the stores,
//! runs them, and persists the derived fields onto the named user.

pub mod aggregation;
pub mod series;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::store::{TransactionFilter, TransactionStore, UserStore};

pub use aggregation::{
    category_counts, detect_pay_day, saving_goal, top_categories, top_spenders, CategoryCount,
    PayDay, PayDayOutcome, TopSpenders, TopSpendersOutcome,
};
pub use series::{
    cumulative_series, daily_flows, month_start, previous_month, DailyFlow, SeriesOutcome,
    SpendingSeries,
};

/// A user's savings target and the monthly figure derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub amount: f64,
    pub time_months: i64,
    pub saving_goal: f64,
}

/// Runs analytics against a store and records results on users
pub struct AnalyticsService<'a, S> {
    store: &'a S,
    config: AnalyticsConfig,
}

impl<'a, S> AnalyticsService<'a, S>
where
    S: TransactionStore + UserStore,
{
    pub fn new(store: &'a S, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    /// Rank categories across all transactions without persisting anything
    pub fn top_spenders(&self) -> Result<TopSpendersOutcome> {
        let transactions = self.store.list(&TransactionFilter::categorized())?;
        Ok(top_spenders(&transactions))
    }

    /// Rank categories and store the top two on the user.
    ///
    /// The user is left untouched when fewer than two labels exist.
    pub fn refresh_top_spenders(&self, username: &str) -> Result<TopSpendersOutcome> {
        let mut user = self.store.require_user(username)?;
        let outcome = self.top_spenders()?;

        if let TopSpendersOutcome::Ranked(ranked) = &outcome {
            user.top_spender = Some(ranked.top.label.clone());
            user.top2_spender = Some(ranked.second.label.clone());
            self.store.save(&user)?;
            info!(
                user = username,
                top = %ranked.top.label,
                second = %ranked.second.label,
                "Top spenders updated"
            );
        }

        Ok(outcome)
    }

    /// Store a savings target and its recomputed monthly figure
    pub fn set_goal(&self, username: &str, amount: f64, time_months: i64) -> Result<GoalSummary> {
        let monthly = saving_goal(amount, time_months)?;
        let mut user = self.store.require_user(username)?;

        user.amount = Some(amount);
        user.time_months = Some(time_months);
        user.saving_goal = Some(monthly);
        self.store.save(&user)?;

        info!(user = username, amount, time_months, monthly, "Saving goal set");
        Ok(GoalSummary {
            amount,
            time_months,
            saving_goal: monthly,
        })
    }

    /// The stored goal, if the user has set one
    pub fn goal(&self, username: &str) -> Result<Option<GoalSummary>> {
        let user = self.store.require_user(username)?;
        Ok(match (user.amount, user.time_months, user.saving_goal) {
            (Some(amount), Some(time_months), Some(saving_goal)) => Some(GoalSummary {
                amount,
                time_months,
                saving_goal,
            }),
            _ => None,
        })
    }

    /// Detect last month's pay-day without persisting anything
    pub fn pay_day(&self, today: NaiveDate) -> Result<PayDayOutcome> {
        let (start, end) = previous_month(today);
        let transactions = self.store.list(&TransactionFilter::between(start, end))?;
        Ok(detect_pay_day(
            &transactions,
            today,
            self.config.income_sign,
        ))
    }

    /// Detect the pay-day and store it on the user; a miss changes nothing
    pub fn refresh_pay_day(&self, username: &str, today: NaiveDate) -> Result<PayDayOutcome> {
        let mut user = self.store.require_user(username)?;
        let outcome = self.pay_day(today)?;

        if let PayDayOutcome::Detected(pay_day) = &outcome {
            user.day_paid = Some(pay_day.day);
            user.income = Some(pay_day.amount.abs());
            self.store.save(&user)?;
            info!(user = username, day = pay_day.day, "Pay-day updated");
        }

        Ok(outcome)
    }

    /// Month-to-date cumulative spending, optionally for one category
    pub fn spending_series(
        &self,
        category: Option<&str>,
        today: NaiveDate,
    ) -> Result<SeriesOutcome> {
        let transactions = self
            .store
            .list(&TransactionFilter::between(month_start(today), today))?;
        Ok(cumulative_series(&transactions, category, today))
    }

    /// Month-to-date money in and out per date
    pub fn flows(&self, today: NaiveDate) -> Result<Vec<DailyFlow>> {
        let transactions = self
            .store
            .list(&TransactionFilter::between(month_start(today), today))?;
        Ok(daily_flows(&transactions, today, self.config.income_sign))
    }
}
