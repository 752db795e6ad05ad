//! Spending aggregation: top categories, savings goal, pay-day detection

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::series::previous_month;
use crate::category::normalize;
use crate::error::{Error, Result};
use crate::models::{IncomeSign, Transaction};

/// How often a category label appears across transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// The two most frequent category labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSpenders {
    pub top: CategoryCount,
    pub second: CategoryCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopSpendersOutcome {
    Ranked(TopSpenders),
    /// Fewer than two distinct labels exist
    InsufficientCategories { distinct: usize },
}

/// A detected recurring pay-day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayDay {
    pub transaction_id: i64,
    pub date: NaiveDate,
    /// Day of month, 1-31
    pub day: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayDayOutcome {
    Detected(PayDay),
    NoTransactionFound,
}

/// Label frequencies over every categorized transaction.
///
/// Sorted by count descending; equal counts keep the order in which the
/// labels were first encountered.
pub fn category_counts(transactions: &[Transaction]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let labels = transactions
        .iter()
        .filter_map(|tx| tx.category.as_ref())
        .flat_map(normalize);

    for label in labels {
        match index.get(&label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push(CategoryCount { label, count: 1 });
            }
        }
    }

    // sort_by is stable, which preserves first-encountered order on ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The `n` most frequent labels (fewer if not enough distinct labels exist)
pub fn top_categories(transactions: &[Transaction], n: usize) -> Vec<CategoryCount> {
    let mut counts = category_counts(transactions);
    counts.truncate(n);
    counts
}

/// Rank-1 and rank-2 labels, or `InsufficientCategories`
pub fn top_spenders(transactions: &[Transaction]) -> TopSpendersOutcome {
    let mut ranked = top_categories(transactions, 2).into_iter();
    match (ranked.next(), ranked.next()) {
        (Some(top), Some(second)) => TopSpendersOutcome::Ranked(TopSpenders { top, second }),
        (Some(_), None) => TopSpendersOutcome::InsufficientCategories { distinct: 1 },
        _ => TopSpendersOutcome::InsufficientCategories { distinct: 0 },
    }
}

/// Monthly savings needed to reach `amount` in `time_months`
pub fn saving_goal(amount: f64, time_months: i64) -> Result<f64> {
    if time_months <= 0 {
        return Err(Error::InvalidInput(format!(
            "time_months must be positive, got {}",
            time_months
        )));
    }
    if !amount.is_finite() {
        return Err(Error::InvalidInput("amount must be a finite number".to_string()));
    }
    Ok(amount / time_months as f64)
}

/// Earliest incoming transaction in the calendar month before `today`
pub fn detect_pay_day(
    transactions: &[Transaction],
    today: NaiveDate,
    income_sign: IncomeSign,
) -> PayDayOutcome {
    let (start, end) = previous_month(today);

    transactions
        .iter()
        .filter(|tx| tx.date >= start && tx.date <= end)
        .filter(|tx| income_sign.is_incoming(tx.amount))
        .min_by_key(|tx| (tx.date, tx.id))
        .map(|tx| {
            PayDayOutcome::Detected(PayDay {
                transaction_id: tx.id,
                date: tx.date,
                day: tx.date.day(),
                amount: tx.amount,
            })
        })
        .unwrap_or(PayDayOutcome::NoTransactionFound)
}
