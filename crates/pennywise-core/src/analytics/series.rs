//! Month-to-date time series: cumulative spending and daily money flow

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::contains_label;
use crate::models::{IncomeSign, Transaction};

/// First day of `date`'s month
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Inclusive bounds of the calendar month before `today`'s month
pub fn previous_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = month_start(today) - Duration::days(1);
    (month_start(end), end)
}

/// Cumulative spending per date, month to date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSeries {
    /// Category filter, if any
    pub category: Option<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Running total at the end of each date with activity
    pub points: BTreeMap<NaiveDate, f64>,
}

impl SpendingSeries {
    /// Total at the last point of the series
    pub fn total(&self) -> f64 {
        self.points.values().next_back().copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesOutcome {
    Series(SpendingSeries),
    NoTransactions,
}

/// Money moving in and out on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    /// Incoming total as a positive magnitude
    pub money_in: f64,
    /// Outgoing total as a positive magnitude
    pub money_out: f64,
    pub net: f64,
}

fn in_current_month(tx: &Transaction, today: NaiveDate) -> bool {
    tx.date >= month_start(today) && tx.date <= today
}

/// Running total of amounts from the first of `today`'s month through `today`.
///
/// With `category` set, only transactions carrying that exact label count.
/// Amounts on the same date are summed before the running total is taken.
pub fn cumulative_series(
    transactions: &[Transaction],
    category: Option<&str>,
    today: NaiveDate,
) -> SeriesOutcome {
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| in_current_month(tx, today)) {
        let matches = match category {
            Some(label) => tx
                .category
                .as_ref()
                .is_some_and(|raw| contains_label(raw, label)),
            None => true,
        };
        if matches {
            *per_day.entry(tx.date).or_insert(0.0) += tx.amount;
        }
    }

    if per_day.is_empty() {
        return SeriesOutcome::NoTransactions;
    }

    let mut running = 0.0;
    let points = per_day
        .into_iter()
        .map(|(date, amount)| {
            running += amount;
            (date, running)
        })
        .collect();

    SeriesOutcome::Series(SpendingSeries {
        category: category.map(str::to_string),
        from: month_start(today),
        to: today,
        points,
    })
}

/// Per-date money in, money out and net for the current month
pub fn daily_flows(
    transactions: &[Transaction],
    today: NaiveDate,
    income_sign: IncomeSign,
) -> Vec<DailyFlow> {
    let mut flows: BTreeMap<NaiveDate, DailyFlow> = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| in_current_month(tx, today)) {
        let flow = flows.entry(tx.date).or_insert_with(|| DailyFlow {
            date: tx.date,
            money_in: 0.0,
            money_out: 0.0,
            net: 0.0,
        });
        if income_sign.is_incoming(tx.amount) {
            flow.money_in += tx.amount.abs();
        } else {
            flow.money_out += tx.amount.abs();
        }
        flow.net = flow.money_in - flow.money_out;
    }

    flows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::tx;
    use crate::models::RawCategory;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_previous_month_bounds() {
        assert_eq!(
            previous_month(d(10)),
            (
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
            )
        );
        assert_eq!(
            previous_month(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            (
                NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
            )
        );
    }

    #[test]
    fn test_cumulative_series_combines_same_day() {
        let txs = vec![tx(1, d(1), 10.0), tx(2, d(1), 5.0), tx(3, d(3), 20.0)];

        match cumulative_series(&txs, None, d(3)) {
            SeriesOutcome::Series(series) => {
                let points: Vec<_> = series.points.into_iter().collect();
                assert_eq!(points, vec![(d(1), 15.0), (d(3), 35.0)]);
            }
            other => panic!("Expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_cumulative_series_window() {
        let txs = vec![
            tx(1, NaiveDate::from_ymd_opt(2025, 2, 27).unwrap(), 99.0),
            tx(2, d(2), 4.0),
            // After today
            tx(3, d(20), 50.0),
        ];

        match cumulative_series(&txs, None, d(15)) {
            SeriesOutcome::Series(series) => {
                assert_eq!(series.from, d(1));
                assert_eq!(series.points.len(), 1);
                assert_eq!(series.total(), 4.0);
            }
            other => panic!("Expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_cumulative_series_category_filter() {
        let mut food = tx(1, d(2), 12.0);
        food.category = Some(RawCategory::Text(r#"["Food and Drink", "Restaurants"]"#.into()));
        let mut travel = tx(2, d(2), 300.0);
        travel.category = Some(RawCategory::Labels(vec!["Travel".into()]));
        let uncategorized = tx(3, d(4), 7.0);
        let txs = vec![food, travel, uncategorized];

        match cumulative_series(&txs, Some("Restaurants"), d(10)) {
            SeriesOutcome::Series(series) => {
                assert_eq!(series.category.as_deref(), Some("Restaurants"));
                assert_eq!(series.total(), 12.0);
            }
            other => panic!("Expected series, got {:?}", other),
        }

        assert_eq!(
            cumulative_series(&txs, Some("Rent"), d(10)),
            SeriesOutcome::NoTransactions
        );
    }

    #[test]
    fn test_empty_month_is_no_transactions() {
        assert_eq!(cumulative_series(&[], None, d(5)), SeriesOutcome::NoTransactions);
    }

    #[test]
    fn test_series_serializes_date_keys() {
        let txs = vec![tx(1, d(1), 10.0)];
        let outcome = cumulative_series(&txs, None, d(1));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "series");
        assert_eq!(json["points"]["2025-03-01"], 10.0);
    }

    #[test]
    fn test_daily_flows() {
        let txs = vec![
            tx(1, d(1), -2000.0),
            tx(2, d(1), 45.5),
            tx(3, d(2), 10.0),
            tx(4, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(), 1.0),
        ];

        let flows = daily_flows(&txs, d(2), IncomeSign::Negative);
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].date, d(1));
        assert_eq!(flows[0].money_in, 2000.0);
        assert_eq!(flows[0].money_out, 45.5);
        assert_eq!(flows[0].net, 1954.5);
        assert_eq!(flows[1].money_in, 0.0);
        assert_eq!(flows[1].net, -10.0);

        let flipped = daily_flows(&txs, d(2), IncomeSign::Positive);
        assert_eq!(flipped[1].money_in, 10.0);
    }
}
