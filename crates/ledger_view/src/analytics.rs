//! Derived figures for the dashboard cards and charts.
//!
//! Period statistics (sum, average, median, 90th percentile) are computed by
//! the server and only formatted here; the breakdowns below are simple
//! totals over records already on screen.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::{Amount, Kind, Record};

/// Label of records without a category.
pub const UNCATEGORIZED: &str = "Без категории";

/// Totals of a record set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub income: Amount,
    pub expense: Amount,
    pub count: usize,
}

impl Summary {
    pub fn of(records: &[Record]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.kind {
                Kind::Income => summary.income = summary.income.saturating_add(record.amount),
                Kind::Expense => summary.expense = summary.expense.saturating_add(record.amount),
            }
            summary.count += 1;
        }
        summary
    }

    /// Income minus expenses, signed.
    pub fn balance(&self) -> Amount {
        self.income.saturating_sub(self.expense)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
}

/// Amount per category, largest first; ties ordered by name.
pub fn by_category(records: &[Record]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, Amount> = HashMap::new();
    for record in records {
        let key = record.category.as_deref().unwrap_or(UNCATEGORIZED);
        let total = totals.entry(key).or_default();
        *total = total.saturating_add(record.amount);
    }

    let mut out: Vec<_> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayTotals {
    pub day: NaiveDate,
    pub income: Amount,
    pub expense: Amount,
}

/// Income and expense per local calendar day, oldest first.
pub fn timeline(records: &[Record], tz: Tz) -> Vec<DayTotals> {
    let mut days: BTreeMap<NaiveDate, (Amount, Amount)> = BTreeMap::new();
    for record in records {
        let day = record.timestamp.with_timezone(&tz).date_naive();
        let entry = days.entry(day).or_default();
        match record.kind {
            Kind::Income => entry.0 = entry.0.saturating_add(record.amount),
            Kind::Expense => entry.1 = entry.1.saturating_add(record.amount),
        }
    }

    days.into_iter()
        .map(|(day, (income, expense))| DayTotals {
            day,
            income,
            expense,
        })
        .collect()
}

/// Formats a server-side major-unit figure like any other amount.
pub fn format_major(value: f64) -> String {
    Amount::from_major(value)
        .map(|amount| amount.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: Kind, minor: i64, category: Option<&str>, at: &str) -> Record {
        Record {
            id: 0,
            kind,
            amount: Amount::new(minor),
            timestamp: at.parse().unwrap(),
            category: category.map(str::to_string),
            note: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn summary_splits_by_kind() {
        let records = vec![
            record(Kind::Income, 100_000, None, "2024-01-01T10:00:00Z"),
            record(Kind::Expense, 30_000, None, "2024-01-02T10:00:00Z"),
            record(Kind::Expense, 80_000, None, "2024-01-03T10:00:00Z"),
        ];
        let summary = Summary::of(&records);
        assert_eq!(summary.income, Amount::new(100_000));
        assert_eq!(summary.expense, Amount::new(110_000));
        assert_eq!(summary.balance(), Amount::new(-10_000));
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn categories_sorted_by_total() {
        let records = vec![
            record(Kind::Expense, 500, Some("Food"), "2024-01-01T10:00:00Z"),
            record(Kind::Expense, 700, None, "2024-01-01T10:00:00Z"),
            record(Kind::Expense, 400, Some("Food"), "2024-01-01T10:00:00Z"),
            record(Kind::Expense, 700, Some("Cafe"), "2024-01-01T10:00:00Z"),
        ];
        let totals = by_category(&records);
        let names: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Cafe", UNCATEGORIZED]);
        assert_eq!(totals[0].total, Amount::new(900));
    }

    #[test]
    fn timeline_groups_by_local_day() {
        let records = vec![
            record(Kind::Income, 100, None, "2024-01-01T22:00:00Z"),
            record(Kind::Expense, 50, None, "2024-01-02T08:00:00Z"),
            record(Kind::Expense, 10, None, "2024-01-01T08:00:00Z"),
        ];
        let utc = timeline(&records, chrono_tz::UTC);
        assert_eq!(utc.len(), 2);
        assert_eq!(utc[0].income, Amount::new(100));
        assert_eq!(utc[0].expense, Amount::new(10));

        // In Moscow the 22:00 income already falls on January 2nd.
        let msk = timeline(&records, chrono_tz::Europe::Moscow);
        assert_eq!(msk[1].income, Amount::new(100));
        assert_eq!(msk[1].expense, Amount::new(50));
    }

    #[test]
    fn huge_server_amounts_saturate_totals() {
        use api_types::item::{Item, ItemKind};

        let item = |id, kind| Item {
            id,
            kind,
            amount: 5e16,
            date: "2024-01-01T10:00:00Z".parse().unwrap(),
            category: Some("Bonds".to_string()),
            description: None,
            created_at: None,
            updated_at: None,
        };
        let (records, rejected) = Record::from_items(vec![
            item(1, ItemKind::Income),
            item(2, ItemKind::Income),
            item(3, ItemKind::Expense),
            item(4, ItemKind::Expense),
        ]);
        assert!(rejected.is_empty());

        let summary = Summary::of(&records);
        assert_eq!(summary.income, Amount::new(i64::MAX));
        assert_eq!(summary.expense, Amount::new(i64::MAX));
        assert_eq!(summary.balance(), Amount::ZERO);

        assert_eq!(by_category(&records)[0].total, Amount::new(i64::MAX));
        let days = timeline(&records, chrono_tz::UTC);
        assert_eq!(days[0].income, Amount::new(i64::MAX));
        assert_eq!(days[0].expense, Amount::new(i64::MAX));
    }

    #[test]
    fn format_major_handles_garbage() {
        assert_eq!(format_major(1234.5), "1 234,50 ₽");
        assert_eq!(format_major(f64::NAN), "-");
    }
}
