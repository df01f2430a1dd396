use std::cmp::Ordering;

use crate::Record;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortOrder {
    /// Parses the select value; anything unrecognized falls back to
    /// [`SortOrder::DateDesc`].
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "date_asc" => Self::DateAsc,
            "amount_desc" => Self::AmountDesc,
            "amount_asc" => Self::AmountAsc,
            _ => Self::DateDesc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::AmountDesc => "amount_desc",
            Self::AmountAsc => "amount_asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "date ↓",
            Self::DateAsc => "date ↑",
            Self::AmountDesc => "amount ↓",
            Self::AmountAsc => "amount ↑",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::DateDesc => Self::DateAsc,
            Self::DateAsc => Self::AmountDesc,
            Self::AmountDesc => Self::AmountAsc,
            Self::AmountAsc => Self::DateDesc,
        }
    }

    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            Self::DateDesc => b.timestamp.cmp(&a.timestamp),
            Self::DateAsc => a.timestamp.cmp(&b.timestamp),
            Self::AmountDesc => b.amount.cmp(&a.amount),
            Self::AmountAsc => a.amount.cmp(&b.amount),
        }
    }
}

/// Stable sort: records with equal keys keep their input order.
pub fn sort(order: SortOrder, items: &[Record]) -> Vec<Record> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| order.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, Kind};

    fn record(id: i64, minor: i64, at: &str) -> Record {
        Record {
            id,
            kind: Kind::Expense,
            amount: Amount::new(minor),
            timestamp: at.parse().unwrap(),
            category: None,
            note: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn unknown_names_fall_back_to_date_desc() {
        assert_eq!(SortOrder::parse("amount_asc"), SortOrder::AmountAsc);
        assert_eq!(SortOrder::parse("category"), SortOrder::DateDesc);
        assert_eq!(SortOrder::parse(""), SortOrder::DateDesc);
    }

    #[test]
    fn orders_by_each_key() {
        let items = vec![
            record(1, 500, "2024-01-02T00:00:00Z"),
            record(2, 100, "2024-01-03T00:00:00Z"),
            record(3, 900, "2024-01-01T00:00:00Z"),
        ];
        assert_eq!(ids(&sort(SortOrder::DateDesc, &items)), vec![2, 1, 3]);
        assert_eq!(ids(&sort(SortOrder::DateAsc, &items)), vec![3, 1, 2]);
        assert_eq!(ids(&sort(SortOrder::AmountDesc, &items)), vec![3, 1, 2]);
        assert_eq!(ids(&sort(SortOrder::AmountAsc, &items)), vec![2, 1, 3]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let items = vec![
            record(4, 100, "2024-01-01T00:00:00Z"),
            record(1, 200, "2024-01-01T00:00:00Z"),
            record(3, 100, "2024-01-02T00:00:00Z"),
            record(2, 100, "2024-01-01T00:00:00Z"),
        ];
        assert_eq!(ids(&sort(SortOrder::DateDesc, &items)), vec![3, 4, 1, 2]);
        assert_eq!(ids(&sort(SortOrder::DateAsc, &items)), vec![4, 1, 2, 3]);
        assert_eq!(ids(&sort(SortOrder::AmountAsc, &items)), vec![4, 3, 2, 1]);
        assert_eq!(ids(&sort(SortOrder::AmountDesc, &items)), vec![1, 4, 3, 2]);
    }
}
