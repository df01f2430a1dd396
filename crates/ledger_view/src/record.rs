use std::collections::HashSet;

use api_types::item::{Item, ItemKind};
use chrono::{DateTime, Utc};

use crate::{Amount, RecordError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// Wire name (`income` / `expense`).
    pub fn code(self) -> &'static str {
        ItemKind::from(self).as_str()
    }

    /// Display label used in tables and exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Доход",
            Self::Expense => "Расход",
        }
    }

    /// Accepts the wire name or the display label, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "income" | "доход" | "+" => Some(Self::Income),
            "expense" | "расход" | "-" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl From<ItemKind> for Kind {
    fn from(value: ItemKind) -> Self {
        match value {
            ItemKind::Income => Self::Income,
            ItemKind::Expense => Self::Expense,
        }
    }
}

impl From<Kind> for ItemKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Income => Self::Income,
            Kind::Expense => Self::Expense,
        }
    }
}

/// One income or expense entry of the working set.
///
/// Records are values: the view never edits one in place, it replaces the
/// whole set after every round-trip to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub kind: Kind,
    /// Always positive.
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Converts a batch of server items, keeping the valid ones.
    ///
    /// Items that break the record invariants are returned separately so the
    /// caller can report them; they never reach the working set. Ids stay
    /// unique: the first item with a given id wins.
    pub fn from_items(items: Vec<Item>) -> (Vec<Record>, Vec<RecordError>) {
        let mut records = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            match Record::try_from(item) {
                Ok(record) if !seen.insert(record.id) => {
                    rejected.push(RecordError::DuplicateId { id: record.id });
                }
                Ok(record) => records.push(record),
                Err(err) => rejected.push(err),
            }
        }
        (records, rejected)
    }
}

impl TryFrom<Item> for Record {
    type Error = RecordError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let amount = Amount::from_major(item.amount)
            .filter(|amount| amount.is_positive())
            .ok_or(RecordError::InvalidAmount {
                id: item.id,
                amount: item.amount,
            })?;

        Ok(Self {
            id: item.id,
            kind: item.kind.into(),
            amount,
            timestamp: item.date,
            category: non_empty(item.category),
            note: non_empty(item.description),
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
