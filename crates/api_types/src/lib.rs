use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treats a JSON `null` (or a missing key, together with `#[serde(default)]`)
/// as the type's default value.
///
/// The backend encodes empty collections as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod item {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ItemKind {
        Income,
        Expense,
    }

    impl ItemKind {
        /// Returns the canonical wire name.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    /// One ledger entry as returned by `GET /items` and `GET /items/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Item {
        pub id: i64,
        #[serde(rename = "type")]
        pub kind: ItemKind,
        /// Major units (e.g. `1250.5` roubles).
        pub amount: f64,
        /// RFC3339 timestamp.
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Request body of `POST /items` and `PUT /items/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ItemPayload {
        #[serde(rename = "type")]
        pub kind: ItemKind,
        pub amount: f64,
        pub date: DateTime<Utc>,
        pub category: Option<String>,
        pub description: Option<String>,
    }

    /// Response body of `GET /items`.
    ///
    /// `total`, `page` and `limit` are only present when the server paginates.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemsResponse {
        #[serde(default, deserialize_with = "null_as_default")]
        pub items: Vec<Item>,
        #[serde(default)]
        pub total: Option<i64>,
        #[serde(default)]
        pub page: Option<u32>,
        #[serde(default)]
        pub limit: Option<u32>,
    }

    /// Query of `GET /items` when server-side paging is used.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub struct ItemsQuery {
        pub page: u32,
        pub limit: u32,
    }

    /// Response body of `POST /items`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemCreated {
        pub id: i64,
    }
}

pub mod analytics {
    use super::*;

    use crate::item::Item;

    /// Aggregates computed by the server over one set of items.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Aggregate {
        pub sum: f64,
        pub avg: f64,
        pub count: i64,
        pub median: f64,
        pub percent90: f64,
    }

    /// Response body of `GET /analytics`.
    ///
    /// Older servers answer with the flat aggregate only, newer ones split it
    /// into `income` and `expense`. Both shapes decode into this type.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Analytics {
        #[serde(default)]
        pub sum: f64,
        #[serde(default)]
        pub avg: f64,
        #[serde(default)]
        pub count: i64,
        #[serde(default)]
        pub median: f64,
        #[serde(default)]
        pub percent90: f64,
        #[serde(default)]
        pub income: Option<Aggregate>,
        #[serde(default)]
        pub expense: Option<Aggregate>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub details: Vec<Item>,
    }

    impl Analytics {
        /// The flat aggregate of the whole period.
        pub fn totals(&self) -> Aggregate {
            Aggregate {
                sum: self.sum,
                avg: self.avg,
                count: self.count,
                median: self.median,
                percent90: self.percent90,
            }
        }
    }

    /// Query of `GET /analytics` and `GET /items/export`.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub struct PeriodQuery {
        /// RFC3339, inclusive.
        pub from: DateTime<Utc>,
        /// RFC3339, inclusive.
        pub to: DateTime<Utc>,
    }
}

#[cfg(test)]
mod tests {
    use super::analytics::Analytics;
    use super::item::{ItemKind, ItemsResponse};

    #[test]
    fn items_response_accepts_null_items() {
        let res: ItemsResponse = serde_json::from_str(r#"{"items":null,"total":0}"#).unwrap();
        assert!(res.items.is_empty());
        assert_eq!(res.total, Some(0));
    }

    #[test]
    fn item_decodes_backend_shape() {
        let body = r#"{"items":[{"id":7,"type":"expense","amount":120.5,
            "date":"2024-03-01T09:30:00+03:00","category":"Food","description":"",
            "created_at":"2024-03-01T06:31:00Z","updated_at":"2024-03-01T06:31:00Z"}]}"#;
        let res: ItemsResponse = serde_json::from_str(body).unwrap();
        let item = &res.items[0];
        assert_eq!(item.id, 7);
        assert_eq!(item.kind, ItemKind::Expense);
        assert_eq!(item.date.to_rfc3339(), "2024-03-01T06:30:00+00:00");
        assert_eq!(item.category.as_deref(), Some("Food"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let body = r#"{"items":[{"id":1,"type":"refund","amount":1,"date":"2024-03-01T00:00:00Z"}]}"#;
        assert!(serde_json::from_str::<ItemsResponse>(body).is_err());
    }

    #[test]
    fn analytics_accepts_both_shapes() {
        let flat: Analytics =
            serde_json::from_str(r#"{"sum":10,"avg":5,"count":2,"median":5,"percent90":9}"#)
                .unwrap();
        assert_eq!(flat.totals().count, 2);
        assert!(flat.income.is_none());

        let split: Analytics = serde_json::from_str(
            r#"{"income":{"sum":100,"avg":100,"count":1,"median":100,"percent90":100},
                "expense":{"sum":0,"avg":0,"count":0,"median":0,"percent90":0},
                "details":null}"#,
        )
        .unwrap();
        assert_eq!(split.income.map(|a| a.sum), Some(100.0));
        assert!(split.details.is_empty());
    }
}
