//! Record predicates of the filter bar.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{Kind, Record};

/// Criteria combined with logical AND. Absent fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub kind: Option<Kind>,
    /// Case-insensitive substring of the record category.
    pub category: Option<String>,
    /// Inclusive, from the start of this day.
    pub from: Option<NaiveDate>,
    /// Inclusive, up to the end of this day.
    pub to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.category_needle().is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Day bounds are evaluated in `tz`, so a record belongs to the calendar
    /// day the user saw it on.
    pub fn matches(&self, record: &Record, tz: Tz) -> bool {
        if let Some(kind) = self.kind
            && record.kind != kind
        {
            return false;
        }

        if let Some(needle) = self.category_needle() {
            let Some(category) = record.category.as_deref() else {
                return false;
            };
            if !category.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let day = record.timestamp.with_timezone(&tz).date_naive();
            if self.from.is_some_and(|from| day < from) {
                return false;
            }
            if self.to.is_some_and(|to| day > to) {
                return false;
            }
        }

        true
    }

    fn category_needle(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }
}

/// Returns the records matching `criteria`, in input order.
///
/// A range with `from` after `to` matches nothing.
pub fn filter(records: &[Record], criteria: &FilterCriteria, tz: Tz) -> Vec<Record> {
    records
        .iter()
        .filter(|record| criteria.matches(record, tz))
        .cloned()
        .collect()
}

/// Relative period presets of the dashboard filter bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    All,
    Today,
    Week,
    Month,
    Quarter,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Today,
            Self::Today => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Quarter,
            Self::Quarter => Self::All,
        }
    }

    /// First day covered by the preset, `None` for [`Period::All`].
    pub fn start(self, now: DateTime<Utc>, tz: Tz) -> Option<NaiveDate> {
        let today = now.with_timezone(&tz).date_naive();
        match self {
            Self::All => None,
            Self::Today => Some(today),
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::Quarter => today.checked_sub_months(Months::new(3)),
        }
    }

    /// Criteria with the preset applied as lower bound and no upper bound.
    pub fn apply(self, criteria: &FilterCriteria, now: DateTime<Utc>, tz: Tz) -> FilterCriteria {
        FilterCriteria {
            from: self.start(now, tz),
            to: None,
            ..criteria.clone()
        }
    }
}
