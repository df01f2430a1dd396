//! Form input → validated payloads.
//!
//! Everything typed by the user is checked here, before it can reach the
//! store or the working set.

use api_types::item::ItemPayload;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{Amount, DraftError, Kind, Record};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Display format of date-time fields, accepted back by [`parse_datetime`].
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Raw field values of the create/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub kind: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub note: String,
}

impl RecordDraft {
    /// Empty form with the kind preset to expense and the date set to `now`.
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            kind: Kind::Expense.code().to_string(),
            date: now.with_timezone(&tz).format(DATETIME_INPUT_FORMAT).to_string(),
            ..Default::default()
        }
    }

    /// Form prefilled with `record`, for editing.
    pub fn from_record(record: &Record, tz: Tz) -> Self {
        Self {
            kind: record.kind.code().to_string(),
            amount: record.amount.plain(),
            date: record
                .timestamp
                .with_timezone(&tz)
                .format(DATETIME_INPUT_FORMAT)
                .to_string(),
            category: record.category.clone().unwrap_or_default(),
            note: record.note.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self, tz: Tz) -> Result<ItemPayload, DraftError> {
        let raw_kind = self.kind.trim();
        if raw_kind.is_empty() {
            return Err(DraftError::MissingKind);
        }
        let kind =
            Kind::parse(raw_kind).ok_or_else(|| DraftError::UnknownKind(raw_kind.to_string()))?;

        let amount: Amount = self.amount.parse()?;
        if !amount.is_positive() {
            return Err(DraftError::NonPositiveAmount);
        }

        let date = parse_datetime(&self.date, tz, false)?;

        Ok(ItemPayload {
            kind: kind.into(),
            amount: amount.to_major(),
            date,
            category: trimmed(&self.category),
            description: trimmed(&self.note),
        })
    }
}

/// Inclusive period of the analytics and report forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Parses both ends; a bare date means the start of the day for `from`
    /// and the end of the day for `to`.
    pub fn parse(from: &str, to: &str, tz: Tz) -> Result<Self, DraftError> {
        let from = parse_datetime(from, tz, false)?;
        let to = parse_datetime(to, tz, true)?;
        if from > to {
            return Err(DraftError::InvalidRange);
        }
        Ok(Self { from, to })
    }

    /// The whole local day of `now`.
    pub fn today(now: DateTime<Utc>, tz: Tz) -> Self {
        let day = now.with_timezone(&tz).date_naive();
        Self {
            from: local_to_utc(day.and_time(NaiveTime::MIN), tz).unwrap_or(now),
            to: local_to_utc(day.and_time(end_of_day()), tz).unwrap_or(now),
        }
    }

    pub fn local_days(&self, tz: Tz) -> (NaiveDate, NaiveDate) {
        (
            self.from.with_timezone(&tz).date_naive(),
            self.to.with_timezone(&tz).date_naive(),
        )
    }
}

/// Parses a local date-time field into UTC.
///
/// Accepts `YYYY-MM-DD HH:MM`, the `T`-separated variant and optional
/// seconds. A bare `YYYY-MM-DD` is midnight, or 23:59:59 when `end_of_day`.
pub fn parse_datetime(input: &str, tz: Tz, end_of_day: bool) -> Result<DateTime<Utc>, DraftError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DraftError::MissingDate);
    }
    let invalid = || DraftError::InvalidDate(input.to_string());

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").ok().map(|day| {
                if end_of_day {
                    day.and_time(self::end_of_day())
                } else {
                    day.and_time(NaiveTime::MIN)
                }
            })
        })
        .ok_or_else(invalid)?;

    local_to_utc(naive, tz).ok_or_else(invalid)
}

/// Parses an optional day field of the filter bar; blank means no bound.
pub fn parse_day(input: &str) -> Result<Option<NaiveDate>, DraftError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DraftError::InvalidDate(input.to_string()))
}

fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    // Inside a DST gap there is no such local time; the earliest mapping
    // covers the fold.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use api_types::item::ItemKind;

    use super::*;

    fn draft(kind: &str, amount: &str, date: &str) -> RecordDraft {
        RecordDraft {
            kind: kind.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
            category: " Food ".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn valid_draft_becomes_payload() {
        let payload = draft("expense", "120,50", "2024-03-01 09:30")
            .validate(chrono_tz::Europe::Moscow)
            .unwrap();
        assert_eq!(payload.kind, ItemKind::Expense);
        assert_eq!(payload.amount, 120.5);
        assert_eq!(payload.date.to_rfc3339(), "2024-03-01T06:30:00+00:00");
        assert_eq!(payload.category.as_deref(), Some("Food"));
        assert_eq!(payload.description, None);
    }

    #[test]
    fn rejects_bad_amounts() {
        let tz = chrono_tz::UTC;
        assert_eq!(
            draft("income", "", "2024-03-01").validate(tz),
            Err(DraftError::MissingAmount)
        );
        assert_eq!(
            draft("income", "0", "2024-03-01").validate(tz),
            Err(DraftError::NonPositiveAmount)
        );
        assert_eq!(
            draft("income", "-5", "2024-03-01").validate(tz),
            Err(DraftError::NonPositiveAmount)
        );
        assert!(matches!(
            draft("income", "ten", "2024-03-01").validate(tz),
            Err(DraftError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let tz = chrono_tz::UTC;
        assert_eq!(draft("", "1", "2024-03-01").validate(tz), Err(DraftError::MissingKind));
        assert_eq!(
            draft("gift", "1", "2024-03-01").validate(tz),
            Err(DraftError::UnknownKind("gift".to_string()))
        );
        assert_eq!(draft("income", "1", " ").validate(tz), Err(DraftError::MissingDate));
        assert!(matches!(
            draft("income", "1", "01/03/2024").validate(tz),
            Err(DraftError::InvalidDate(_))
        ));
    }

    #[test]
    fn edit_form_round_trips_a_record() {
        let tz = chrono_tz::Europe::Moscow;
        let record = Record {
            id: 9,
            kind: Kind::Income,
            amount: Amount::new(250_000),
            timestamp: "2024-03-01T06:30:00Z".parse().unwrap(),
            category: Some("Salary".to_string()),
            note: Some("March".to_string()),
            created_at: None,
            updated_at: None,
        };
        let form = RecordDraft::from_record(&record, tz);
        assert_eq!(form.date, "2024-03-01 09:30");
        assert_eq!(form.amount, "2500.00");

        let payload = form.validate(tz).unwrap();
        assert_eq!(payload.date, record.timestamp);
        assert_eq!(payload.amount, 2500.0);
        assert_eq!(payload.description.as_deref(), Some("March"));
    }

    #[test]
    fn range_expands_bare_dates_to_whole_days() {
        let range = DateRange::parse("2024-03-01", "2024-03-31", chrono_tz::UTC).unwrap();
        assert_eq!(range.from.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(range.to.to_rfc3339(), "2024-03-31T23:59:59+00:00");
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert_eq!(
            DateRange::parse("2024-03-02 10:00", "2024-03-01 10:00", chrono_tz::UTC),
            Err(DraftError::InvalidRange)
        );
    }

    #[test]
    fn blank_day_is_no_bound() {
        assert_eq!(parse_day("  "), Ok(None));
        assert_eq!(parse_day("2024-02-29"), Ok(NaiveDate::from_ymd_opt(2024, 2, 29)));
        assert!(parse_day("2024-02-30").is_err());
    }
}
