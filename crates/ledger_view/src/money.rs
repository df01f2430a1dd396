use std::{fmt, str::FromStr};

use crate::DraftError;

/// Money amount held as **integer kopecks**.
///
/// The backend speaks floating point roubles; values are converted once, at
/// the wire boundary, so sorting and summing never see float drift.
///
/// # Examples
///
/// ```rust
/// use ledger_view::Amount;
///
/// let amount: Amount = "1234,5".parse().unwrap();
/// assert_eq!(amount.minor(), 123_450);
/// assert_eq!(amount.to_string(), "1 234,50 ₽");
/// assert_eq!(amount.plain(), "1234.50");
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Addition clamped to the representable range; totals over server data
    /// use this.
    #[must_use]
    pub const fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    #[must_use]
    pub const fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }

    /// Converts a major-unit float from the wire, rounding to the kopeck.
    ///
    /// Returns `None` for NaN, infinities and values outside `i64` kopecks.
    #[must_use]
    pub fn from_major(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let minor = (value * 100.0).round();
        if minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return None;
        }
        Some(Self(minor as i64))
    }

    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Two fixed decimals with a dot, no grouping: `1234.50`.
    #[must_use]
    pub fn plain(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    /// Shortest decimal form, the way the backend's JSON prints the number:
    /// `1500`, `12.5`, `12.34`. Used for free-text search.
    #[must_use]
    pub fn compact(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (major, minor) = (abs / 100, abs % 100);
        match minor {
            0 => format!("{sign}{major}"),
            m if m % 10 == 0 => format!("{sign}{major}.{}", m / 10),
            m => format!("{sign}{major}.{m:02}"),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let digits = (abs / 100).to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}{grouped},{:02} ₽", abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = DraftError;

    /// Parses user input into kopecks.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading sign and
    /// spaces between digit groups (`1 000,50`). At most 2 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DraftError::InvalidAmount(s.trim().to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DraftError::MissingAmount);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
        if rest.is_empty() {
            return Err(invalid());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let major: i64 = major_str.parse().map_err(|_| invalid())?;

        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(frac) if !frac.chars().all(|c| c.is_ascii_digit()) => return Err(invalid()),
            Some(frac) if frac.len() == 1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            Some(frac) if frac.len() == 2 => frac.parse::<i64>().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(invalid)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}
