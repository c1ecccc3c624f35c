use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// How often a company pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Monthly, Frequency::Quarterly, Frequency::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid enum value. Expected 'monthly' | 'quarterly' | 'annual', received '{}'",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearAmountParseError {
    #[error("expected \"YEAR:AMOUNT\", found '{0}'")]
    MissingSeparator(String),
    #[error("invalid year '{0}'")]
    InvalidYear(String),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

/// One year-wise history entry.
///
/// On the wire this is the string `"<year>:<amount>"`; parsing splits on the
/// first colon so the year is everything before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearAmount {
    pub year: i32,
    pub amount: Decimal,
}

impl YearAmount {
    pub fn new(year: i32, amount: Decimal) -> Self {
        Self { year, amount }
    }
}

impl fmt::Display for YearAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.year, self.amount)
    }
}

impl FromStr for YearAmount {
    type Err = YearAmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, amount) = s
            .split_once(':')
            .ok_or_else(|| YearAmountParseError::MissingSeparator(s.to_string()))?;

        let year = year
            .parse::<i32>()
            .map_err(|_| YearAmountParseError::InvalidYear(year.to_string()))?;
        let amount = Decimal::from_str(amount)
            .map_err(|_| YearAmountParseError::InvalidAmount(amount.to_string()))?;

        Ok(Self { year, amount })
    }
}

impl Serialize for YearAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Replace the entry for `entry.year` (if any) and append `entry` at the end.
///
/// Surviving entries keep their relative order; nothing is re-sorted.
pub fn replace_year(entries: &[YearAmount], entry: YearAmount) -> Vec<YearAmount> {
    entries
        .iter()
        .filter(|existing| existing.year != entry.year)
        .copied()
        .chain(std::iter::once(entry))
        .collect()
}

/// A stored dividend record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendRecord {
    pub id: u32,
    pub company_name: String,
    pub ticker: String,
    pub sector: String,
    pub established: i32,
    pub quoted_date: i32,
    pub fy_ending: String,
    pub dividend_amount: Decimal,
    pub frequency: Frequency,
    pub year_wise_data: Vec<YearAmount>,
    pub last_updated: DateTime<Utc>,
}

/// Every client-settable field of a record; `id` and `lastUpdated` are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDividend {
    pub company_name: String,
    pub ticker: String,
    pub sector: String,
    pub established: i32,
    pub quoted_date: i32,
    pub fy_ending: String,
    pub dividend_amount: Decimal,
    pub frequency: Frequency,
    pub year_wise_data: Vec<YearAmount>,
}

/// Partial update; `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_date: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fy_ending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_wise_data: Option<Vec<YearAmount>>,
}

impl DividendRecord {
    pub fn from_new(id: u32, new: NewDividend, now: DateTime<Utc>) -> Self {
        Self {
            id,
            company_name: new.company_name,
            ticker: new.ticker,
            sector: new.sector,
            established: new.established,
            quoted_date: new.quoted_date,
            fy_ending: new.fy_ending,
            dividend_amount: new.dividend_amount,
            frequency: new.frequency,
            year_wise_data: new.year_wise_data,
            last_updated: now,
        }
    }

    /// Shallow-merge `patch` over this record and stamp `now`
    pub fn apply(&mut self, patch: DividendPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.company_name {
            self.company_name = v;
        }
        if let Some(v) = patch.ticker {
            self.ticker = v;
        }
        if let Some(v) = patch.sector {
            self.sector = v;
        }
        if let Some(v) = patch.established {
            self.established = v;
        }
        if let Some(v) = patch.quoted_date {
            self.quoted_date = v;
        }
        if let Some(v) = patch.fy_ending {
            self.fy_ending = v;
        }
        if let Some(v) = patch.dividend_amount {
            self.dividend_amount = v;
        }
        if let Some(v) = patch.frequency {
            self.frequency = v;
        }
        if let Some(v) = patch.year_wise_data {
            self.year_wise_data = v;
        }
        self.last_updated = now;
    }
}

impl DividendPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patch touching only the year-wise history
    pub fn year_wise_data(entries: Vec<YearAmount>) -> Self {
        Self {
            year_wise_data: Some(entries),
            ..Default::default()
        }
    }
}
