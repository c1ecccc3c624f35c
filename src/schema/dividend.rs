use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use super::{as_object, kind, non_empty_string, string, FieldErrors, ValidationError};
use crate::storage::models::{DividendPatch, Frequency, NewDividend, YearAmount};

/// Earliest accepted year for `established`, `quotedDate` and year-wise entries
pub const MIN_YEAR: i32 = 1800;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

/// Full schema: every client-settable field must be present and valid
pub fn validate_new_dividend(body: &Value) -> Result<NewDividend, ValidationError> {
    let patch = parse_fields(body, true)?;

    let DividendPatch {
        company_name: Some(company_name),
        ticker: Some(ticker),
        sector: Some(sector),
        established: Some(established),
        quoted_date: Some(quoted_date),
        fy_ending: Some(fy_ending),
        dividend_amount: Some(dividend_amount),
        frequency: Some(frequency),
        year_wise_data: Some(year_wise_data),
    } = patch
    else {
        return Err(ValidationError::body("Invalid dividend record"));
    };

    Ok(NewDividend {
        company_name,
        ticker,
        sector,
        established,
        quoted_date,
        fy_ending,
        dividend_amount,
        frequency,
        year_wise_data,
    })
}

/// Partial schema: absent fields stay unset, present ones follow the full rules
pub fn validate_dividend_patch(body: &Value) -> Result<DividendPatch, ValidationError> {
    parse_fields(body, false)
}

/// Body of the append-year operation: `{ "year": int, "amount": string }`
pub fn validate_year_entry(body: &Value) -> Result<YearAmount, ValidationError> {
    let object = as_object(body)?;
    let mut errors = FieldErrors::default();

    let year = errors.field(object, "year", true, year);
    let amount = errors.field(object, "amount", true, decimal);
    errors.finish("Invalid year entry")?;

    match (year, amount) {
        (Some(year), Some(amount)) => Ok(YearAmount::new(year, amount)),
        _ => Err(ValidationError::body("Invalid year entry")),
    }
}

fn parse_fields(body: &Value, required: bool) -> Result<DividendPatch, ValidationError> {
    let object = as_object(body)?;
    let mut errors = FieldErrors::default();

    let patch = DividendPatch {
        company_name: errors.field(object, "companyName", required, non_empty_string),
        ticker: errors.field(object, "ticker", required, non_empty_string),
        sector: errors.field(object, "sector", required, string),
        established: errors.field(object, "established", required, year),
        quoted_date: errors.field(object, "quotedDate", required, year),
        fy_ending: errors.field(object, "fyEnding", required, month),
        dividend_amount: errors.field(object, "dividendAmount", required, decimal),
        frequency: errors.field(object, "frequency", required, frequency),
        year_wise_data: errors.field(object, "yearWiseData", required, year_wise_data),
    };

    errors.finish("Invalid dividend record")?;
    Ok(patch)
}

fn year(value: &Value) -> Result<i32, String> {
    let Value::Number(number) = value else {
        return Err(format!("Expected number, received {}", kind(value)));
    };
    match (number.as_i64(), number.as_u64()) {
        (Some(year), _) => check_year(year),
        (None, Some(year)) => Err(format!("Year {} is out of range", year)),
        (None, None) => Err("Expected integer, received float".to_string()),
    }
}

fn check_year(year: i64) -> Result<i32, String> {
    if year < i64::from(MIN_YEAR) {
        return Err(format!("Number must be greater than or equal to {}", MIN_YEAR));
    }
    i32::try_from(year).map_err(|_| format!("Year {} is out of range", year))
}

fn month(value: &Value) -> Result<String, String> {
    let raw = string(value)?;
    MONTHS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(raw.trim()))
        .map(|name| name.to_string())
        .ok_or_else(|| format!("Expected a month name, received '{}'", raw))
}

/// Decimal amounts travel as strings; plain JSON numbers are accepted too
fn decimal(value: &Value) -> Result<Decimal, String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => return Err(format!("Expected decimal string, received {}", kind(other))),
    };
    Decimal::from_str(&raw).map_err(|_| format!("Invalid decimal amount '{}'", raw))
}

fn frequency(value: &Value) -> Result<Frequency, String> {
    string(value)?.parse()
}

fn year_wise_data(value: &Value) -> Result<Vec<YearAmount>, String> {
    let Value::Array(items) = value else {
        return Err(format!("Expected array, received {}", kind(value)));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let raw = string(item).map_err(|e| format!("Entry {}: {}", index, e))?;
            let entry: YearAmount = raw
                .parse()
                .map_err(|e| format!("Entry {}: {}", index, e))?;
            check_year(i64::from(entry.year)).map_err(|e| format!("Entry {}: {}", index, e))?;
            Ok(entry)
        })
        .collect()
}
