//! Serde helpers for the loosely typed values the backend emits.
//!
//! Decimal fields arrive as strings (`"1500.00"`), choice fields such as
//! `grade` may arrive as numbers, and dates use `YYYY-MM-DD`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serializer};
use time::macros::format_description;
use time::Date;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_amount<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) if s.trim().is_empty() => Ok(0.0),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid amount {s:?}"))),
        }
    }
}

/// Amount given as a number, a decimal string or null (read as 0).
pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Option::<NumberOrString>::deserialize(d)? {
        Some(value) => value.into_amount(),
        None => Ok(0.0),
    }
}

pub fn optional_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrString>::deserialize(d)?
        .map(NumberOrString::into_amount)
        .transpose()
}

pub fn amount_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, f64>, D::Error> {
    BTreeMap::<String, NumberOrString>::deserialize(d)?
        .into_iter()
        .map(|(k, v)| v.into_amount().map(|n| (k, n)))
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrString {
    Integer(i64),
    Text(String),
}

/// Choice value that may come as `5` or `"5"`; kept as a string.
pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match IntegerOrString::deserialize(d)? {
        IntegerOrString::Integer(n) => n.to_string(),
        IntegerOrString::Text(s) => s,
    })
}

pub fn optional_string_or_number<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<IntegerOrString>::deserialize(d)?.map(|value| match value {
            IntegerOrString::Integer(n) => n.to_string(),
            IntegerOrString::Text(s) => s,
        }),
    )
}

pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    let raw = raw.trim();
    // datetimes are cut to their date part
    let day = raw.get(..10).unwrap_or(raw);
    Date::parse(day, format_description!("[year]-[month]-[day]"))
}

pub fn iso_date_string(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub mod optional_date {
    use serde::de::Error as _;

    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&iso_date_string(*date)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_date(&raw)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid date {raw:?}: {e}"))),
            None => Ok(None),
        }
    }
}
