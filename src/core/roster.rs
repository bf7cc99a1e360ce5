use crate::domain::model::{Partner, RecordPolicy};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use serde::Deserialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Roster entry as it appears on the wire. Extra fields such as `firstName`
/// are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartnerRecord {
    country: Option<String>,
    email: Option<String>,
    available_dates: Option<Vec<String>>,
}

fn malformed(index: usize, reason: impl Into<String>) -> EtlError {
    EtlError::MalformedRecord {
        index,
        reason: reason.into(),
    }
}

pub fn parse_date(value: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

/// Validate a single roster entry. `index` is its position in the roster and
/// is only used for error reporting.
pub fn parse_partner(index: usize, record: serde_json::Value) -> Result<Partner> {
    let record: PartnerRecord =
        serde_json::from_value(record).map_err(|e| malformed(index, e.to_string()))?;

    let country = record
        .country
        .filter(|country| !country.is_empty())
        .ok_or_else(|| malformed(index, "missing or empty field `country`"))?;
    let email = record
        .email
        .ok_or_else(|| malformed(index, "missing field `email`"))?;
    let raw_dates = record
        .available_dates
        .ok_or_else(|| malformed(index, "missing field `availableDates`"))?;

    let available_dates = raw_dates
        .iter()
        .map(|raw| {
            parse_date(raw).map_err(|e| {
                malformed(index, format!("invalid date '{}' for {}: {}", raw, email, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Partner::new(country, email, available_dates))
}

/// Turn raw roster entries into partners, keeping roster order.
pub fn parse_partners(records: Vec<serde_json::Value>, policy: RecordPolicy) -> Result<Vec<Partner>> {
    let total = records.len();
    let mut partners = Vec::with_capacity(total);

    for (index, record) in records.into_iter().enumerate() {
        match parse_partner(index, record) {
            Ok(partner) => partners.push(partner),
            Err(e) if policy == RecordPolicy::Skip => {
                tracing::warn!("⚠️ Skipping partner record: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    if partners.len() < total {
        tracing::warn!(
            "Dropped {} of {} partner records",
            total - partners.len(),
            total
        );
    }

    Ok(partners)
}
