use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One organization's participation record. Built by `core::roster` from a raw
/// roster entry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub country: String,
    pub email: String,
    pub available_dates: BTreeSet<NaiveDate>,
}

impl Partner {
    pub fn new(
        country: impl Into<String>,
        email: impl Into<String>,
        available_dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            country: country.into(),
            email: email.into(),
            available_dates: available_dates.into_iter().collect(),
        }
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.available_dates.contains(&date)
    }
}

/// Wire shape of the partner roster document. Entries stay untyped until
/// validation so a single bad record can be reported (or skipped) by index.
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerEnvelope {
    pub partners: Vec<serde_json::Value>,
}

/// Outcome for one country.
///
/// Field order matches the consumer's expected byte layout:
/// `attendeeCount, attendees, name, startDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryResult {
    attendee_count: usize,
    attendees: Vec<String>,
    name: String,
    start_date: Option<NaiveDate>,
}

impl CountryResult {
    pub fn new(name: impl Into<String>, start_date: Option<NaiveDate>, attendees: Vec<String>) -> Self {
        Self {
            attendee_count: attendees.len(),
            attendees,
            name: name.into(),
            start_date,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn attendees(&self) -> &[String] {
        &self.attendees
    }

    pub fn attendee_count(&self) -> usize {
        self.attendee_count
    }
}

/// Per-country results ordered by country name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    countries: Vec<CountryResult>,
}

impl Report {
    /// Callers must pass results already sorted by name with unique names;
    /// `core::report` is the only producer.
    pub(crate) fn from_sorted(countries: Vec<CountryResult>) -> Self {
        Self { countries }
    }

    pub fn countries(&self) -> &[CountryResult] {
        &self.countries
    }

    pub fn country(&self, name: &str) -> Option<&CountryResult> {
        self.countries
            .binary_search_by(|result| result.name().cmp(name))
            .ok()
            .map(|idx| &self.countries[idx])
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// What to do with a roster entry that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Abort the run on the first malformed record.
    #[default]
    Strict,
    /// Log the record at warn level and leave it out.
    Skip,
}

/// Acknowledgement from a result sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub destination: String,
    pub status: Option<u16>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: Report,
    pub receipt: SubmitReceipt,
}
