//! Per-country best start date selection.
//!
//! A partner votes for day `d` once for every pair of consecutive days
//! `(d, d + 1)` in its availability. The date with the most votes wins, with
//! ties going to the earliest date. Attendees are then every partner of the
//! country that is available on the day after the winning date, whether or not
//! it voted for it.

use crate::domain::model::{CountryResult, Partner};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Candidate start date -> number of votes.
pub type VoteTally = BTreeMap<NaiveDate, usize>;

/// Start days of every consecutive-day pair in an ascending date set.
fn consecutive_starts(dates: &BTreeSet<NaiveDate>) -> impl Iterator<Item = NaiveDate> + '_ {
    dates
        .iter()
        .zip(dates.iter().skip(1))
        .filter(|(day, next)| day.succ_opt() == Some(**next))
        .map(|(day, _)| *day)
}

pub fn tally_votes<'a>(partners: impl IntoIterator<Item = &'a Partner>) -> VoteTally {
    partners
        .into_iter()
        .flat_map(|partner| consecutive_starts(&partner.available_dates))
        .fold(VoteTally::new(), |mut tally, start| {
            *tally.entry(start).or_insert(0) += 1;
            tally
        })
}

/// Most-voted date, earliest first on ties. `None` when nobody has two
/// consecutive days.
pub fn select_winner(tally: &VoteTally) -> Option<NaiveDate> {
    // Ascending iteration plus a strict comparison keeps the earliest date on ties.
    tally
        .iter()
        .fold(None, |best: Option<(NaiveDate, usize)>, (&date, &votes)| match best {
            Some((_, top)) if top >= votes => best,
            _ => Some((date, votes)),
        })
        .map(|(date, _)| date)
}

pub fn compute_best_start(country: &str, partners: &[Partner]) -> CountryResult {
    let country_partners: Vec<&Partner> = partners
        .iter()
        .filter(|partner| partner.country == country)
        .collect();

    let tally = tally_votes(country_partners.iter().copied());
    let start_date = select_winner(&tally);

    let attendees = start_date
        .and_then(|start| start.succ_opt())
        .map(|next_day| {
            country_partners
                .iter()
                .filter(|partner| partner.is_available(next_day))
                .map(|partner| partner.email.clone())
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(
        country,
        partners = country_partners.len(),
        candidates = tally.len(),
        start_date = ?start_date,
        "Selected start date"
    );

    CountryResult::new(country, start_date, attendees)
}
