use crate::core::aggregator::compute_best_start;
use crate::domain::model::{CountryResult, Partner, Report};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Distinct countries in byte-wise ascending order.
pub fn distinct_countries(partners: &[Partner]) -> Vec<String> {
    partners
        .iter()
        .map(|partner| partner.country.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn build_report(partners: &[Partner]) -> Report {
    let countries = distinct_countries(partners)
        .iter()
        .map(|country| compute_best_start(country, partners))
        .collect();

    Report::from_sorted(countries)
}

/// Same output as [`build_report`], with one blocking task per country.
pub async fn build_report_parallel(partners: Arc<[Partner]>) -> Result<Report> {
    let countries = distinct_countries(&partners);
    let mut tasks = JoinSet::new();

    for (position, country) in countries.into_iter().enumerate() {
        let partners = Arc::clone(&partners);
        tasks.spawn_blocking(move || (position, compute_best_start(&country, &partners)));
    }

    let mut results: Vec<(usize, CountryResult)> = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let finished = joined.map_err(|e| EtlError::ProcessingError {
            message: format!("Country aggregation task failed: {}", e),
        })?;
        results.push(finished);
    }

    // Completion order is arbitrary.
    results.sort_by_key(|(position, _)| *position);

    Ok(Report::from_sorted(
        results.into_iter().map(|(_, result)| result).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn partner(country: &str, email: &str, dates: &[&str]) -> Partner {
        Partner::new(
            country,
            email,
            dates
                .iter()
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        )
    }

    fn roster() -> Vec<Partner> {
        vec![
            partner("United States", "a@us", &["2024-01-01", "2024-01-02"]),
            partner("Ireland", "a@ie", &["2024-04-28", "2024-04-29", "2024-05-01"]),
            partner("Spain", "a@es", &["2024-04-27"]),
            partner("United States", "b@us", &["2024-01-02", "2024-01-03"]),
            partner("Ireland", "b@ie", &["2024-04-29", "2024-04-30"]),
            partner("Mexico", "a@mx", &["2024-06-01", "2024-06-02"]),
            partner("Ireland", "c@ie", &["2024-04-29"]),
        ]
    }

    #[test]
    fn test_report_is_sorted_by_country_name() {
        let report = build_report(&roster());

        let names: Vec<&str> = report.countries().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Ireland", "Mexico", "Spain", "United States"]);
    }

    #[test]
    fn test_ordering_is_byte_wise() {
        let partners = vec![
            partner("bolivia", "a@bo", &[]),
            partner("Zambia", "a@zm", &[]),
            partner("Austria", "a@at", &[]),
        ];

        assert_eq!(
            distinct_countries(&partners),
            vec!["Austria", "Zambia", "bolivia"]
        );
    }

    #[test]
    fn test_one_result_per_country_in_roster() {
        let report = build_report(&roster());

        assert_eq!(report.len(), 4);
        assert!(report.country("France").is_none());
        for result in report.countries() {
            assert_eq!(result.attendee_count(), result.attendees().len());
        }
    }

    #[test]
    fn test_report_values() {
        let report = build_report(&roster());

        let ireland = report.country("Ireland").unwrap();
        assert_eq!(
            ireland.start_date(),
            NaiveDate::from_ymd_opt(2024, 4, 28)
        );
        assert_eq!(ireland.attendees(), ["a@ie", "b@ie", "c@ie"]);

        let spain = report.country("Spain").unwrap();
        assert_eq!(spain.start_date(), None);
        assert_eq!(spain.attendee_count(), 0);
    }

    #[test]
    fn test_empty_roster_gives_empty_report() {
        let report = build_report(&[]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_build_report_is_deterministic() {
        let partners = roster();
        assert_eq!(build_report(&partners), build_report(&partners));
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let partners = roster();
        let sequential = build_report(&partners);

        let parallel = build_report_parallel(Arc::from(partners)).await.unwrap();

        assert_eq!(parallel, sequential);
    }
}
