//! Read-only statistics over a loaded [`Dataset`].
use crate::core::dataset::{Dataset, Metric, Record};
use crate::core::rounding::round2;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("Country '{0}' not found in dataset.")]
    CountryNotFound(String),
}

/// Aggregate metrics for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub avg_house_price_index: f64,
    pub avg_rent_index: Option<f64>,
    pub max_inflation: Option<f64>,
    pub latest_gdp_growth: Option<f64>,
    pub data_years: String,
}

/// One line of the growth ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "GDP Growth (%)")]
    pub gdp_growth: Option<f64>,
    #[serde(rename = "House Price Index")]
    pub house_price_index: f64,
    #[serde(rename = "Inflation Rate (%)")]
    pub inflation_rate: Option<f64>,
}

impl From<&Record> for GrowthRow {
    fn from(record: &Record) -> Self {
        GrowthRow {
            country: record.country.clone(),
            gdp_growth: record.gdp_growth,
            house_price_index: record.house_price_index,
            inflation_rate: record.inflation_rate,
        }
    }
}

/// Mean of the non-NaN values, `None` when there are none.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.filter(|v| !v.is_nan()).fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Computes the summary for `country` (exact, case-sensitive match).
///
/// `latest_gdp_growth` is taken from the last matching row in table order.
/// It is only the latest year's value when the dataset is sorted by year.
pub fn country_stats(dataset: &Dataset, country: &str) -> Result<CountrySummary, StatsError> {
    let rows: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|r| r.country == country)
        .collect();

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(StatsError::CountryNotFound(country.to_string()));
    };
    debug!("Summarizing {} rows for {}", rows.len(), country);

    let avg_house_price_index = mean(rows.iter().map(|r| r.house_price_index))
        .map(round2)
        .unwrap_or_default();
    let avg_rent_index = mean(rows.iter().filter_map(|r| r.rent_index)).map(round2);
    let max_inflation = rows
        .iter()
        .filter_map(|r| r.inflation_rate)
        .reduce(f64::max)
        .map(round2);
    let latest_gdp_growth = last.gdp_growth.filter(|v| !v.is_nan()).map(round2);

    let (min_year, max_year) = rows
        .iter()
        .fold((first.year, first.year), |(lo, hi), r| {
            (lo.min(r.year), hi.max(r.year))
        });

    Ok(CountrySummary {
        country: country.to_string(),
        avg_house_price_index,
        avg_rent_index,
        max_inflation,
        latest_gdp_growth,
        data_years: format!("{min_year} - {max_year}"),
    })
}

/// Rows of `year` ordered by GDP growth, highest first, at most `limit` long.
///
/// The sort is stable, so equal growth keeps table order. Rows without a GDP
/// value go last. A year with no rows yields an empty ranking.
pub fn top_growth(dataset: &Dataset, year: i32, limit: usize) -> Vec<GrowthRow> {
    let mut rows: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|r| r.year == year)
        .collect();

    if rows.is_empty() {
        debug!("No rows for year {year}");
        return Vec::new();
    }

    let growth = |r: &Record| r.gdp_growth.filter(|v| !v.is_nan());
    rows.sort_by(|a, b| match (growth(*a), growth(*b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    rows.into_iter().take(limit).map(GrowthRow::from).collect()
}

/// Distinct country names in order of first appearance.
pub fn countries(dataset: &Dataset) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .records()
        .iter()
        .map(|r| r.country.as_str())
        .filter(|country| seen.insert(*country))
        .map(str::to_string)
        .collect()
}

/// Distinct years, ascending.
pub fn years(dataset: &Dataset) -> Vec<i32> {
    let mut years: Vec<i32> = dataset.records().iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Year -> country -> value of `metric` for the requested countries.
///
/// When a country has several rows for one year the later row wins.
pub fn metric_trend(
    dataset: &Dataset,
    countries: &[String],
    metric: Metric,
) -> BTreeMap<i32, BTreeMap<String, f64>> {
    let mut trend: BTreeMap<i32, BTreeMap<String, f64>> = BTreeMap::new();
    for record in dataset.records() {
        if !countries.contains(&record.country) {
            continue;
        }
        if let Some(value) = record.metric(metric) {
            trend
                .entry(record.year)
                .or_default()
                .insert(record.country.clone(), value);
        }
    }
    trend
}

/// Per-country value of `metric` in `year`, averaged over duplicate rows,
/// in first-appearance order.
pub fn metric_snapshot(dataset: &Dataset, year: i32, metric: Metric) -> Vec<(String, f64)> {
    let view = dataset.filtered(|r| r.year == year);
    countries(&view)
        .into_iter()
        .filter_map(|country| {
            mean(
                view.records()
                    .iter()
                    .filter(|r| r.country == country)
                    .filter_map(|r| r.metric(metric)),
            )
            .map(|value| (country, round2(value)))
        })
        .collect()
}
