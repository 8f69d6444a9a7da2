use super::ui;
use crate::core::{Dataset, Metric, StatsError, analytics};
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeMap;

type Trend = BTreeMap<i32, BTreeMap<String, f64>>;

fn series(trend: &Trend, country: &str) -> Vec<Option<f64>> {
    trend.values().map(|by_country| by_country.get(country).copied()).collect()
}

pub fn render_trend(countries: &[String], metric: Metric, trend: &Trend) -> String {
    if trend.is_empty() {
        return ui::style_text(
            &format!("No {} values for the selected countries.", metric.column()),
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Year")];
    header.extend(countries.iter().map(|c| ui::header_cell(c)));
    table.set_header(header);

    for (year, by_country) in trend {
        let mut row = vec![Cell::new(year)];
        row.extend(countries.iter().map(|c| {
            ui::format_optional_cell(by_country.get(c).copied(), |v| format!("{v:.2}"))
        }));
        table.add_row(row);
    }

    let width = countries.iter().map(String::len).max().unwrap_or(0);
    let lines: Vec<String> = countries
        .iter()
        .map(|c| format!("{c:<width$}  {}", ui::sparkline(&series(trend, c))))
        .collect();

    format!(
        "{} by year\n\n{}\n\n{}",
        ui::style_text(metric.column(), ui::StyleType::Title),
        table,
        lines.join("\n")
    )
}

pub fn run(dataset: &Dataset, countries: &[String], metric: Metric) -> Result<()> {
    let known = analytics::countries(dataset);
    let (found, missing): (Vec<String>, Vec<String>) =
        countries.iter().cloned().partition(|c| known.contains(c));

    for country in missing {
        let e = StatsError::CountryNotFound(country);
        println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
    }
    if found.is_empty() {
        return Ok(());
    }

    let trend = analytics::metric_trend(dataset, &found, metric);
    println!("{}", render_trend(&found, metric, &trend));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_trend() {
        let countries = vec!["USA".to_string(), "France".to_string()];
        let mut trend = Trend::new();
        trend.insert(
            2020,
            BTreeMap::from([("USA".to_string(), 100.0), ("France".to_string(), 105.0)]),
        );
        trend.insert(2021, BTreeMap::from([("USA".to_string(), 110.0)]));

        let output = render_trend(&countries, Metric::HousePriceIndex, &trend);

        assert!(output.contains("House Price Index by year"));
        assert!(output.contains("110.00"));
        assert!(output.contains("N/A"));
        assert_eq!(series(&trend, "France"), vec![Some(105.0), None]);
    }

    #[test]
    fn test_render_empty_trend() {
        let output = render_trend(&["USA".to_string()], Metric::RentIndex, &Trend::new());
        assert!(output.contains("No Rent Index values"));
    }
}
