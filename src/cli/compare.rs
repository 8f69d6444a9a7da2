use super::stats::{convert_summary, fetch_rates_with_spinner, rates_unavailable_notice};
use super::ui;
use crate::core::{CountrySummary, Dataset, ExchangeRateProvider, analytics};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

fn difference_cell(left: Option<f64>, right: Option<f64>) -> Cell {
    ui::format_optional_cell(left.zip(right).map(|(l, r)| r - l), |d| format!("{d:+.2}"))
}

/// Side-by-side table of two summaries with the right-minus-left difference.
pub fn render_comparison(
    left: &CountrySummary,
    right: &CountrySummary,
    converted: Option<(&str, Option<f64>, Option<f64>)>,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metric"),
        ui::header_cell(&left.country),
        ui::header_cell(&right.country),
        ui::header_cell("Difference"),
    ]);

    let metrics: [(&str, Option<f64>, Option<f64>); 4] = [
        (
            "Avg House Price Index",
            Some(left.avg_house_price_index),
            Some(right.avg_house_price_index),
        ),
        ("Avg Rent Index", left.avg_rent_index, right.avg_rent_index),
        ("Max Inflation (%)", left.max_inflation, right.max_inflation),
        (
            "Latest GDP Growth (%)",
            left.latest_gdp_growth,
            right.latest_gdp_growth,
        ),
    ];

    for (label, l, r) in metrics {
        table.add_row(vec![
            Cell::new(label),
            ui::format_optional_cell(l, |v| format!("{v:.2}")),
            ui::format_optional_cell(r, |v| format!("{v:.2}")),
            difference_cell(l, r),
        ]);
    }

    if let Some((currency, l, r)) = converted {
        table.add_row(vec![
            Cell::new(format!("Avg HPI in {currency} (indicative)")),
            ui::format_optional_cell(l, |v| format!("{v:.2}")),
            ui::format_optional_cell(r, |v| format!("{v:.2}")),
            difference_cell(l, r),
        ]);
    }

    table.add_row(vec![
        Cell::new("Years"),
        Cell::new(&left.data_years).set_alignment(CellAlignment::Right),
        Cell::new(&right.data_years).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    format!(
        "{} vs {}\n\n{}",
        ui::style_text(&left.country, ui::StyleType::Title),
        ui::style_text(&right.country, ui::StyleType::Title),
        table
    )
}

pub async fn run(
    dataset: &Dataset,
    first: &str,
    second: &str,
    currency: Option<&str>,
    rate_provider: &(dyn ExchangeRateProvider + Send + Sync),
) -> Result<()> {
    let summaries = (
        analytics::country_stats(dataset, first),
        analytics::country_stats(dataset, second),
    );
    let (left, right) = match summaries {
        (Ok(left), Ok(right)) => (left, right),
        (left, right) => {
            for e in [left.err(), right.err()].into_iter().flatten() {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            }
            return Ok(());
        }
    };

    let mut notice = None;
    let converted = match currency {
        Some(currency) => match fetch_rates_with_spinner(rate_provider).await {
            Some(rates) => Some((
                currency,
                convert_summary(&left, currency, &rates).map(|c| c.value),
                convert_summary(&right, currency, &rates).map(|c| c.value),
            )),
            None => {
                notice = Some(rates_unavailable_notice());
                None
            }
        },
        None => None,
    };

    println!("{}", render_comparison(&left, &right, converted));
    if let Some(notice) = notice {
        println!("\n{notice}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(country: &str, hpi: f64, gdp: Option<f64>) -> CountrySummary {
        CountrySummary {
            country: country.to_string(),
            avg_house_price_index: hpi,
            avg_rent_index: None,
            max_inflation: Some(2.5),
            latest_gdp_growth: gdp,
            data_years: "2015 - 2024".to_string(),
        }
    }

    #[test]
    fn test_render_comparison() {
        let output = render_comparison(
            &summary("USA", 105.0, Some(2.0)),
            &summary("France", 110.5, None),
            None,
        );

        assert!(output.contains("USA"));
        assert!(output.contains("France"));
        assert!(output.contains("+5.50"));
        assert!(output.contains("+0.00"));
        assert!(!output.contains("indicative"));
    }

    #[test]
    fn test_render_comparison_with_conversion() {
        let output = render_comparison(
            &summary("USA", 100.0, None),
            &summary("Japan", 120.0, None),
            Some(("EUR", Some(92.0), Some(110.4))),
        );

        assert!(output.contains("Avg HPI in EUR (indicative)"));
        assert!(output.contains("+18.40"));
    }
}
