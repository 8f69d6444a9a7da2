use super::ui;
use crate::core::{
    CountrySummary, Dataset, ExchangeRateProvider, ExchangeRates, analytics, convert,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::Cell;

/// The average house price index expressed in another currency.
///
/// An index is not a money amount, so this figure is indicative only.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedIndex {
    pub currency: String,
    pub value: f64,
    pub rates_updated_at: Option<DateTime<Utc>>,
}

pub fn convert_summary(
    summary: &CountrySummary,
    currency: &str,
    rates: &ExchangeRates,
) -> Option<ConvertedIndex> {
    convert(summary.avg_house_price_index, currency, rates).map(|value| ConvertedIndex {
        currency: currency.to_string(),
        value,
        rates_updated_at: rates.updated_at,
    })
}

impl CountrySummary {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

        table.add_row(vec![
            Cell::new("Avg House Price Index"),
            ui::number_cell(self.avg_house_price_index),
        ]);
        table.add_row(vec![
            Cell::new("Avg Rent Index"),
            ui::format_optional_cell(self.avg_rent_index, |v| format!("{v:.2}")),
        ]);
        table.add_row(vec![
            Cell::new("Max Inflation (%)"),
            ui::format_optional_cell(self.max_inflation, |v| format!("{v:.2}%")),
        ]);
        table.add_row(vec![
            Cell::new("Latest GDP Growth (%)"),
            ui::change_cell(self.latest_gdp_growth),
        ]);
        table.add_row(vec![Cell::new("Years"), Cell::new(&self.data_years)]);

        format!(
            "Country: {}\n\n{}",
            ui::style_text(&self.country, ui::StyleType::Title),
            table
        )
    }
}

pub fn render_conversion(conversion: &ConvertedIndex) -> String {
    let as_of = conversion
        .rates_updated_at
        .map(|t| format!(" (rates as of {})", t.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!(
        "Avg House Price Index in {}: {} {}",
        ui::style_text(&conversion.currency, ui::StyleType::Label),
        ui::style_text(&format!("{:.2}", conversion.value), ui::StyleType::Value),
        ui::style_text(&format!("indicative{as_of}"), ui::StyleType::Subtle),
    )
}

/// Fetches rates behind a spinner. `None` means the conversion panel is skipped.
pub async fn fetch_rates_with_spinner(
    provider: &(dyn ExchangeRateProvider + Send + Sync),
) -> Option<ExchangeRates> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = provider.fetch_rates().await;
    pb.finish_and_clear();
    rates
}

pub fn rates_unavailable_notice() -> String {
    ui::style_text(
        "Exchange rates unavailable, currency conversion omitted.",
        ui::StyleType::Subtle,
    )
}

pub async fn run(
    dataset: &Dataset,
    country: &str,
    currency: Option<&str>,
    json: bool,
    rate_provider: &(dyn ExchangeRateProvider + Send + Sync),
) -> Result<()> {
    let summary = match analytics::country_stats(dataset, country) {
        Ok(summary) => summary,
        Err(e) => {
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.display_as_table());
    }

    let Some(currency) = currency else {
        return Ok(());
    };

    match fetch_rates_with_spinner(rate_provider).await {
        Some(rates) => match convert_summary(&summary, currency, &rates) {
            Some(conversion) => println!("\n{}", render_conversion(&conversion)),
            None => println!(
                "\n{}",
                ui::style_text(
                    &format!("Currency '{currency}' not found in exchange rates."),
                    ui::StyleType::Error
                )
            ),
        },
        None => println!("\n{}", rates_unavailable_notice()),
    }

    Ok(())
}
