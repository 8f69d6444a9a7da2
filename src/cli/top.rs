use super::ui;
use crate::core::{Dataset, GrowthRow, analytics};
use anyhow::Result;
use comfy_table::Cell;

pub fn render_ranking(year: i32, ranking: &[GrowthRow]) -> String {
    if ranking.is_empty() {
        return ui::style_text(
            &format!("No data available for year {year}."),
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Country"),
        ui::header_cell("GDP Growth (%)"),
        ui::header_cell("House Price Index"),
        ui::header_cell("Inflation Rate (%)"),
    ]);

    for (rank, row) in ranking.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&row.country),
            ui::change_cell(row.gdp_growth),
            ui::number_cell(row.house_price_index),
            ui::format_optional_cell(row.inflation_rate, |v| format!("{v:.2}%")),
        ]);
    }

    format!(
        "Top {} countries by GDP growth in {}\n\n{}",
        ranking.len(),
        ui::style_text(&year.to_string(), ui::StyleType::Title),
        table
    )
}

pub fn run(dataset: &Dataset, year: i32, limit: usize) -> Result<()> {
    let ranking = analytics::top_growth(dataset, year, limit);
    println!("{}", render_ranking(year, &ranking));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_ranking() {
        let output = render_ranking(1999, &[]);
        assert!(output.contains("No data available for year 1999."));
    }

    #[test]
    fn test_render_ranking_rows() {
        let ranking = vec![
            GrowthRow {
                country: "USA".to_string(),
                gdp_growth: Some(1.5),
                house_price_index: 100.0,
                inflation_rate: Some(2.0),
            },
            GrowthRow {
                country: "France".to_string(),
                gdp_growth: Some(-0.4),
                house_price_index: 105.0,
                inflation_rate: None,
            },
        ];

        let output = render_ranking(2023, &ranking);
        assert!(output.contains("Top 2 countries"));
        assert!(output.contains("USA"));
        assert!(output.contains("1.50%"));
        assert!(output.contains("-0.40%"));
        assert!(output.find("USA").unwrap() < output.find("France").unwrap());
    }
}
