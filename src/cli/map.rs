use super::ui;
use crate::core::{Dataset, Metric, analytics};
use anyhow::Result;
use comfy_table::{Cell, Color};

const PALETTE: [Color; 5] = [
    Color::Blue,
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Red,
];

/// Quantile class of `value` among `sorted` (ascending), from its rank.
///
/// Equal values share the class of their lowest rank.
pub fn bucket(value: f64, sorted: &[f64], levels: usize) -> usize {
    if levels == 0 || sorted.is_empty() {
        return 0;
    }
    let rank = sorted.partition_point(|v| *v < value);
    (rank * levels / sorted.len()).min(levels - 1)
}

pub fn render_map(year: i32, metric: Metric, snapshot: &[(String, f64)]) -> String {
    if snapshot.is_empty() {
        return ui::style_text(
            &format!("No {} values for year {year}.", metric.column()),
            ui::StyleType::Subtle,
        );
    }

    let mut sorted: Vec<f64> = snapshot.iter().map(|(_, v)| *v).collect();
    sorted.sort_by(f64::total_cmp);
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);

    let mut rows: Vec<&(String, f64)> = snapshot.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell(metric.column()),
        ui::header_cell("Level"),
    ]);
    for (country, value) in rows {
        let level = bucket(*value, &sorted, PALETTE.len());
        table.add_row(vec![
            Cell::new(country),
            ui::number_cell(*value),
            Cell::new("■".repeat(level + 1)).fg(PALETTE[level]),
        ]);
    }

    format!(
        "{} by country in {}\n\n{}\n\n{}",
        ui::style_text(metric.column(), ui::StyleType::Title),
        year,
        table,
        ui::style_text(
            &format!("Range {min:.2} to {max:.2}, {} quantile bands", PALETTE.len()),
            ui::StyleType::Subtle
        )
    )
}

/// Defaults to the most recent year in the dataset when `year` is `None`.
pub fn run(dataset: &Dataset, year: Option<i32>, metric: Metric) -> Result<()> {
    let Some(year) = year.or_else(|| analytics::years(dataset).last().copied()) else {
        println!("No data available.");
        return Ok(());
    };

    let snapshot = analytics::metric_snapshot(dataset, year, metric);
    println!("{}", render_map(year, metric, &snapshot));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_by_rank_not_range() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 100.0];
        let levels: Vec<usize> = sorted.iter().map(|v| bucket(*v, &sorted, 5)).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4]);

        let sorted: Vec<f64> = (1..=8).map(f64::from).collect();
        let levels: Vec<usize> = sorted.iter().map(|v| bucket(*v, &sorted, 4)).collect();
        assert_eq!(levels, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_bucket_ties_and_degenerate_input() {
        let sorted = [5.0, 5.0, 5.0, 9.0];
        assert_eq!(bucket(5.0, &sorted, 5), 0);
        assert_eq!(bucket(9.0, &sorted, 5), 3);
        assert_eq!(bucket(10.0, &[10.0, 20.0], 5), 0);
        assert_eq!(bucket(20.0, &[10.0, 20.0], 5), 2);
        assert_eq!(bucket(3.0, &[], 5), 0);
        assert_eq!(bucket(3.0, &[3.0], 0), 0);
    }

    #[test]
    fn test_render_map_sorted_by_value() {
        let snapshot = vec![
            ("France".to_string(), 105.0),
            ("USA".to_string(), 130.0),
            ("Italy".to_string(), 90.0),
        ];

        let output = render_map(2023, Metric::HousePriceIndex, &snapshot);

        assert!(output.contains("Range 90.00 to 130.00"));
        let usa = output.find("USA").unwrap();
        let france = output.find("France").unwrap();
        let italy = output.find("Italy").unwrap();
        assert!(usa < france && france < italy);
    }

    #[test]
    fn test_render_map_empty() {
        let output = render_map(1990, Metric::GdpGrowth, &[]);
        assert!(output.contains("No GDP Growth (%) values for year 1990."));
    }
}
