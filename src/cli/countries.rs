use super::ui;
use crate::core::{Dataset, analytics};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn run(dataset: &Dataset) -> Result<()> {
    let names = analytics::countries(dataset);
    if names.is_empty() {
        println!("No countries match the current filters.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell("Rows"),
        ui::header_cell("Years"),
    ]);

    for name in &names {
        let view = dataset.filtered(|r| &r.country == name);
        let years = analytics::years(&view);
        let span = match (years.first(), years.last()) {
            (Some(first), Some(last)) => format!("{first} - {last}"),
            _ => "N/A".to_string(),
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(view.len()).set_alignment(CellAlignment::Right),
            Cell::new(span),
        ]);
    }

    println!("{table}");
    println!(
        "\n{}",
        ui::style_text(
            &format!("{} countries, {} rows", names.len(), dataset.len()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
