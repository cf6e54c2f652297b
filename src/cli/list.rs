use super::ui;
use crate::core::{CutOffTable, DayBucket};
use comfy_table::Cell;

pub fn display_table(table: &CutOffTable) -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("ISO"),
        ui::header_cell("Country"),
        ui::header_cell("Today"),
        ui::header_cell("Tomorrow"),
        ui::header_cell("After tomorrow"),
    ]);

    for entry in table.entries() {
        let mut row = vec![Cell::new(&entry.code), Cell::new(&entry.country)];
        row.extend(
            DayBucket::ALL
                .iter()
                .map(|bucket| ui::reading_cell(entry.readings.get(*bucket))),
        );
        output.add_row(row);
    }

    format!(
        "{}\n\n{}",
        output,
        ui::style_text(
            &format!("{} currencies", table.len()),
            ui::StyleType::Subtle
        )
    )
}
