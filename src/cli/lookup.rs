use super::ui;
use crate::core::{CutOffResult, LookupError, Resolver};
use chrono::NaiveDate;
use comfy_table::Cell;

impl CutOffResult {
    pub fn display_as_table(&self, date: NaiveDate) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Country"),
        ]);
        for currency in [&self.currency_a, &self.currency_b] {
            table.add_row(vec![Cell::new(&currency.iso), Cell::new(&currency.country)]);
        }

        let mut output = format!(
            "Cut-off for {}\n\n",
            ui::style_text(&date.to_string(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nCut-off time: {} {}",
            ui::style_text(&self.cut_off_time, ui::StyleType::Value),
            ui::style_text(&format!("({} reading)", self.bucket), ui::StyleType::Subtle)
        ));
        output
    }
}

/// Resolves and renders one lookup. `today` is the date the request is
/// judged against.
pub fn run(
    resolver: &Resolver,
    currency_a: &str,
    currency_b: &str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<String, LookupError> {
    let result = resolver.resolve_on(currency_a, currency_b, date, today)?;
    Ok(result.display_as_table(date))
}
