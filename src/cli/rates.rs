use super::ui;
use crate::AppContext;
use crate::core::{BASE_CURRENCY, CurrencyCode, RateSnapshot, TableOrigin};
use chrono::{DateTime, Utc};

/// Describes where the active table came from and how old it is.
pub fn describe_source(snapshot: &RateSnapshot, now: DateTime<Utc>) -> String {
    match (snapshot.origin, snapshot.refreshed_at) {
        (TableOrigin::Live, Some(at)) => {
            let minutes = (now - at).num_minutes().max(0);
            format!(
                "live, refreshed {} ({} min ago)",
                at.format("%Y-%m-%d %H:%M UTC"),
                minutes
            )
        }
        _ => "built-in fallback".to_string(),
    }
}

pub fn display_rates(snapshot: &RateSnapshot, selected: CurrencyCode, now: DateTime<Utc>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {BASE_CURRENCY}")),
    ]);

    for (code, rate) in snapshot.table.iter() {
        let descriptor = code.descriptor();
        let is_selected = code == selected;
        table.add_row(vec![
            ui::selected_cell(code.as_str(), is_selected),
            ui::selected_cell(
                &format!("{} {}", descriptor.flag, descriptor.display_name),
                is_selected,
            ),
            ui::number_cell(format!("{rate:.4}")),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Exchange rates", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text("Source:", ui::StyleType::TotalLabel),
        ui::style_text(&describe_source(snapshot, now), ui::StyleType::Subtle)
    ));
    output
}

pub fn run(app: &AppContext) {
    let snapshot = app.rates.snapshot();
    println!(
        "{}",
        display_rates(&snapshot, app.selection.selected(), Utc::now())
    );
}
