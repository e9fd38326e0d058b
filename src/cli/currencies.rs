use super::ui;
use crate::core::CurrencyCode;
use crate::core::catalog::grouped_view;

/// Renders the catalog grouped for the selection screen, marking `selected`.
pub fn display_catalog(selected: CurrencyCode) -> String {
    let mut output = String::new();

    for (group, members) in grouped_view() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell(""),
            ui::header_cell("Code"),
            ui::header_cell("Currency"),
            ui::header_cell("Symbol"),
        ]);

        for descriptor in members {
            let is_selected = descriptor.code == selected;
            let marker = if is_selected { "✓" } else { "" };
            table.add_row(vec![
                ui::selected_cell(marker, is_selected),
                ui::selected_cell(descriptor.code.as_str(), is_selected),
                ui::selected_cell(
                    &format!("{} {}", descriptor.flag, descriptor.display_name),
                    is_selected,
                ),
                ui::selected_cell(descriptor.symbol, is_selected),
            ]);
        }

        output.push_str(&format!(
            "{}\n{}\n\n",
            ui::style_text(group.display_name(), ui::StyleType::Title),
            table
        ));
    }

    output.push_str(&ui::style_text(
        "Change with: pricefx select <CODE>",
        ui::StyleType::Subtle,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyGroup;

    #[test]
    fn test_catalog_lists_groups_and_marks_selection() {
        let output = display_catalog(CurrencyCode::Aed);
        for group in CurrencyGroup::ALL {
            assert!(output.contains(group.display_name()));
        }
        for code in CurrencyCode::ALL {
            assert!(output.contains(code.as_str()), "missing {code}");
        }
        assert_eq!(output.matches('✓').count(), 1);
    }
}
