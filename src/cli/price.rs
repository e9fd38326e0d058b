use super::ui;
use crate::AppContext;
use crate::core::PriceDisplay;

pub fn run(app: &AppContext, display: &PriceDisplay) {
    let converter = app.selection.bound_converter();
    println!(
        "{}",
        ui::style_text(&converter.render(display), ui::StyleType::TotalValue)
    );
}
