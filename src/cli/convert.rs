use super::ui;
use crate::AppContext;
use crate::core::{CurrencyCode, convert};
use anyhow::Result;

pub fn format_conversion(amount: f64, from: CurrencyCode, value: f64, to: CurrencyCode) -> String {
    format!("{amount:.2} {from} = {value:.2} {to}")
}

pub fn run(app: &AppContext, amount: f64, from: &str, to: Option<&str>) -> Result<()> {
    let from: CurrencyCode = from.parse()?;
    let to = match to {
        Some(raw) => raw.parse()?,
        None => app.selection.selected(),
    };

    let value = convert(amount, from, to, &app.rates.current_rates());
    println!(
        "{}",
        ui::style_text(
            &format_conversion(amount, from, value, to),
            ui::StyleType::TotalValue
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_conversion() {
        assert_eq!(
            format_conversion(1000.0, CurrencyCode::Cny, 140.0, CurrencyCode::Usd),
            "1000.00 CNY = 140.00 USD"
        );
    }
}
