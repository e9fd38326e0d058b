use super::ui;
use crate::AppContext;
use anyhow::Result;

pub async fn run(app: &AppContext, code: &str) -> Result<()> {
    app.selection.select(code)?.wait().await;

    let descriptor = app.selection.selected().descriptor();
    println!(
        "Display currency set to {} {}",
        ui::style_text(descriptor.code.as_str(), ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("({} {})", descriptor.flag, descriptor.display_name),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
