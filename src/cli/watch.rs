use super::ui;
use crate::AppContext;
use crate::core::PriceDisplay;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

/// Keeps rates fresh in the background and reprints the price whenever a
/// new table is installed, until interrupted.
pub async fn run(app: &AppContext, display: &PriceDisplay, refresh_every: Duration) {
    let scheduler = app.rates.start(refresh_every);
    let converter = app.selection.bound_converter();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut poll = interval(Duration::from_secs(1));
    let mut last_seen = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, stopping refresh timer");
                scheduler.stop();
                return;
            }
            _ = poll.tick() => {
                let snapshot = app.rates.snapshot();
                let stamp = (snapshot.origin, snapshot.refreshed_at);
                if last_seen == Some(stamp) {
                    continue;
                }
                last_seen = Some(stamp);
                println!(
                    "{} {}",
                    ui::style_text(&converter.render(display), ui::StyleType::TotalValue),
                    ui::style_text(
                        &super::rates::describe_source(&snapshot, chrono::Utc::now()),
                        ui::StyleType::Subtle
                    )
                );
            }
        }
    }
}
