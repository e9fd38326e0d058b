pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::ui;
use crate::core::config::AppConfig;
use crate::core::storage::KeyValueStorage;
use crate::core::{PriceDisplay, RateCache, RefreshOutcome, SelectionStore};
use crate::providers::HttpJsonSource;
use crate::store::{DiskStorage, MemoryStorage};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Rates,
    Convert {
        amount: f64,
        from: String,
        to: Option<String>,
    },
    Currencies,
    Select {
        code: String,
    },
    Price {
        amount: f64,
        from: Option<String>,
        show_symbol: bool,
        suffix: Option<String>,
    },
    Watch {
        amount: f64,
        from: Option<String>,
    },
}

impl AppCommand {
    /// Whether live rates should be fetched before the command runs.
    ///
    /// `Watch` starts its own refresh timer, and the timer's first tick is
    /// its startup fetch.
    pub fn wants_rates(&self) -> bool {
        !matches!(
            self,
            AppCommand::Currencies | AppCommand::Select { .. } | AppCommand::Watch { .. }
        )
    }
}

/// Explicitly owned pricing state shared by the command handlers.
pub struct AppContext {
    pub config: AppConfig,
    pub rates: Arc<RateCache>,
    pub selection: SelectionStore,
}

impl AppContext {
    /// Loads the persisted selection and, when `eager_refresh` is set,
    /// fetches live rates at the same time.
    pub async fn build(
        config: AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        eager_refresh: bool,
    ) -> Result<(Self, Option<RefreshOutcome>)> {
        let source = HttpJsonSource::from_config(&config.provider)?;
        let rates = Arc::new(RateCache::new(Arc::new(source), config.min_coverage));

        let refresh = async {
            if eager_refresh {
                Some(rates.refresh().await)
            } else {
                None
            }
        };
        let (selection, outcome) = futures::join!(
            SelectionStore::initialize(storage, Arc::clone(&rates)),
            refresh
        );

        Ok((
            AppContext {
                config,
                rates,
                selection,
            },
            outcome,
        ))
    }
}

/// Opens on-disk storage for the selection, or in-memory storage if the data
/// directory is unusable. Selection then lasts for this run only.
pub fn open_storage(config: &AppConfig) -> Arc<dyn KeyValueStorage> {
    match config.data_path().and_then(|path| DiskStorage::open(&path)) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            warn!(error = %e, "Falling back to in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    }
}

fn parse_display(amount: f64, from: Option<&str>) -> Result<PriceDisplay> {
    let display = PriceDisplay::new(amount);
    Ok(match from {
        Some(raw) => display.from_currency(raw.parse()?),
        None => display,
    })
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    offline: bool,
) -> Result<()> {
    info!("pricefx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let storage = open_storage(&config);
    let eager_refresh = command.wants_rates() && !offline;
    let spinner = eager_refresh.then(|| ui::new_spinner("Fetching exchange rates..."));
    let (app, outcome) = AppContext::build(config, storage, eager_refresh).await?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if let Some(RefreshOutcome::Failed(e)) = &outcome {
        eprintln!(
            "{}",
            ui::style_text(
                &format!("Using built-in rates, live rates unavailable: {e}"),
                ui::StyleType::Error
            )
        );
    }

    match command {
        AppCommand::Rates => cli::rates::run(&app),
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&app, amount, &from, to.as_deref())?
        }
        AppCommand::Currencies => {
            println!("{}", cli::currencies::display_catalog(app.selection.selected()))
        }
        AppCommand::Select { code } => cli::select::run(&app, &code).await?,
        AppCommand::Price {
            amount,
            from,
            show_symbol,
            suffix,
        } => {
            let mut display = parse_display(amount, from.as_deref())?;
            display.show_symbol = show_symbol;
            display.suffix = suffix;
            cli::price::run(&app, &display)
        }
        AppCommand::Watch { amount, from } => {
            let display = parse_display(amount, from.as_deref())?;
            let every = app.config.refresh_interval();
            cli::watch::run(&app, &display, every).await
        }
    }

    Ok(())
}
