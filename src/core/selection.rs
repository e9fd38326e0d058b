//! The user's display currency and the converter bound to it.

use crate::core::catalog::{BASE_CURRENCY, CurrencyCode, normalize};
use crate::core::convert::{PriceDisplay, convert, format_price};
use crate::core::rate_cache::RateCache;
use crate::core::storage::{KeyValueStorage, SELECTED_CURRENCY_KEY};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

struct SelectionState {
    selected: RwLock<CurrencyCode>,
    storage: Arc<dyn KeyValueStorage>,
    write_lock: Mutex<()>,
}

impl SelectionState {
    fn current(&self) -> CurrencyCode {
        *self.selected.read().unwrap_or_else(PoisonError::into_inner)
    }

    // Writes are serialized and always store the latest selection, so the
    // last write to finish carries the final in-memory value.
    async fn persist(&self) {
        let _guard = self.write_lock.lock().await;
        let code = self.current();
        match self.storage.set(SELECTED_CURRENCY_KEY, code.as_str()).await {
            Ok(()) => debug!(%code, "Persisted display currency"),
            Err(e) => warn!(error = %e, %code, "Failed to persist display currency"),
        }
    }
}

pub struct SelectionStore {
    state: Arc<SelectionState>,
    rates: Arc<RateCache>,
}

impl SelectionStore {
    /// Loads the persisted selection, defaulting to the base currency when
    /// nothing usable is stored or the read fails.
    pub async fn initialize(storage: Arc<dyn KeyValueStorage>, rates: Arc<RateCache>) -> Self {
        let selected = match storage.get(SELECTED_CURRENCY_KEY).await {
            Ok(Some(raw)) => normalize(&raw).unwrap_or_else(|| {
                warn!(persisted = %raw, "Ignoring unknown persisted currency");
                BASE_CURRENCY
            }),
            Ok(None) => {
                debug!("No persisted currency, using default");
                BASE_CURRENCY
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted currency, using default");
                BASE_CURRENCY
            }
        };
        info!(%selected, "Display currency initialized");

        Self {
            state: Arc::new(SelectionState {
                selected: RwLock::new(selected),
                storage,
                write_lock: Mutex::new(()),
            }),
            rates,
        }
    }

    pub fn selected(&self) -> CurrencyCode {
        self.state.current()
    }

    /// Switches the display currency.
    ///
    /// The in-memory selection changes before this returns; the write to
    /// storage runs in the background. Must be called within a tokio runtime.
    pub fn select(&self, raw: &str) -> Result<PendingWrite, SelectionError> {
        let code = normalize(raw).ok_or_else(|| SelectionError::UnknownCurrency(raw.to_string()))?;

        *self
            .state
            .selected
            .write()
            .unwrap_or_else(PoisonError::into_inner) = code;
        info!(%code, "Display currency selected");

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move { state.persist().await });
        Ok(PendingWrite { handle })
    }

    pub fn bound_converter(&self) -> PriceConverter {
        PriceConverter {
            selection: Arc::clone(&self.state),
            rates: Arc::clone(&self.rates),
        }
    }
}

/// Completion handle for a background selection write.
///
/// Dropping it does not cancel the write.
pub struct PendingWrite {
    handle: JoinHandle<()>,
}

impl PendingWrite {
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Selection write task did not complete");
        }
    }
}

/// Converts amounts into whatever currency is selected at call time, using
/// whatever rates are active at call time.
#[derive(Clone)]
pub struct PriceConverter {
    selection: Arc<SelectionState>,
    rates: Arc<RateCache>,
}

impl PriceConverter {
    pub fn target(&self) -> CurrencyCode {
        self.selection.current()
    }

    /// `from` defaults to the base currency.
    pub fn convert(&self, amount: f64, from: Option<CurrencyCode>) -> f64 {
        let to = self.selection.current();
        convert(
            amount,
            from.unwrap_or(BASE_CURRENCY),
            to,
            &self.rates.current_rates(),
        )
    }

    pub fn render(&self, display: &PriceDisplay) -> String {
        let to = self.selection.current();
        let value = convert(display.amount, display.source, to, &self.rates.current_rates());
        format_price(
            value,
            to.descriptor(),
            display.show_symbol,
            display.suffix.as_deref(),
        )
    }

    pub fn into_fn(self) -> impl Fn(f64, Option<CurrencyCode>) -> f64 + Send + Sync + 'static {
        move |amount, from| self.convert(amount, from)
    }
}
