//! Pricing core: catalog, rates, conversion and selection

pub mod catalog;
pub mod config;
pub mod convert;
pub mod log;
pub mod rate_cache;
pub mod rates;
pub mod selection;
pub mod source;
pub mod storage;

// Re-export main types for cleaner imports
pub use catalog::{BASE_CURRENCY, CurrencyCode, CurrencyDescriptor, CurrencyGroup};
pub use convert::{PriceDisplay, convert};
pub use rate_cache::{RateCache, RateSnapshot, RefreshOutcome, RefreshScheduler, TableOrigin};
pub use rates::{RateError, RateTable};
pub use selection::{PriceConverter, SelectionError, SelectionStore};
pub use source::JsonSource;
pub use storage::KeyValueStorage;
