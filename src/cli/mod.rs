pub mod convert;
pub mod currencies;
pub mod price;
pub mod rates;
pub mod select;
pub mod setup;
pub mod ui;
pub mod watch;
