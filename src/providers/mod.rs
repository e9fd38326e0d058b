pub mod http;
pub mod util;

pub use http::HttpJsonSource;
