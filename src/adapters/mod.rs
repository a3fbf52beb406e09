// Adapters layer: concrete data sources behind the `DataSource` port.

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use crate::domain::ports::DataSource;
use crate::utils::validation::is_http_locator;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub timeout: Option<Duration>,
    pub headers: HashMap<String, String>,
}

/// `http`/`https` URLs are fetched over the network, anything else is read
/// from disk.
pub fn source_for(locator: &str, options: SourceOptions) -> Box<dyn DataSource> {
    if is_http_locator(locator) {
        Box::new(
            HttpSource::new(locator)
                .with_timeout(options.timeout)
                .with_headers(options.headers),
        )
    } else {
        Box::new(FileSource::new(locator))
    }
}
