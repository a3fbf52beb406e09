use crate::domain::ports::DataSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// Dataset stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    locator: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(locator: impl Into<String>) -> Self {
        let locator = locator.into();
        let path = local_path(&locator);
        Self { locator, path }
    }
}

/// Filesystem path named by a locator. `file:` URLs are decoded, so
/// `file://localhost/...` and percent escapes resolve to the real path.
pub fn local_path(locator: &str) -> PathBuf {
    match Url::parse(locator) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(locator)),
        _ => PathBuf::from(locator),
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading dataset file: {}", self.path.display());
        let data = tokio::fs::read(&self.path).await?;
        Ok(data)
    }

    fn locator(&self) -> &str {
        &self.locator
    }
}
