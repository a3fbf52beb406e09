use crate::utils::error::Result;
use async_trait::async_trait;

/// Where the raw dataset bytes come from.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// URL or path, for logs and error messages.
    fn locator(&self) -> &str;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Box<T> {
    async fn fetch(&self) -> Result<Vec<u8>> {
        (**self).fetch().await
    }

    fn locator(&self) -> &str {
        (**self).locator()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn source_location(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn year_field(&self) -> &str;
    fn salary_field(&self) -> &str;
}
