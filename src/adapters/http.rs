use crate::domain::ports::DataSource;
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Dataset served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let mut request = self.client.get(&self.url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Making request to: {}", self.url);
        let response = request.send().await.map_err(|e| self.map_transport(e))?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(DashboardError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_transport(e))?;
        Ok(body.to_vec())
    }

    fn locator(&self) -> &str {
        &self.url
    }
}

impl HttpSource {
    fn map_transport(&self, error: reqwest::Error) -> DashboardError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => DashboardError::Timeout {
                locator: self.url.clone(),
                after: timeout,
            },
            _ => DashboardError::Transport(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/salaries.csv")
                .header("x-api-key", "secret");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body("work_year,salary_in_usd\n2020,100\n");
        });

        let source = HttpSource::new(server.url("/salaries.csv")).with_headers(
            [("x-api-key".to_string(), "secret".to_string())]
                .into_iter()
                .collect(),
        );
        let body = source.fetch().await.unwrap();

        mock.assert();
        assert_eq!(body, b"work_year,salary_in_usd\n2020,100\n");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.csv");
            then.status(404);
        });

        let source = HttpSource::new(server.url("/missing.csv"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DashboardError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.csv");
            then.status(200)
                .body("work_year\n")
                .delay(Duration::from_secs(3));
        });

        let source = HttpSource::new(server.url("/slow.csv"))
            .with_timeout(Some(Duration::from_millis(200)));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DashboardError::Timeout { .. }));
        assert!(err.to_string().contains("200ms"));
    }
}
