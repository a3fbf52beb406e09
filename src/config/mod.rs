#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::adapters::SourceOptions;
use crate::core::aggregate::{AggregateFields, DEFAULT_SALARY_FIELD, DEFAULT_YEAR_FIELD};
use crate::core::dashboard::DashboardOptions;
use crate::core::ingest::normalize_header;
use crate::domain::ports::ConfigProvider;
use crate::presentation::render::{DEFAULT_PRECISION, DEFAULT_TITLE};
use crate::presentation::{OutputFormat, RenderOptions, SortColumn, SortDirection};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_SOURCE: &str = "data/salaries.csv";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_PRECISION: usize = 6;

/// Effective settings after defaults, the TOML file and CLI flags are layered.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub year_field: String,
    pub salary_field: String,
    pub title: String,
    pub format: OutputFormat,
    pub sort: Option<(SortColumn, SortDirection)>,
    pub precision: usize,
    pub by_year: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            headers: HashMap::new(),
            year_field: DEFAULT_YEAR_FIELD.to_string(),
            salary_field: DEFAULT_SALARY_FIELD.to_string(),
            title: DEFAULT_TITLE.to_string(),
            format: OutputFormat::Table,
            sort: None,
            precision: DEFAULT_PRECISION,
            by_year: false,
        }
    }
}

impl DashboardConfig {
    /// Overlay values present in a TOML file.
    pub fn apply_toml(mut self, file: TomlConfig) -> Result<Self> {
        if let Some(location) = file.source.location {
            self.source = location;
        }
        if let Some(timeout) = file.source.timeout_seconds {
            self.timeout_seconds = Some(timeout);
        }
        if let Some(headers) = file.source.headers {
            self.headers = headers;
        }
        if let Some(field) = file.aggregate.year_field {
            self.year_field = field;
        }
        if let Some(field) = file.aggregate.salary_field {
            self.salary_field = field;
        }

        let render = file.render;
        if let Some(title) = render.title {
            self.title = title;
        }
        if let Some(format) = render.format {
            self.format = format.parse()?;
        }
        if let Some(column) = render.sort_by {
            let direction = if render.descending.unwrap_or(false) {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            self.sort = Some((column.parse()?, direction));
        }
        if let Some(precision) = render.precision {
            self.precision = precision;
        }
        if let Some(by_year) = render.by_year {
            self.by_year = by_year;
        }
        Ok(self)
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(mut self, cli: &CliConfig) -> Self {
        if let Some(source) = &cli.source {
            self.source = source.clone();
        }
        if let Some(timeout) = cli.timeout_seconds {
            self.timeout_seconds = Some(timeout);
        }
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(column) = cli.sort {
            let direction = if cli.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            self.sort = Some((column, direction));
        }
        if cli.by_year {
            self.by_year = true;
        }
        self
    }

    /// Defaults, then `--config` if given, then the remaining flags.
    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = &cli.config {
            tracing::info!("Loading configuration from: {}", path);
            config = config.apply_toml(TomlConfig::from_file(path)?)?;
        }
        Ok(config.apply_cli(cli))
    }

    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            timeout: self.timeout(),
            headers: self.headers.clone(),
        }
    }

    /// Field names go through the same normalization as CSV headers, so
    /// `"Work Year"` in a config file still matches.
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            fields: AggregateFields {
                year: normalize_header(&self.year_field),
                salary: normalize_header(&self.salary_field),
            },
            timeout: self.timeout(),
            sort_by_year: self.by_year,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: self.title.clone(),
            format: self.format,
            precision: self.precision,
            sort: self.sort,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl ConfigProvider for DashboardConfig {
    fn source_location(&self) -> &str {
        &self.source
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn year_field(&self) -> &str {
        &self.year_field
    }

    fn salary_field(&self) -> &str {
        &self.salary_field
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_locator("source.location", self.source_location())?;
        if let Some(timeout) = self.timeout_seconds() {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }
        validation::validate_non_empty_string("aggregate.year_field", self.year_field())?;
        validation::validate_non_empty_string("aggregate.salary_field", self.salary_field())?;
        validation::validate_range("render.precision", self.precision, 0, MAX_PRECISION)?;
        Ok(())
    }
}
