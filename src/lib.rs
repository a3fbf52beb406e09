pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod presentation;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{DashboardConfig, TomlConfig};

pub use crate::adapters::{source_for, FileSource, HttpSource, SourceOptions};
pub use crate::core::aggregate::{aggregate, AggregateFields};
pub use crate::core::dashboard::{Dashboard, DashboardOptions, LoadFailure, LoadOutcome, LoadState};
pub use crate::core::ingest::{load_records, normalize_header, parse_records};
pub use crate::domain::model::{Aggregation, FieldValue, RawRecord, SkipStats, SummaryRow};
pub use crate::presentation::{render_state, OutputFormat, RenderOptions, SortColumn, SortDirection};
pub use crate::utils::error::{DashboardError, Result};
