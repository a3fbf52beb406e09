pub mod aggregate;
pub mod dashboard;
pub mod ingest;

pub use crate::domain::model::{Aggregation, FieldValue, RawRecord, SummaryRow};
pub use crate::domain::ports::{ConfigProvider, DataSource};
pub use crate::utils::error::Result;
