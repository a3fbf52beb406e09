use crate::core::dashboard::LoadState;
use crate::domain::model::{Aggregation, SkipStats, SummaryRow};
use crate::presentation::table::{summary_columns, SortDirection, TableView};
use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, Utc};
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::str::FromStr;

pub const DEFAULT_TITLE: &str = "ML Engineer Salaries";
pub const DEFAULT_PRECISION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["table", "json", "csv"];
}

impl FromStr for OutputFormat {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(DashboardError::InvalidConfigValueError {
                field: "render.format".to_string(),
                value: s.to_string(),
                reason: format!("Valid formats: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

/// Summary columns by position in [`summary_columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Year,
    Jobs,
    Salary,
}

impl SortColumn {
    pub const NAMES: [&'static str; 3] = ["year", "jobs", "salary"];

    pub fn index(&self) -> usize {
        match self {
            SortColumn::Year => 0,
            SortColumn::Jobs => 1,
            SortColumn::Salary => 2,
        }
    }
}

impl FromStr for SortColumn {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(SortColumn::Year),
            "jobs" | "total_jobs" => Ok(SortColumn::Jobs),
            "salary" | "average_salary" => Ok(SortColumn::Salary),
            _ => Err(DashboardError::InvalidConfigValueError {
                field: "render.sort_by".to_string(),
                value: s.to_string(),
                reason: format!("Valid columns: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub title: String,
    pub format: OutputFormat,
    pub precision: usize,
    pub sort: Option<(SortColumn, SortDirection)>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            format: OutputFormat::Table,
            precision: DEFAULT_PRECISION,
            sort: None,
        }
    }
}

impl RenderOptions {
    pub fn view<'a>(&self, rows: &'a [SummaryRow]) -> TableView<'a, SummaryRow> {
        let mut view = TableView::new(summary_columns(self.precision), rows);
        if let Some((column, direction)) = self.sort {
            view.set_sort(column.index(), direction);
        }
        view
    }
}

pub fn render_text(title: &str, view: &TableView<SummaryRow>) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        view.headers().iter().map(|h| Cell::new(h).style_spec("b")).collect(),
    ));

    for cells in view.cells() {
        table.add_row(Row::new(
            cells
                .iter()
                .map(|cell| {
                    let text = cell.display();
                    if cell.is_numeric() {
                        Cell::new(&text).style_spec("r")
                    } else {
                        Cell::new(&text)
                    }
                })
                .collect(),
        ));
    }

    format!("{}\n\n{}", title, table)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    title: &'a str,
    generated_at: DateTime<Utc>,
    rows: Vec<&'a SummaryRow>,
    skipped: SkipStats,
}

pub fn render_json(
    title: &str,
    view: &TableView<SummaryRow>,
    skipped: SkipStats,
) -> Result<String> {
    let report = Report {
        title,
        generated_at: Utc::now(),
        rows: view.rows(),
        skipped,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render_csv(view: &TableView<SummaryRow>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(view.columns().iter().map(|c| c.header.as_str()))?;
    for cells in view.cells() {
        writer.write_record(cells.iter().map(|c| c.display()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(DashboardError::from)
}

pub fn render_aggregation(aggregation: &Aggregation, options: &RenderOptions) -> Result<String> {
    let view = options.view(&aggregation.rows);
    match options.format {
        OutputFormat::Table if aggregation.rows.is_empty() => {
            Ok(format!("{}\n\nNo data", options.title))
        }
        OutputFormat::Table => Ok(render_text(&options.title, &view)),
        OutputFormat::Json => render_json(&options.title, &view, aggregation.skipped),
        OutputFormat::Csv => render_csv(&view),
    }
}

/// Loading and failure get their own output so a failed fetch never looks
/// like a load that is still in progress.
pub fn render_state(state: &LoadState, options: &RenderOptions) -> Result<String> {
    match state {
        LoadState::Loading => Ok("Loading data...".to_string()),
        LoadState::Failed(failure) => Ok(format!("Failed to load data: {}", failure.message)),
        LoadState::Loaded(aggregation) => render_aggregation(aggregation, options),
    }
}
