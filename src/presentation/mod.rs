// Presentation layer: sortable table view over summary rows and its renderers.

pub mod render;
pub mod table;

pub use render::{render_state, OutputFormat, RenderOptions, SortColumn};
pub use table::{summary_columns, CellValue, Column, SortDirection, TableView};
