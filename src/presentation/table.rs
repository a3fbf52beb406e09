use crate::domain::model::SummaryRow;
use std::cmp::Ordering;

/// Value a column exposes for display and ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(u64),
    Decimal { value: f64, precision: usize },
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Decimal { value, precision } => format!("{:.*}", precision, value),
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, CellValue::Text(_))
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Decimal { value: a, .. }, CellValue::Decimal { value: b, .. }) => {
                a.total_cmp(b)
            }
            (CellValue::Text(a), CellValue::Text(b)) => compare_text(a, b),
            _ => self.display().cmp(&other.display()),
        }
    }
}

// years are text but should order like numbers
fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn marker(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;

pub struct Column<T> {
    pub header: String,
    pub accessor: Accessor<T>,
    pub sortable: bool,
}

impl<T> Column<T> {
    pub fn new(
        header: impl Into<String>,
        accessor: impl Fn(&T) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            header: header.into(),
            accessor: Box::new(accessor),
            sortable: true,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// Year / Number of Jobs / Average Salary (USD).
pub fn summary_columns(precision: usize) -> Vec<Column<SummaryRow>> {
    vec![
        Column::new("Year", |r: &SummaryRow| CellValue::Text(r.year.clone())),
        Column::new("Number of Jobs", |r: &SummaryRow| {
            CellValue::Integer(r.total_jobs)
        }),
        Column::new("Average Salary (USD)", move |r: &SummaryRow| {
            CellValue::Decimal {
                value: r.average_salary,
                precision,
            }
        }),
    ]
}

/// Sortable read-only view over a slice of rows.
pub struct TableView<'a, T> {
    columns: Vec<Column<T>>,
    rows: &'a [T],
    sort: Option<(usize, SortDirection)>,
}

impl<'a, T> TableView<'a, T> {
    pub fn new(columns: Vec<Column<T>>, rows: &'a [T]) -> Self {
        Self {
            columns,
            rows,
            sort: None,
        }
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    /// Advance the sort state of `column`: unsorted, ascending, descending,
    /// then back to unsorted. Switching to another column starts at
    /// ascending. Unknown or unsortable columns leave the state untouched.
    pub fn toggle_sort(&mut self, column: usize) -> Option<(usize, SortDirection)> {
        if !self.columns.get(column).is_some_and(|c| c.sortable) {
            return self.sort;
        }

        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
        self.sort
    }

    pub fn toggle_sort_by_header(&mut self, header: &str) -> Option<(usize, SortDirection)> {
        match self.columns.iter().position(|c| c.header == header) {
            Some(index) => self.toggle_sort(index),
            None => self.sort,
        }
    }

    /// Jump straight to a sort state.
    pub fn set_sort(&mut self, column: usize, direction: SortDirection) {
        if self.columns.get(column).is_some_and(|c| c.sortable) {
            self.sort = Some((column, direction));
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Rows in display order. The underlying slice is never reordered.
    pub fn rows(&self) -> Vec<&'a T> {
        let mut rows: Vec<&'a T> = self.rows.iter().collect();
        if let Some((index, direction)) = self.sort {
            let accessor = &self.columns[index].accessor;
            // stable sort keeps input order among equal keys
            rows.sort_by(|a, b| {
                let ordering = accessor(*a).compare(&accessor(*b));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// Header labels, with a marker on the sorted column.
    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| match self.sort {
                Some((sorted, direction)) if sorted == index => {
                    format!("{} {}", column.header, direction.marker())
                }
                _ => column.header.clone(),
            })
            .collect()
    }

    pub fn cells(&self) -> Vec<Vec<CellValue>> {
        self.rows()
            .into_iter()
            .map(|row| self.columns.iter().map(|c| (c.accessor)(row)).collect())
            .collect()
    }
}
