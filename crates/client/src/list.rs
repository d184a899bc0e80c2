//! State of the upcoming-surgeries list: rows, sorting and pagination.

use crate::{ClientError, ClientResult, SurgeryClient};
use api_shared::Surgery;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable list column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    DateTime,
    SurgeryType,
    Surgeon,
    Patient,
    Status,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::DateTime => "dateTime",
            Column::SurgeryType => "surgeryType",
            Column::Surgeon => "surgeon",
            Column::Patient => "patient",
            Column::Status => "status",
        }
    }

    fn compare(self, a: &Surgery, b: &Surgery) -> Ordering {
        match self {
            Column::DateTime => a.date_time.cmp(&b.date_time),
            Column::SurgeryType => a.surgery_type.cmp(&b.surgery_type),
            Column::Surgeon => a.surgeon.cmp(&b.surgeon),
            Column::Patient => a.patient.name.cmp(&b.patient.name),
            Column::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateTime" => Ok(Column::DateTime),
            "surgeryType" => Ok(Column::SurgeryType),
            "surgeon" => Ok(Column::Surgeon),
            "patient" => Ok(Column::Patient),
            "status" => Ok(Column::Status),
            other => Err(ClientError::InvalidInput(format!(
                "unknown column '{other}' (expected dateTime, surgeryType, surgeon, patient or status)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub column: Column,
    pub direction: SortDirection,
}

/// List view state.
///
/// Rows keep the server's order until a column is chosen. `page` is zero-based and always within
/// `0..page_count()`.
#[derive(Clone, Debug)]
pub struct ListView {
    rows: Vec<Surgery>,
    sort: Option<Sort>,
    page: usize,
    page_size: usize,
    loaded: bool,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            loaded: false,
        }
    }
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the upcoming list from the server.
    ///
    /// On failure the error is logged and previously shown rows stay in place.
    pub async fn load(&mut self, client: &SurgeryClient) -> ClientResult<()> {
        match client.list().await {
            Ok(rows) => {
                self.show(rows);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load surgeries");
                Err(e)
            }
        }
    }

    /// Replace the rows, keeping sort and page size.
    pub fn show(&mut self, rows: Vec<Surgery>) {
        self.rows = rows;
        self.loaded = true;
        self.clamp_page();
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn rows(&self) -> &[Surgery] {
        &self.rows
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Sort by `column`. Choosing the current column again flips the direction.
    pub fn sort_by(&mut self, column: Column) {
        self.sort = Some(match self.sort {
            Some(current) if current.column == column => Sort {
                column,
                direction: current.direction.toggled(),
            },
            _ => Sort {
                column,
                direction: SortDirection::Ascending,
            },
        });
        self.page = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size; only the sizes in [`PAGE_SIZES`] are accepted.
    pub fn set_page_size(&mut self, size: usize) -> ClientResult<()> {
        if !PAGE_SIZES.contains(&size) {
            return Err(ClientError::InvalidInput(format!(
                "page size {size} is not one of {PAGE_SIZES:?}"
            )));
        }
        self.page_size = size;
        self.page = 0;
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Number of pages; an empty list still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    pub fn sorted_rows(&self) -> Vec<&Surgery> {
        let mut rows: Vec<&Surgery> = self.rows.iter().collect();
        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ord = sort.column.compare(a, b);
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    /// Rows on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&Surgery> {
        self.sorted_rows()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Cancel `id`, then reload so the row drops out of the upcoming list.
    pub async fn cancel(&mut self, client: &SurgeryClient, id: &str) -> ClientResult<()> {
        if let Err(e) = client.cancel(id).await {
            tracing::error!(error = %e, %id, "failed to cancel surgery");
            return Err(e);
        }
        self.load(client).await
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
    }
}
