use std::str::FromStr;

use entity::employees::{Column, Model as Employee};
use sea_orm::Order;
use serde::{Deserialize, Serialize};

use crate::error::{EmployeeError, EmployeeResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction `{other}`, expected asc or desc")),
        }
    }
}

impl From<SortDirection> for Order {
    fn from(value: SortDirection) -> Self {
        match value {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Columns a listing may be sorted on, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    FirstName,
    LastName,
    Position,
}

impl SortKey {
    pub fn column(self) -> Column {
        match self {
            SortKey::FirstName => Column::FirstName,
            SortKey::LastName => Column::LastName,
            SortKey::Position => Column::Position,
        }
    }
}

/// Listing request: optional per-column sort directions plus a 1-based page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub first_name: Option<SortDirection>,
    pub last_name: Option<SortDirection>,
    pub position: Option<SortDirection>,
    pub page: i64,
    pub size: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            first_name: None,
            last_name: None,
            position: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Rows to skip and rows to take for one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub size: u64,
    pub offset: u64,
}

impl ListQuery {
    /// Active sort keys in priority order; keys without a direction are left out.
    pub fn sort_order(&self) -> Vec<(SortKey, SortDirection)> {
        [
            (SortKey::FirstName, self.first_name),
            (SortKey::LastName, self.last_name),
            (SortKey::Position, self.position),
        ]
        .into_iter()
        .filter_map(|(key, direction)| direction.map(|direction| (key, direction)))
        .collect()
    }

    pub fn window(&self) -> EmployeeResult<PageWindow> {
        let page = u64::try_from(self.page)
            .ok()
            .filter(|page| *page >= 1)
            .ok_or(EmployeeError::InvalidPagination("page must be at least 1"))?;
        let size = u64::try_from(self.size)
            .ok()
            .filter(|size| *size >= 1)
            .ok_or(EmployeeError::InvalidPagination("size must be at least 1"))?;
        // Stores bind offsets as signed 64-bit integers.
        let offset = (page - 1)
            .checked_mul(size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or(EmployeeError::InvalidPagination("page is out of range"))?;
        Ok(PageWindow { page, size, offset })
    }
}

/// One page of a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmployeePage {
    pub current_page: u64,
    pub data: Vec<Employee>,
    pub total_items: u64,
    pub total_pages: u64,
}

impl EmployeePage {
    pub fn new(window: PageWindow, data: Vec<Employee>, total_items: u64) -> Self {
        Self {
            current_page: window.page,
            data,
            total_items,
            total_pages: total_pages(total_items, window.size),
        }
    }
}

/// `ceil(total_items / size)`; `size` is never zero once a window is validated.
pub fn total_pages(total_items: u64, size: u64) -> u64 {
    if size == 0 {
        return 0;
    }
    total_items.div_ceil(size)
}
