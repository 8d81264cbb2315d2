//! HR vertical slice.
//!
//! Business rules for employee records live here: uniqueness of email and phone number,
//! existence checks, partial-update merging and offset/limit pagination. The HTTP surface
//! only parses input and shapes responses around [`EmployeeService`].

mod error;
mod pagination;
mod service;

pub use entity::employees::Model as Employee;
pub use error::{EmployeeError, EmployeeResult};
pub use pagination::{EmployeePage, ListQuery, PageWindow, SortDirection, SortKey, total_pages};
pub use service::{EmployeePatch, EmployeeService, NewEmployee};
