pub mod employees;

pub mod prelude {
    pub use crate::employees::Entity as Employees;
}
