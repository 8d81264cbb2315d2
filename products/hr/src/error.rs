use sea_orm::DbErr;
use thiserror::Error;

pub type EmployeeResult<T> = Result<T, EmployeeError>;

#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Phone number already exists")]
    DuplicatePhoneNumber,
    #[error("Employee with ID {0} not found")]
    NotFound(i32),
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl EmployeeError {
    /// Business-rule failures are the caller's fault; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EmployeeError::Database(_))
    }
}

impl From<DbErr> for EmployeeError {
    /// Unique-index violations surface as the matching duplicate error, whatever the
    /// backend. Index and column names both carry the field name.
    fn from(err: DbErr) -> Self {
        match platform_db::unique_violation(&err) {
            Some(message) if message.contains("phone_number") => Self::DuplicatePhoneNumber,
            Some(message) if message.contains("email") => Self::DuplicateEmail,
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_api_contract() {
        assert_eq!(EmployeeError::DuplicateEmail.to_string(), "Email already exists");
        assert_eq!(
            EmployeeError::DuplicatePhoneNumber.to_string(),
            "Phone number already exists"
        );
        assert_eq!(
            EmployeeError::NotFound(42).to_string(),
            "Employee with ID 42 not found"
        );
    }

    #[test]
    fn plain_database_errors_stay_internal() {
        let err = EmployeeError::from(DbErr::Custom("connection reset".into()));
        assert!(matches!(err, EmployeeError::Database(_)));
        assert!(!err.is_client_error());
        assert!(EmployeeError::NotFound(1).is_client_error());
    }
}
