use entity::employees::{self, Column, Entity as Employees, Model as Employee};
use platform_db::DbPool;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::{EmployeeError, EmployeeResult},
    pagination::{EmployeePage, ListQuery},
};

/// Fields required to create an employee. Field rules are checked by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub phone_number: String,
    pub email: String,
}

/// Partial update. `None` and `Some("")` both leave the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl EmployeePatch {
    fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|value| !value.is_empty())
        }
        Self {
            first_name: present(self.first_name),
            last_name: present(self.last_name),
            position: present(self.position),
            phone_number: present(self.phone_number),
            email: present(self.email),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum UniqueField {
    Email,
    PhoneNumber,
}

impl UniqueField {
    fn column(self) -> Column {
        match self {
            UniqueField::Email => Column::Email,
            UniqueField::PhoneNumber => Column::PhoneNumber,
        }
    }

    fn conflict(self) -> EmployeeError {
        match self {
            UniqueField::Email => EmployeeError::DuplicateEmail,
            UniqueField::PhoneNumber => EmployeeError::DuplicatePhoneNumber,
        }
    }
}

/// Employee data operations over the shared pool.
#[derive(Clone, Debug)]
pub struct EmployeeService {
    db: DbPool,
}

impl EmployeeService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// One page of employees plus the overall count.
    ///
    /// The page and the count are two independent reads, so they are not guaranteed to
    /// observe the same snapshot.
    #[instrument(name = "employees.list", skip_all, fields(page = query.page, size = query.size))]
    pub async fn list(&self, query: ListQuery) -> EmployeeResult<EmployeePage> {
        let window = query.window()?;
        let mut select = Employees::find();
        for (key, direction) in query.sort_order() {
            select = select.order_by(key.column(), direction.into());
        }
        let rows = select
            .order_by_asc(Column::Id)
            .offset(window.offset)
            .limit(window.size)
            .all(&self.db);
        let count = Employees::find().count(&self.db);
        let (data, total_items) =
            tokio::try_join!(rows, count).map_err(|err| storage_error("list", err))?;
        Ok(EmployeePage::new(window, data, total_items))
    }

    #[instrument(name = "employees.get", skip(self))]
    pub async fn get(&self, id: i32) -> EmployeeResult<Employee> {
        find_existing(&self.db, id).await
    }

    #[instrument(name = "employees.create", skip_all)]
    pub async fn create(&self, new: NewEmployee) -> EmployeeResult<Employee> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|err| storage_error("create", err))?;
        ensure_available(&txn, UniqueField::Email, &new.email).await?;
        ensure_available(&txn, UniqueField::PhoneNumber, &new.phone_number).await?;
        let created = employees::ActiveModel {
            id: NotSet,
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            position: Set(new.position),
            phone_number: Set(new.phone_number),
            email: Set(new.email),
        }
        .insert(&txn)
        .await
        .map_err(|err| storage_error("create", err))?;
        txn.commit()
            .await
            .map_err(|err| storage_error("create", err))?;
        info!(id = created.id, "employee created");
        Ok(created)
    }

    #[instrument(name = "employees.update", skip(self, patch))]
    pub async fn update(&self, id: i32, patch: EmployeePatch) -> EmployeeResult<Employee> {
        let patch = patch.normalized();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|err| storage_error("update", err))?;
        let existing = find_existing(&txn, id).await?;

        if let Some(email) = patch.email.as_deref().filter(|email| *email != existing.email) {
            ensure_available(&txn, UniqueField::Email, email).await?;
        }
        if let Some(phone_number) = patch
            .phone_number
            .as_deref()
            .filter(|phone_number| *phone_number != existing.phone_number)
        {
            ensure_available(&txn, UniqueField::PhoneNumber, phone_number).await?;
        }

        let mut active: employees::ActiveModel = existing.clone().into();
        if let Some(first_name) = patch.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(position) = patch.position {
            active.position = Set(position);
        }
        if let Some(phone_number) = patch.phone_number {
            active.phone_number = Set(phone_number);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }

        // An empty patch issues no UPDATE.
        let updated = if active.is_changed() {
            active
                .update(&txn)
                .await
                .map_err(|err| storage_error("update", err))?
        } else {
            existing
        };
        txn.commit()
            .await
            .map_err(|err| storage_error("update", err))?;
        info!(id, "employee updated");
        Ok(updated)
    }

    /// Removes the row and hands back what it held.
    #[instrument(name = "employees.delete", skip(self))]
    pub async fn delete(&self, id: i32) -> EmployeeResult<Employee> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|err| storage_error("delete", err))?;
        let existing = find_existing(&txn, id).await?;
        Employees::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|err| storage_error("delete", err))?;
        txn.commit()
            .await
            .map_err(|err| storage_error("delete", err))?;
        info!(id, "employee deleted");
        Ok(existing)
    }
}

async fn find_existing<C: ConnectionTrait>(conn: &C, id: i32) -> EmployeeResult<Employee> {
    Employees::find_by_id(id)
        .one(conn)
        .await
        .map_err(|err| storage_error("find", err))?
        .ok_or_else(|| {
            warn!(id, "employee not found");
            EmployeeError::NotFound(id)
        })
}

async fn ensure_available<C: ConnectionTrait>(
    conn: &C,
    field: UniqueField,
    value: &str,
) -> EmployeeResult<()> {
    let taken = Employees::find()
        .filter(field.column().eq(value))
        .one(conn)
        .await
        .map_err(|err| storage_error("uniqueness check", err))?;
    match taken {
        Some(holder) => {
            warn!(?field, holder = holder.id, "unique value already in use");
            Err(field.conflict())
        }
        None => Ok(()),
    }
}

/// Classifies a store error and logs the ones that are not business-rule failures.
fn storage_error(operation: &'static str, err: DbErr) -> EmployeeError {
    let err = EmployeeError::from(err);
    match &err {
        EmployeeError::Database(inner) => {
            error!(operation, error = ?inner, "employee storage failure");
        }
        conflict => warn!(operation, %conflict, "unique index rejected write"),
    }
    err
}
