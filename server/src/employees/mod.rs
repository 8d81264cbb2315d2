//! REST surface for employee records under `/api/employees`.

mod payload;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use platform_api::{ApiError, ApiResult};
use products_hr::{Employee, EmployeeError, EmployeePage, EmployeeService};

use crate::http::AppState;
use payload::{CreateEmployeeRequest, ListEmployeesParams, Payload, UpdateEmployeeRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route(
            "/api/employees/{id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

async fn list_employees(
    State(service): State<EmployeeService>,
    params: Result<Query<ListEmployeesParams>, QueryRejection>,
) -> ApiResult<Json<EmployeePage>> {
    let Query(params) = params.map_err(|err| ApiError::invalid_input(err.body_text()))?;
    let page = service
        .list(params.into())
        .await
        .map_err(employee_error)?;
    Ok(Json(page))
}

async fn create_employee(
    State(service): State<EmployeeService>,
    Payload(body): Payload<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let new = body.into_validated()?;
    let created = service.create(new).await.map_err(employee_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_employee(
    State(service): State<EmployeeService>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    let employee = service.get(employee_id(id)?).await.map_err(employee_error)?;
    Ok(Json(employee))
}

async fn update_employee(
    State(service): State<EmployeeService>,
    id: Result<Path<i32>, PathRejection>,
    Payload(body): Payload<UpdateEmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    let updated = service
        .update(employee_id(id)?, body.into())
        .await
        .map_err(employee_error)?;
    Ok(Json(updated))
}

async fn delete_employee(
    State(service): State<EmployeeService>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    let deleted = service
        .delete(employee_id(id)?)
        .await
        .map_err(employee_error)?;
    Ok(Json(deleted))
}

fn employee_id(id: Result<Path<i32>, PathRejection>) -> ApiResult<i32> {
    id.map(|Path(id)| id)
        .map_err(|err| ApiError::invalid_input(err.body_text()))
}

fn employee_error(err: EmployeeError) -> ApiError {
    let message = err.to_string();
    match err {
        EmployeeError::DuplicateEmail | EmployeeError::DuplicatePhoneNumber => {
            ApiError::Duplicate(message)
        }
        EmployeeError::NotFound(_) => ApiError::NotFound(message),
        EmployeeError::InvalidPagination(_) => ApiError::InvalidInput(message),
        // Already logged where it was caught.
        EmployeeError::Database(inner) => ApiError::internal(inner.into()),
    }
}
