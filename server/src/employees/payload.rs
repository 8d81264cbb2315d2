use std::str::FromStr;

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use platform_api::{ApiError, ApiResult, FieldErrors};
use products_hr::{EmployeePatch, ListQuery, NewEmployee, SortDirection};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

/// Query string of the listing route.
#[derive(Debug, Default, Deserialize)]
pub struct ListEmployeesParams {
    #[serde(default, deserialize_with = "sort_direction")]
    pub first_name: Option<SortDirection>,
    #[serde(default, deserialize_with = "sort_direction")]
    pub last_name: Option<SortDirection>,
    #[serde(default, deserialize_with = "sort_direction")]
    pub position: Option<SortDirection>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl From<ListEmployeesParams> for ListQuery {
    fn from(params: ListEmployeesParams) -> Self {
        let defaults = ListQuery::default();
        Self {
            first_name: params.first_name,
            last_name: params.last_name,
            position: params.position,
            page: params.page.unwrap_or(defaults.page),
            size: params.size.unwrap_or(defaults.size),
        }
    }
}

/// A blank direction means "do not sort on this column".
fn sort_direction<'de, D>(deserializer: D) -> Result<Option<SortDirection>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => SortDirection::from_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Create body. Missing fields deserialize as empty strings and fail their rule.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateEmployeeRequest {
    #[validate(length(
        min = 1,
        max = 15,
        message = "first_name must be between 1 and 15 characters"
    ))]
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[validate(length(
        min = 1,
        max = 15,
        message = "last_name must be between 1 and 15 characters"
    ))]
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[validate(length(
        min = 1,
        max = 15,
        message = "position must be between 1 and 15 characters"
    ))]
    #[serde(deserialize_with = "null_as_empty")]
    pub position: String,
    #[validate(length(
        min = 10,
        max = 20,
        message = "phone_number must be between 10 and 20 characters"
    ))]
    #[serde(deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[validate(email(message = "email must be an email"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
}

/// `null` reads as an empty string so it fails the field rule like a missing value.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CreateEmployeeRequest {
    pub fn into_validated(self) -> ApiResult<NewEmployee> {
        self.validate().map_err(validation_error)?;
        Ok(NewEmployee {
            first_name: self.first_name,
            last_name: self.last_name,
            position: self.position,
            phone_number: self.phone_number,
            email: self.email,
        })
    }
}

/// Update body; accepted as-is, any subset of fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateEmployeeRequest> for EmployeePatch {
    fn from(body: UpdateEmployeeRequest) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            position: body.position,
            phone_number: body.phone_number,
            email: body.email,
        }
    }
}

fn validation_error(errors: ValidationErrors) -> ApiError {
    let fields: FieldErrors = errors
        .field_errors()
        .into_iter()
        .map(|(field, violations)| {
            let messages = violations
                .iter()
                .map(|violation| {
                    violation
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| violation.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    ApiError::Validation(fields)
}

/// Request body read as JSON, urlencoded form or multipart form, by content type.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|err| ApiError::invalid_input(err.body_text()))?;
            read_multipart(multipart).await.map(Self)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|err| ApiError::invalid_input(err.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|err| ApiError::invalid_input(err.body_text()))?;
            Ok(Self(value))
        }
    }
}

async fn read_multipart<T: DeserializeOwned>(mut multipart: Multipart) -> ApiResult<T> {
    let mut fields = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::invalid_input(err.to_string()))?
    {
        if field.file_name().is_some() {
            return Err(ApiError::invalid_input("file uploads are not accepted"));
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|err| ApiError::invalid_input(err.to_string()))?;
        fields.insert(name, Value::String(value));
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| ApiError::invalid_input(format!("invalid form body: {err}")))
}
