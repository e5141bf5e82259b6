//! Extractors that reject malformed input with 422.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use blog_core::error::AppError;

use crate::error::ApiError;

/// Flatten validation errors into one readable message.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|err| {
                    let reason = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    format!("{field}: {reason}")
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

fn check<T: Validate>(value: &T) -> Result<(), ApiError> {
    value
        .validate()
        .map_err(|errors| ApiError(AppError::validation(describe(&errors))))
}

/// JSON body that passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AppError::validation(rejection.body_text())))?;
        check(&value)?;
        Ok(Self(value))
    }
}

/// Form-urlencoded body that passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AppError::validation(rejection.body_text())))?;
        check(&value)?;
        Ok(Self(value))
    }
}

/// Query string that passed deserialization; failures are a 422.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError(AppError::validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}
