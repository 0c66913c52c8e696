// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request body extraction.
//!
//! [`Payload`] accepts the two encodings clients send issue bodies in:
//! JSON and HTML form submissions (`application/x-www-form-urlencoded`).
//! An empty body decodes to `T::default()`, so a create with no body reports
//! missing fields instead of a transport error. In either encoding a blank
//! timestamp or flag counts as not supplied.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Fields carrying booleans rather than text.
const FLAG_FIELDS: &[&str] = &["open"];

/// Fields whose blank value means "not supplied" rather than "set to empty".
const TYPED_FIELDS: &[&str] = &["created_on", "updated_on", "open"];

/// A decoded request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e.body_text())))?;

        decode(&bytes, is_form).map(Payload)
    }
}

/// Decodes a raw body as form data or JSON.
pub fn decode<T>(bytes: &[u8], is_form: bool) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let mut value = if is_form {
        form_to_json(bytes)?
    } else {
        serde_json::from_slice::<Value>(bytes).map_err(invalid_body)?
    };
    if let Value::Object(ref mut object) = value {
        normalize_typed_fields(object);
    }

    serde_json::from_value(value).map_err(invalid_body)
}

/// Converts form pairs into a JSON object.
///
/// Blank values are dropped (an empty form input means "not supplied").
/// Repeated keys keep the last value.
fn form_to_json(bytes: &[u8]) -> Result<Value, ApiError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes).map_err(invalid_body)?;

    let object: Map<String, Value> = pairs
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Ok(Value::Object(object))
}

/// Drops blank timestamps and flags, and turns `"true"`/`"false"` flags into booleans.
fn normalize_typed_fields(object: &mut Map<String, Value>) {
    for key in TYPED_FIELDS {
        if object.get(*key).and_then(Value::as_str) == Some("") {
            object.remove(*key);
        }
    }
    for key in FLAG_FIELDS {
        let flag = match object.get(*key).and_then(Value::as_str) {
            Some("true") => true,
            Some("false") => false,
            _ => continue,
        };
        object.insert((*key).to_string(), Value::Bool(flag));
    }
}

fn invalid_body(err: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("invalid request body: {err}"))
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
