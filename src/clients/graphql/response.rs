//! Decoding of GraphQL response bodies.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlError;
use crate::clients::HttpResponse;

/// A validation error returned in a mutation payload's `userErrors`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field, if the server reported one.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable code, for payloads that select it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) if !field.is_empty() => write!(f, "{}: {}", field.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Outcome of one mutation, decided at the decoding boundary.
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// The mutation succeeded and the payload decoded.
    Ok(T),
    /// The server rejected the input (`userErrors` was non-empty).
    ValidationFailed(Vec<UserError>),
    /// The request failed, or the response was not a usable mutation payload.
    TransportFailed(GraphqlError),
}

impl<T> MutationOutcome<T> {
    /// Returns `true` for [`MutationOutcome::Ok`].
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns `true` when the failure means later requests cannot succeed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::TransportFailed(e) => e.is_fatal(),
            Self::Ok(_) | Self::ValidationFailed(_) => false,
        }
    }

    /// Collapses the outcome to the payload or a failure message.
    ///
    /// # Errors
    ///
    /// Returns the joined user error messages, or the transport error text.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::ValidationFailed(errors) => Err(errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")),
            Self::TransportFailed(error) => Err(error.to_string()),
        }
    }
}

/// Decodes a mutation response at `data.{root_field}.{payload_field}`.
///
/// - HTTP failures, a top-level `errors` field, a missing root, or a
///   payload that does not decode as `T` yield `TransportFailed`
/// - a non-empty `userErrors` array yields `ValidationFailed`
/// - otherwise the payload is decoded into `Ok(T)`
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use serde_json::json;
/// use shopify_data::clients::HttpResponse;
/// use shopify_data::clients::graphql::{decode_mutation, MutationOutcome};
///
/// let body = json!({"data": {"webhookSubscriptionCreate": {
///     "userErrors": [{"field": ["callbackUrl"], "message": "is invalid"}],
///     "webhookSubscription": null
/// }}});
/// let response = HttpResponse::new(200, HashMap::new(), body);
///
/// let outcome = decode_mutation::<serde_json::Value>(
///     Ok(response), "webhookSubscriptionCreate", "webhookSubscription");
/// assert!(matches!(outcome, MutationOutcome::ValidationFailed(ref e) if e.len() == 1));
/// ```
pub fn decode_mutation<T: DeserializeOwned>(
    result: Result<HttpResponse, GraphqlError>,
    root_field: &str,
    payload_field: &str,
) -> MutationOutcome<T> {
    let response = match result {
        Ok(response) => response,
        Err(error) => return MutationOutcome::TransportFailed(error),
    };

    let root = match data_at(&response.body, &[root_field]) {
        Ok(root) => root,
        Err(error) => return MutationOutcome::TransportFailed(error),
    };

    if let Some(raw_errors) = root.get("userErrors").filter(|v| !is_empty(v)) {
        return match serde_json::from_value::<Vec<UserError>>(raw_errors.clone()) {
            Ok(errors) => MutationOutcome::ValidationFailed(errors),
            Err(e) => MutationOutcome::TransportFailed(GraphqlError::Decode {
                path: format!("data.{root_field}.userErrors"),
                message: e.to_string(),
            }),
        };
    }

    let path = format!("data.{root_field}.{payload_field}");
    match root.get(payload_field) {
        None | Some(Value::Null) => MutationOutcome::TransportFailed(GraphqlError::MissingData { path }),
        Some(payload) => match serde_json::from_value::<T>(payload.clone()) {
            Ok(value) => MutationOutcome::Ok(value),
            Err(e) => MutationOutcome::TransportFailed(GraphqlError::Decode {
                path,
                message: e.to_string(),
            }),
        },
    }
}

/// Returns the value at `data.{path...}`.
///
/// A top-level `errors` field takes precedence over any partial data.
///
/// # Errors
///
/// Returns [`GraphqlError::Query`] when the body has `errors`, and
/// [`GraphqlError::MissingData`] when any path segment is missing or null.
pub fn data_at<'a>(body: &'a Value, path: &[&str]) -> Result<&'a Value, GraphqlError> {
    if let Some(errors) = body.get("errors").filter(|v| !is_empty(v)) {
        return Err(GraphqlError::Query {
            message: error_messages(errors),
        });
    }

    let mut current = body.get("data").filter(|v| !v.is_null()).ok_or_else(|| {
        GraphqlError::MissingData {
            path: "data".to_string(),
        }
    })?;

    for (depth, segment) in path.iter().enumerate() {
        current = current
            .get(segment)
            .filter(|v| !v.is_null())
            .ok_or_else(|| GraphqlError::MissingData {
                path: format!("data.{}", path[..=depth].join(".")),
            })?;
    }

    Ok(current)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn error_messages(errors: &Value) -> String {
    match errors {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| item.to_string(), ToString::to_string)
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
