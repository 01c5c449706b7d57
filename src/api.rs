//! Business Profile API client.
//!
//! Each operation authenticates through the shared [`CredentialCache`], sends
//! exactly one request to the endpoint configured for it and hands back the
//! records found under the endpoint's response field. Records are opaque
//! JSON values and are returned in the order the service sent them.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthError;
use crate::endpoints::{EndpointError, EndpointTable, Operation, PathParams};
use crate::http_utils::HttpClient;
use crate::model::Record;
use crate::token_cache::CredentialCache;

/// Error emitted by the Business Profile API client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{url} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("expected an array under {field:?} but found {found}")]
    UnexpectedPayload { field: String, found: String },
    #[error("{0}")]
    EndpointError(#[from] EndpointError),
    #[error("{0}")]
    AuthError(#[from] AuthError),
}

pub struct BusinessApiClient {
    http: HttpClient,
    credentials: Arc<CredentialCache>,
    endpoints: EndpointTable,
}

impl BusinessApiClient {
    pub fn new(http: HttpClient, credentials: Arc<CredentialCache>, endpoints: EndpointTable) -> Self {
        Self {
            http,
            credentials,
            endpoints,
        }
    }

    async fn call(&self, operation: Operation, params: PathParams<'_>) -> Result<(Value, Option<&str>), ApiError> {
        let endpoint = self.endpoints.endpoint(operation)?;
        let url = endpoint.render(operation, &params)?;
        debug!("Calling {}", operation);

        let token = self.credentials.token().await?;
        let body = self.http.execute(endpoint.method, url, token.secret()).await?;

        Ok((body, endpoint.field.as_deref()))
    }

    async fn call_list(&self, operation: Operation, params: PathParams<'_>) -> Result<Vec<Record>, ApiError> {
        let (body, field) = self.call(operation, params).await?;
        let records = extract_records(body, field)?;
        debug!("{} returned {} record(s)", operation, records.len());
        Ok(records)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Record>, ApiError> {
        self.call_list(Operation::ListAccounts, PathParams::none()).await
    }

    pub async fn list_locations(&self, account: &str) -> Result<Vec<Record>, ApiError> {
        self.call_list(Operation::ListLocations, PathParams::account(account))
            .await
    }

    pub async fn list_invitations(&self, account: &str) -> Result<Vec<Record>, ApiError> {
        self.call_list(Operation::ListInvitations, PathParams::account(account))
            .await
    }

    /// Accepts a pending invitation and returns the raw response body.
    pub async fn accept_invitation(&self, invitation: &str) -> Result<Value, ApiError> {
        let (body, field) = self
            .call(Operation::AcceptInvitation, PathParams::invitation(invitation))
            .await?;
        match (body, field) {
            (Value::Object(mut map), Some(field)) => Ok(map.remove(field).unwrap_or(Value::Null)),
            (body, _) => Ok(body),
        }
    }

    pub async fn list_reviews(&self, account: &str, location: &str) -> Result<Vec<Record>, ApiError> {
        self.call_list(
            Operation::ListReviews,
            PathParams::account_location(account, location),
        )
        .await
    }

    pub async fn list_categories(&self) -> Result<Vec<Record>, ApiError> {
        self.call_list(Operation::ListCategories, PathParams::none()).await
    }

    pub async fn list_attributes(&self, location: &str) -> Result<Vec<Record>, ApiError> {
        self.call_list(Operation::ListAttributes, PathParams::location(location))
            .await
    }
}

/// Pulls the record array out of a response body.
///
/// The service leaves out empty arrays, so a missing or `null` field is an
/// empty list rather than an error.
pub fn extract_records(body: Value, field: Option<&str>) -> Result<Vec<Record>, ApiError> {
    let value = match (field, body) {
        (Some(field), Value::Object(mut map)) => map.remove(field).unwrap_or(Value::Null),
        (Some(field), other) => {
            return Err(ApiError::UnexpectedPayload {
                field: field.to_string(),
                found: json_kind(&other).to_string(),
            })
        }
        (None, body) => body,
    };

    match value {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::UnexpectedPayload {
            field: field.unwrap_or("<body>").to_string(),
            found: json_kind(&other).to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
