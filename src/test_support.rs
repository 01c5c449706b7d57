//! Helpers shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use wiremock::MockServer;

use crate::api::BusinessApiClient;
use crate::auth::AuthError;
use crate::endpoints::{Endpoint, EndpointTable, Operation};
use crate::http_utils::{HttpClient, HttpRequestConfig};
use crate::token_cache::{AccessToken, CachePolicy, CredentialCache, TokenSource};

pub(crate) struct StaticTokenSource(pub &'static str);

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Result<AccessToken, AuthError> {
        Ok(AccessToken::new(self.0.to_string(), None))
    }
}

/// Default endpoints with their scheme and host swapped for `base`.
pub(crate) fn mock_endpoints(base: &str) -> EndpointTable {
    let defaults = EndpointTable::default();
    let overrides: BTreeMap<Operation, Endpoint> = Operation::iter()
        .map(|operation| {
            let mut endpoint = defaults.endpoint(operation).unwrap().clone();
            let host_end = endpoint.url["https://".len()..]
                .find('/')
                .map(|i| i + "https://".len())
                .unwrap();
            endpoint.url = format!("{}{}", base, &endpoint.url[host_end..]);
            (operation, endpoint)
        })
        .collect();
    defaults.with_overrides(&overrides)
}

pub(crate) fn api_client(server: &MockServer) -> BusinessApiClient {
    let credentials = CredentialCache::new(Arc::new(StaticTokenSource("test-token")), CachePolicy::Process);
    BusinessApiClient::new(
        HttpClient::new(HttpRequestConfig::default()).unwrap(),
        Arc::new(credentials),
        mock_endpoints(&server.uri()),
    )
}
