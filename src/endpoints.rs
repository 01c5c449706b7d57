//! Resource URLs of the Business Profile APIs.
//!
//! Every API operation maps to an [`Endpoint`]: the HTTP method, a URL
//! template with `{account}`, `{location}` and `{invitation}` placeholders,
//! the fixed query parameters and the response field holding the records.
//! The defaults can be overridden per operation from the configuration file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use url::Url;

const ACCOUNT_MANAGEMENT_URL: &str = "https://mybusinessaccountmanagement.googleapis.com/v1";
const BUSINESS_INFORMATION_URL: &str = "https://mybusinessbusinessinformation.googleapis.com/v1";
const LEGACY_URL: &str = "https://mybusiness.googleapis.com/v4";

const LOCATION_READ_MASK: &str = "name,categories.primaryCategory,serviceArea,storefrontAddress";
const REGION_CODE: &str = "IT";
const LANGUAGE_CODE: &str = "it";

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("no endpoint defined for operation {0}")]
    UndefinedOperation(Operation),
    #[error("operation {operation} needs a value for {{{name}}}")]
    MissingParameter { operation: Operation, name: String },
    #[error("invalid URL {url:?} for operation {operation}: {cause}")]
    InvalidUrl {
        operation: Operation,
        url: String,
        cause: url::ParseError,
    },
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
    ListAccounts,
    ListLocations,
    ListInvitations,
    AcceptInvitation,
    ListReviews,
    ListCategories,
    ListAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

impl QueryParam {
    pub fn new(name: &str, value: &str) -> QueryParam {
        QueryParam {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QueryParam>,
    /// Response field holding the records; `None` returns the whole body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Identifiers substituted into endpoint templates. Values are resource
/// names such as `accounts/123` and are inserted verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParams<'a> {
    pub account: Option<&'a str>,
    pub location: Option<&'a str>,
    pub invitation: Option<&'a str>,
}

impl<'a> PathParams<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn account(account: &'a str) -> Self {
        Self {
            account: Some(account),
            ..Self::default()
        }
    }

    pub fn location(location: &'a str) -> Self {
        Self {
            location: Some(location),
            ..Self::default()
        }
    }

    pub fn invitation(invitation: &'a str) -> Self {
        Self {
            invitation: Some(invitation),
            ..Self::default()
        }
    }

    pub fn account_location(account: &'a str, location: &'a str) -> Self {
        Self {
            account: Some(account),
            location: Some(location),
            ..Self::default()
        }
    }

    fn placeholders(&self) -> [(&'static str, &'static str, Option<&'a str>); 3] {
        [
            ("{account}", "account", self.account),
            ("{location}", "location", self.location),
            ("{invitation}", "invitation", self.invitation),
        ]
    }
}

impl Endpoint {
    fn new(method: HttpMethod, url: String, query: Vec<QueryParam>, field: Option<&str>) -> Endpoint {
        Endpoint {
            method,
            url,
            query,
            field: field.map(str::to_string),
        }
    }

    fn substitute(
        operation: Operation,
        template: &str,
        params: &PathParams<'_>,
    ) -> Result<String, EndpointError> {
        let mut rendered = template.to_string();
        for (placeholder, name, value) in params.placeholders() {
            if !rendered.contains(placeholder) {
                continue;
            }
            let value = value.ok_or_else(|| EndpointError::MissingParameter {
                operation,
                name: name.to_string(),
            })?;
            rendered = rendered.replace(placeholder, value);
        }
        Ok(rendered)
    }

    /// Builds the request URL for `operation` from this endpoint's template.
    pub fn render(&self, operation: Operation, params: &PathParams<'_>) -> Result<Url, EndpointError> {
        let rendered = Self::substitute(operation, &self.url, params)?;
        let mut url = Url::parse(&rendered).map_err(|cause| EndpointError::InvalidUrl {
            operation,
            url: rendered.clone(),
            cause,
        })?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in &self.query {
                let value = Self::substitute(operation, &param.value, params)?;
                pairs.append_pair(&param.name, &value);
            }
        }

        Ok(url)
    }
}

/// Endpoint of every [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointTable {
    endpoints: BTreeMap<Operation, Endpoint>,
}

impl EndpointTable {
    pub fn endpoint(&self, operation: Operation) -> Result<&Endpoint, EndpointError> {
        self.endpoints
            .get(&operation)
            .ok_or(EndpointError::UndefinedOperation(operation))
    }

    /// Replaces the endpoints of the given operations, keeping the rest.
    pub fn with_overrides(mut self, overrides: &BTreeMap<Operation, Endpoint>) -> Self {
        for (operation, endpoint) in overrides {
            self.endpoints.insert(*operation, endpoint.clone());
        }
        self
    }

    fn default_endpoint(operation: Operation) -> Endpoint {
        use HttpMethod::{Get, Post};

        match operation {
            Operation::ListAccounts => Endpoint::new(
                Get,
                format!("{}/accounts", ACCOUNT_MANAGEMENT_URL),
                vec![],
                Some("accounts"),
            ),
            Operation::ListLocations => Endpoint::new(
                Get,
                format!("{}/{{account}}/locations", BUSINESS_INFORMATION_URL),
                vec![
                    QueryParam::new("readMask", LOCATION_READ_MASK),
                    QueryParam::new("pageSize", "100"),
                ],
                Some("locations"),
            ),
            Operation::ListInvitations => Endpoint::new(
                Get,
                format!("{}/{{account}}/invitations", BUSINESS_INFORMATION_URL),
                vec![],
                Some("invitations"),
            ),
            Operation::AcceptInvitation => Endpoint::new(
                Post,
                format!("{}/{{invitation}}:accept", BUSINESS_INFORMATION_URL),
                vec![],
                None,
            ),
            Operation::ListReviews => Endpoint::new(
                Get,
                format!("{}/{{account}}/{{location}}/reviews", LEGACY_URL),
                vec![],
                Some("reviews"),
            ),
            Operation::ListCategories => Endpoint::new(
                Get,
                format!("{}/categories", BUSINESS_INFORMATION_URL),
                vec![
                    QueryParam::new("regionCode", REGION_CODE),
                    QueryParam::new("languageCode", LANGUAGE_CODE),
                    QueryParam::new("view", "BASIC"),
                ],
                Some("categories"),
            ),
            Operation::ListAttributes => Endpoint::new(
                Get,
                format!("{}/attributes", BUSINESS_INFORMATION_URL),
                vec![
                    QueryParam::new("parent", "{location}"),
                    QueryParam::new("languageCode", LANGUAGE_CODE),
                ],
                Some("attributeMetadata"),
            ),
        }
    }
}

impl Default for EndpointTable {
    fn default() -> Self {
        EndpointTable {
            endpoints: Operation::iter()
                .map(|operation| (operation, Self::default_endpoint(operation)))
                .collect(),
        }
    }
}
