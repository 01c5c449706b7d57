use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::credential::ServiceCredential;
use crate::token_cache::{AccessToken, TokenSource};

pub const BUSINESS_MANAGE_SCOPE: &str = "https://www.googleapis.com/auth/business.manage";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("failed to sign the token assertion: {0}")]
    SigningError(#[from] jsonwebtoken::errors::Error),
    #[error("Authentication failed: {0}")]
    AuthFailed(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Removes every run of two or more consecutive periods from a token.
///
/// Single periods (the separators of a JWT-shaped token) are kept.
pub fn sanitize_token(raw: &str) -> String {
    let mut sanitized = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '.' {
            sanitized.push(c);
            continue;
        }

        let mut run = 1;
        while chars.peek() == Some(&'.') {
            chars.next();
            run += 1;
        }
        if run == 1 {
            sanitized.push('.');
        }
    }

    sanitized
}

/// Exchanges a signed service-account assertion for an access token
/// (OAuth 2.0 JWT bearer grant).
pub struct ServiceAccountAuthenticator {
    http: reqwest::Client,
    credential: ServiceCredential,
    subject: String,
    token_uri: String,
    scope: String,
}

impl ServiceAccountAuthenticator {
    /// Impersonates the service identity itself and talks to the token URI of
    /// the key file, or Google's default one.
    pub fn new(http: reqwest::Client, credential: ServiceCredential) -> Self {
        let subject = credential.client_email().to_string();
        let token_uri = credential
            .token_uri()
            .unwrap_or(DEFAULT_TOKEN_URI)
            .to_string();

        Self {
            http,
            credential,
            subject,
            token_uri,
            scope: BUSINESS_MANAGE_SCOPE.to_string(),
        }
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        if let Some(subject) = subject {
            self.subject = subject;
        }
        self
    }

    pub fn with_token_uri(mut self, token_uri: Option<String>) -> Self {
        if let Some(token_uri) = token_uri {
            self.token_uri = token_uri;
        }
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AssertionClaims {
            iss: self.credential.client_email(),
            sub: &self.subject,
            scope: &self.scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.credential.private_key().as_bytes())?;
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }

    pub async fn authenticate(&self) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        debug!("Authenticating with token URL: {}", &self.token_uri);
        debug!("Service account: {}, subject: {}", self.credential.client_email(), &self.subject);

        let params = [
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ];

        let response = self.http.post(&self.token_uri).form(&params).send().await?;
        let status = response.status();
        debug!("Authentication response status: {}", status);

        if status.is_success() {
            let body = response.text().await?;
            let token_response: TokenResponse = serde_json::from_str(&body)?;
            debug!("Authentication successful, received {:?} token", token_response.token_type);

            let expires_at = match token_response.expires_in {
                Some(seconds) => Some(expiry_instant(now, seconds)?),
                None => None,
            };
            Ok(AccessToken::new(
                sanitize_token(&token_response.access_token),
                expires_at,
            ))
        } else {
            let error_body = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to read error response body: {}", e);
                    "Unable to read error response body".to_string()
                }
            };
            error!("Authentication request failed with status {}: {}", status, &error_body);

            Err(AuthError::AuthFailed(format!(
                "HTTP {} {}",
                status,
                describe_oauth_error(&error_body)
            )))
        }
    }
}

#[async_trait]
impl TokenSource for ServiceAccountAuthenticator {
    async fn fetch_token(&self) -> Result<AccessToken, AuthError> {
        self.authenticate().await
    }
}

/// Absolute expiry of a token issued at `now` and valid for `seconds`.
fn expiry_instant(now: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>, AuthError> {
    Duration::try_seconds(seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AuthError::AuthFailed(format!("token endpoint returned an invalid expires_in of {}", seconds)))
}

/// Turns an OAuth error response into a message fit for the user.
fn describe_oauth_error(body: &str) -> String {
    let error_json = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(error_json) => error_json,
        Err(json_err) => {
            warn!("Failed to parse error response as JSON: {}", json_err);
            return body.to_string();
        }
    };

    let Some(error_str) = error_json.get("error").and_then(|e| e.as_str()) else {
        return body.to_string();
    };

    let error_description = error_json
        .get("error_description")
        .and_then(|d| d.as_str())
        .map(|d| format!(" - {}", d))
        .unwrap_or_default();

    match error_str {
        "invalid_grant" => format!(
            "Invalid grant{}. The service account key may be revoked or the impersonation subject is not allowed.",
            error_description
        ),
        "invalid_client" => format!(
            "Invalid client{}. Please check the client_email and private_key of the key file.",
            error_description
        ),
        "unauthorized_client" => format!(
            "Unauthorized client{}. The service account is not authorized for the requested scope.",
            error_description
        ),
        "invalid_scope" => format!("Invalid scope{}.", error_description),
        _ => format!("{}{}", error_str, error_description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture_credential() -> ServiceCredential {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/service_account.json");
        ServiceCredential::load_from_file(&path).unwrap()
    }

    fn authenticator(server: &MockServer) -> ServiceAccountAuthenticator {
        ServiceAccountAuthenticator::new(reqwest::Client::new(), fixture_credential())
            .with_token_uri(Some(format!("{}/token", server.uri())))
    }

    #[test]
    fn sanitize_removes_runs_of_periods() {
        assert_eq!(sanitize_token("abc..def"), "abcdef");
        assert_eq!(sanitize_token("a...b....c"), "abc");
        assert_eq!(sanitize_token("..leading"), "leading");
        assert_eq!(sanitize_token("trailing.."), "trailing");
    }

    #[test]
    fn sanitize_keeps_tokens_without_runs() {
        assert_eq!(sanitize_token("ya29.a0AfH6SMB"), "ya29.a0AfH6SMB");
        assert_eq!(sanitize_token("header.payload.signature"), "header.payload.signature");
        assert_eq!(sanitize_token(""), "");
    }

    #[test]
    fn subject_defaults_to_service_identity() {
        let authenticator = ServiceAccountAuthenticator::new(reqwest::Client::new(), fixture_credential());
        assert_eq!(authenticator.subject(), "gmb-test@gmb-test.iam.gserviceaccount.com");
        assert_eq!(authenticator.token_uri(), DEFAULT_TOKEN_URI);

        let authenticator = authenticator.with_subject(Some("owner@example.com".to_string()));
        assert_eq!(authenticator.subject(), "owner@example.com");
    }

    #[test]
    fn malformed_private_key_fails_to_sign() {
        let credential = ServiceCredential::new("svc@example.com".to_string(), "not a pem".to_string());
        let authenticator = ServiceAccountAuthenticator::new(reqwest::Client::new(), credential);
        let result = authenticator.sign_assertion(Utc::now());
        assert!(matches!(result, Err(AuthError::SigningError(_))));
    }

    #[tokio::test]
    async fn exchanges_assertion_for_sanitized_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29..abc.def",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let before = Utc::now();
        let token = authenticator(&server).authenticate().await.unwrap();

        assert_eq!(token.secret(), "ya29abc.def");
        let expires_at = token.expires_at().unwrap();
        assert!(expires_at >= before + Duration::seconds(3599));
    }

    #[tokio::test]
    async fn rejected_exchange_is_an_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&server)
            .await;

        match authenticator(&server).authenticate().await {
            Err(AuthError::AuthFailed(message)) => {
                assert!(message.contains("400"));
                assert!(message.contains("Invalid grant - Invalid JWT Signature."));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn undecodable_token_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = authenticator(&server).authenticate().await;
        assert!(matches!(result, Err(AuthError::JsonError(_))));
    }

    #[tokio::test]
    async fn out_of_range_expiry_is_an_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": i64::MAX
            })))
            .mount(&server)
            .await;

        match authenticator(&server).authenticate().await {
            Err(AuthError::AuthFailed(message)) => assert!(message.contains("expires_in")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn expiry_instant_rejects_overflow() {
        let now = Utc::now();
        assert_eq!(expiry_instant(now, 60).unwrap(), now + Duration::seconds(60));
        assert!(expiry_instant(now, i64::MAX / 1000).is_err());
        assert!(expiry_instant(now, i64::MIN).is_err());
    }

    #[test]
    fn non_json_error_body_is_passed_through() {
        assert_eq!(describe_oauth_error("Bad Gateway"), "Bad Gateway");
        assert_eq!(describe_oauth_error(r#"{"error":"weird"}"#), "weird");
    }
}
