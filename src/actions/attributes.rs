use std::io::Write;

use tracing::trace;

use crate::{
    actions::{
        utils::{account_names, location_names, write_records},
        CliActionError,
    },
    api::BusinessApiClient,
    format::OutputFormat,
};

/// Prints the attributes available to every location, one list per location.
pub async fn list_attributes<W: Write>(
    api: &BusinessApiClient,
    format: &OutputFormat,
    out: &mut W,
) -> Result<(), CliActionError> {
    trace!("Executing 'attributes-list' action");

    for account in account_names(api).await? {
        for location in location_names(api, &account).await? {
            let attributes = api.list_attributes(&location).await?;
            if !attributes.is_empty() {
                write_records(out, attributes, format)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::api_client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn prints_attribute_metadata_per_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accounts": [{"name": "accounts/1"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts/1/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locations": [{"name": "locations/10"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/attributes"))
            .and(query_param("parent", "locations/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "attributeMetadata": [{"parent": "attributes/has_wheelchair_accessible_entrance", "valueType": "BOOL"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut out = Vec::new();
        list_attributes(&api_client(&server), &OutputFormat::default(), &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("has_wheelchair_accessible_entrance"));
        assert_eq!(output.lines().count(), 1);
    }

    #[tokio::test]
    async fn locations_are_listed_one_account_at_a_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accounts": [{"name": "accounts/1"}, {"name": "accounts/2"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts/1/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locations": [{"name": "locations/10"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts/2/locations"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/attributes"))
            .and(query_param("parent", "locations/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "attributeMetadata": [{"parent": "attributes/has_takeout"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut out = Vec::new();
        let result = list_attributes(&api_client(&server), &OutputFormat::default(), &mut out).await;

        assert!(matches!(result, Err(CliActionError::ApiError(_))));
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("has_takeout"));
        assert_eq!(output.lines().count(), 1);
    }
}
