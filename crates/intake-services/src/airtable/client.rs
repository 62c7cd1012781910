use async_trait::async_trait;
use intake_core::AirtableConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::{
    AirtableRecord, BaseSummary, ErrorEnvelope, ListBasesResponse, ListTablesResponse,
    RecordWriteRequest, TableSchema,
};
use crate::records::{LeadStore, RecordFields, StoreError, StoreResult};

/// HTTP client for one Airtable table.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_url: String,
    access_token: String,
    base_id: String,
    table_name: String,
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("api_url", &self.api_url)
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> StoreResult<Self> {
        if config.access_token.trim().is_empty() {
            return Err(StoreError::Config("access token is empty".to_string()));
        }
        if config.base_id.trim().is_empty() || config.table_name.trim().is_empty() {
            return Err(StoreError::Config(
                "base id and table name are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            base_id: config.base_id.clone(),
            table_name: config.table_name.clone(),
        })
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_url,
            self.base_id,
            urlencoding::encode(&self.table_name)
        )
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.table_url(), urlencoding::encode(record_id))
    }

    fn meta_url(&self, path: &str) -> String {
        format!("{}/meta/{}", self.api_url, path)
    }

    /// Create a record. Values are typecast so select options and similar
    /// fields accept plain strings.
    pub async fn create_record(&self, fields: &RecordFields) -> StoreResult<AirtableRecord> {
        let request = self
            .client
            .post(self.table_url())
            .bearer_auth(&self.access_token)
            .json(&RecordWriteRequest {
                fields,
                typecast: true,
            });

        self.send_json(request).await
    }

    /// Update some fields of a record, leaving the others untouched.
    pub async fn update_record(
        &self,
        record_id: &str,
        fields: &RecordFields,
    ) -> StoreResult<AirtableRecord> {
        let request = self
            .client
            .patch(self.record_url(record_id))
            .bearer_auth(&self.access_token)
            .json(&RecordWriteRequest {
                fields,
                typecast: true,
            });

        self.send_json(request).await
    }

    /// PATCH a record with a hand-encoded body and explicit headers. No
    /// typecast flag, and the response body is not interpreted.
    pub async fn patch_record_raw(&self, record_id: &str, fields: &RecordFields) -> StoreResult<()> {
        let body = serde_json::to_vec(&serde_json::json!({ "fields": fields }))
            .map_err(|e| StoreError::Config(format!("Failed to encode request body: {}", e)))?;

        let response = self
            .client
            .patch(self.record_url(record_id))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// List every base the token can see, following pagination offsets.
    pub async fn list_bases(&self) -> StoreResult<Vec<BaseSummary>> {
        let mut bases = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.meta_url("bases"))
                .bearer_auth(&self.access_token);
            if let Some(ref offset) = offset {
                request = request.query(&[("offset", offset.as_str())]);
            }

            let page: ListBasesResponse = self.send_json(request).await?;
            bases.extend(page.bases);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(bases)
    }

    /// List the tables of the configured base with their field schemas.
    pub async fn list_tables(&self) -> StoreResult<Vec<TableSchema>> {
        let request = self
            .client
            .get(self.meta_url(&format!("bases/{}/tables", self.base_id)))
            .bearer_auth(&self.access_token);

        let response: ListTablesResponse = self.send_json(request).await?;
        Ok(response.tables)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn check_status(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => envelope.error.describe(),
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => body,
        };

        tracing::debug!(status = status.as_u16(), message = %message, "Airtable request failed");

        Err(StoreError::from_status(status.as_u16(), message))
    }
}

#[async_trait]
impl LeadStore for AirtableClient {
    async fn create(&self, fields: RecordFields) -> StoreResult<String> {
        let record = self.create_record(&fields).await?;
        tracing::debug!(record_id = %record.id, table = %self.table_name, "Airtable record created");
        Ok(record.id)
    }

    async fn update(&self, record_id: &str, fields: RecordFields) -> StoreResult<()> {
        self.update_record(record_id, &fields).await?;
        Ok(())
    }

    async fn patch_raw(&self, record_id: &str, fields: RecordFields) -> StoreResult<()> {
        self.patch_record_raw(record_id, &fields).await
    }

    async fn check_connectivity(&self) -> StoreResult<()> {
        let response = self
            .client
            .get(self.table_url())
            .bearer_auth(&self.access_token)
            .query(&[("maxRecords", "1")])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(api_url: String) -> AirtableConfig {
        AirtableConfig {
            api_url,
            access_token: "patTEST".to_string(),
            base_id: "appBASE".to_string(),
            table_name: "Leads".to_string(),
            attachment_field: "Aggrement".to_string(),
            timeout_secs: 5,
        }
    }

    fn fields(value: serde_json::Value) -> RecordFields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn new_rejects_empty_token() {
        let mut cfg = config("http://localhost".to_string());
        cfg.access_token = " ".to_string();
        assert!(matches!(AirtableClient::new(&cfg), Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn create_sends_fields_with_typecast_and_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/appBASE/Leads")
            .match_header("authorization", "Bearer patTEST")
            .match_body(Matcher::Json(json!({
                "fields": {"Name": "A", "Email": "a@b.co", "Case Description": "x"},
                "typecast": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"rec123","createdTime":"2024-01-01T00:00:00.000Z","fields":{}}"#)
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        let id = client
            .create(fields(json!({"Name": "A", "Email": "a@b.co", "Case Description": "x"})))
            .await
            .unwrap();

        assert_eq!(id, "rec123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_patches_the_record_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/appBASE/Leads/rec123")
            .match_body(Matcher::PartialJson(json!({
                "fields": {"Aggrement": [{"url": "https://f/x.pdf", "filename": "x.pdf"}]}
            })))
            .with_status(200)
            .with_body(r#"{"id":"rec123","fields":{}}"#)
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        client
            .update(
                "rec123",
                fields(json!({"Aggrement": [{"url": "https://f/x.pdf", "filename": "x.pdf"}]})),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn raw_patch_sends_explicit_headers_and_ignores_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/appBASE/Leads/rec123")
            .match_header("authorization", "Bearer patTEST")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"fields": {"Aggrement": "https://f/x.pdf"}})))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        client
            .patch_raw("rec123", fields(json!({"Aggrement": "https://f/x.pdf"})))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn status_codes_map_to_store_errors() {
        let mut server = mockito::Server::new_async().await;
        let _unauthorized = server
            .mock("PATCH", "/appBASE/Leads/rec401")
            .with_status(401)
            .with_body(r#"{"error":{"type":"AUTHENTICATION_REQUIRED","message":"no"}}"#)
            .create_async()
            .await;
        let _throttled = server
            .mock("PATCH", "/appBASE/Leads/rec429")
            .with_status(429)
            .create_async()
            .await;
        let _invalid = server
            .mock("PATCH", "/appBASE/Leads/rec422")
            .with_status(422)
            .with_body(r#"{"error":{"type":"INVALID_ATTACHMENT_OBJECT","message":"bad"}}"#)
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        let empty = RecordFields::new();

        assert_eq!(
            client.update("rec401", empty.clone()).await.unwrap_err(),
            StoreError::Unauthorized
        );
        assert_eq!(
            client.update("rec429", empty.clone()).await.unwrap_err(),
            StoreError::RateLimited
        );
        assert_eq!(
            client.patch_raw("rec422", empty).await.unwrap_err(),
            StoreError::Api {
                status: 422,
                message: "INVALID_ATTACHMENT_OBJECT: bad".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = AirtableClient::new(&config("http://127.0.0.1:1".to_string())).unwrap();
        let err = client.create(RecordFields::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
    }

    #[tokio::test]
    async fn list_bases_follows_offsets() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/meta/bases")
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"bases":[{"id":"app1","name":"One","permissionLevel":"create"}],"offset":"itr2"}"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/meta/bases")
            .match_query(Matcher::UrlEncoded("offset".into(), "itr2".into()))
            .with_status(200)
            .with_body(r#"{"bases":[{"id":"app2","name":"Two"}]}"#)
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        let bases = client.list_bases().await.unwrap();

        let ids: Vec<_> = bases.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["app1", "app2"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn list_tables_reads_schema() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/meta/bases/appBASE/tables")
            .with_status(200)
            .with_body(
                r#"{"tables":[{"id":"tbl1","name":"Leads","fields":[{"name":"Email","type":"email"}]}]}"#,
            )
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        let tables = client.list_tables().await.unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].fields[0].name, "Email");
        assert_eq!(tables[0].fields[0].field_type, "email");
    }

    #[tokio::test]
    async fn connectivity_check_reads_one_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/appBASE/Leads")
            .match_query(Matcher::UrlEncoded("maxRecords".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"records":[]}"#)
            .create_async()
            .await;

        let client = AirtableClient::new(&config(server.url())).unwrap();
        client.check_connectivity().await.unwrap();
        mock.assert_async().await;
    }
}
