//! Hosted record store client
//!
//! Talks to the PostgREST interface of a hosted Postgres service. Each read
//! is a single `GET /rest/v1/{table}` filtered by `user_id`.

use super::store::{RecordStore, StoreError};
use crate::model::{Activity, Client, Collection, Employee, Invoice, Project};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 15;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Record store reached over HTTP
pub struct RestStore {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestStore {
    pub fn new(
        base_url: &str,
        api_key: &str,
        access_token: Option<String>,
    ) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token,
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table_name())
    }

    fn select<T: DeserializeOwned>(
        &self,
        collection: Collection,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>, StoreError> {
        let table = collection.table_name();
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);

        tracing::debug!(table, user_id, "selecting rows");

        let response = self
            .http
            .get(self.table_url(collection))
            .query(&query_params(collection, user_id, limit))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| StoreError::Request {
                table,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| StoreError::Request {
            table,
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(StoreError::Status {
                table,
                status,
                body: text,
            });
        }

        parse_rows(table, &text)
    }
}

/// Query string for a user-scoped read
fn query_params(
    collection: Collection,
    user_id: &str,
    limit: Option<usize>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", user_id)),
    ];
    if collection == Collection::Activities {
        params.push(("order", "created_at.desc".to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

/// Decode a response body; an empty body is an empty table
fn parse_rows<T: DeserializeOwned>(table: &'static str, body: &str) -> Result<Vec<T>, StoreError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|e| StoreError::Decode {
        table,
        message: e.to_string(),
    })
}

impl RecordStore for RestStore {
    fn projects(&self, user_id: &str) -> Result<Vec<Project>, StoreError> {
        self.select(Collection::Projects, user_id, None)
    }

    fn clients(&self, user_id: &str) -> Result<Vec<Client>, StoreError> {
        self.select(Collection::Clients, user_id, None)
    }

    fn invoices(&self, user_id: &str) -> Result<Vec<Invoice>, StoreError> {
        self.select(Collection::Invoices, user_id, None)
    }

    fn employees(&self, user_id: &str) -> Result<Vec<Employee>, StoreError> {
        self.select(Collection::Employees, user_id, None)
    }

    fn recent_activities(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError> {
        self.select(Collection::Activities, user_id, Some(limit))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_filter_by_user() {
        let params = query_params(Collection::Invoices, "abc-123", None);
        assert_eq!(
            params,
            vec![
                ("select", "*".to_string()),
                ("user_id", "eq.abc-123".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_order_and_limit_activities() {
        let params = query_params(Collection::Activities, "u1", Some(10));
        assert!(params.contains(&("order", "created_at.desc".to_string())));
        assert!(params.contains(&("limit", "10".to_string())));
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let store = RestStore::new("https://db.example.com/", "key", None).unwrap();
        assert_eq!(
            store.table_url(Collection::Employees),
            "https://db.example.com/rest/v1/employees"
        );
        assert_eq!(store.describe(), "https://db.example.com");
    }

    #[test]
    fn test_parse_rows_empty_body_is_empty_table() {
        let rows: Vec<Project> = parse_rows("projects", "").unwrap();
        assert!(rows.is_empty());
        let rows: Vec<Project> = parse_rows("projects", "[]").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_rows_reports_decode_error() {
        let err = parse_rows::<Invoice>("invoices", r#"[{"id":"1"}]"#).unwrap_err();
        assert!(matches!(err, StoreError::Decode { table: "invoices", .. }));
    }
}
