//! Hosted REST backend client.
//!
//! Speaks the PostgREST dialect: filters as `column=eq.value` query
//! params, OR'd `ilike` search, `order`/`offset`/`limit` pagination,
//! mutations with `Prefer: return=representation`, and exact counts via
//! the `Content-Range` response header. Authentication is an `apikey`
//! header plus a bearer token, both installed as default headers.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::info;

use homewiz_core::query::SortOrder;
use homewiz_core::store::{SelectQuery, SelectResult, StoreClient, StoreError};

use crate::config::DbConfig;

/// REST backend implementation of [`StoreClient`].
#[derive(Clone)]
pub struct RestStore {
    base: String,
    http: Client,
    /// When set, the backend is unconfigured and every operation fails
    /// fast with this reason instead of touching the network.
    disabled: Option<String>,
}

impl RestStore {
    pub fn new(config: &DbConfig) -> Self {
        if !config.is_configured() {
            return Self {
                base: String::new(),
                http: Client::new(),
                disabled: Some(
                    "backend URL or API key is missing or still a placeholder; \
                     set HOMEWIZ_BACKEND_URL and HOMEWIZ_BACKEND_KEY"
                        .to_string(),
                ),
            };
        }

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.api_key) {
            headers.insert("apikey", value);
        }
        let bearer = config
            .service_token
            .clone()
            .unwrap_or_else(|| config.api_key.clone());
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {bearer}")) {
            headers.insert(AUTHORIZATION, value);
        }

        let (http, disabled) = match Client::builder().default_headers(headers).build() {
            Ok(client) => (client, None),
            Err(err) => (
                Client::new(),
                Some(format!("failed to build HTTP client: {err}")),
            ),
        };

        info!(url = %config.url, "connected REST backend client");

        Self {
            base: config.url.trim_end_matches('/').to_string(),
            http,
            disabled,
        }
    }

    /// Whether the client will fail fast instead of issuing requests.
    pub fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }

    fn ensure_enabled(&self) -> Result<(), StoreError> {
        match &self.disabled {
            Some(reason) => Err(StoreError::NotConfigured(reason.clone())),
            None => Ok(()),
        }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(error_from_response(status, response).await)
    }

    async fn rows(&self, response: Response) -> Result<Vec<Value>, StoreError> {
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

/// Render a JSON value as a PostgREST filter literal.
fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn query_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];

    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{}", literal(value))));
    }

    for range in &query.ranges {
        if let Some(min) = &range.min {
            params.push((range.column.clone(), format!("gte.{}", literal(min))));
        }
        if let Some(max) = &range.max {
            params.push((range.column.clone(), format!("lte.{}", literal(max))));
        }
    }

    if let Some(search) = &query.search {
        let clauses: Vec<String> = search
            .fields
            .iter()
            .map(|field| format!("{field}.ilike.*{}*", search.term))
            .collect();
        params.push(("or".to_string(), format!("({})", clauses.join(","))));
    }

    if let Some((column, order)) = &query.order {
        let direction = match order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        params.push(("order".to_string(), format!("{column}.{direction}")));
    }

    if let Some(offset) = query.offset {
        params.push(("offset".to_string(), offset.to_string()));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

/// Total row count from a `Content-Range` header (`0-24/3573` or `*/0`).
fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.parse().ok()
}

async fn error_from_response(status: StatusCode, response: Response) -> StoreError {
    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<Value>(&body) {
        Ok(parsed) => (
            parsed
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_string),
            parsed
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(body),
        ),
        Err(_) => (None, body),
    };
    StoreError::Backend {
        status: status.as_u16(),
        code,
        message,
    }
}

impl StoreClient for RestStore {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<SelectResult, StoreError> {
        self.ensure_enabled()?;

        let mut request = self
            .http
            .get(self.endpoint(table))
            .query(&query_params(&query));
        if query.count {
            request = request.header("Prefer", "count=exact");
        }

        let response = self.send(request).await?;
        let count = query
            .count
            .then(|| {
                response
                    .headers()
                    .get("content-range")
                    .and_then(|value| value.to_str().ok())
                    .and_then(parse_content_range)
            })
            .flatten();
        let rows = self.rows(response).await?;

        Ok(SelectResult { rows, count })
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        self.ensure_enabled()?;

        let request = self
            .http
            .post(self.endpoint(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.send(request).await?;
        let mut rows = self.rows(response).await?;

        if rows.is_empty() {
            return Err(StoreError::Decode(
                "insert returned no representation".into(),
            ));
        }
        Ok(rows.remove(0))
    }

    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id: &Value,
        patch: Value,
    ) -> Result<Value, StoreError> {
        self.ensure_enabled()?;

        let request = self
            .http
            .patch(self.endpoint(table))
            .query(&[(id_column, format!("eq.{}", literal(id)))])
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = self.send(request).await?;
        let mut rows = self.rows(response).await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: literal(id),
            });
        }
        Ok(rows.remove(0))
    }

    async fn delete(&self, table: &str, id_column: &str, id: &Value) -> Result<u64, StoreError> {
        self.ensure_enabled()?;

        let request = self
            .http
            .delete(self.endpoint(table))
            .query(&[(id_column, format!("eq.{}", literal(id)))])
            .header("Prefer", "return=representation");
        let response = self.send(request).await?;
        let rows = self.rows(response).await?;

        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homewiz_core::store::SearchClause;
    use serde_json::json;

    #[test]
    fn builds_filter_search_order_and_window_params() {
        let query = SelectQuery::default()
            .filter("status", "ACTIVE")
            .order_by("created_at", SortOrder::Desc)
            .range(40, 20);
        let mut query = query;
        query.search = Some(SearchClause {
            term: "Jane".into(),
            fields: vec!["tenant_name".into(), "tenant_email".into()],
        });

        let params = query_params(&query);
        assert!(params.contains(&("status".into(), "eq.ACTIVE".into())));
        assert!(params.contains(&(
            "or".into(),
            "(tenant_name.ilike.*Jane*,tenant_email.ilike.*Jane*)".into()
        )));
        assert!(params.contains(&("order".into(), "created_at.desc".into())));
        assert!(params.contains(&("offset".into(), "40".into())));
        assert!(params.contains(&("limit".into(), "20".into())));
    }

    #[test]
    fn range_clauses_become_gte_and_lte() {
        let query = SelectQuery::default().between(
            "private_room_rent",
            Some(json!(500)),
            Some(json!(1500)),
        );
        let params = query_params(&query);
        assert!(params.contains(&("private_room_rent".into(), "gte.500".into())));
        assert!(params.contains(&("private_room_rent".into(), "lte.1500".into())));
    }

    #[test]
    fn content_range_totals() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn unconfigured_backend_is_disabled() {
        let store = RestStore::new(&DbConfig::default());
        assert!(store.is_disabled());
    }
}
