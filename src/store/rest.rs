//! PostgREST-style REST client for the hosted fare store.
//!
//! Tables are addressed as `{base}/rest/v1/{table}` with equality filters
//! (`col=eq.value`), in-list filters (`id=in.(a,b)`) and an `order` key in
//! the query string. Inserts and deletes send `Prefer: return=representation`
//! so the store echoes the affected rows back, which gives us generated
//! ids/timestamps on insert and an affected-row count on delete.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::{
    FareStore, FareTransactionRow, NewPriceSetting, NewTransaction, PriceSettingRow, StoreError,
};

const PRICE_SETTINGS_TABLE: &str = "price_settings";
const FARE_TRANSACTIONS_TABLE: &str = "fare_transactions";

/// Format an equality filter clause, encoding the value
fn eq_filter(column: &str, value: &str) -> String {
    format!("{}=eq.{}", column, urlencoding::encode(value))
}

/// Format an in-list filter clause over row ids
fn in_filter(column: &str, values: &[String]) -> String {
    let encoded: Vec<_> = values
        .iter()
        .map(|v| urlencoding::encode(v).into_owned())
        .collect();
    format!("{}=in.({})", column, encoded.join(","))
}

/// Client for the remote fare store
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|_| StoreError::Api("Store API key contains invalid characters".into()))?;
        headers.insert("apikey", key_value);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StoreError::Api("Store API key contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.base_url, table, query)
    }

    /// Issue one request and read the response body, logging id/duration/status
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        prefer_representation: bool,
    ) -> Result<String, StoreError> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if prefer_representation {
            request = request.header("Prefer", "return=representation");
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%request_id, %url, error = %e, "Store request failed");
            StoreError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        tracing::debug!(
            %request_id,
            method = %method,
            %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Store request completed"
        );

        if !status.is_success() {
            return Err(match status {
                StatusCode::CONFLICT => {
                    StoreError::Api(format!("Constraint violation: {}", body.trim()))
                }
                _ => StoreError::Api(format!("HTTP {}: {}", status.as_u16(), body.trim())),
            });
        }

        Ok(body)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table, query);
        let body = self.send(Method::GET, &url, None, false).await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &impl Serialize,
    ) -> Result<T, StoreError> {
        let url = self.table_url(table, "select=*");
        let payload =
            serde_json::to_value(row).map_err(|e| StoreError::Parse(e.to_string()))?;
        let body = self.send(Method::POST, &url, Some(&payload), true).await?;
        let mut rows: Vec<T> =
            serde_json::from_str(&body).map_err(|e| StoreError::Parse(e.to_string()))?;
        if rows.is_empty() {
            return Err(StoreError::Api("Insert returned no row".into()));
        }
        Ok(rows.remove(0))
    }

    /// Delete matching rows, returning how many were removed
    async fn delete(&self, table: &str, query: &str) -> Result<u64, StoreError> {
        let url = self.table_url(table, query);
        let body = self.send(Method::DELETE, &url, None, true).await?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(rows.len() as u64)
    }
}

/// Narrow row shapes for single-column selects
#[derive(serde::Deserialize)]
struct AmountRow {
    amount: f64,
}

#[derive(serde::Deserialize)]
struct IdRow {
    id: String,
}

impl FareStore for RestStore {
    async fn list_price_settings(&self) -> Result<Vec<PriceSettingRow>, StoreError> {
        self.select(PRICE_SETTINGS_TABLE, "select=*").await
    }

    async fn find_price_setting(
        &self,
        from_id: &str,
        to_id: &str,
    ) -> Result<Option<PriceSettingRow>, StoreError> {
        let query = format!(
            "select=*&{}&{}&limit=1",
            eq_filter("from_id", from_id),
            eq_filter("to_id", to_id)
        );
        let mut rows: Vec<PriceSettingRow> = self.select(PRICE_SETTINGS_TABLE, &query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    async fn insert_price_setting(
        &self,
        new: NewPriceSetting<'_>,
    ) -> Result<PriceSettingRow, StoreError> {
        self.insert(PRICE_SETTINGS_TABLE, &new).await
    }

    async fn delete_price_setting(&self, from_id: &str, to_id: &str) -> Result<u64, StoreError> {
        let query = format!(
            "{}&{}",
            eq_filter("from_id", from_id),
            eq_filter("to_id", to_id)
        );
        self.delete(PRICE_SETTINGS_TABLE, &query).await
    }

    async fn insert_transaction(
        &self,
        new: NewTransaction<'_>,
    ) -> Result<FareTransactionRow, StoreError> {
        self.insert(FARE_TRANSACTIONS_TABLE, &new).await
    }

    async fn list_transactions(&self) -> Result<Vec<FareTransactionRow>, StoreError> {
        self.select(FARE_TRANSACTIONS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    async fn transaction_amounts(&self) -> Result<Vec<f64>, StoreError> {
        let rows: Vec<AmountRow> = self.select(FARE_TRANSACTIONS_TABLE, "select=amount").await?;
        Ok(rows.into_iter().map(|r| r.amount).collect())
    }

    async fn transaction_ids(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<IdRow> = self.select(FARE_TRANSACTIONS_TABLE, "select=id").await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    async fn delete_transactions(&self, ids: &[String]) -> Result<u64, StoreError> {
        let query = in_filter("id", ids);
        self.delete(FARE_TRANSACTIONS_TABLE, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_filter_encodes_value() {
        assert_eq!(eq_filter("from_id", "1"), "from_id=eq.1");
        assert_eq!(eq_filter("from_id", "a b"), "from_id=eq.a%20b");
    }

    #[test]
    fn in_filter_joins_ids() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(in_filter("id", &ids), "id=in.(a,b,c)");
    }

    #[test]
    fn table_url_normalizes_trailing_slash() {
        let store = RestStore::new("https://example.supabase.co/", "key").unwrap();
        assert_eq!(
            store.table_url("price_settings", "select=*"),
            "https://example.supabase.co/rest/v1/price_settings?select=*"
        );
    }
}
