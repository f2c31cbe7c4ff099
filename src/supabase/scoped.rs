//! Token-scoped PostgREST client
//!
//! A `ScopedClient` is created per request by the auth guard and carries that
//! request's bearer token on every call, so row-level security in the database
//! decides what the caller may read or write.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Method, RequestBuilder, Response,
};
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use crate::{
    error::{AppError, AppResult},
    supabase::models::BackendErrorBody,
};

/// `Accept` value that makes PostgREST return a single object instead of an array
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Query parameter list for a PostgREST request
pub type Query = Vec<(&'static str, String)>;

/// `col=eq.<value>` filter value
pub fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// `col=in.(<v1>,<v2>)` filter value. String values are double-quoted so
/// commas and parentheses inside ids cannot break the list.
pub fn in_list(values: &[Value]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| match v {
            Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            other => other.to_string(),
        })
        .collect();
    format!("in.({})", items.join(","))
}

/// Data client bound to one caller's token
#[derive(Clone)]
pub struct ScopedClient {
    client: reqwest::Client,
    rest_url: String,
    headers: HeaderMap,
}

impl std::fmt::Debug for ScopedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedClient")
            .field("rest_url", &self.rest_url)
            .finish_non_exhaustive()
    }
}

impl ScopedClient {
    pub(crate) fn new(client: reqwest::Client, rest_url: String, headers: HeaderMap) -> Self {
        Self {
            client,
            rest_url,
            headers,
        }
    }

    /// Select rows from `table`
    #[instrument(skip(self, query), fields(table = %table))]
    pub async fn select(&self, table: &str, query: Query) -> AppResult<Vec<Value>> {
        let mut params: Query = vec![("select", "*".to_string())];
        params.extend(query);

        let response = self
            .send(self.request(Method::GET, table).query(&params))
            .await?;

        let rows: Vec<Value> = response.json().await?;
        debug!(rows = rows.len(), "Select completed");
        Ok(rows)
    }

    /// Insert one row and return it as stored, including generated columns
    #[instrument(skip(self, row), fields(table = %table))]
    pub async fn insert_single(&self, table: &str, row: &Map<String, Value>) -> AppResult<Value> {
        let builder = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .json(row);

        let inserted: Value = self.send(builder).await?.json().await?;
        debug!("Insert completed");
        Ok(inserted)
    }

    /// Apply `patch` to the row whose `id` matches
    #[instrument(skip(self, patch), fields(table = %table, id = %id))]
    pub async fn update(&self, table: &str, id: &str, patch: &Map<String, Value>) -> AppResult<()> {
        let builder = self
            .request(Method::PATCH, table)
            .query(&[("id", eq(id))])
            .header("Prefer", "return=minimal")
            .json(patch);

        self.send(builder).await?;
        debug!("Update completed");
        Ok(())
    }

    /// Delete the row whose `id` matches
    #[instrument(skip(self), fields(table = %table, id = %id))]
    pub async fn delete(&self, table: &str, id: &str) -> AppResult<()> {
        let builder = self
            .request(Method::DELETE, table)
            .query(&[("id", eq(id))])
            .header("Prefer", "return=minimal");

        self.send(builder).await?;
        debug!("Delete completed");
        Ok(())
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .headers(self.headers.clone())
    }

    /// Send and turn any non-2xx into `Backend` with PostgREST's message
    async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Failed to send request to Supabase");
            AppError::Backend(e.to_string())
        })?;

        let status = response.status();
        debug!(status = %status, "Supabase data response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Supabase data request failed");
            let message = BackendErrorBody::message_from(&text)
                .unwrap_or_else(|| format!("Backend request failed with status {}", status));
            return Err(AppError::Backend(message));
        }

        Ok(response)
    }
}
