//! PostgREST record store over HTTP.
//!
//! Requests follow the PostgREST conventions used by hosted Postgres backends:
//!
//! - `GET    {base}/{table}?user_id=eq.{owner}&order=col.desc`
//! - `POST   {base}/{table}` with `Prefer: return=representation`
//! - `PATCH  {base}/{table}?id=eq.{id}&user_id=eq.{owner}`
//! - `DELETE {base}/{table}?id=eq.{id}&user_id=eq.{owner}`
//!
//! Every request carries the `apikey` header and a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use clarity_shared::config::StoreConfig;
use clarity_shared::types::UserId;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{Direction, Filter, Order, RecordStore, Row, StoreError, Table};

/// Asks PostgREST to echo written rows back.
const RETURN_REPRESENTATION: &str = "return=representation";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Record store backed by a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    /// Creates a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or token is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.anon_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.bearer_token()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_base(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/{}", self.base_url, table.name())
    }

    fn scoped(builder: RequestBuilder, id: Option<Uuid>, owner: UserId) -> RequestBuilder {
        let mut params = Vec::with_capacity(2);
        if let Some(id) = id {
            params.push(("id".to_string(), format!("eq.{id}")));
        }
        params.push(("user_id".to_string(), format!("eq.{owner}")));
        builder.query(&params)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value).map_err(|e| StoreError::Request(format!("invalid header: {e}")))
}

/// PostgREST operator for an equality filter.
fn filter_param(filter: &Filter) -> (String, String) {
    let condition = match &filter.value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{s}"),
        other => format!("eq.{other}"),
    };
    (filter.column.to_string(), condition)
}

/// PostgREST `order` parameter, e.g. `transaction_date.desc,created_at.desc`.
fn order_param(ordering: &[Order]) -> String {
    ordering
        .iter()
        .map(|o| {
            let direction = match o.direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            format!("{}.{direction}", o.column)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Turns a non-success response into [`StoreError::Server`].
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => [body.message, body.details, body.hint]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" - "),
        Err(_) => text,
    };
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("error").to_string()
    } else {
        message
    };

    if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
        return Err(StoreError::Unavailable(message));
    }
    Err(StoreError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn rows(response: Response) -> Result<Vec<Row>, StoreError> {
    let response = check(response).await?;
    Ok(response.json::<Vec<Row>>().await?)
}

#[async_trait]
impl RecordStore for RestStore {
    async fn query(
        &self,
        table: Table,
        owner: UserId,
        filters: &[Filter],
        ordering: &[Order],
    ) -> Result<Vec<Row>, StoreError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filters.iter().map(filter_param));
        if !ordering.is_empty() {
            params.push(("order".to_string(), order_param(ordering)));
        }

        debug!(table = %table, "GET");
        let request = Self::scoped(self.client.get(self.table_url(table)), None, owner);
        rows(request.query(&params).send().await?).await
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        debug!(table = %table, "POST");
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&row)
            .send()
            .await?;

        rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode(format!("insert into {table} returned no row")))
    }

    async fn update(
        &self,
        table: Table,
        id: Uuid,
        owner: UserId,
        patch: Row,
    ) -> Result<Row, StoreError> {
        debug!(table = %table, id = %id, "PATCH");
        let request = self
            .client
            .patch(self.table_url(table))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch);
        let response = Self::scoped(request, Some(id), owner).send().await?;

        rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { table, id })
    }

    async fn delete(&self, table: Table, id: Uuid, owner: UserId) -> Result<(), StoreError> {
        debug!(table = %table, id = %id, "DELETE");
        let request = Self::scoped(self.client.delete(self.table_url(table)), Some(id), owner);
        check(request.send().await?).await?;
        Ok(())
    }
}
