//! RestStore against a mock PostgREST server.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::any;
use axum::{Json, Router};
use clarity_db::store::{Filter, Order, Row};
use clarity_db::{RecordStore, RestStore, StoreError, Table};
use clarity_shared::config::StoreConfig;
use clarity_shared::types::UserId;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    table: String,
    query: String,
    headers: HeaderMap,
    body: Value,
}

#[derive(Default)]
struct Mock {
    requests: Mutex<Vec<Recorded>>,
    responses: Mutex<VecDeque<(StatusCode, Value)>>,
}

impl Mock {
    async fn respond(&self, status: StatusCode, body: Value) {
        self.responses.lock().await.push_back((status, body));
    }

    async fn last(&self) -> Recorded {
        self.requests.lock().await.last().cloned().unwrap()
    }
}

async fn handle(
    State(mock): State<Arc<Mock>>,
    Path(table): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    mock.requests.lock().await.push(Recorded {
        method,
        table,
        query: query.unwrap_or_default(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    let (status, body) = mock
        .responses
        .lock()
        .await
        .pop_front()
        .unwrap_or((StatusCode::OK, json!([])));
    (status, Json(body))
}

async fn serve() -> (Arc<Mock>, RestStore) {
    let mock = Arc::new(Mock::default());
    let app = Router::new()
        .route("/rest/v1/{table}", any(handle))
        .with_state(mock.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let store = RestStore::new(&StoreConfig {
        url: format!("http://{addr}/"),
        anon_key: "anon-key".to_string(),
        access_token: Some("user-token".to_string()),
        rest_path: "/rest/v1".to_string(),
        timeout_secs: 5,
    })
    .unwrap();
    (mock, store)
}

fn decoded(query: &str) -> String {
    query.replace("%2C", ",").replace("%3D", "=")
}

#[tokio::test]
async fn test_query_sends_owner_filter_order_and_headers() {
    let (mock, store) = serve().await;
    let owner = UserId::new();
    mock.respond(StatusCode::OK, json!([{"id": "1", "name": "Food"}]))
        .await;

    let rows = store
        .query(
            Table::Transactions,
            owner,
            &[Filter::eq("is_active", true)],
            &[Order::desc("transaction_date"), Order::desc("created_at")],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Food");

    let request = mock.last().await;
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.table, "transactions");
    let query = decoded(&request.query);
    assert!(query.contains(&format!("user_id=eq.{owner}")));
    assert!(query.contains("is_active=eq.true"));
    assert!(query.contains("order=transaction_date.desc,created_at.desc"));
    assert_eq!(request.headers["apikey"], "anon-key");
    assert_eq!(request.headers["authorization"], "Bearer user-token");
}

#[tokio::test]
async fn test_insert_asks_for_representation() {
    let (mock, store) = serve().await;
    mock.respond(StatusCode::CREATED, json!([{"id": "abc", "name": "Food"}]))
        .await;

    let mut row = Row::new();
    row.insert("name".to_string(), json!("Food"));
    let created = store.insert(Table::Categories, row).await.unwrap();

    assert_eq!(created["id"], "abc");
    let request = mock.last().await;
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.headers["prefer"], "return=representation");
    assert_eq!(request.body, json!({"name": "Food"}));
}

#[tokio::test]
async fn test_update_with_no_rows_is_not_found() {
    let (mock, store) = serve().await;
    let (id, owner) = (Uuid::now_v7(), UserId::new());
    mock.respond(StatusCode::OK, json!([])).await;

    let err = store
        .update(Table::Accounts, id, owner, Row::new())
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::NotFound { table: Table::Accounts, id });
    let request = mock.last().await;
    assert_eq!(request.method, Method::PATCH);
    let query = decoded(&request.query);
    assert!(query.contains(&format!("id=eq.{id}")));
    assert!(query.contains(&format!("user_id=eq.{owner}")));
}

#[tokio::test]
async fn test_delete_scopes_by_id_and_owner() {
    let (mock, store) = serve().await;
    let (id, owner) = (Uuid::now_v7(), UserId::new());
    mock.respond(StatusCode::NO_CONTENT, Value::Null).await;

    store.delete(Table::Budgets, id, owner).await.unwrap();

    let request = mock.last().await;
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.table, "budgets");
    assert!(decoded(&request.query).contains(&format!("id=eq.{id}")));
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let (mock, store) = serve().await;
    mock.respond(
        StatusCode::CONFLICT,
        json!({"code": "23505", "message": "duplicate key value", "details": null, "hint": null}),
    )
    .await;

    let err = store
        .insert(Table::Categories, Row::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::Server {
            status: 409,
            message: "duplicate key value".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = RestStore::new(&StoreConfig {
        url: format!("http://{addr}"),
        anon_key: "anon-key".to_string(),
        access_token: None,
        rest_path: "/rest/v1".to_string(),
        timeout_secs: 1,
    })
    .unwrap();

    let err = store
        .query(Table::Accounts, UserId::new(), &[], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Request(_)));
}
