#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TOKEN: &str = "test-token";

pub struct MockServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn(app: Router) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
    let addr = listener.local_addr().expect("mock addr");
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    MockServer { addr, handle }
}

/// Stand-in for the coinpaprika API with a handful of coins.
///
/// `btc` has full data, `gap` has a ticker without quotes or supply, `nul`
/// sends explicit nulls for them and `ghost` shows up in search without an id.
pub async fn paprika() -> MockServer {
    let app = Router::new()
        .route("/v1/search", get(paprika_search))
        .route("/v1/tickers/:id", get(paprika_ticker));
    spawn(app).await
}

async fn paprika_search(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let query = params.get("q").cloned().unwrap_or_default();
    if query.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "q is required" })));
    }
    assert_eq!(params.get("c").map(String::as_str), Some("currencies"));
    let symbol_only = params.get("modifier").map(String::as_str) == Some("symbol_search");

    let coins = [
        json!({ "id": "btc-bitcoin", "name": "Bitcoin", "symbol": "BTC", "rank": 1, "is_active": true }),
        json!({ "id": "gap-gapcoin", "name": "Gapcoin", "symbol": "GAP", "rank": 900, "is_active": true }),
        json!({ "name": "Ghost", "symbol": "GHOST", "rank": 1500, "is_active": false }),
        json!({ "id": "nul-nullcoin", "name": "Nullcoin", "symbol": "NUL", "rank": 2000, "is_active": true }),
    ];
    let matches: Vec<Value> = coins
        .into_iter()
        .filter(|coin| {
            let symbol = coin["symbol"].as_str().unwrap_or_default();
            let name = coin["name"].as_str().unwrap_or_default();
            symbol.eq_ignore_ascii_case(&query) || (!symbol_only && name.eq_ignore_ascii_case(&query))
        })
        .collect();

    (StatusCode::OK, Json(json!({ "currencies": matches })))
}

async fn paprika_ticker(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    assert_eq!(params.get("quotes").map(String::as_str), Some("USD,BTC"));
    match id.as_str() {
        "btc-bitcoin" => (
            StatusCode::OK,
            Json(json!({
                "id": "btc-bitcoin",
                "name": "Bitcoin",
                "symbol": "BTC",
                "rank": 1,
                "circulating_supply": 19_712_345,
                "total_supply": 19_712_345,
                "max_supply": 21_000_000,
                "last_updated": "2024-06-01T12:00:00Z",
                "quotes": {
                    "USD": { "price": 67012.345678, "volume_24h": 28_123_456_789.1234, "market_cap": 1_300_000_000_000u64, "percent_change_24h": 1.2 },
                    "BTC": { "price": 1.0, "volume_24h": 419_000.5, "market_cap": 19_712_345, "percent_change_24h": 0.0 }
                }
            })),
        ),
        "gap-gapcoin" => (
            StatusCode::OK,
            Json(json!({ "id": "gap-gapcoin", "name": "Gapcoin", "symbol": "GAP", "quotes": {} })),
        ),
        "nul-nullcoin" => (
            StatusCode::OK,
            Json(json!({
                "id": "nul-nullcoin",
                "name": "Nullcoin",
                "symbol": "NUL",
                "circulating_supply": null,
                "quotes": null
            })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "id not found" }))),
    }
}

#[derive(Default)]
struct TelegramState {
    pending: Mutex<Vec<Value>>,
    sent: Mutex<Vec<Value>>,
    fail_sends_to: Mutex<Vec<i64>>,
}

/// Stand-in for the Telegram Bot API that serves queued updates and records replies.
pub struct MockTelegram {
    pub server: MockServer,
    state: Arc<TelegramState>,
}

impl MockTelegram {
    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn push_message(&self, update_id: i64, chat_id: i64, message_id: i64, text: &str) {
        self.state.pending.lock().expect("pending").push(json!({
            "update_id": update_id,
            "message": {
                "message_id": message_id,
                "date": 1_700_000_000,
                "chat": { "id": chat_id, "type": "private" },
                "text": text
            }
        }));
    }

    pub fn push_raw(&self, update: Value) {
        self.state.pending.lock().expect("pending").push(update);
    }

    pub fn fail_sends_to(&self, chat_id: i64) {
        self.state.fail_sends_to.lock().expect("fail list").push(chat_id);
    }

    pub fn sent(&self) -> Vec<Value> {
        self.state.sent.lock().expect("sent").clone()
    }

    pub async fn wait_for_sent(&self, count: usize) -> Vec<Value> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("expected {count} replies, got {:?}", self.sent());
    }
}

pub async fn telegram() -> MockTelegram {
    let state = Arc::new(TelegramState::default());
    let app = Router::new()
        .route(&format!("/bot{TOKEN}/getMe"), post(telegram_get_me))
        .route(&format!("/bot{TOKEN}/getUpdates"), post(telegram_get_updates))
        .route(&format!("/bot{TOKEN}/sendMessage"), post(telegram_send_message))
        .with_state(Arc::clone(&state));
    let server = spawn(app).await;
    MockTelegram { server, state }
}

async fn telegram_get_me() -> Json<Value> {
    Json(json!({
        "ok": true,
        "result": { "id": 4242, "is_bot": true, "first_name": "Paprika", "username": "paprika_test_bot" }
    }))
}

async fn telegram_get_updates(
    State(state): State<Arc<TelegramState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let offset = body["offset"].as_i64().unwrap_or(0);
    let ready = |state: &TelegramState| -> Vec<Value> {
        let mut pending = state.pending.lock().expect("pending");
        pending.retain(|update| update["update_id"].as_i64().unwrap_or(0) >= offset);
        pending.clone()
    };

    let mut updates = ready(state.as_ref());
    if updates.is_empty() {
        tokio::time::sleep(Duration::from_millis(100)).await;
        updates = ready(state.as_ref());
    }
    Json(json!({ "ok": true, "result": updates }))
}

async fn telegram_send_message(
    State(state): State<Arc<TelegramState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let chat_id = body["chat_id"].as_i64().unwrap_or_default();
    if state.fail_sends_to.lock().expect("fail list").contains(&chat_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error_code": 400, "description": "Bad Request: chat not found" })),
        );
    }

    state.sent.lock().expect("sent").push(body.clone());
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "result": {
                "message_id": 10_000,
                "date": 1_700_000_001,
                "chat": { "id": chat_id, "type": "private" },
                "text": body["text"]
            }
        })),
    )
}
