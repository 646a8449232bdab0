#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use alloy::primitives::Address;
use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

use bsc_dapp_adapters::{DappAdapterConfig, Eip1193Adapter, RuntimeProfile};

/// Requests seen by a mock server, as (url, parsed body).
pub type Calls = Arc<Mutex<Vec<(String, Value)>>>;

/// Serves up to `max_requests` requests; `reply` maps (url, body) to
/// (status, payload).
pub fn spawn_mock_server<F>(max_requests: usize, reply: F) -> (String, Calls, thread::JoinHandle<()>)
where
    F: Fn(&str, &Value) -> (u16, Value) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);

    let join = thread::spawn(move || {
        for _ in 0..max_requests {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut raw = String::new();
            let _ = req.as_reader().read_to_string(&mut raw);
            let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
            let url = req.url().to_owned();
            let (code, payload) = reply(&url, &body);
            if let Ok(mut g) = seen.lock() {
                g.push((url, body));
            }
            let response =
                Response::from_string(payload.to_string()).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    (addr, calls, join)
}

/// JSON-RPC success envelope echoing the request id.
pub fn rpc_result(body: &Value, result: Value) -> (u16, Value) {
    (
        200,
        json!({"jsonrpc": "2.0", "id": body["id"].clone(), "result": result}),
    )
}

pub fn rpc_error(body: &Value, code: i64, message: &str) -> (u16, Value) {
    (
        200,
        json!({
            "jsonrpc": "2.0",
            "id": body["id"].clone(),
            "error": {"code": code, "message": message}
        }),
    )
}

pub fn proxy_config(url: &str) -> DappAdapterConfig {
    DappAdapterConfig {
        eip1193_proxy_url: Some(url.to_owned()),
        request_timeout_ms: 2_000,
        ..DappAdapterConfig::default()
    }
}

pub fn production_without_runtime() -> Eip1193Adapter {
    Eip1193Adapter::with_config(DappAdapterConfig {
        runtime_profile: RuntimeProfile::Production,
        eip1193_proxy_url: None,
        ..DappAdapterConfig::default()
    })
}

pub fn account_a() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("account a")
}

pub fn account_b() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("account b")
}

pub fn token_address() -> Address {
    "0x000000000000000000000000000000000000CAFE"
        .parse()
        .expect("token")
}
