mod common;

use alloy::primitives::{utils::parse_ether, Bytes};
use serde_json::{json, Value};

use bsc_dapp_adapters::Eip1193Adapter;
use bsc_dapp_core::{
    NetworkLabel, PortError, TxRequest, TypedField, WalletEventKind, WalletEventPayload,
    WalletPort,
};

use common::{account_a, account_b, proxy_config, rpc_error, rpc_result, spawn_mock_server};

fn methods(calls: &common::Calls) -> Vec<String> {
    calls
        .lock()
        .expect("calls lock")
        .iter()
        .map(|(_, body)| body["method"].as_str().unwrap_or_default().to_owned())
        .collect()
}

fn params_of(calls: &common::Calls, method: &str) -> Value {
    calls
        .lock()
        .expect("calls lock")
        .iter()
        .find(|(_, body)| body["method"] == method)
        .map(|(_, body)| body["params"].clone())
        .expect("method was called")
}

#[test]
fn proxy_enable_and_sign_use_eip1193_methods() {
    let signature = format!("0x{}", "11".repeat(65));
    let reply_sig = signature.clone();
    let (url, calls, join) = spawn_mock_server(4, move |_, body| {
        match body["method"].as_str().unwrap_or_default() {
            "eth_requestAccounts" => rpc_result(body, json!([account_a().to_string()])),
            "eth_chainId" => rpc_result(body, json!("0x38")),
            "personal_sign" | "eth_signTypedData" => rpc_result(body, json!(reply_sig)),
            _ => rpc_error(body, -32601, "method not found"),
        }
    });

    let wallet = Eip1193Adapter::with_config(proxy_config(&url));
    assert!(wallet.is_extension_installed());
    assert!(!wallet.is_deterministic());

    let account = wallet.enable_extension().expect("enable");
    assert_eq!(account.address, account_a());
    assert!(wallet.is_extension_enabled());
    assert_eq!(wallet.network().expect("network").label(), NetworkLabel::Mainnet);

    let sig = wallet.sign_message("Sign", account_a()).expect("personal_sign");
    assert_eq!(sig, signature.parse::<Bytes>().expect("sig"));
    wallet
        .sign_typed_data(&[TypedField::string("Message", "Sign")], account_a())
        .expect("typed");
    join.join().expect("server thread");

    assert_eq!(
        methods(&calls),
        vec![
            "eth_requestAccounts",
            "eth_chainId",
            "personal_sign",
            "eth_signTypedData"
        ]
    );
    let personal = params_of(&calls, "personal_sign");
    assert_eq!(personal[0], "0x5369676e");
    assert_eq!(personal[1], account_a().to_string());

    let typed = params_of(&calls, "eth_signTypedData");
    assert_eq!(
        typed[0],
        json!([{"type": "string", "name": "Message", "value": "Sign"}])
    );
    assert_eq!(typed[1], account_a().to_string());
}

#[test]
fn proxy_user_rejection_is_reported() {
    let (url, calls, join) = spawn_mock_server(1, |_, body| {
        rpc_error(body, 4001, "User denied transaction signature.")
    });
    let wallet = Eip1193Adapter::with_config(proxy_config(&url));
    let tx = TxRequest {
        from: account_a(),
        to: Some(account_b()),
        value: parse_ether("0.01").expect("amount"),
        data: None,
    };

    let err = wallet.send_transaction(&tx).expect_err("rejected");
    join.join().expect("server thread");
    assert!(
        matches!(err, PortError::UserRejected(ref msg) if msg == "User denied transaction signature.")
    );

    let params = params_of(&calls, "eth_sendTransaction");
    assert_eq!(params[0]["to"], account_b().to_string());
    assert_eq!(params[0]["value"], "0x2386f26fc10000");
    assert!(params[0].get("data").is_none());
}

#[test]
fn proxy_snapshot_refresh_is_explicit() {
    let (url, _calls, join) = spawn_mock_server(4, |_, body| {
        match body["method"].as_str().unwrap_or_default() {
            "eth_requestAccounts" => rpc_result(body, json!([account_a().to_string()])),
            "eth_accounts" => rpc_result(body, json!([account_b().to_string()])),
            "eth_chainId" => rpc_result(body, json!("0x38")),
            _ => rpc_error(body, -32601, "method not found"),
        }
    });
    let wallet = Eip1193Adapter::with_config(proxy_config(&url));
    assert!(wallet.polls_snapshot());
    for kind in [
        WalletEventKind::Enabled,
        WalletEventKind::AccountChanged,
        WalletEventKind::NetworkChanged,
    ] {
        wallet.subscribe(kind).expect("subscribe");
    }

    wallet.enable_extension().expect("enable");

    // Draining only hands out queued events; the proxy is not contacted.
    let events = wallet.drain_events().expect("drain");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].payload, WalletEventPayload::Enabled(_)));
    assert_eq!(
        wallet.current_account().expect("account").map(|a| a.address),
        Some(account_a())
    );

    assert!(wallet.refresh_snapshot().expect("refresh"));
    let events = wallet.drain_events().expect("drain");
    join.join().expect("server thread");

    assert_eq!(
        events.iter().map(|e| e.payload.clone()).collect::<Vec<_>>(),
        vec![WalletEventPayload::AccountChanged(
            bsc_dapp_core::Account::new(account_b())
        )]
    );
    assert_eq!(
        wallet.current_account().expect("account").map(|a| a.address),
        Some(account_b())
    );
}

#[test]
fn disabled_proxy_wallet_skips_snapshot_refresh() {
    let (url, calls, join) = spawn_mock_server(0, |_, body| rpc_error(body, -32601, "unused"));
    let wallet = Eip1193Adapter::with_config(proxy_config(&url));
    assert!(!wallet.refresh_snapshot().expect("not enabled"));
    join.join().expect("server thread");
    assert!(calls.lock().expect("calls").is_empty());
}

#[test]
fn proxy_transport_failure_is_not_a_rejection() {
    let (url, _calls, join) = spawn_mock_server(1, |_, _| (500, json!({"error": "boom"})));
    let wallet = Eip1193Adapter::with_config(proxy_config(&url));
    let err = wallet.sign_message("Sign", account_a()).expect_err("500");
    join.join().expect("server thread");
    assert!(matches!(err, PortError::Transport(_)));
}
