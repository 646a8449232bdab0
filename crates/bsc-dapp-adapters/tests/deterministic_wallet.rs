mod common;

use alloy::primitives::{utils::parse_ether, U256};

use bsc_dapp_adapters::{Eip1193Adapter, InMemoryExplorer, InMemoryRpc, COIN_ABI};
use bsc_dapp_core::{
    CommandOutcome, ContractRef, DappCommand, DappController, DappError, NetworkLabel, PortError,
    SessionState, SignatureMethod, TxRequest, TypedField, WalletEventKind, WalletEventPayload,
    WalletPort,
};

use common::{account_a, account_b, production_without_runtime, token_address};

#[test]
fn starts_installed_but_not_enabled() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    assert!(wallet.is_deterministic());
    assert!(!wallet.polls_snapshot());
    assert!(wallet.is_extension_installed());
    assert!(!wallet.is_extension_enabled());
    assert_eq!(wallet.extension_name().as_deref(), Some("MetaMask"));
    assert_eq!(wallet.current_account().expect("account"), None);
    assert_eq!(wallet.network().expect("network").label(), NetworkLabel::Testnet);
}

#[test]
fn events_follow_subscriptions() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    let enabled = wallet.subscribe(WalletEventKind::Enabled).expect("subscribe");
    wallet
        .subscribe(WalletEventKind::NetworkChanged)
        .expect("subscribe");

    let account = wallet.enable_extension().expect("enable");
    assert_eq!(account.address, account_a());
    wallet.debug_inject_chain_changed(56).expect("inject chain");
    // No AccountChanged subscriber.
    wallet
        .debug_inject_accounts_changed(vec![account_b()])
        .expect("inject accounts");

    let events = wallet.drain_events().expect("drain");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].sequence + 1, events[1].sequence);
    assert_eq!(events[0].payload, WalletEventPayload::Enabled(account));
    match &events[1].payload {
        WalletEventPayload::NetworkChanged(info) => {
            assert_eq!(info.chain_id, Some(56));
            assert!(info.is_mainnet);
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert!(wallet.drain_events().expect("drain").is_empty());

    wallet.unsubscribe(enabled).expect("unsubscribe");
    assert!(matches!(
        wallet.unsubscribe(enabled),
        Err(PortError::NotFound(_))
    ));
}

#[test]
fn signatures_are_stable_per_input() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    let a = wallet.sign_message("Sign", account_a()).expect("sign");
    let b = wallet.sign_message("Sign", account_a()).expect("sign");
    let c = wallet.sign_message("Sign", account_b()).expect("sign");
    assert_eq!(a.len(), 65);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let typed = wallet
        .sign_typed_data(&[TypedField::string("Message", "Sign")], account_a())
        .expect("typed");
    assert_ne!(typed, a);
}

#[test]
fn rejection_maps_to_user_rejected() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    wallet.debug_reject_requests(true).expect("reject");
    assert!(matches!(
        wallet.sign_message("Sign", account_a()),
        Err(PortError::UserRejected(_))
    ));
    let tx = TxRequest {
        from: account_a(),
        to: Some(account_b()),
        value: U256::from(1u64),
        data: None,
    };
    assert!(matches!(
        wallet.send_transaction(&tx),
        Err(PortError::UserRejected(_))
    ));
}

#[test]
fn execute_contract_builds_mint_calldata() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    let contract = ContractRef {
        address: token_address(),
        abi_json: COIN_ABI,
    };
    let params = wallet
        .execute_contract(
            &contract,
            "mint",
            &[account_b().to_string(), "1000".to_owned()],
        )
        .expect("mint params");
    assert_eq!(params.to, token_address());
    assert_eq!(&params.data[..4], &[0x40, 0xc1, 0x0f, 0x19]);
    assert_eq!(params.data.len(), 4 + 32 * 2);
    assert_eq!(
        U256::from_be_slice(&params.data[36..68]),
        U256::from(1000u64)
    );
    assert_eq!(params.value, None);

    let err = wallet
        .execute_contract(&contract, "mint", &[account_b().to_string()])
        .expect_err("arity");
    assert!(matches!(err, PortError::Validation(_)));
}

#[test]
fn mint_amount_with_eighteen_decimals_encodes_exactly() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    let contract = ContractRef {
        address: token_address(),
        abi_json: COIN_ABI,
    };
    let amount = "1000000000000000000000";
    let params = wallet
        .execute_contract(&contract, "mint", &[account_b().to_string(), amount.to_owned()])
        .expect("amount above u64::MAX");
    assert_eq!(
        U256::from_be_slice(&params.data[36..68]),
        U256::from_str_radix(amount, 10).expect("amount")
    );
}

#[test]
fn parse_ether_matches_alloy_units() {
    let wallet = Eip1193Adapter::deterministic("MetaMask");
    assert_eq!(
        wallet.parse_ether("0.01").expect("amount"),
        parse_ether("0.01").expect("alloy")
    );
    assert!(wallet.parse_ether("ten").is_err());
}

#[test]
fn production_without_runtime_is_not_installed() {
    let wallet = production_without_runtime();
    assert!(!wallet.is_extension_installed());
    assert_eq!(wallet.extension_name(), None);
    assert!(matches!(wallet.enable_extension(), Err(PortError::Policy(_))));
    // Watchers may still mount so the page can render the empty state.
    wallet
        .subscribe(WalletEventKind::Enabled)
        .expect("subscribe while disabled");
    assert!(wallet.drain_events().expect("drain").is_empty());
}

#[test]
fn controller_runs_page_flow_against_deterministic_wallet() {
    let rpc = InMemoryRpc::default();
    rpc.set_balance(account_a(), U256::from(5u64));
    let ctl = DappController::new(
        Eip1193Adapter::deterministic("MetaMask"),
        rpc,
        InMemoryExplorer::default(),
        COIN_ABI,
    );

    let (watcher, mut view) = ctl.mount().expect("mount");
    assert_eq!(view.state, SessionState::ExtensionDetected);
    assert_eq!(
        ctl.handle(&view, DappCommand::SignMessage),
        Err(DappError::ExtensionNotEnabled)
    );

    ctl.handle(&view, DappCommand::EnableExtension)
        .expect("enable");
    assert_eq!(ctl.poll(&watcher, &mut view).expect("poll"), 1);
    assert_eq!(view.state, SessionState::NetworkKnown);
    assert_eq!(view.network, NetworkLabel::Testnet);

    match ctl.handle(&view, DappCommand::SignMessage).expect("sign") {
        CommandOutcome::Signed(result) => {
            assert_eq!(result.method, SignatureMethod::EthSignTypedData);
            assert_eq!(result.message, "Sign");
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let transfer = ctl
        .handle(
            &view,
            DappCommand::Transfer {
                to: account_b().to_string(),
                amount: "0.01".to_owned(),
            },
        )
        .expect("transfer");
    assert!(matches!(transfer, CommandOutcome::Submitted(_)));

    let mint = ctl
        .handle(
            &view,
            DappCommand::ExecuteMint {
                contract: token_address().to_string(),
                receiver: account_b().to_string(),
                amount: "1000".to_owned(),
            },
        )
        .expect("mint");
    assert_ne!(mint, transfer);

    match ctl
        .handle(&view, DappCommand::QueryBalanceAndHistory)
        .expect("query")
    {
        CommandOutcome::BalanceAndHistory(report) => {
            assert_eq!(report.balance, U256::from(5u64));
            assert!(report.history.is_empty());
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn binance_wallet_signs_plain_message() {
    let ctl = DappController::new(
        Eip1193Adapter::deterministic("Binance Chain Wallet"),
        InMemoryRpc::default(),
        InMemoryExplorer::default(),
        COIN_ABI,
    );
    let (watcher, mut view) = ctl.mount().expect("mount");
    ctl.handle(&view, DappCommand::EnableExtension)
        .expect("enable");
    ctl.poll(&watcher, &mut view).expect("poll");

    match ctl.handle(&view, DappCommand::SignMessage).expect("sign") {
        CommandOutcome::Signed(result) => {
            assert_eq!(result.method, SignatureMethod::PersonalSign);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}
