mod common;

use bsc_dapp_core::{
    Account, NetworkDisplay, NetworkInfo, NetworkLabel, SessionState, WalletEventPayload,
    BSC_NETWORK_HELP_URL, NO_EXTENSION_TEXT, UNCONNECTED_TEXT,
};

use common::{account_a, account_b, controller, mainnet, testnet, FakeWallet};

#[test]
fn missing_extension_shows_status_without_enable_control() {
    let ctl = controller(FakeWallet::not_installed());
    let (_watcher, view) = ctl.mount().expect("mount");

    assert_eq!(view.state, SessionState::Disconnected);
    assert_eq!(view.status_text(), NO_EXTENSION_TEXT);
    assert!(view.enable_label().is_none());
    assert!(view.network_display().is_none());
}

#[test]
fn disabled_extension_offers_enable_control() {
    let ctl = controller(FakeWallet::installed("BinanceChainWallet"));
    let (_watcher, view) = ctl.mount().expect("mount");

    assert_eq!(view.state, SessionState::ExtensionDetected);
    assert_eq!(view.status_text(), "BinanceChainWallet Detected. Not enabled");
    assert_eq!(
        view.enable_label().as_deref(),
        Some("Enable BinanceChainWallet")
    );
    assert!(view.account_text().is_none());
}

#[test]
fn enabled_notification_sets_account_and_network() {
    let ctl = controller(FakeWallet::installed("MetaMask"));
    let (watcher, mut view) = ctl.mount().expect("mount");

    ctl.wallet.with(|s| s.network = testnet());
    ctl.wallet
        .emit(WalletEventPayload::Enabled(Account::new(account_a())));
    assert_eq!(ctl.poll(&watcher, &mut view).expect("poll"), 1);

    assert_eq!(view.state, SessionState::NetworkKnown);
    assert_eq!(view.status_text(), "MetaMask Detected. Enabled.");
    assert!(view.enable_label().is_none());
    assert_eq!(
        view.account_text().as_deref(),
        Some("0x1000000000000000000000000000000000000001")
    );
    assert_eq!(
        view.network_display(),
        Some(NetworkDisplay::Known("Network: BSC Testnet".to_owned()))
    );
}

#[test]
fn network_notifications_map_to_labels() {
    let ctl = controller(FakeWallet::installed("MetaMask"));
    let (watcher, mut view) = ctl.mount().expect("mount");
    ctl.wallet
        .emit(WalletEventPayload::Enabled(Account::new(account_a())));
    ctl.poll(&watcher, &mut view).expect("poll");
    assert_eq!(view.network, NetworkLabel::Unconnected);
    assert_eq!(view.state, SessionState::Enabled);

    ctl.wallet.emit(WalletEventPayload::NetworkChanged(mainnet()));
    ctl.poll(&watcher, &mut view).expect("poll");
    assert_eq!(view.network, NetworkLabel::Mainnet);
    assert_eq!(
        view.network_display(),
        Some(NetworkDisplay::Known("Network: BSC Mainnet".to_owned()))
    );

    ctl.wallet.emit(WalletEventPayload::NetworkChanged(testnet()));
    ctl.poll(&watcher, &mut view).expect("poll");
    assert_eq!(view.network, NetworkLabel::Testnet);

    ctl.wallet
        .emit(WalletEventPayload::NetworkChanged(NetworkInfo::from_chain_id(1)));
    ctl.poll(&watcher, &mut view).expect("poll");
    assert_eq!(view.state, SessionState::Enabled);
    match view.network_display() {
        Some(NetworkDisplay::Unconnected {
            message, help_url, ..
        }) => {
            assert_eq!(message, UNCONNECTED_TEXT);
            assert_eq!(help_url, BSC_NETWORK_HELP_URL);
        }
        other => panic!("expected unconnected display, got {other:?}"),
    }
}

#[test]
fn account_change_replaces_account_and_bumps_epoch() {
    let ctl = controller(FakeWallet::installed("MetaMask"));
    let (watcher, mut view) = ctl.mount().expect("mount");
    ctl.wallet.with(|s| s.network = mainnet());
    ctl.wallet
        .emit(WalletEventPayload::Enabled(Account::new(account_a())));
    ctl.poll(&watcher, &mut view).expect("poll");
    let epoch = view.epoch;

    ctl.wallet
        .emit(WalletEventPayload::AccountChanged(Account::new(account_b())));
    ctl.poll(&watcher, &mut view).expect("poll");

    assert_eq!(view.account, Some(Account::new(account_b())));
    assert!(view.epoch > epoch);
    assert_eq!(view.state, SessionState::NetworkKnown);
}

#[test]
fn already_enabled_extension_is_mirrored_at_mount() {
    let wallet = FakeWallet::installed("MetaMask");
    wallet.with(|s| {
        s.enabled = true;
        s.account = Some(Account::new(account_a()));
        s.network = mainnet();
    });
    let ctl = controller(wallet);
    let (_watcher, view) = ctl.mount().expect("mount");

    assert_eq!(view.state, SessionState::NetworkKnown);
    assert!(view.actions_unlocked());
}

#[test]
fn unmount_releases_all_subscriptions() {
    let ctl = controller(FakeWallet::installed("MetaMask"));
    let (mut watcher, mut view) = ctl.mount().expect("mount");
    assert_eq!(ctl.wallet.snapshot(|s| s.subscriptions.len()), 3);

    ctl.unmount(&mut watcher).expect("unmount");
    assert_eq!(ctl.wallet.snapshot(|s| s.subscriptions.len()), 0);
    assert!(!watcher.is_mounted());

    ctl.wallet
        .emit(WalletEventPayload::Enabled(Account::new(account_a())));
    assert_eq!(ctl.poll(&watcher, &mut view).expect("poll"), 0);
    assert_eq!(view.state, SessionState::ExtensionDetected);
}
