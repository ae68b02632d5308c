//! Integration tests for the bridge coordinator using fake implementations
//!
//! Every test drives the public [`Coordinator`] with a scripted wallet, scan
//! service and clock, so whole bridge attempts run in microseconds.

use alloy_primitives::{Address, Log, TxKind, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use rstest::rstest;
use std::time::Duration;
use treat_bridge::testing::{
    FakeClock, FakeScanProvider, FakeWallet, WalletCall, DEFAULT_FAKE_NATIVE_FEE,
};
use treat_bridge::{
    is_approve_request, is_send_request, ActionButton, ApprovalState, BridgeConfig, BridgeError,
    ContractVariant, Coordinator, DeliveryStatus, Effect, Erc20, Event, LifecycleState, Oft,
    PollingConfig, Registry, ScanResponse, EXHAUSTED_ADVISORY, GENERIC_FAILURE_MESSAGE,
    SEPOLIA_TREAT_OFT,
};

const SEPOLIA: u64 = 11155111;
const BSC_TESTNET: u64 = 97;
const POLYGON_AMOY: u64 = 80002;

type TestCoordinator = Coordinator<FakeWallet, FakeScanProvider, FakeClock>;

/// Routes coordinator logs to the test output; set `RUST_LOG` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn account() -> Address {
    Address::repeat_byte(0xaa)
}

fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}

fn scan_response(status: &str) -> ScanResponse {
    serde_json::from_value(serde_json::json!({
        "messages": [{
            "status": status,
            "srcTxHash": format!("{}", B256::repeat_byte(0x01)),
            "dstTxHash": if status == "DELIVERED" {
                format!("{}", B256::repeat_byte(0xdd))
            } else {
                String::new()
            },
            "dstTxError": if status == "FAILED" { "out of gas" } else { "" },
        }]
    }))
    .unwrap()
}

/// Helper function to create a coordinator over the fakes
fn create_coordinator(
    wallet: FakeWallet,
    scan: FakeScanProvider,
    clock: FakeClock,
    polling: PollingConfig,
) -> TestCoordinator {
    let config = BridgeConfig {
        polling,
        ..BridgeConfig::testnet()
    };
    Coordinator::builder()
        .wallet(wallet)
        .scan(scan)
        .clock(clock)
        .config(config)
        .build()
}

/// A connected coordinator on Sepolia with 10 TREAT and `amount` entered.
async fn connected_with_amount(
    wallet: FakeWallet,
    scan: FakeScanProvider,
    clock: FakeClock,
    amount: &str,
) -> TestCoordinator {
    let wallet = wallet.with_token_balance(SEPOLIA, ether(10));
    let mut coordinator = create_coordinator(wallet, scan, clock, PollingConfig::default());
    coordinator
        .handle(Event::Connected {
            account: account(),
            chain_id: SEPOLIA,
        })
        .await;
    coordinator.handle(Event::SetAmount(amount.to_string())).await;
    coordinator
}

#[tokio::test]
async fn test_full_bridge_lifecycle() {
    init_tracing();
    let sent = Oft::OFTSent {
        guid: B256::repeat_byte(0x42),
        dstEid: 40102,
        fromAddress: account(),
        amountSentLD: ether(1) + ether(1) / U256::from(2),
        amountReceivedLD: ether(1) + ether(1) / U256::from(2),
    };
    let wallet = FakeWallet::new().with_receipt_logs(vec![Log {
        address: SEPOLIA_TREAT_OFT,
        data: sent.encode_log_data(),
    }]);
    let scan = FakeScanProvider::with_responses(vec![
        Ok(ScanResponse::default()),
        Ok(scan_response("INFLIGHT")),
        Ok(scan_response("DELIVERED")),
    ]);
    let clock = FakeClock::new();

    let mut coordinator =
        connected_with_amount(wallet.clone(), scan.clone(), clock.clone(), "1.5").await;

    let view = coordinator.view();
    assert_eq!(view.action, ActionButton::Approve);
    assert_eq!(view.source_balance, "10.0000");
    assert_eq!(view.fee, "0.001000 ETH");

    coordinator.handle(Event::RequestApproval).await;
    assert_eq!(coordinator.state().approval, ApprovalState::Success);
    assert_eq!(
        coordinator.state().allowance,
        Some(ether(1) + ether(1) / U256::from(2))
    );
    assert_eq!(coordinator.view().action, ActionButton::Bridge);

    coordinator.handle(Event::RequestBridge).await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::Idle, "success returns to idle");
    assert_eq!(state.status.as_deref(), Some("Bridge complete"));
    assert!(state.error.is_none());
    assert!(state.intent.amount.is_empty(), "amount resets after delivery");
    assert_eq!(state.approval, ApprovalState::Idle);

    let delivery = state.delivery.as_ref().unwrap();
    assert_eq!(delivery.status, DeliveryStatus::Delivered);
    assert_eq!(delivery.destination_tx_hash, Some(B256::repeat_byte(0xdd)));
    assert_eq!(state.sent_events.len(), 1);
    assert_eq!(state.sent_events[0].guid, Some(B256::repeat_byte(0x42)));

    let requests = wallet.sent_requests();
    assert_eq!(requests.len(), 2);
    assert!(is_approve_request(&requests[0]));
    assert!(is_send_request(&requests[1]));
    assert_eq!(requests[1].value, Some(U256::from(DEFAULT_FAKE_NATIVE_FEE)));
    assert!(requests[1].gas.is_some(), "bridge send carries a gas limit");

    assert_eq!(scan.call_count(), 3, "polling stops once delivered");
    assert_eq!(
        clock.sleep_log(),
        vec![Duration::from_secs(5), Duration::from_secs(5)],
        "first poll is immediate"
    );

    let tx_hash = state.tx_hash.unwrap();
    assert!(coordinator.subscriptions().contains(&tx_hash));

    coordinator.handle(Event::Dismiss).await;
    assert_eq!(coordinator.state().lifecycle, LifecycleState::Idle);
    assert!(coordinator.subscriptions().is_empty());
    assert!(coordinator.state().tx_hash.is_none());
}

#[tokio::test]
async fn test_bridge_walks_every_lifecycle_state() {
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, ether(5));
    let scan = FakeScanProvider::with_responses(vec![
        Ok(scan_response("INFLIGHT")),
        Ok(scan_response("DELIVERED")),
    ]);
    let mut coordinator = connected_with_amount(wallet, scan, FakeClock::new(), "1").await;

    let mut observed = vec![coordinator.state().lifecycle];
    coordinator.dispatch(Event::RequestBridge);
    loop {
        let lifecycle = coordinator.state().lifecycle;
        if observed.last() != Some(&lifecycle) {
            observed.push(lifecycle);
        }
        if !coordinator.step().await {
            break;
        }
    }

    assert_eq!(
        observed,
        vec![
            LifecycleState::Idle,
            LifecycleState::Preparing,
            LifecycleState::AwaitingConfirmation,
            LifecycleState::Pending,
            LifecycleState::TransactionConfirmed,
            LifecycleState::Confirmed,
            LifecycleState::Idle,
        ]
    );
    assert!(coordinator.state().intent.amount.is_empty());
    assert_eq!(coordinator.state().status.as_deref(), Some("Bridge complete"));
}

#[rstest]
#[case::user_rejected(
    FakeWallet::new().with_send_results(vec![Err(BridgeError::UserRejected)]),
    ApprovalState::Idle,
    false
)]
#[case::wallet_error(
    FakeWallet::new().with_send_results(vec![Err(BridgeError::Provider("nonce too low".into()))]),
    ApprovalState::Error,
    true
)]
#[case::reverted(FakeWallet::new().with_reverted_receipts(), ApprovalState::Error, true)]
#[tokio::test]
async fn test_approval_failures_leave_bridge_lifecycle_alone(
    #[case] wallet: FakeWallet,
    #[case] approval: ApprovalState,
    #[case] shows_error: bool,
) {
    let mut coordinator =
        connected_with_amount(wallet, FakeScanProvider::new(), FakeClock::new(), "1").await;

    coordinator.handle(Event::RequestApproval).await;

    let state = coordinator.state();
    assert_eq!(state.approval, approval);
    assert_eq!(state.approval_error.is_some(), shows_error);
    assert_eq!(state.lifecycle, LifecycleState::Idle);
    assert!(state.error.is_none());
    assert!(state.status.is_none());
    assert_eq!(coordinator.view().action, ActionButton::Approve);
    assert!(coordinator.view().action_enabled, "approval can be retried");
}

#[tokio::test]
async fn test_approval_queued_before_network_change_is_not_sent() {
    let wallet = FakeWallet::new().with_token_balance(POLYGON_AMOY, ether(10));
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;

    coordinator.dispatch(Event::RequestApproval);
    assert!(coordinator.step().await);
    assert!(matches!(
        coordinator.pending_effects().next(),
        Some(Effect::SubmitApproval { .. })
    ));

    coordinator.dispatch(Event::SelectSource(POLYGON_AMOY));
    coordinator.dispatch(Event::SetAmount("1".to_string()));
    coordinator.dispatch(Event::RequestApproval);
    coordinator.run_pending().await;

    let approval_chains: Vec<u64> = wallet
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            WalletCall::SendTransaction(chain_id, request) if is_approve_request(&request) => {
                Some(chain_id)
            }
            _ => None,
        })
        .collect();
    assert_eq!(approval_chains, vec![POLYGON_AMOY]);

    let state = coordinator.state();
    assert_eq!(state.source().chain_id(), POLYGON_AMOY);
    assert_eq!(state.approval, ApprovalState::Success);
    assert_eq!(state.allowance, Some(ether(1)));
}

#[tokio::test]
async fn test_adapter_network_approves_wrapped_token() {
    let token = Address::repeat_byte(0x77);
    let mut networks = Registry::testnet().all().to_vec();
    networks[0].token_address = token;
    networks[0].variant = ContractVariant::Adapter;
    let registry = Registry::new(networks).unwrap();

    let wallet = FakeWallet::new().with_token_balance(SEPOLIA, ether(10));
    let mut coordinator = Coordinator::builder()
        .wallet(wallet.clone())
        .scan(FakeScanProvider::repeating(Ok(scan_response("DELIVERED"))))
        .clock(FakeClock::new())
        .registry(registry)
        .build();
    coordinator
        .handle(Event::Connected {
            account: account(),
            chain_id: SEPOLIA,
        })
        .await;
    coordinator.handle(Event::SetAmount("1".into())).await;
    coordinator.handle(Event::RequestApproval).await;
    coordinator.handle(Event::RequestBridge).await;

    let requests = wallet.sent_requests();
    assert_eq!(requests.len(), 2);

    let approve = &requests[0];
    assert_eq!(approve.to, Some(TxKind::Call(token)));
    let call = Erc20::approveCall::abi_decode(approve.input.input().unwrap()).unwrap();
    assert_eq!(call.spender, SEPOLIA_TREAT_OFT);
    assert_eq!(call.amount, ether(1));

    assert_eq!(requests[1].to, Some(TxKind::Call(SEPOLIA_TREAT_OFT)));
    assert!(is_send_request(&requests[1]));
}

#[rstest]
#[case::approved(ether(5), true)]
#[case::not_approved(U256::ZERO, false)]
#[tokio::test]
async fn test_refresh_keeps_guard_outcome(#[case] allowance: U256, #[case] passes: bool) {
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, allowance);
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;
    let guard = format!("{:?}", coordinator.state().bridge_guard());
    let quote = coordinator.state().quote;

    coordinator.handle(Event::Refresh).await;
    coordinator.handle(Event::Refresh).await;

    let state = coordinator.state();
    assert_eq!(state.bridge_guard().is_ok(), passes);
    assert_eq!(format!("{:?}", state.bridge_guard()), guard);
    assert_eq!(state.intent.amount, "1");
    assert_eq!(state.quote, quote);
    assert_eq!(wallet.send_count(), 0);
}

#[tokio::test]
async fn test_bridge_blocked_without_allowance() {
    let wallet = FakeWallet::new();
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;

    coordinator.handle(Event::RequestBridge).await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::Idle);
    assert!(state.error.is_some());
    assert_eq!(wallet.send_count(), 0, "no write without allowance");
}

#[tokio::test]
async fn test_allowance_equal_to_amount_is_enough() {
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, ether(1));
    let scan = FakeScanProvider::repeating(Ok(scan_response("DELIVERED")));
    let mut coordinator =
        connected_with_amount(wallet.clone(), scan, FakeClock::new(), "1").await;

    assert_eq!(coordinator.view().action, ActionButton::Bridge);
    coordinator.handle(Event::RequestBridge).await;

    assert_eq!(coordinator.state().status.as_deref(), Some("Bridge complete"));
    assert_eq!(wallet.send_count(), 1);
}

#[tokio::test]
async fn test_fee_quote_falls_back() {
    let wallet = FakeWallet::new()
        .with_quote_results(vec![Err(BridgeError::ContractCall("execution reverted".into()))]);
    let coordinator =
        connected_with_amount(wallet, FakeScanProvider::new(), FakeClock::new(), "1").await;

    let quote = coordinator.state().quote.unwrap();
    assert!(quote.is_fallback);
    assert_eq!(quote.native_fee, U256::from(60_000_000_000_000u64));

    let view = coordinator.view();
    assert_eq!(view.fee, "0.000060 ETH");
    assert!(view.fee_is_estimate);
}

#[tokio::test]
async fn test_user_rejection_returns_to_idle_silently() {
    let wallet = FakeWallet::new()
        .with_allowance(SEPOLIA, ether(5))
        .with_send_results(vec![Err(BridgeError::UserRejected)]);
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;

    coordinator.handle(Event::RequestBridge).await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::Idle);
    assert!(state.error.is_none());
    assert!(state.status.is_none());
    assert!(state.tx_hash.is_none());
    assert_eq!(wallet.send_count(), 1);
    assert_eq!(coordinator.view().action, ActionButton::Bridge);
}

#[tokio::test]
async fn test_wallet_failure_surfaces_generic_error() {
    let wallet = FakeWallet::new()
        .with_allowance(SEPOLIA, ether(5))
        .with_send_results(vec![Err(BridgeError::Provider(
            "nonce too low: next nonce 7".into(),
        ))]);
    let mut coordinator =
        connected_with_amount(wallet, FakeScanProvider::new(), FakeClock::new(), "1").await;

    coordinator.handle(Event::RequestBridge).await;

    let view = coordinator.view();
    assert_eq!(view.lifecycle, LifecycleState::Error);
    assert_eq!(view.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(view.action, ActionButton::TryAgain);
}

#[tokio::test]
async fn test_reverted_source_transaction_is_an_error() {
    let wallet = FakeWallet::new()
        .with_allowance(SEPOLIA, ether(5))
        .with_reverted_receipts();
    let scan = FakeScanProvider::new();
    let mut coordinator =
        connected_with_amount(wallet, scan.clone(), FakeClock::new(), "1").await;

    coordinator.handle(Event::RequestBridge).await;

    assert_eq!(coordinator.state().lifecycle, LifecycleState::Error);
    assert_eq!(scan.call_count(), 0, "no delivery polling for a reverted send");
}

#[tokio::test]
async fn test_gas_shortfall_never_prompts_wallet() {
    let wallet = FakeWallet::new()
        .with_allowance(SEPOLIA, ether(5))
        .with_native_balance(SEPOLIA, U256::from(1));
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;

    coordinator.handle(Event::RequestBridge).await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::Idle);
    assert!(state.advisory.is_some());
    assert!(state.error.is_none());
    assert_eq!(wallet.send_count(), 0);
}

#[tokio::test]
async fn test_gas_estimate_retries_then_falls_back() {
    let failures: Vec<treat_bridge::Result<u64>> = (0..3)
        .map(|_| Err(BridgeError::Provider("estimate failed".into())))
        .collect();
    let wallet = FakeWallet::new()
        .with_allowance(SEPOLIA, ether(5))
        .with_gas_estimates(failures);
    let scan = FakeScanProvider::repeating(Ok(scan_response("DELIVERED")));
    let clock = FakeClock::new();
    let mut coordinator =
        connected_with_amount(wallet.clone(), scan, clock.clone(), "1").await;

    coordinator.handle(Event::RequestBridge).await;

    assert_eq!(coordinator.state().status.as_deref(), Some("Bridge complete"));
    assert_eq!(wallet.estimate_gas_count(), 3);
    assert_eq!(wallet.sent_requests()[0].gas, Some(500_000));
    assert_eq!(
        clock.sleep_log(),
        vec![Duration::from_secs(1), Duration::from_secs(1)]
    );
}

#[tokio::test]
async fn test_delivery_polling_exhaustion_is_advisory() {
    init_tracing();
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, ether(5));
    let scan = FakeScanProvider::repeating(Ok(ScanResponse::default()));
    let clock = FakeClock::new();
    let mut coordinator = create_coordinator(
        wallet.with_token_balance(SEPOLIA, ether(10)),
        scan.clone(),
        clock.clone(),
        PollingConfig::fast(),
    );
    coordinator
        .handle(Event::Connected {
            account: account(),
            chain_id: SEPOLIA,
        })
        .await;
    coordinator.handle(Event::SetAmount("1".into())).await;

    coordinator.handle(Event::RequestBridge).await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::TransactionConfirmed);
    assert_eq!(state.advisory.as_deref(), Some(EXHAUSTED_ADVISORY));
    assert!(state.error.is_none());
    assert!(state.delivery_watch.is_none());
    assert_eq!(scan.call_count(), 30);
    assert_eq!(clock.sleep_count(), 29);
    assert_eq!(clock.total_sleep_time(), Duration::from_secs(29 * 5));

    let view = coordinator.view();
    assert!(view.can_switch_chain, "exhausted monitor releases the inputs");
    assert!(view.scan_url.is_some());
}

#[tokio::test]
async fn test_failed_delivery_moves_to_error() {
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, ether(5));
    let scan = FakeScanProvider::with_responses(vec![
        Ok(scan_response("INFLIGHT")),
        Ok(scan_response("FAILED")),
    ]);
    let mut coordinator =
        connected_with_amount(wallet, scan.clone(), FakeClock::new(), "1").await;

    coordinator.handle(Event::RequestBridge).await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::Error);
    assert_eq!(state.delivery.as_ref().unwrap().status, DeliveryStatus::Failed);
    assert!(state.error.is_some());
    assert_eq!(scan.call_count(), 2);
}

#[tokio::test]
async fn test_duplicate_bridge_request_is_ignored() {
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, ether(5));
    let scan = FakeScanProvider::repeating(Ok(scan_response("DELIVERED")));
    let mut coordinator =
        connected_with_amount(wallet.clone(), scan, FakeClock::new(), "1").await;

    coordinator.dispatch(Event::RequestBridge);
    coordinator.dispatch(Event::RequestBridge);

    let prepares = coordinator
        .pending_effects()
        .filter(|effect| matches!(effect, Effect::PrepareBridge { .. }))
        .count();
    assert_eq!(prepares, 1);

    coordinator.run_pending().await;
    assert_eq!(wallet.send_count(), 1);
}

#[tokio::test]
async fn test_reset_mid_delivery_cancels_poll_and_subscription() {
    let wallet = FakeWallet::new().with_allowance(SEPOLIA, ether(5));
    let scan = FakeScanProvider::repeating(Ok(scan_response("INFLIGHT")));
    let mut coordinator =
        connected_with_amount(wallet, scan.clone(), FakeClock::new(), "1").await;

    coordinator.dispatch(Event::RequestBridge);
    while coordinator.state().lifecycle != LifecycleState::TransactionConfirmed {
        assert!(coordinator.step().await, "ran out of effects before confirmation");
    }

    // Inputs stay locked while delivery is being watched.
    coordinator.dispatch(Event::SelectSource(POLYGON_AMOY));
    assert_eq!(coordinator.state().source().chain_id(), SEPOLIA);

    coordinator.dispatch(Event::Reset);
    coordinator.run_pending().await;

    let state = coordinator.state();
    assert_eq!(state.lifecycle, LifecycleState::Idle);
    assert!(state.delivery.is_none());
    assert!(state.sent_events.is_empty());
    assert!(coordinator.subscriptions().is_empty());
    assert_eq!(scan.call_count(), 0, "queued poll for the old hash is dropped");
}

#[rstest]
#[case::new_source(Event::SelectSource(POLYGON_AMOY), POLYGON_AMOY, BSC_TESTNET)]
#[case::new_destination(Event::SelectDestination(POLYGON_AMOY), SEPOLIA, POLYGON_AMOY)]
#[case::source_collides(Event::SelectSource(BSC_TESTNET), BSC_TESTNET, SEPOLIA)]
#[case::destination_collides(Event::SelectDestination(SEPOLIA), BSC_TESTNET, SEPOLIA)]
#[case::swap(Event::SwapNetworks, BSC_TESTNET, SEPOLIA)]
#[tokio::test]
async fn test_network_selection(
    #[case] event: Event,
    #[case] source: u64,
    #[case] destination: u64,
) {
    let wallet = FakeWallet::new();
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;

    coordinator.handle(event).await;

    let state = coordinator.state();
    assert_eq!(state.source().chain_id(), source);
    assert_eq!(state.destination().chain_id(), destination);
    assert!(state.intent.amount.is_empty(), "network change clears the amount");

    let expected_switches: Vec<u64> = if source == SEPOLIA { vec![] } else { vec![source] };
    assert_eq!(wallet.switch_requests(), expected_switches);
    assert_eq!(state.wallet_chain, Some(source));
}

#[tokio::test]
async fn test_wallet_chain_change_moves_source() {
    let wallet = FakeWallet::new();
    let mut coordinator =
        connected_with_amount(wallet.clone(), FakeScanProvider::new(), FakeClock::new(), "1")
            .await;

    coordinator.handle(Event::ChainChanged(BSC_TESTNET)).await;

    let state = coordinator.state();
    assert_eq!(state.source().chain_id(), BSC_TESTNET);
    assert_eq!(state.destination().chain_id(), SEPOLIA);
    assert!(wallet.switch_requests().is_empty());
    assert!(!coordinator.view().wrong_network);
}

#[tokio::test]
async fn test_amount_inputs() {
    let mut coordinator = connected_with_amount(
        FakeWallet::new(),
        FakeScanProvider::new(),
        FakeClock::new(),
        "1",
    )
    .await;

    coordinator.handle(Event::SetAmount("1.2.3".into())).await;
    assert_eq!(coordinator.state().intent.amount, "1");
    assert_eq!(coordinator.state().intent.percentage, 10);

    coordinator.handle(Event::SetPercentage(25)).await;
    assert_eq!(coordinator.state().intent.amount, "2.5");
    assert!(coordinator.state().quote.is_some());
}

#[tokio::test]
async fn test_disconnect_clears_account_data() {
    let mut coordinator = connected_with_amount(
        FakeWallet::new(),
        FakeScanProvider::new(),
        FakeClock::new(),
        "1",
    )
    .await;

    coordinator.handle(Event::Disconnected).await;

    let view = coordinator.view();
    assert_eq!(view.action, ActionButton::Connect);
    assert_eq!(view.source_balance, "N/A");
    assert_eq!(view.fee, "Calculating...");
}
