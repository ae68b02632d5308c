// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashSet, VecDeque};

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, TxHash, U256};
use tracing::{debug, info, trace, warn, Instrument};

use super::event::{Effect, Event};
use super::reducer::reduce;
use super::state::BridgeState;
use crate::balances::BalanceReader;
use crate::chain::{NetworkDescriptor, Registry};
use crate::config::BridgeConfig;
use crate::contracts::erc20::approve_request;
use crate::contracts::oft::{build_send_param, send_request};
use crate::error::{BridgeError, Result};
use crate::fees::FeeQuoter;
use crate::gas::GasEstimator;
use crate::monitor::DeliveryMonitor;
use crate::protocol::DeliveryRecord;
use crate::receipt::SourceReceipt;
use crate::spans;
use crate::traits::{Clock, MessageScanProvider, WalletProvider};
use crate::view::BridgeView;

/// Runs the reducer against real (or fake) collaborators.
///
/// Events go in through [`Coordinator::dispatch`]; the effects they produce
/// queue up and run one at a time in [`Coordinator::step`], each feeding its
/// completion back as a new event. Nothing runs concurrently, so completions
/// apply in arrival order.
///
/// # Examples
///
/// ```rust,no_run
/// use treat_bridge::coordinator::{Coordinator, Event};
/// use treat_bridge::providers::{AlloyWallet, LayerZeroScanProvider, TokioClock};
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sepolia = ProviderBuilder::new().connect("https://rpc.sepolia.org").await?;
/// let wallet = AlloyWallet::new(11155111).with_chain(11155111, sepolia);
///
/// let mut coordinator = Coordinator::builder()
///     .wallet(wallet)
///     .scan(LayerZeroScanProvider::testnet())
///     .clock(TokioClock::new())
///     .build();
///
/// coordinator
///     .handle(Event::Connected {
///         account: "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d".parse()?,
///         chain_id: 11155111,
///     })
///     .await;
/// coordinator.handle(Event::SetAmount("1".to_string())).await;
/// println!("{:?}", coordinator.view().fee);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Coordinator<W, S, C> {
    wallet: W,
    scan: S,
    clock: C,
    config: BridgeConfig,
    state: BridgeState,
    queue: VecDeque<Effect>,
    subscriptions: HashSet<TxHash>,
}

#[bon::bon]
impl<W, S, C> Coordinator<W, S, C>
where
    W: WalletProvider,
    S: MessageScanProvider,
    C: Clock,
{
    #[builder]
    pub fn new(
        wallet: W,
        scan: S,
        clock: C,
        #[builder(default)] registry: Registry,
        #[builder(default)] config: BridgeConfig,
    ) -> Self {
        let state = BridgeState::new(registry, config.polling);
        Self {
            wallet,
            scan,
            clock,
            config,
            state,
            queue: VecDeque::new(),
            subscriptions: HashSet::new(),
        }
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    pub fn view(&self) -> BridgeView {
        BridgeView::from(&self.state)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn pending_effects(&self) -> impl Iterator<Item = &Effect> {
        self.queue.iter()
    }

    /// Hashes with an open send-event subscription.
    pub fn subscriptions(&self) -> &HashSet<TxHash> {
        &self.subscriptions
    }

    /// Applies `event` and queues the resulting effects without running them.
    pub fn dispatch(&mut self, event: Event) {
        let span = spans::dispatch(event.name());
        let _guard = span.enter();

        let effects = reduce(&mut self.state, event);
        trace!(
            effect_count = effects.len(),
            lifecycle = ?self.state.lifecycle,
            event = "event_reduced"
        );
        self.queue.extend(effects);
    }

    /// Runs the oldest queued effect. Returns `false` when nothing was queued.
    pub async fn step(&mut self) -> bool {
        let Some(effect) = self.queue.pop_front() else {
            return false;
        };
        if let Some(event) = self.execute(effect).await {
            self.dispatch(event);
        }
        true
    }

    /// Runs effects until the queue is empty, including every follow-up
    /// effect, delivery polls among them.
    pub async fn run_pending(&mut self) {
        while self.step().await {}
    }

    /// [`Coordinator::dispatch`] followed by [`Coordinator::run_pending`].
    pub async fn handle(&mut self, event: Event) {
        self.dispatch(event);
        self.run_pending().await;
    }

    async fn execute(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SwitchChain(chain_id) => match self.wallet.switch_chain(chain_id).await {
                Ok(()) => Some(Event::ChainChanged(chain_id)),
                Err(e) => {
                    warn!(
                        chain_id = chain_id,
                        error = %e,
                        rejected = e.is_user_rejection(),
                        event = "chain_switch_failed"
                    );
                    None
                }
            },
            Effect::RefreshBalances {
                account,
                source,
                destination,
            } => {
                let balances = BalanceReader::new(&self.wallet)
                    .refresh(account, &source, &destination)
                    .await;
                Some(Event::BalancesLoaded {
                    source_chain: source.chain_id(),
                    destination_chain: destination.chain_id(),
                    balances,
                })
            }
            Effect::RefreshAllowance { owner, network } => {
                let allowance = BalanceReader::new(&self.wallet)
                    .get_allowance(owner, &network)
                    .await;
                Some(Event::AllowanceLoaded {
                    chain_id: network.chain_id(),
                    allowance,
                })
            }
            Effect::FetchQuote {
                seq,
                source,
                destination,
                amount,
                recipient,
            } => {
                let quote = FeeQuoter::new(&self.wallet, self.config.gas.fallback_native_fee)
                    .quote(&source, &destination, amount, recipient)
                    .await;
                Some(Event::QuoteFetched { seq, quote })
            }
            Effect::EstimateApprovalGas {
                seq,
                owner,
                network,
                amount,
            } => {
                let gas_limit = GasEstimator::new(&self.wallet, &self.clock, &self.config.gas)
                    .estimate_approval_gas(owner, &network, amount)
                    .await;
                Some(Event::ApprovalGasEstimated { seq, gas_limit })
            }
            Effect::SubmitApproval {
                seq,
                owner,
                network,
                amount,
                gas_limit,
            } => {
                // No wallet prompt for a flow the user already left.
                if seq != self.state.approval_seq {
                    debug!(
                        seq = seq,
                        chain_id = network.chain_id(),
                        event = "approval_submit_cancelled"
                    );
                    return None;
                }
                Some(
                    self.submit_approval(seq, owner, &network, amount, gas_limit)
                        .await,
                )
            }
            Effect::WaitForApprovalReceipt {
                seq,
                network,
                tx_hash,
            } => {
                let result = self.wait_for_receipt(network.chain_id(), tx_hash).await;
                Some(Event::ApprovalReceipt {
                    seq,
                    tx_hash,
                    result,
                })
            }
            Effect::PrepareBridge {
                account,
                source,
                destination,
                amount,
                recipient,
            } => Some(
                self.prepare_bridge(account, &source, &destination, amount, recipient)
                    .await,
            ),
            Effect::SubmitBridge { network, request } => {
                let span = spans::submit_transaction(network.chain_id(), "send");
                let result = self
                    .wallet
                    .send_transaction(network.chain_id(), request)
                    .instrument(span.clone())
                    .await;
                Some(match result {
                    Ok(tx_hash) => {
                        span.record("tx_hash", tracing::field::display(tx_hash));
                        Event::BridgeSubmitted(tx_hash)
                    }
                    Err(e) => {
                        if !e.is_user_rejection() {
                            span.in_scope(|| spans::record_error(&e));
                        }
                        Event::BridgeSubmitFailed(e)
                    }
                })
            }
            Effect::WaitForReceipt { network, tx_hash } => {
                let result = self.wait_for_receipt(network.chain_id(), tx_hash).await;
                Some(Event::BridgeReceipt { tx_hash, result })
            }
            Effect::WatchSendEvents { network, tx_hash } => {
                self.subscriptions.insert(tx_hash);
                debug!(tx_hash = %tx_hash, event = "send_events_subscribed");
                match self
                    .wallet
                    .get_transaction_receipt(network.chain_id(), tx_hash)
                    .await
                {
                    Ok(Some(receipt)) => Some(Event::SendEventsObserved {
                        tx_hash,
                        events: receipt.sent_events(),
                    }),
                    Ok(None) => None,
                    Err(e) => {
                        warn!(tx_hash = %tx_hash, error = %e, event = "send_events_unavailable");
                        None
                    }
                }
            }
            Effect::UnwatchSendEvents { tx_hash } => {
                if self.subscriptions.remove(&tx_hash) {
                    debug!(tx_hash = %tx_hash, event = "send_events_unsubscribed");
                }
                None
            }
            Effect::PollDelivery {
                tx_hash,
                attempt,
                delay,
            } => self.poll_delivery(tx_hash, attempt, delay).await,
            Effect::ReturnToIdle { tx_hash } => Some(Event::SuccessSurfaced { tx_hash }),
        }
    }

    async fn submit_approval(
        &self,
        seq: u64,
        owner: Address,
        network: &NetworkDescriptor,
        amount: U256,
        gas_limit: Option<u64>,
    ) -> Event {
        let span = spans::submit_transaction(network.chain_id(), "approve");
        let mut request = approve_request(network.token(), owner, network.spender(), amount);
        if let Some(gas_limit) = gas_limit {
            request = request.with_gas_limit(gas_limit);
        }

        match self
            .wallet
            .send_transaction(network.chain_id(), request)
            .instrument(span)
            .await
        {
            Ok(tx_hash) => {
                info!(tx_hash = %tx_hash, event = "approval_submitted");
                Event::ApprovalSubmitted { seq, tx_hash }
            }
            Err(error) => Event::ApprovalSubmitFailed { seq, error },
        }
    }

    /// Fresh quote, gas estimate with fallback, then the sufficiency check.
    async fn prepare_bridge(
        &self,
        account: Address,
        source: &NetworkDescriptor,
        destination: &NetworkDescriptor,
        amount: U256,
        recipient: Address,
    ) -> Event {
        let span = spans::prepare_bridge(source.chain_id(), &account, &recipient, &amount);

        async {
            let quote = FeeQuoter::new(&self.wallet, self.config.gas.fallback_native_fee)
                .quote(source, destination, amount, recipient)
                .await;

            let send_param = build_send_param(destination.endpoint_id, recipient, amount);
            let request = send_request(
                source.bridge_address,
                account,
                send_param,
                quote.messaging_fee(),
                account,
            );

            let estimator = GasEstimator::new(&self.wallet, &self.clock, &self.config.gas);
            let gas = estimator
                .estimate_bridge_gas(source.chain_id(), &request)
                .await;

            match estimator
                .check_sufficiency(source.chain_id(), account, gas.gas_limit, quote.native_fee)
                .await
            {
                Ok(()) => Event::BridgePrepared {
                    quote,
                    request: request.with_gas_limit(gas.gas_limit),
                },
                Err(e) => {
                    spans::record_error_with_context(
                        "GasShortfall",
                        &e.to_string(),
                        Some("no wallet prompt shown"),
                    );
                    Event::BridgePreparationFailed(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Polls for the receipt within the configured receipt budget.
    async fn wait_for_receipt(&self, chain_id: u64, tx_hash: TxHash) -> Result<SourceReceipt> {
        let polling = self.config.receipt_polling;
        let span = spans::wait_for_receipt(tx_hash, chain_id, polling.max_attempts);

        async {
            for attempt in 1..=polling.max_attempts {
                if let Some(receipt) = self
                    .wallet
                    .get_transaction_receipt(chain_id, tx_hash)
                    .await?
                {
                    debug!(
                        tx_hash = %tx_hash,
                        attempt = attempt,
                        success = receipt.success,
                        event = "receipt_found"
                    );
                    return Ok(receipt);
                }
                trace!(tx_hash = %tx_hash, attempt = attempt, event = "receipt_pending");
                if attempt < polling.max_attempts {
                    self.clock.sleep(polling.poll_interval()).await;
                }
            }

            Err(BridgeError::TransactionFailed {
                reason: format!(
                    "{tx_hash} not mined after {} attempts",
                    polling.max_attempts
                ),
            })
        }
        .instrument(span)
        .await
    }

    async fn poll_delivery(
        &self,
        tx_hash: TxHash,
        attempt: u32,
        delay: std::time::Duration,
    ) -> Option<Event> {
        if self.state.delivery_watch != Some(tx_hash) {
            debug!(tx_hash = %tx_hash, attempt = attempt, event = "delivery_poll_cancelled");
            return None;
        }
        if !delay.is_zero() {
            self.clock.sleep(delay).await;
        }

        let record = self
            .state
            .delivery
            .clone()
            .filter(|r| r.source_tx_hash == tx_hash)
            .unwrap_or_else(|| DeliveryRecord::new(tx_hash));

        let span = spans::poll_delivery(tx_hash, attempt, self.config.polling.max_attempts);
        let result = DeliveryMonitor::new(&self.scan, &self.clock, self.config.polling)
            .poll_once(&record)
            .instrument(span)
            .await;

        Some(Event::DeliveryPolled {
            tx_hash,
            attempt,
            result,
        })
    }
}
