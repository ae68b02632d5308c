// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! LayerZero OFT / OFT adapter bindings
//!
//! Both contract shapes share the `IOFT` surface used here. Which ERC-20 the
//! user approves differs per shape; see
//! [`NetworkDescriptor::token`](crate::NetworkDescriptor::token).

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, Bytes, Log, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::{debug, info, warn};

use Oft::{MessagingFee, OftInstance, SendParam};

/// Canonical `SendParam` for a TREAT transfer.
///
/// The recipient is left-padded to 32 bytes and the minimum received equals
/// the nominal amount; extra options, compose message and OFT command are
/// empty.
pub fn build_send_param(destination_eid: u32, recipient: Address, amount: U256) -> SendParam {
    SendParam {
        dstEid: destination_eid,
        to: recipient.into_word(),
        amountLD: amount,
        minAmountLD: amount,
        extraOptions: Bytes::new(),
        composeMsg: Bytes::new(),
        oftCmd: Bytes::new(),
    }
}

/// OFT contract wrapper for fee quoting
pub struct OftContract<P: Provider<Ethereum>> {
    instance: OftInstance<P>,
}

impl<P: Provider<Ethereum>> OftContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            instance: OftInstance::new(address, provider),
        }
    }

    /// Calls `quoteSend(sendParam, false)`, paying in native currency only.
    pub async fn quote_send(
        &self,
        send_param: SendParam,
    ) -> Result<MessagingFee, alloy_contract::Error> {
        let fee = self.instance.quoteSend(send_param, false).call().await?;

        debug!(
            native_fee = %fee.nativeFee,
            lz_token_fee = %fee.lzTokenFee,
            contract_address = %self.instance.address(),
            event = "quote_send_retrieved"
        );

        Ok(fee)
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

/// Builds an unsigned payable `send` request with `fee.nativeFee` attached as value.
pub fn send_request(
    bridge: Address,
    from: Address,
    send_param: SendParam,
    fee: MessagingFee,
    refund_address: Address,
) -> TransactionRequest {
    let value = fee.nativeFee;

    info!(
        from = %from,
        bridge = %bridge,
        destination_eid = send_param.dstEid,
        amount = %send_param.amountLD,
        native_fee = %value,
        event = "send_transaction_created"
    );

    let call = Oft::sendCall {
        _sendParam: send_param,
        _fee: fee,
        _refundAddress: refund_address,
    };

    TransactionRequest::default()
        .with_from(from)
        .with_to(bridge)
        .with_value(value)
        .with_input(call.abi_encode())
}

/// Whether `request` carries an OFT `send` call.
pub fn is_send_request(request: &TransactionRequest) -> bool {
    request
        .input
        .input()
        .is_some_and(|data| data.starts_with(&Oft::sendCall::SELECTOR))
}

/// A send emission decoded from a source receipt.
///
/// OFT v2 contracts emit `OFTSent`; older deployments emit `SendToChain`,
/// which carries no message guid and a single amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEvent {
    pub guid: Option<B256>,
    pub destination_eid: u32,
    pub from: Address,
    pub amount_sent: U256,
    pub amount_received: U256,
}

/// Extracts every `OFTSent` and `SendToChain` event from a set of receipt logs.
///
/// Logs that carry an event signature but fail to decode are skipped with a
/// warning rather than failing the receipt.
pub fn decode_sent_events(logs: &[Log]) -> Vec<SentEvent> {
    logs.iter().filter_map(decode_sent_event).collect()
}

fn decode_sent_event(log: &Log) -> Option<SentEvent> {
    let topic = log.topics().first()?;
    let decoded = if *topic == Oft::OFTSent::SIGNATURE_HASH {
        Oft::OFTSent::decode_log_data(&log.data).map(|sent| SentEvent {
            guid: Some(sent.guid),
            destination_eid: sent.dstEid,
            from: sent.fromAddress,
            amount_sent: sent.amountSentLD,
            amount_received: sent.amountReceivedLD,
        })
    } else if *topic == Oft::SendToChain::SIGNATURE_HASH {
        Oft::SendToChain::decode_log_data(&log.data).map(|sent| SentEvent {
            guid: None,
            destination_eid: u32::from(sent._dstChainId),
            from: sent._from,
            amount_sent: sent._amount,
            amount_received: sent._amount,
        })
    } else {
        return None;
    };

    match decoded {
        Ok(sent) => Some(sent),
        Err(e) => {
            warn!(
                error = %e,
                contract_address = %log.address,
                event = "sent_event_decode_failed"
            );
            None
        }
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract Oft {
        struct SendParam {
            uint32 dstEid;
            bytes32 to;
            uint256 amountLD;
            uint256 minAmountLD;
            bytes extraOptions;
            bytes composeMsg;
            bytes oftCmd;
        }

        struct MessagingFee {
            uint256 nativeFee;
            uint256 lzTokenFee;
        }

        struct MessagingReceipt {
            bytes32 guid;
            uint64 nonce;
            MessagingFee fee;
        }

        struct OFTReceipt {
            uint256 amountSentLD;
            uint256 amountReceivedLD;
        }

        event OFTSent(
            bytes32 indexed guid,
            uint32 dstEid,
            address indexed fromAddress,
            uint256 amountSentLD,
            uint256 amountReceivedLD
        );

        event SendToChain(
            uint16 indexed _dstChainId,
            address indexed _from,
            bytes32 indexed _toAddress,
            uint256 _amount
        );

        function quoteSend(SendParam calldata _sendParam, bool _payInLzToken)
            external
            view
            returns (MessagingFee memory msgFee);

        function send(SendParam calldata _sendParam, MessagingFee calldata _fee, address _refundAddress)
            external
            payable
            returns (MessagingReceipt memory msgReceipt, OFTReceipt memory oftReceipt);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, LogData};

    #[test]
    fn test_send_param_is_canonical() {
        let recipient = address!("1111111111111111111111111111111111111111");
        let amount = U256::from(10u64).pow(U256::from(18));
        let param = build_send_param(40102, recipient, amount);

        assert_eq!(param.dstEid, 40102);
        assert_eq!(param.to, recipient.into_word());
        assert_eq!(&param.to[..12], &[0u8; 12]);
        assert_eq!(param.amountLD, amount);
        assert_eq!(param.minAmountLD, param.amountLD);
        assert!(param.extraOptions.is_empty());
        assert!(param.composeMsg.is_empty());
        assert!(param.oftCmd.is_empty());
    }

    #[test]
    fn test_send_request_attaches_native_fee() {
        let bridge = address!("845f1be42fdbf9f285bf1278256b6627543f51dd");
        let from = address!("1111111111111111111111111111111111111111");
        let fee = MessagingFee {
            nativeFee: U256::from(777),
            lzTokenFee: U256::ZERO,
        };
        let request = send_request(
            bridge,
            from,
            build_send_param(40102, from, U256::from(1)),
            fee,
            from,
        );

        assert_eq!(request.value, Some(U256::from(777)));
        assert!(is_send_request(&request));
        assert!(!crate::contracts::erc20::is_approve_request(&request));
    }

    #[test]
    fn test_decode_sent_events_skips_unrelated_logs() {
        let bridge = address!("845f1be42fdbf9f285bf1278256b6627543f51dd");
        let from = address!("1111111111111111111111111111111111111111");
        let sent = Oft::OFTSent {
            guid: B256::repeat_byte(0x42),
            dstEid: 40267,
            fromAddress: from,
            amountSentLD: U256::from(5),
            amountReceivedLD: U256::from(5),
        };
        let logs = vec![
            Log {
                address: bridge,
                data: sent.encode_log_data(),
            },
            Log {
                address: bridge,
                data: LogData::new_unchecked(vec![B256::ZERO], Bytes::new()),
            },
        ];

        let decoded = decode_sent_events(&logs);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].guid, Some(B256::repeat_byte(0x42)));
        assert_eq!(decoded[0].destination_eid, 40267);
        assert_eq!(decoded[0].from, from);
        assert_eq!(decoded[0].amount_sent, U256::from(5));
    }

    #[test]
    fn test_decode_legacy_send_to_chain() {
        let bridge = address!("845f1be42fdbf9f285bf1278256b6627543f51dd");
        let from = address!("1111111111111111111111111111111111111111");
        let sent = Oft::SendToChain {
            _dstChainId: 10102,
            _from: from,
            _toAddress: from.into_word(),
            _amount: U256::from(9),
        };
        let logs = vec![Log {
            address: bridge,
            data: sent.encode_log_data(),
        }];

        let decoded = decode_sent_events(&logs);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].guid, None);
        assert_eq!(decoded[0].destination_eid, 10102);
        assert_eq!(decoded[0].from, from);
        assert_eq!(decoded[0].amount_received, U256::from(9));
    }
}
