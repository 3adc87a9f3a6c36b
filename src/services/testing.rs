// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory chain and ledger doubles shared by service and API tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::{transaction::SignerRecoverable, Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolInterface};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::blockchain::nft::INftCollection::{self, INftCollectionCalls};
use crate::blockchain::{BalanceRecord, ChainClient, ChainClientError, ChainConnector};
use crate::storage::{BalanceLedger, LedgerError, LedgerResult};

/// Well-known development key (address `0xf39F…2266`).
pub const TEST_KEY_HEX: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const MOCK_CHAIN_ID: u64 = 31_337;

/// A transaction accepted by [`MockChain::send_raw`].
#[derive(Debug, Clone)]
pub struct SentTx {
    pub hash: String,
    pub from: Address,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Option<Address>,
    pub mint_to: Address,
    pub token_uri: String,
}

/// Scriptable node. Nonces follow the number of accepted transactions, and a
/// broadcast reusing a nonce is rejected the way a real node would.
///
/// It also plays the NFT collection: accepted mints become tokens numbered
/// from zero, readable through `call`.
pub struct MockChain {
    gas_price: AtomicU64,
    block_number: AtomicU64,
    balance: Mutex<U256>,
    unavailable: AtomicBool,
    reject_reason: Mutex<Option<String>>,
    latency: Mutex<Duration>,
    sent: Mutex<Vec<SentTx>>,
    tokens: Mutex<Vec<(Address, String)>>,
    call_output: Mutex<Option<Vec<u8>>>,
    failing_ops: Mutex<HashSet<&'static str>>,
    balance_calls: AtomicUsize,
    gas_price_calls: AtomicUsize,
    nonce_calls: AtomicUsize,
    total_calls: AtomicUsize,
}

impl MockChain {
    pub fn new(gas_price: u64, block_number: u64, balance: U256) -> Self {
        Self {
            gas_price: AtomicU64::new(gas_price),
            block_number: AtomicU64::new(block_number),
            balance: Mutex::new(balance),
            unavailable: AtomicBool::new(false),
            reject_reason: Mutex::new(None),
            latency: Mutex::new(Duration::ZERO),
            sent: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            call_output: Mutex::new(None),
            failing_ops: Mutex::new(HashSet::new()),
            balance_calls: AtomicUsize::new(0),
            gas_price_calls: AtomicUsize::new(0),
            nonce_calls: AtomicUsize::new(0),
            total_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_gas_price(&self, value: u64) {
        self.gas_price.store(value, Ordering::SeqCst);
    }

    pub fn set_block_number(&self, value: u64) {
        self.block_number.store(value, Ordering::SeqCst);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn reject_sends(&self, reason: &str) {
        *self.reject_reason.lock().unwrap() = Some(reason.to_string());
    }

    /// Make one operation (named after its `ChainClient` method) fail.
    pub fn fail_op(&self, op: &'static str) {
        self.failing_ops.lock().unwrap().insert(op);
    }

    /// Add a token owned by `owner`; ids are assigned in order from zero.
    pub fn seed_token(&self, owner: Address, uri: &str) {
        self.tokens.lock().unwrap().push((owner, uri.to_string()));
    }

    /// Answer every `call` with these bytes instead of the collection state.
    pub fn set_call_output(&self, output: Option<Vec<u8>>) {
        *self.call_output.lock().unwrap() = output;
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn gas_price_calls(&self) -> usize {
        self.gas_price_calls.load(Ordering::SeqCst)
    }

    pub fn nonce_calls(&self) -> usize {
        self.nonce_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    /// Count the call, wait out the latency, then fail if the node is down.
    async fn enter(&self, op: &'static str) -> Result<(), ChainClientError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        if latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ChainClientError::Unavailable("mock node down".to_string()));
        }
        if self.failing_ops.lock().unwrap().contains(op) {
            return Err(ChainClientError::Unavailable(format!("mock {op} failed")));
        }
        Ok(())
    }

    /// Answer a view call against the seeded tokens.
    fn collection_call(&self, data: &[u8]) -> Result<Vec<u8>, ChainClientError> {
        let revert = |reason: &str| ChainClientError::Reverted(format!("execution reverted: {reason}"));
        let call = INftCollectionCalls::abi_decode(data).map_err(|_| revert("unknown selector"))?;
        let guard = self.tokens.lock().unwrap();
        let tokens = guard.as_slice();
        let token = move |id: U256| {
            usize::try_from(id)
                .ok()
                .and_then(|i| tokens.get(i))
                .ok_or_else(|| revert("ERC721NonexistentToken"))
        };
        let owned = move |owner: Address| {
            tokens
                .iter()
                .enumerate()
                .filter(move |(_, (o, _))| *o == owner)
                .map(|(id, _)| U256::from(id))
        };

        let output = match call {
            INftCollectionCalls::ownerOf(c) => {
                INftCollection::ownerOfCall::abi_encode_returns(&token(c.tokenId)?.0)
            }
            INftCollectionCalls::tokenURI(c) => {
                INftCollection::tokenURICall::abi_encode_returns(&token(c.tokenId)?.1)
            }
            INftCollectionCalls::balanceOf(c) => {
                let count = U256::from(owned(c.owner).count());
                INftCollection::balanceOfCall::abi_encode_returns(&count)
            }
            INftCollectionCalls::tokenOfOwnerByIndex(c) => {
                let id = usize::try_from(c.index)
                    .ok()
                    .and_then(|i| owned(c.owner).nth(i))
                    .ok_or_else(|| revert("ERC721OutOfBoundsIndex"))?;
                INftCollection::tokenOfOwnerByIndexCall::abi_encode_returns(&id)
            }
            INftCollectionCalls::safeMint(_) => return Err(revert("not a view")),
        };
        Ok(output)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn gas_price(&self) -> Result<u128, ChainClientError> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        self.enter("gas_price").await?;
        Ok(u128::from(self.gas_price.load(Ordering::SeqCst)))
    }

    async fn block_number(&self) -> Result<u64, ChainClientError> {
        self.enter("block_number").await?;
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn balance_of(&self, _address: Address) -> Result<U256, ChainClientError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.enter("balance_of").await?;
        Ok(*self.balance.lock().unwrap())
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, ChainClientError> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        self.enter("transaction_count").await?;
        Ok(self.sent.lock().unwrap().len() as u64)
    }

    async fn chain_id(&self) -> Result<u64, ChainClientError> {
        self.enter("chain_id").await?;
        Ok(MOCK_CHAIN_ID)
    }

    async fn send_raw(&self, signed_tx: &[u8]) -> Result<String, ChainClientError> {
        self.enter("send_raw").await?;
        if let Some(reason) = self.reject_reason.lock().unwrap().clone() {
            return Err(ChainClientError::Rejected(reason));
        }

        let envelope = TxEnvelope::decode_2718(&mut &signed_tx[..])
            .map_err(|e| ChainClientError::Rejected(format!("undecodable tx: {e}")))?;
        let from = envelope
            .recover_signer()
            .map_err(|e| ChainClientError::Rejected(format!("bad signature: {e}")))?;
        if envelope.chain_id() != Some(MOCK_CHAIN_ID) {
            return Err(ChainClientError::Rejected("wrong chain id".to_string()));
        }
        let call = INftCollection::safeMintCall::abi_decode(envelope.input())
            .map_err(|e| ChainClientError::Rejected(format!("bad calldata: {e}")))?;

        let mut sent = self.sent.lock().unwrap();
        let expected = sent.len() as u64;
        if envelope.nonce() != expected {
            return Err(ChainClientError::Rejected(format!(
                "nonce {} does not match expected {expected}",
                envelope.nonce()
            )));
        }

        let hash = format!("{:#x}", envelope.tx_hash());
        self.tokens.lock().unwrap().push((call.to, call.uri.clone()));
        sent.push(SentTx {
            hash: hash.clone(),
            from,
            nonce: envelope.nonce(),
            gas_price: envelope.gas_price().unwrap_or_default(),
            gas_limit: envelope.gas_limit(),
            to: envelope.to(),
            mint_to: call.to,
            token_uri: call.uri,
        });
        Ok(hash)
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, ChainClientError> {
        self.enter("call").await?;
        if let Some(output) = self.call_output.lock().unwrap().clone() {
            return Ok(output.into());
        }
        self.collection_call(&data).map(Bytes::from)
    }
}

/// Connector that hands out registered [`MockChain`]s by URL.
///
/// Unregistered URLs yield a client whose every call fails.
#[derive(Default)]
pub struct MockConnector {
    chains: HashMap<String, Arc<MockChain>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rpc_url: &str, chain: Arc<MockChain>) -> Self {
        self.chains.insert(rpc_url.to_string(), chain);
        self
    }
}

impl ChainConnector for MockConnector {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn ChainClient>, ChainClientError> {
        match self.chains.get(rpc_url) {
            Some(chain) => Ok(Arc::clone(chain) as Arc<dyn ChainClient>),
            None => {
                let dead = MockChain::new(0, 0, U256::ZERO);
                dead.set_unavailable(true);
                Ok(Arc::new(dead))
            }
        }
    }
}

/// Ledger that forwards every upsert to a channel.
pub struct RecordingLedger {
    tx: mpsc::UnboundedSender<BalanceRecord>,
    fail: bool,
    calls: AtomicUsize,
    records: Mutex<HashMap<String, BalanceRecord>>,
}

impl RecordingLedger {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<BalanceRecord>) {
        Self::build(false)
    }

    /// A ledger whose every upsert fails after being observed.
    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<BalanceRecord>) {
        Self::build(true)
    }

    fn build(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<BalanceRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ledger = Arc::new(Self {
            tx,
            fail,
            calls: AtomicUsize::new(0),
            records: Mutex::new(HashMap::new()),
        });
        (ledger, rx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceLedger for RecordingLedger {
    async fn upsert(&self, record: BalanceRecord) -> LedgerResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(record.clone());
        if self.fail {
            return Err(LedgerError::Task("ledger offline".to_string()));
        }
        let key = format!("{:#x}", record.address);
        self.records.lock().unwrap().insert(key, record);
        Ok(())
    }

    async fn latest(&self, address: &str) -> LedgerResult<Option<BalanceRecord>> {
        if self.fail {
            return Err(LedgerError::Task("ledger offline".to_string()));
        }
        Ok(self.records.lock().unwrap().get(&address.to_lowercase()).cloned())
    }
}
