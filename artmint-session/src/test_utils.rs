// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! In-memory collaborators for testing sessions without a wallet, a node or a gateway.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{Address, Bytes, Log, B256, U256},
    sol_types::SolEvent as _,
};
use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    contracts::{ArtNft, ChainBackend, IArtNFT, Receipt, RewardToken},
    error::{ChainError, ProviderError, SessionError},
    metadata::{MetadataFetcher, NftMetadata},
    upload::{FileUpload, PinningService},
    wallet::{ChainParameters, WalletProvider},
};

/// A wallet whose answers are set by the test.
pub struct MockWallet {
    state: Mutex<MockWalletState>,
}

struct MockWalletState {
    accounts: Result<Vec<Address>, ProviderError>,
    chain_id: u64,
    known_chains: BTreeSet<u64>,
    add_chain_error: Option<ProviderError>,
    added_chains: Vec<ChainParameters>,
}

impl MockWallet {
    pub fn new(accounts: Vec<Address>, chain_id: u64) -> Self {
        Self {
            state: Mutex::new(MockWalletState {
                accounts: Ok(accounts),
                chain_id,
                known_chains: BTreeSet::from([chain_id]),
                add_chain_error: None,
                added_chains: Vec::new(),
            }),
        }
    }

    /// Makes the user decline every account access request.
    pub fn reject_access(&self) {
        self.state.lock().unwrap().accounts = Err(ProviderError::user_rejected());
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().unwrap().accounts = Ok(accounts);
    }

    pub fn fail_add_chain(&self, error: ProviderError) {
        self.state.lock().unwrap().add_chain_error = Some(error);
    }

    pub fn current_chain(&self) -> u64 {
        self.state.lock().unwrap().chain_id
    }

    pub fn added_chains(&self) -> Vec<ChainParameters> {
        self.state.lock().unwrap().added_chains.clone()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.state.lock().unwrap().accounts.clone()
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(self.current_chain())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        if !state.known_chains.contains(&chain_id) {
            return Err(ProviderError::unrecognized_chain(chain_id));
        }
        state.chain_id = chain_id;
        Ok(())
    }

    async fn add_chain(&self, parameters: &ChainParameters) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.add_chain_error.clone() {
            return Err(error);
        }
        let chain_id = parameters
            .numeric_chain_id()
            .ok_or_else(|| ProviderError::new(-32602, "invalid chain ID"))?;
        state.known_chains.insert(chain_id);
        state.chain_id = chain_id;
        state.added_chains.push(parameters.clone());
        Ok(())
    }
}

/// What happens to the next mint submitted to a [`MockChain`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MintBehaviour {
    /// The token is minted and the receipt carries the mint event.
    #[default]
    Succeed,
    /// The token is minted but the receipt carries no event.
    SucceedWithoutEvent,
    /// The transaction reverts.
    Revert,
    /// No receipt can be obtained.
    Lost,
}

#[derive(Clone, Debug)]
struct MockToken {
    token_uri: String,
    owner: Address,
    creator: Address,
}

#[derive(Default)]
struct MockChainState {
    code: HashMap<Address, Bytes>,
    balances: HashMap<Address, U256>,
    creator_reward_amount: U256,
    tokens: Vec<MockToken>,
    broken_tokens: BTreeSet<u64>,
    fail_total_supply: bool,
    fail_balances: bool,
    mint_behaviour: MintBehaviour,
    minter: Address,
    receipts: BTreeMap<B256, Receipt>,
    receipt_gate: Option<watch::Sender<bool>>,
    submitted_transactions: u64,
    total_supply_calls: usize,
}

/// An in-memory chain holding one reward token and one NFT collection.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<MockChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places contract code at `address`.
    pub fn deploy(&self, address: Address) {
        self.state
            .lock()
            .unwrap()
            .code
            .insert(address, Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]));
    }

    /// Removes the contract code at `address`.
    pub fn undeploy(&self, address: Address) {
        self.state.lock().unwrap().code.remove(&address);
    }

    pub fn set_balance(&self, owner: Address, balance: U256) {
        self.state.lock().unwrap().balances.insert(owner, balance);
    }

    pub fn set_creator_reward_amount(&self, amount: U256) {
        self.state.lock().unwrap().creator_reward_amount = amount;
    }

    /// Adds an existing token and returns its ID.
    pub fn push_token(&self, token_uri: &str, owner: Address, creator: Address) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.tokens.push(MockToken {
            token_uri: token_uri.to_string(),
            owner,
            creator,
        });
        state.tokens.len() as u64 - 1
    }

    /// Makes every read about `token_id` fail.
    pub fn break_token(&self, token_id: u64) {
        self.state.lock().unwrap().broken_tokens.insert(token_id);
    }

    pub fn fail_total_supply(&self, fail: bool) {
        self.state.lock().unwrap().fail_total_supply = fail;
    }

    pub fn fail_balances(&self, fail: bool) {
        self.state.lock().unwrap().fail_balances = fail;
    }

    pub fn set_mint_behaviour(&self, behaviour: MintBehaviour) {
        self.state.lock().unwrap().mint_behaviour = behaviour;
    }

    /// Sets the account minting through this chain.
    pub fn set_minter(&self, minter: Address) {
        self.state.lock().unwrap().minter = minter;
    }

    /// Holds every receipt back until [`MockChain::release_receipts`] is called.
    pub fn hold_receipts(&self) {
        let (gate, _) = watch::channel(false);
        self.state.lock().unwrap().receipt_gate = Some(gate);
    }

    pub fn release_receipts(&self) {
        if let Some(gate) = self.state.lock().unwrap().receipt_gate.take() {
            gate.send_replace(true);
        }
    }

    /// How many times the total supply was read, i.e. how many NFT refreshes started.
    pub fn total_supply_calls(&self) -> usize {
        self.state.lock().unwrap().total_supply_calls
    }

    fn token(&self, token_id: u64) -> Result<MockToken, ChainError> {
        let state = self.state.lock().unwrap();
        if state.broken_tokens.contains(&token_id) {
            return Err(ChainError::Request(format!("token {token_id} read failed")));
        }
        usize::try_from(token_id)
            .ok()
            .and_then(|index| state.tokens.get(index))
            .cloned()
            .ok_or_else(|| ChainError::Request(format!("token {token_id} does not exist")))
    }
}

#[async_trait]
impl ChainBackend for MockChain {
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .code
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    fn reward_token(&self, address: Address) -> Arc<dyn RewardToken> {
        Arc::new(MockContract {
            chain: self.clone(),
            address,
        })
    }

    fn art_nft(&self, address: Address) -> Arc<dyn ArtNft> {
        Arc::new(MockContract {
            chain: self.clone(),
            address,
        })
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<Receipt, ChainError> {
        let gate = self
            .state
            .lock()
            .unwrap()
            .receipt_gate
            .as_ref()
            .map(watch::Sender::subscribe);
        if let Some(mut gate) = gate {
            let _ = gate.wait_for(|released| *released).await;
        }
        self.state
            .lock()
            .unwrap()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ChainError::Request(format!("no receipt for {tx_hash}")))
    }
}

/// A contract on a [`MockChain`].
struct MockContract {
    chain: MockChain,
    address: Address,
}

#[async_trait]
impl RewardToken for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        let state = self.chain.state.lock().unwrap();
        if state.fail_balances {
            return Err(ChainError::Request("balanceOf failed".to_string()));
        }
        Ok(state.balances.get(&owner).copied().unwrap_or_default())
    }
}

#[async_trait]
impl ArtNft for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn total_supply(&self) -> Result<u64, ChainError> {
        let mut state = self.chain.state.lock().unwrap();
        state.total_supply_calls += 1;
        if state.fail_total_supply {
            return Err(ChainError::Request("totalSupply failed".to_string()));
        }
        Ok(state.tokens.len() as u64)
    }

    async fn token_uri(&self, token_id: u64) -> Result<String, ChainError> {
        Ok(self.chain.token(token_id)?.token_uri)
    }

    async fn owner_of(&self, token_id: u64) -> Result<Address, ChainError> {
        Ok(self.chain.token(token_id)?.owner)
    }

    async fn creator_of(&self, token_id: u64) -> Result<Address, ChainError> {
        Ok(self.chain.token(token_id)?.creator)
    }

    async fn creator_reward_amount(&self) -> Result<U256, ChainError> {
        let state = self.chain.state.lock().unwrap();
        if state.fail_balances {
            return Err(ChainError::Request("creatorRewardAmount failed".to_string()));
        }
        Ok(state.creator_reward_amount)
    }

    async fn submit_mint(&self, token_uri: &str) -> Result<B256, ChainError> {
        let mut state = self.chain.state.lock().unwrap();
        state.submitted_transactions += 1;
        let tx_hash = B256::left_padding_from(&state.submitted_transactions.to_be_bytes());
        let minter = state.minter;
        let behaviour = state.mint_behaviour;

        let (success, logs) = match behaviour {
            MintBehaviour::Lost => return Ok(tx_hash),
            MintBehaviour::Revert => (false, Vec::new()),
            MintBehaviour::Succeed | MintBehaviour::SucceedWithoutEvent => {
                state.tokens.push(MockToken {
                    token_uri: token_uri.to_string(),
                    owner: minter,
                    creator: minter,
                });
                let token_id = U256::from(state.tokens.len() - 1);
                let logs = if behaviour == MintBehaviour::Succeed {
                    let event = IArtNFT::NFTMinted {
                        tokenId: token_id,
                        creator: minter,
                        tokenURI: token_uri.to_string(),
                    };
                    vec![Log {
                        address: self.address,
                        data: event.encode_log_data(),
                    }]
                } else {
                    Vec::new()
                };
                (true, logs)
            }
        };
        state.receipts.insert(
            tx_hash,
            Receipt {
                tx_hash,
                success,
                logs,
            },
        );
        Ok(tx_hash)
    }
}

/// Serves metadata documents from memory; unknown URLs are unavailable.
#[derive(Default)]
pub struct MockMetadata {
    documents: Mutex<HashMap<String, NftMetadata>>,
}

impl MockMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, metadata: NftMetadata) {
        self.documents.lock().unwrap().insert(url.into(), metadata);
    }
}

#[async_trait]
impl MetadataFetcher for MockMetadata {
    async fn fetch(&self, url: &str) -> Result<NftMetadata, SessionError> {
        self.documents
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SessionError::metadata_unavailable(url, "document not found"))
    }
}

/// Records pinned content and hands out sequential content identifiers.
#[derive(Default)]
pub struct MockPinning {
    pinned_files: Mutex<Vec<FileUpload>>,
    pinned_documents: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockPinning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pinned_files(&self) -> Vec<FileUpload> {
        self.pinned_files.lock().unwrap().clone()
    }

    pub fn pinned_documents(&self) -> Vec<(String, serde_json::Value)> {
        self.pinned_documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl PinningService for MockPinning {
    async fn pin_file(&self, file: &FileUpload) -> Result<String, SessionError> {
        let mut pinned = self.pinned_files.lock().unwrap();
        pinned.push(file.clone());
        Ok(format!("QmFile{}", pinned.len()))
    }

    async fn pin_json(
        &self,
        name: &str,
        document: &serde_json::Value,
    ) -> Result<String, SessionError> {
        let mut pinned = self.pinned_documents.lock().unwrap();
        pinned.push((name.to_string(), document.clone()));
        Ok(format!("QmJson{}", pinned.len()))
    }
}
