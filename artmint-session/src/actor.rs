// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! An actor that owns a wallet session.
//!
//! User requests, wallet notifications and mint settlements go through a single queue and
//! are handled one at a time, in arrival order.

use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::{
    config::SessionConfig,
    contracts::{find_minted_token, ChainBackend, ContractHandles, Receipt},
    error::{ChainError, SessionError},
    metadata::MetadataFetcher,
    network,
    nft::{load_catalog, NftCatalog},
    session::{MintedToken, SessionSnapshot, SessionState, TransactionState},
    wallet::{WalletEvent, WalletProvider},
};

/// A request for the [`SessionActor`].
pub(crate) enum SessionRequest {
    Connect {
        response_sender: oneshot::Sender<Result<Address, SessionError>>,
    },
    Disconnect {
        response_sender: oneshot::Sender<()>,
    },
    MintNft {
        token_uri: String,
        response_sender: oneshot::Sender<Result<MintedToken, SessionError>>,
    },
    RefreshNfts {
        response_sender: oneshot::Sender<Result<(), SessionError>>,
    },
    RefreshBalances {
        response_sender: oneshot::Sender<()>,
    },
    EnsureNetwork {
        response_sender: oneshot::Sender<Result<bool, SessionError>>,
    },
    /// Answers once every message queued before it has been handled.
    Flush {
        response_sender: oneshot::Sender<()>,
    },
}

/// A mint whose receipt wait has ended.
pub(crate) struct MintSettlement {
    /// The connection the mint was submitted in.
    epoch: u64,
    tx_hash: B256,
    outcome: Result<Receipt, ChainError>,
    response_sender: oneshot::Sender<Result<MintedToken, SessionError>>,
}

pub(crate) enum SessionMessage {
    Request(SessionRequest),
    Wallet(WalletEvent),
    MintSettled(MintSettlement),
}

/// The actor worker type.
pub struct SessionActor {
    config: SessionConfig,
    wallet: Option<Arc<dyn WalletProvider>>,
    backend: Arc<dyn ChainBackend>,
    metadata: Arc<dyn MetadataFetcher>,
    state: SessionState,
    /// Bumped whenever a connection starts or ends.
    epoch: u64,
    incoming_messages: mpsc::UnboundedReceiver<SessionMessage>,
    loopback: mpsc::WeakUnboundedSender<SessionMessage>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionActor {
    /// Spawns a new task to run the [`SessionActor`], returning a handle for sending it
    /// requests.
    ///
    /// `wallet` is `None` when no wallet is available; `connect` then fails with
    /// [`SessionError::NoProvider`].
    pub fn spawn(
        config: SessionConfig,
        wallet: Option<Arc<dyn WalletProvider>>,
        backend: Arc<dyn ChainBackend>,
        metadata: Arc<dyn MetadataFetcher>,
    ) -> SessionHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (snapshots, snapshot_receiver) = watch::channel(SessionSnapshot::default());

        let actor = SessionActor {
            config,
            wallet,
            backend,
            metadata,
            state: SessionState::default(),
            epoch: 0,
            incoming_messages: receiver,
            loopback: sender.downgrade(),
            snapshots,
        };

        tokio::spawn(actor.run());

        SessionHandle {
            sender,
            snapshots: snapshot_receiver,
        }
    }

    /// Runs the session until every handle is dropped.
    #[instrument(skip_all)]
    async fn run(mut self) {
        trace!("Starting `SessionActor`");

        while let Some(message) = self.incoming_messages.recv().await {
            match message {
                SessionMessage::Request(request) => self.handle_request(request).await,
                SessionMessage::Wallet(event) => self.handle_wallet_event(event).await,
                SessionMessage::MintSettled(settlement) => self.settle_mint(settlement).await,
            }
            self.publish();
        }

        trace!("`SessionActor` finished");
    }

    async fn handle_request(&mut self, request: SessionRequest) {
        match request {
            SessionRequest::Connect { response_sender } => {
                let result = self.connect().await;
                let connected = result.is_ok();
                self.respond(response_sender, result);
                if connected {
                    self.reload().await;
                }
            }
            SessionRequest::Disconnect { response_sender } => {
                self.disconnect();
                self.respond(response_sender, ());
            }
            SessionRequest::MintNft {
                token_uri,
                response_sender,
            } => self.start_mint(token_uri, response_sender).await,
            SessionRequest::RefreshNfts { response_sender } => {
                let result = self.refresh_nfts().await;
                self.respond(response_sender, result);
            }
            SessionRequest::RefreshBalances { response_sender } => {
                self.refresh_balances().await;
                self.respond(response_sender, ());
            }
            SessionRequest::EnsureNetwork { response_sender } => {
                let result = match &self.wallet {
                    Some(wallet) => Ok(network::ensure_network(
                        wallet.as_ref(),
                        self.config.chain_id,
                        &self.config.chain_parameters(),
                    )
                    .await),
                    None => Err(SessionError::NoProvider),
                };
                self.respond(response_sender, result);
            }
            SessionRequest::Flush { response_sender } => self.respond(response_sender, ()),
        }
    }

    /// Asks the wallet for access. The state is only touched once everything succeeded.
    async fn connect(&mut self) -> Result<Address, SessionError> {
        let wallet = self.wallet.clone().ok_or(SessionError::NoProvider)?;
        let accounts = wallet
            .request_accounts()
            .await
            .map_err(SessionError::from_access_request)?;
        let account = *accounts.first().ok_or(SessionError::ZeroAccounts)?;
        let chain_id = wallet.chain_id().await?;

        info!(%account, chain_id, "Wallet connected");
        self.epoch += 1;
        self.state.account = Some(account);
        self.state.chain_id = Some(chain_id);
        self.state.is_connected = true;
        Ok(account)
    }

    fn disconnect(&mut self) {
        if self.state.is_connected {
            info!("Wallet disconnected");
        }
        self.epoch += 1;
        self.state = SessionState::default();
    }

    /// Rebuilds everything derived from the account and the chain.
    async fn reload(&mut self) {
        self.state.catalog = NftCatalog::default();
        self.initialize_contracts().await;
        self.refresh_balances().await;
        if let Err(error) = self.refresh_nfts().await {
            warn!(%error, "Failed to refresh NFTs");
        }
    }

    async fn initialize_contracts(&mut self) {
        self.state.contracts = None;
        match self.verified_contracts().await {
            Ok(contracts) => {
                debug!(?contracts, "Contracts initialized");
                self.state.contracts = Some(contracts);
                self.state.contracts_error = None;
            }
            Err(error) => {
                error!(%error, "Failed to initialize contracts");
                self.state.contracts_error = Some(error.to_string());
            }
        }
    }

    /// Returns handles to both contracts if both have code deployed.
    async fn verified_contracts(&self) -> Result<ContractHandles, SessionError> {
        let (token_address, nft_address) = self
            .config
            .contract_addresses()
            .ok_or(SessionError::MissingContractAddresses)?;
        for address in [token_address, nft_address] {
            if self.backend.code_at(address).await?.is_empty() {
                return Err(SessionError::ContractNotDeployed { address });
            }
        }
        Ok(ContractHandles {
            reward_token: self.backend.reward_token(token_address),
            art_nft: self.backend.art_nft(nft_address),
        })
    }

    /// Reloads the cached balances, zeroing them if they cannot be read.
    async fn refresh_balances(&mut self) {
        let contracts = self.state.contracts.clone();
        let (token_balance, creator_reward_amount) = match (contracts, self.state.account) {
            (Some(contracts), Some(account)) if self.state.is_connected => {
                match Self::read_balances(&contracts, account).await {
                    Ok(balances) => balances,
                    Err(error) => {
                        warn!(%error, "Failed to fetch token data");
                        (U256::ZERO, U256::ZERO)
                    }
                }
            }
            _ => (U256::ZERO, U256::ZERO),
        };
        self.state.token_balance = token_balance;
        self.state.creator_reward_amount = creator_reward_amount;
    }

    async fn read_balances(
        contracts: &ContractHandles,
        account: Address,
    ) -> Result<(U256, U256), ChainError> {
        let balance = contracts.reward_token.balance_of(account).await?;
        let reward = contracts.art_nft.creator_reward_amount().await?;
        Ok((balance, reward))
    }

    /// Replaces the NFT catalog. The previous catalog is kept if the supply cannot be read.
    async fn refresh_nfts(&mut self) -> Result<(), SessionError> {
        let art_nft = match (&self.state.contracts, self.state.is_connected) {
            (Some(contracts), true) => contracts.art_nft.clone(),
            _ => return Err(SessionError::NotConnected),
        };

        self.state.loading_nfts = true;
        self.publish();
        let result = load_catalog(
            art_nft.as_ref(),
            self.metadata.as_ref(),
            &self.config.gateway_url,
            self.state.account,
        )
        .await;
        self.state.loading_nfts = false;

        self.state.catalog = result?;
        Ok(())
    }

    async fn handle_wallet_event(&mut self, event: WalletEvent) {
        if !self.state.is_connected {
            debug!(?event, "Ignoring wallet event while disconnected");
            return;
        }
        trace!(?event, "Handling wallet event");
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                None => self.disconnect(),
                Some(&account) => {
                    info!(%account, "Account changed");
                    self.state.account = Some(account);
                    let records = std::mem::take(&mut self.state.catalog).into_records();
                    self.state.catalog = NftCatalog::new(records, Some(account));
                    self.refresh_balances().await;
                    if let Err(error) = self.refresh_nfts().await {
                        warn!(%error, "Failed to refresh NFTs");
                    }
                }
            },
            WalletEvent::ChainChanged(chain_id) => {
                info!(chain_id, "Chain changed");
                self.state.chain_id = Some(chain_id);
                self.reload().await;
            }
            WalletEvent::Disconnected => self.disconnect(),
        }
    }

    /// Submits a mint and leaves the receipt wait to a separate task, so that the session
    /// keeps handling messages while the transaction is mined.
    async fn start_mint(
        &mut self,
        token_uri: String,
        response_sender: oneshot::Sender<Result<MintedToken, SessionError>>,
    ) {
        let art_nft = match (&self.state.contracts, self.state.is_connected) {
            (Some(contracts), true) => contracts.art_nft.clone(),
            _ => return self.respond(response_sender, Err(SessionError::NotConnected)),
        };

        let tx_hash = match art_nft.submit_mint(&token_uri).await {
            Ok(tx_hash) => tx_hash,
            Err(error) => return self.respond(response_sender, Err(error.into())),
        };
        info!(%tx_hash, %token_uri, "Mint submitted");
        self.state
            .record_transaction(tx_hash, TransactionState::Pending, "Minting NFT...");

        let Some(loopback) = self.loopback.upgrade() else {
            return self.respond(response_sender, Err(SessionError::SessionClosed));
        };
        let backend = self.backend.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let outcome = backend.wait_for_receipt(tx_hash).await;
            let settlement = MintSettlement {
                epoch,
                tx_hash,
                outcome,
                response_sender,
            };
            if loopback
                .send(SessionMessage::MintSettled(settlement))
                .is_err()
            {
                debug!(%tx_hash, "Session closed before the mint settled");
            }
        });
    }

    /// Answers the minter. The outcome is only recorded if the connection the mint was
    /// submitted in is still the current one.
    async fn settle_mint(&mut self, settlement: MintSettlement) {
        let MintSettlement {
            epoch,
            tx_hash,
            outcome,
            response_sender,
        } = settlement;

        let (status, result): (_, Result<MintedToken, SessionError>) = match outcome {
            Ok(receipt) if receipt.success => match find_minted_token(&receipt.logs) {
                Some(token_id) => {
                    info!(%tx_hash, %token_id, "NFT minted");
                    (TransactionState::Confirmed, Ok(MintedToken::Assigned(token_id)))
                }
                None => {
                    warn!(%tx_hash, "No mint event in receipt");
                    (TransactionState::Confirmed, Ok(MintedToken::Unknown))
                }
            },
            Ok(_) => {
                warn!(%tx_hash, "Mint transaction reverted");
                (
                    TransactionState::Failed,
                    Err(SessionError::TransactionFailed { tx_hash }),
                )
            }
            Err(error) => {
                warn!(%tx_hash, %error, "Failed to wait for mint receipt");
                (TransactionState::Failed, Err(error.into()))
            }
        };

        if epoch != self.epoch {
            debug!(%tx_hash, "Mint settled after its connection ended");
        } else if status == TransactionState::Confirmed {
            self.state.record_transaction(tx_hash, status, "NFT minted successfully!");
            if let Err(error) = self.refresh_nfts().await {
                warn!(%error, "Failed to refresh NFTs after mint");
            }
        } else {
            self.state.record_transaction(tx_hash, status, "NFT minting failed");
        }
        self.respond(response_sender, result);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }

    /// Publishes the current state, then answers the request.
    fn respond<T>(&self, response_sender: oneshot::Sender<T>, response: T) {
        self.publish();
        if response_sender.send(response).is_err() {
            trace!("Requester dropped before receiving the response");
        }
    }
}

/// The front door to a running [`SessionActor`].
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<SessionMessage>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    async fn send_request<Response>(
        &self,
        build: impl FnOnce(oneshot::Sender<Response>) -> SessionRequest,
    ) -> Result<Response, SessionError> {
        let (response_sender, response_receiver) = oneshot::channel();
        self.sender
            .send(SessionMessage::Request(build(response_sender)))
            .map_err(|_| SessionError::SessionClosed)?;
        response_receiver
            .await
            .map_err(|_| SessionError::SessionClosed)
    }

    /// Requests account access and, on success, loads the contracts, balances and NFTs.
    ///
    /// Returns as soon as the wallet granted access; the loading happens afterwards.
    pub async fn connect(&self) -> Result<Address, SessionError> {
        self.send_request(|response_sender| SessionRequest::Connect { response_sender })
            .await?
    }

    /// Forgets everything about the wallet. Permissions granted in the wallet are kept.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        self.send_request(|response_sender| SessionRequest::Disconnect { response_sender })
            .await
    }

    /// Mints an NFT pointing at `token_uri` and waits until it is mined.
    pub async fn mint_nft(&self, token_uri: impl Into<String>) -> Result<MintedToken, SessionError> {
        let token_uri = token_uri.into();
        self.send_request(|response_sender| SessionRequest::MintNft {
            token_uri,
            response_sender,
        })
        .await?
    }

    pub async fn refresh_nfts(&self) -> Result<(), SessionError> {
        self.send_request(|response_sender| SessionRequest::RefreshNfts { response_sender })
            .await?
    }

    pub async fn refresh_balances(&self) -> Result<(), SessionError> {
        self.send_request(|response_sender| SessionRequest::RefreshBalances { response_sender })
            .await
    }

    /// Makes sure the wallet is on the configured network. See [`network::ensure_network`].
    pub async fn ensure_network(&self) -> Result<bool, SessionError> {
        self.send_request(|response_sender| SessionRequest::EnsureNetwork { response_sender })
            .await?
    }

    /// Waits until everything sent to the session so far has been handled.
    pub async fn flush(&self) -> Result<(), SessionError> {
        self.send_request(|response_sender| SessionRequest::Flush { response_sender })
            .await
    }

    /// Returns the latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Returns the endpoint the wallet integration feeds notifications into.
    pub fn wallet_events(&self) -> WalletEventSender {
        WalletEventSender {
            sender: self.sender.clone(),
        }
    }
}

/// Delivers wallet notifications to a session, in order with its requests.
#[derive(Clone)]
pub struct WalletEventSender {
    sender: mpsc::UnboundedSender<SessionMessage>,
}

impl WalletEventSender {
    pub fn send(&self, event: WalletEvent) -> Result<(), SessionError> {
        self.sender
            .send(SessionMessage::Wallet(event))
            .map_err(|_| SessionError::SessionClosed)
    }
}
