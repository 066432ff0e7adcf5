// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use std::{collections::BTreeMap, fmt};

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{contracts::ContractHandles, nft::NftCatalog};

/// The lifecycle of a submitted transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub hash: B256,
    pub status: TransactionState,
    pub message: String,
}

/// The token ID assigned by a successful mint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MintedToken {
    Assigned(U256),
    /// The receipt carried no mint event.
    Unknown,
}

impl fmt::Display for MintedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintedToken::Assigned(token_id) => write!(f, "{token_id}"),
            MintedToken::Unknown => write!(f, "-1"),
        }
    }
}

impl Serialize for MintedToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The state owned by the session actor.
///
/// `contracts` is only set while connected, after both contracts were found on chain.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
    pub contracts: Option<ContractHandles>,
    pub contracts_error: Option<String>,
    pub token_balance: U256,
    pub creator_reward_amount: U256,
    pub transactions: BTreeMap<B256, TransactionStatus>,
    pub catalog: NftCatalog,
    pub loading_nfts: bool,
}

impl SessionState {
    pub fn record_transaction(
        &mut self,
        hash: B256,
        status: TransactionState,
        message: impl Into<String>,
    ) {
        self.transactions.insert(
            hash,
            TransactionStatus {
                hash,
                status,
                message: message.into(),
            },
        );
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            account: self.account,
            chain_id: self.chain_id,
            is_connected: self.is_connected,
            contracts_ready: self.contracts.is_some(),
            contracts_error: self.contracts_error.clone(),
            token_balance: self.token_balance,
            creator_reward_amount: self.creator_reward_amount,
            transactions: self.transactions.clone(),
            catalog: self.catalog.clone(),
            loading_nfts: self.loading_nfts,
        }
    }
}

/// A read-only copy of the session, published after every change.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
    pub contracts_ready: bool,
    pub contracts_error: Option<String>,
    pub token_balance: U256,
    pub creator_reward_amount: U256,
    pub transactions: BTreeMap<B256, TransactionStatus>,
    pub catalog: NftCatalog,
    pub loading_nfts: bool,
}

impl SessionSnapshot {
    pub fn transaction(&self, hash: &B256) -> Option<&TransactionStatus> {
        self.transactions.get(hash)
    }
}
