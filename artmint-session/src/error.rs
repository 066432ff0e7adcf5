// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::upload::MAX_FILE_SIZE;

/// An error reported by the wallet provider, using EIP-1193 error codes.
#[derive(Clone, Debug, Eq, PartialEq, Error, Serialize, Deserialize)]
#[error("wallet provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method is not supported by this provider.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// Internal JSON-RPC error.
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED, "User rejected the request.")
    }

    pub fn unrecognized_chain(chain_id: u64) -> Self {
        Self::new(
            Self::UNRECOGNIZED_CHAIN,
            format!("Unrecognized chain ID {chain_id:#x}."),
        )
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Self::UNRECOGNIZED_CHAIN
    }
}

/// A failed query or transaction against the chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC transport error
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),

    /// Contract call or transaction submission error
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    /// Waiting for a receipt failed
    #[error(transparent)]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    /// URL parsing error
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error("token supply {0} does not fit in 64 bits")]
    SupplyOutOfRange(U256),

    #[error("chain request failed: {0}")]
    Request(String),
}

/// A client-side check that rejected a file before upload.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("File is too large. Maximum size is {}MB.", MAX_FILE_SIZE / (1024 * 1024))]
    TooLarge { size: u64 },

    #[error(
        "Unsupported file type. Supported types are: {}",
        crate::upload::SUPPORTED_FILE_TYPES.join(", ")
    )]
    UnsupportedType { content_type: String },
}

/// Errors reported by the session manager.
///
/// None of them is fatal: the session stays usable and in its last consistent state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no wallet provider available; install an Ethereum wallet")]
    NoProvider,

    #[error("the account access request was rejected")]
    UserRejected,

    #[error("the wallet returned no accounts")]
    ZeroAccounts,

    #[error("contract addresses are not configured")]
    MissingContractAddresses,

    #[error("no contract code deployed at {address}")]
    ContractNotDeployed { address: Address },

    #[error("wallet not connected or contracts not initialized")]
    NotConnected,

    #[error("transaction {tx_hash} failed")]
    TransactionFailed { tx_hash: B256 },

    #[error("metadata at {uri} is unavailable: {source}")]
    MetadataUnavailable {
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid upload: {0}")]
    Validation(#[from] ValidationError),

    #[error("pinning service error: {0}")]
    Pinning(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("the session has shut down")]
    SessionClosed,
}

impl SessionError {
    /// Classifies a failed account access request.
    pub(crate) fn from_access_request(error: ProviderError) -> Self {
        if error.is_user_rejection() {
            SessionError::UserRejected
        } else {
            SessionError::Provider(error)
        }
    }

    pub fn metadata_unavailable(
        uri: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SessionError::MetadataUnavailable {
            uri: uri.into(),
            source: source.into(),
        }
    }
}
