// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Session management for the Artmint NFT studio.
//!
//! A [`SessionActor`] owns the connection to a wallet, the two contract handles, the cached
//! balances and the NFT catalog. Everything else talks to it through a [`SessionHandle`]
//! and reads its state from published [`SessionSnapshot`]s.

mod actor;
pub mod config;
pub mod contracts;
pub mod error;
pub mod ethereum;
pub mod format;
pub mod metadata;
pub mod network;
pub mod nft;
mod session;
pub mod upload;
pub mod wallet;

#[cfg(with_testing)]
pub mod test_utils;

pub use crate::{
    actor::{SessionActor, SessionHandle, WalletEventSender},
    config::SessionConfig,
    error::{ChainError, ProviderError, SessionError, ValidationError},
    session::{MintedToken, SessionSnapshot, TransactionState, TransactionStatus},
    wallet::{WalletEvent, WalletProvider},
};
