// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for the Artmint NFT studio.

mod logging;

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context as _, Result};
use artmint_session::{
    ethereum::{EthereumBackend, LocalWallet},
    format::{format_address, format_token_amount},
    metadata::HttpMetadataFetcher,
    SessionActor, SessionConfig, SessionHandle,
};
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};

/// Artmint CLI
#[derive(Parser, Debug)]
#[command(name = "artmint", version)]
struct Cli {
    #[command(flatten)]
    config: SessionConfig,

    /// Hex-encoded private key signing the transactions. Without it, the accounts managed
    /// by the node are used.
    #[arg(long, env = "ARTMINT_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
    /// Make sure the wallet is on the configured network, adding it if needed
    SwitchNetwork,
    #[command(flatten)]
    Connected(ConnectedCommand),
}

/// The commands run in a connected session.
#[derive(clap::Subcommand, Debug, Clone)]
enum ConnectedCommand {
    /// Show the account, the network, the contracts and the token balances
    Status,
    /// List the NFTs of the collection
    Nfts {
        /// Only list the NFTs owned by the account
        #[arg(long, conflicts_with = "created")]
        mine: bool,

        /// Only list the NFTs created by the account
        #[arg(long)]
        created: bool,
    },
    /// Mint an NFT whose metadata is at the given URI
    Mint {
        #[arg(long)]
        token_uri: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init("artmint")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli.run())
}

impl Cli {
    async fn run(self) -> Result<()> {
        let session = self.start_session()?;

        let output = match self.command {
            Command::SwitchNetwork => {
                let switched = session.ensure_network().await?;
                json!({ "chainId": self.config.chain_id, "switched": switched })
            }
            Command::Connected(command) => {
                let account = session.connect().await?;
                session.flush().await?;
                info!(%account, "Session ready");
                let output = Self::run_connected(&session, command).await;
                session.disconnect().await?;
                output?
            }
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn start_session(&self) -> Result<SessionHandle> {
        let signer = self
            .private_key
            .as_deref()
            .map(str::parse::<PrivateKeySigner>)
            .transpose()
            .context("invalid private key")?;
        let account = signer.as_ref().map(PrivateKeySigner::address);

        let backend = EthereumBackend::new(&self.config.rpc_url, signer)?;
        let wallet = LocalWallet::new(backend.provider().clone(), account);
        let metadata = HttpMetadataFetcher::new(self.config.metadata_timeout())?;

        Ok(SessionActor::spawn(
            self.config.clone(),
            Some(Arc::new(wallet)),
            Arc::new(backend),
            Arc::new(metadata),
        ))
    }

    async fn run_connected(
        session: &SessionHandle,
        command: ConnectedCommand,
    ) -> Result<serde_json::Value> {
        let snapshot = session.snapshot();
        if let Some(error) = &snapshot.contracts_error {
            warn!(%error, "Contracts are unavailable");
        }

        Ok(match command {
            ConnectedCommand::Status => json!({
                "account": snapshot.account,
                "shortAccount": snapshot.account.as_ref().map(format_address),
                "chainId": snapshot.chain_id,
                "contractsReady": snapshot.contracts_ready,
                "contractsError": snapshot.contracts_error,
                "tokenBalance": format_token_amount(snapshot.token_balance),
                "creatorRewardAmount": format_token_amount(snapshot.creator_reward_amount),
                "nfts": snapshot.catalog.all().len(),
                "ownedNfts": snapshot.catalog.owned().len(),
                "createdNfts": snapshot.catalog.created().len(),
            }),
            ConnectedCommand::Nfts { mine, created } => {
                let records = if mine {
                    snapshot.catalog.owned()
                } else if created {
                    snapshot.catalog.created()
                } else {
                    snapshot.catalog.all()
                };
                serde_json::to_value(records)?
            }
            ConnectedCommand::Mint { token_uri } => {
                let token_id = session.mint_nft(token_uri).await?;
                json!({
                    "tokenId": token_id,
                    "transactions": session.snapshot().transactions,
                })
            }
        })
    }
}
