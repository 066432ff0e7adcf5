// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use tracing::{info, warn};

use crate::wallet::{ChainParameters, WalletProvider};

/// Makes sure the wallet is on `chain_id`, adding the network if the wallet does not know it.
///
/// Returns whether the wallet ended up on the requested network.
pub async fn ensure_network(
    wallet: &dyn WalletProvider,
    chain_id: u64,
    parameters: &ChainParameters,
) -> bool {
    let error = match wallet.switch_chain(chain_id).await {
        Ok(()) => return true,
        Err(error) => error,
    };
    if !error.is_unrecognized_chain() {
        warn!(%error, chain_id, "Failed to switch network");
        return false;
    }
    info!(chain_name = %parameters.chain_name, "Adding network to wallet");
    match wallet.add_chain(parameters).await {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, chain_id, "Failed to add network");
            false
        }
    }
}
