//! # Campaign directory
//!
//! Issues campaign identities and enumerates them. Identities are sequential
//! `u64`s starting at 0, so the counter alone is the append-only registry:
//! the deployed campaigns are exactly `0..campaign_count`, in creation order.

use soroban_sdk::{Address, Env, Vec};

use crate::storage::{self, get_and_increment_campaign_id, get_campaign_count};
use crate::types::CampaignConfig;
use crate::Error;

/// Create a campaign managed by `manager` and return its configuration.
///
/// Fails with `NotInitialized` before the funding token is configured and with
/// `InvalidParameter` for a non-positive `minimum_contribution`.
pub fn create_campaign(
    env: &Env,
    manager: Address,
    minimum_contribution: i128,
) -> Result<CampaignConfig, Error> {
    storage::get_token(env)?;

    if minimum_contribution <= 0 {
        return Err(Error::InvalidParameter);
    }

    let config = CampaignConfig {
        id: get_and_increment_campaign_id(env),
        manager,
        minimum_contribution,
    };
    storage::save_campaign(env, &config);
    Ok(config)
}

/// All campaign identities created so far, oldest first.
pub fn deployed_campaigns(env: &Env) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for id in 0..get_campaign_count(env) {
        ids.push_back(id);
    }
    ids
}
