//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type      | Description                          |
//! |-----------------|-----------|--------------------------------------|
//! | `Token`         | `Address` | Funding token shared by all campaigns |
//! | `CampaignCount` | `u64`     | Auto-increment campaign ID counter   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                          | Type              | Description                   |
//! |------------------------------|-------------------|-------------------------------|
//! | `CampConfig(id)`             | `CampaignConfig`  | Immutable campaign config     |
//! | `CampState(id)`              | `CampaignState`   | Mutable campaign state        |
//! | `Approver(id, addr)`         | `bool`            | Approver membership flag      |
//! | `Request(id, index)`         | `SpendingRequest` | One spending request          |
//! | `Approval(id, index, addr)`  | `bool`            | Vote flag for one request     |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Membership flags are written once and never removed, which is what keeps the
//! approver set and every vote set monotonic.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{CampaignConfig, CampaignState, SpendingRequest};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Funding token address (Instance).
    Token,
    /// Global auto-increment counter for campaign IDs (Instance).
    CampaignCount,
    /// Immutable campaign configuration keyed by ID (Persistent).
    CampConfig(u64),
    /// Mutable campaign state keyed by ID (Persistent).
    CampState(u64),
    /// Approver membership of an address in a campaign (Persistent).
    Approver(u64, Address),
    /// Spending request keyed by (campaign ID, request index) (Persistent).
    Request(u64, u32),
    /// Vote of an approver on one request (Persistent).
    Approval(u64, u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_token(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// Retrieve the funding token, or `NotInitialized` before `init`.
pub fn get_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

/// Number of campaigns created so far.
pub fn get_campaign_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

/// Atomically reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    let current = get_campaign_count(env);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load<T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>>(
    env: &Env,
    key: &DataKey,
) -> Result<T, Error> {
    let value: T = env
        .storage()
        .persistent()
        .get(key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, key);
    Ok(value)
}

fn save<T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: &DataKey, value: &T) {
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

fn has_flag(env: &Env, key: &DataKey) -> bool {
    let present = env.storage().persistent().has(key);
    if present {
        bump_persistent(env, key);
    }
    present
}

/// Save both the immutable config and the initial (empty) state of a new campaign.
pub fn save_campaign(env: &Env, config: &CampaignConfig) {
    save(env, &DataKey::CampConfig(config.id), config);
    save(env, &DataKey::CampState(config.id), &CampaignState::default());
}

/// Load only the immutable campaign configuration.
pub fn load_campaign_config(env: &Env, id: u64) -> Result<CampaignConfig, Error> {
    load(env, &DataKey::CampConfig(id))
}

/// Load only the mutable campaign state.
pub fn load_campaign_state(env: &Env, id: u64) -> Result<CampaignState, Error> {
    load(env, &DataKey::CampState(id))
}

pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    save(env, &DataKey::CampState(id), state);
}

pub fn is_approver(env: &Env, id: u64, address: &Address) -> bool {
    has_flag(env, &DataKey::Approver(id, address.clone()))
}

pub fn add_approver(env: &Env, id: u64, address: &Address) {
    save(env, &DataKey::Approver(id, address.clone()), &true);
}

pub fn load_request(env: &Env, id: u64, index: u32) -> Result<SpendingRequest, Error> {
    load(env, &DataKey::Request(id, index))
}

pub fn save_request(env: &Env, id: u64, index: u32, request: &SpendingRequest) {
    save(env, &DataKey::Request(id, index), request);
}

pub fn has_approved(env: &Env, id: u64, index: u32, address: &Address) -> bool {
    has_flag(env, &DataKey::Approval(id, index, address.clone()))
}

pub fn record_approval(env: &Env, id: u64, index: u32, address: &Address) {
    save(env, &DataKey::Approval(id, index, address.clone()), &true);
}
