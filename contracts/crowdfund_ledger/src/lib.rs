//! # Crowdfund Ledger Contract
//!
//! This is the root crate of the **crowdfund ledger**. It exposes the single
//! Soroban contract `CrowdfundLedger`, which acts both as the campaign
//! directory and as the custodian of every campaign's pooled funds:
//!
//! | Phase        | Entry Point(s)                                                |
//! |--------------|---------------------------------------------------------------|
//! | Bootstrap    | [`CrowdfundLedger::init`]                                     |
//! | Directory    | [`CrowdfundLedger::create_campaign`], `get_deployed_campaigns`, `campaign_count` |
//! | Funding      | [`CrowdfundLedger::contribute`]                               |
//! | Spending     | `create_request`, `approve_request`, `finalize_request`       |
//! | Queries      | `manager`, `minimum_contribution`, `approvers`, `approvers_count`, `requests`, `get_requests_count`, `get_summary`, `token` |
//!
//! ## Architecture
//!
//! Campaign rules live in [`campaign`], identity issuance in [`directory`] and
//! storage access in [`storage`]. This file contains **only** the public entry
//! points, caller authentication and event emissions.
//!
//! Every mutating entry point takes the acting address explicitly and calls
//! `require_auth` on it. A returned [`Error`] aborts the invocation, so no
//! storage write, token transfer or event of a failed call survives.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

mod campaign;
mod directory;
mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use events::{
    ApproverAdded, CampaignCreated, ContributionReceived, RequestApproved, RequestCreated,
    RequestFinalized,
};
pub use types::{CampaignConfig, CampaignState, CampaignSummary, SpendingRequest};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidParameter         = 1,
    InsufficientContribution = 2,
    Unauthorized             = 3,
    NotFound                 = 4,
    AlreadyApproved          = 5,
    AlreadyFinalized         = 6,
    QuorumNotMet             = 7,
    InsufficientFunds        = 8,
    TransferFailed           = 9,
    AlreadyInitialized       = 10,
    NotInitialized           = 11,
}

#[contract]
pub struct CrowdfundLedger;

#[contractimpl]
impl CrowdfundLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Configure the token every campaign is denominated in.
    ///
    /// Must be called exactly once after deployment; later calls fail with
    /// `Error::AlreadyInitialized`.
    pub fn init(env: Env, token: Address) -> Result<(), Error> {
        if storage::has_token(&env) {
            return Err(Error::AlreadyInitialized);
        }
        storage::set_token(&env, &token);
        Ok(())
    }

    /// The funding token configured by `init`.
    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Directory
    // ─────────────────────────────────────────────────────────

    /// Create a campaign managed by `manager` and return its identity.
    ///
    /// Anyone may create a campaign; the creator becomes its manager.
    pub fn create_campaign(
        env: Env,
        manager: Address,
        minimum_contribution: i128,
    ) -> Result<u64, Error> {
        manager.require_auth();
        let config = directory::create_campaign(&env, manager, minimum_contribution)?;

        events::emit_campaign_created(
            &env,
            CampaignCreated {
                campaign_id: config.id,
                manager: config.manager,
                minimum_contribution: config.minimum_contribution,
            },
        );
        Ok(config.id)
    }

    /// Every campaign identity created so far, in creation order.
    pub fn get_deployed_campaigns(env: Env) -> Vec<u64> {
        directory::deployed_campaigns(&env)
    }

    pub fn campaign_count(env: Env) -> u64 {
        storage::get_campaign_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Campaign queries
    // ─────────────────────────────────────────────────────────

    pub fn manager(env: Env, campaign_id: u64) -> Result<Address, Error> {
        Ok(storage::load_campaign_config(&env, campaign_id)?.manager)
    }

    pub fn minimum_contribution(env: Env, campaign_id: u64) -> Result<i128, Error> {
        Ok(storage::load_campaign_config(&env, campaign_id)?.minimum_contribution)
    }

    /// Return `true` if `address` is an approver of the campaign.
    pub fn approvers(env: Env, campaign_id: u64, address: Address) -> Result<bool, Error> {
        storage::load_campaign_config(&env, campaign_id)?;
        Ok(storage::is_approver(&env, campaign_id, &address))
    }

    pub fn approvers_count(env: Env, campaign_id: u64) -> Result<u32, Error> {
        Ok(storage::load_campaign_state(&env, campaign_id)?.approvers_count)
    }

    /// Retrieve a spending request by its index.
    pub fn requests(env: Env, campaign_id: u64, index: u32) -> Result<SpendingRequest, Error> {
        storage::load_campaign_config(&env, campaign_id)?;
        storage::load_request(&env, campaign_id, index)
    }

    pub fn get_requests_count(env: Env, campaign_id: u64) -> Result<u32, Error> {
        Ok(storage::load_campaign_state(&env, campaign_id)?.request_count)
    }

    /// Configuration and current state of a campaign in one read.
    pub fn get_summary(env: Env, campaign_id: u64) -> Result<CampaignSummary, Error> {
        let config = storage::load_campaign_config(&env, campaign_id)?;
        let state = storage::load_campaign_state(&env, campaign_id)?;
        Ok(CampaignSummary::from_parts(config, state))
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the funding token to a campaign.
    ///
    /// Contributions below the campaign minimum are rejected and no tokens
    /// move. The first accepted contribution makes `contributor` an approver.
    pub fn contribute(
        env: Env,
        campaign_id: u64,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        contributor.require_auth();
        let outcome = campaign::contribute(&env, campaign_id, &contributor, amount)?;

        events::emit_contribution_received(
            &env,
            ContributionReceived {
                campaign_id,
                contributor: contributor.clone(),
                amount,
                balance: outcome.balance,
            },
        );
        if let Some(approvers_count) = outcome.new_approvers_count {
            events::emit_approver_added(
                &env,
                ApproverAdded {
                    campaign_id,
                    approver: contributor,
                    approvers_count,
                },
            );
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Spending requests
    // ─────────────────────────────────────────────────────────

    /// Propose paying `value` to `recipient`. Manager only.
    ///
    /// `value` may exceed the current balance; funds are checked at
    /// finalization.
    pub fn create_request(
        env: Env,
        campaign_id: u64,
        caller: Address,
        description: String,
        value: i128,
        recipient: Address,
    ) -> Result<u32, Error> {
        caller.require_auth();
        let index = campaign::create_request(
            &env,
            campaign_id,
            &caller,
            description.clone(),
            value,
            recipient.clone(),
        )?;

        events::emit_request_created(
            &env,
            RequestCreated {
                campaign_id,
                request_index: index,
                description,
                value,
                recipient,
            },
        );
        Ok(index)
    }

    /// Vote for a spending request. Approvers only, once per request.
    pub fn approve_request(
        env: Env,
        campaign_id: u64,
        caller: Address,
        index: u32,
    ) -> Result<(), Error> {
        caller.require_auth();
        let approval_count = campaign::approve_request(&env, campaign_id, &caller, index)?;

        events::emit_request_approved(
            &env,
            RequestApproved {
                campaign_id,
                request_index: index,
                approver: caller,
                approval_count,
            },
        );
        Ok(())
    }

    /// Pay out an approved request. Manager only.
    ///
    /// Requires a strict majority of the current approvers and enough balance.
    /// The request is marked complete and the payout transferred in the same
    /// invocation; if the token rejects the transfer the call fails with
    /// `Error::TransferFailed` and nothing changes.
    pub fn finalize_request(
        env: Env,
        campaign_id: u64,
        caller: Address,
        index: u32,
    ) -> Result<(), Error> {
        caller.require_auth();
        let request = campaign::finalize_request(&env, campaign_id, &caller, index)?;

        events::emit_request_finalized(
            &env,
            RequestFinalized {
                campaign_id,
                request_index: index,
                recipient: request.recipient,
                value: request.value,
            },
        );
        Ok(())
    }
}
