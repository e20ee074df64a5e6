//! # Types
//!
//! Shared data structures used across all modules of the crowdfund ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A campaign is internally stored as two separate ledger entries:
//!
//! - [`CampaignConfig`] — written once at creation; never mutated.
//! - [`CampaignState`] — written on every contribution, proposal and payout.
//!
//! Approver membership and per-request votes are stored as individual flag
//! entries so that neither set has to be loaded to answer a membership test.
//! The public API exposes the reconstructed [`CampaignSummary`].
//!
//! ### Requests as a two-state machine
//!
//! A [`SpendingRequest`] is either open (`complete == false`) or finalized
//! (`complete == true`):
//!
//! ```text
//! Open ──► Finalized
//! ```
//!
//! There is no cancellation path and finalization never reverses.

use soroban_sdk::{contracttype, Address, String};

/// Immutable campaign configuration, written once by `create_campaign`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    pub manager: Address,
    pub minimum_contribution: i128,
}

/// Mutable campaign state, updated on contributions, proposals and payouts.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CampaignState {
    /// Funds currently held on behalf of this campaign.
    pub balance: i128,
    /// Number of distinct approvers; always equals the size of the approver set.
    pub approvers_count: u32,
    /// Number of spending requests proposed so far (next request index).
    pub request_count: u32,
}

/// A manager's proposal to pay `value` to `recipient` out of the pooled balance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpendingRequest {
    /// Free-form text describing what the payout is for.
    pub description: String,
    /// Amount to pay out on finalization.
    pub value: i128,
    /// Receiver of the payout.
    pub recipient: Address,
    /// Set exactly once, when the payout is executed.
    pub complete: bool,
    /// Number of distinct approvers that voted for this request.
    pub approval_count: u32,
}

/// Read-only snapshot of a campaign, combining config and state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignSummary {
    pub id: u64,
    pub manager: Address,
    pub minimum_contribution: i128,
    pub balance: i128,
    pub request_count: u32,
    pub approvers_count: u32,
}

impl CampaignSummary {
    pub fn from_parts(config: CampaignConfig, state: CampaignState) -> Self {
        CampaignSummary {
            id: config.id,
            manager: config.manager,
            minimum_contribution: config.minimum_contribution,
            balance: state.balance,
            request_count: state.request_count,
            approvers_count: state.approvers_count,
        }
    }
}
