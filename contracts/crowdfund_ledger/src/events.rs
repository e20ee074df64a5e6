//! # Events
//!
//! Every successful mutating entry point publishes exactly one event (two for a
//! first qualifying contribution). Topics are `(name, campaign_id)` for campaign
//! level events and `(name, campaign_id, request_index)` for request events, so
//! off-chain consumers can filter by campaign without decoding payloads.
//!
//! | Topic       | Payload                  |
//! |-------------|--------------------------|
//! | `created`   | [`CampaignCreated`]      |
//! | `funded`    | [`ContributionReceived`] |
//! | `approver`  | [`ApproverAdded`]        |
//! | `req_new`   | [`RequestCreated`]       |
//! | `approved`  | [`RequestApproved`]      |
//! | `finalized` | [`RequestFinalized`]     |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub manager: Address,
    pub minimum_contribution: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub campaign_id: u64,
    pub contributor: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApproverAdded {
    pub campaign_id: u64,
    pub approver: Address,
    pub approvers_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestCreated {
    pub campaign_id: u64,
    pub request_index: u32,
    pub description: String,
    pub value: i128,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestApproved {
    pub campaign_id: u64,
    pub request_index: u32,
    pub approver: Address,
    pub approval_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestFinalized {
    pub campaign_id: u64,
    pub request_index: u32,
    pub recipient: Address,
    pub value: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreated) {
    env.events()
        .publish((symbol_short!("created"), event.campaign_id), event);
}

pub fn emit_contribution_received(env: &Env, event: ContributionReceived) {
    env.events()
        .publish((symbol_short!("funded"), event.campaign_id), event);
}

pub fn emit_approver_added(env: &Env, event: ApproverAdded) {
    env.events()
        .publish((symbol_short!("approver"), event.campaign_id), event);
}

pub fn emit_request_created(env: &Env, event: RequestCreated) {
    env.events().publish(
        (
            symbol_short!("req_new"),
            event.campaign_id,
            event.request_index,
        ),
        event,
    );
}

pub fn emit_request_approved(env: &Env, event: RequestApproved) {
    env.events().publish(
        (
            symbol_short!("approved"),
            event.campaign_id,
            event.request_index,
        ),
        event,
    );
}

pub fn emit_request_finalized(env: &Env, event: RequestFinalized) {
    env.events().publish(
        (
            symbol_short!("finalized"),
            event.campaign_id,
            event.request_index,
        ),
        event,
    );
}
