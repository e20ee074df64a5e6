//! Canonical event types emitted by the crowdfund ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund_ledger/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new campaign was created (`created` topic).
    CampaignCreated,
    /// A contribution was accepted (`funded` topic).
    ContributionReceived,
    /// A contributor became an approver (`approver` topic).
    ApproverAdded,
    /// The manager proposed a spending request (`req_new` topic).
    RequestCreated,
    /// An approver voted for a spending request (`approved` topic).
    RequestApproved,
    /// A spending request was paid out (`finalized` topic).
    RequestFinalized,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "funded" => Self::ContributionReceived,
            "approver" => Self::ApproverAdded,
            "req_new" => Self::RequestCreated,
            "approved" => Self::RequestApproved,
            "finalized" => Self::RequestFinalized,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::ContributionReceived => "contribution_received",
            Self::ApproverAdded => "approver_added",
            Self::RequestCreated => "request_created",
            Self::RequestApproved => "request_approved",
            Self::RequestFinalized => "request_finalized",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the event carries a request index as its third topic.
    pub fn is_request_event(&self) -> bool {
        matches!(
            self,
            Self::RequestCreated | Self::RequestApproved | Self::RequestFinalized
        )
    }
}

/// A fully decoded campaign event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub request_index: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub request_index: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
