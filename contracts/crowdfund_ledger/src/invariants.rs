#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::storage;
use crate::types::{CampaignSummary, SpendingRequest};
use crate::CrowdfundLedgerClient;

/// INV-1: approvers_count equals the number of distinct approvers.
///
/// `known` is every address the test has interacted with; the contract only
/// answers membership queries, so the set is counted from the outside.
pub fn assert_approvers_count_matches(
    client: &CrowdfundLedgerClient,
    campaign_id: u64,
    known: &[Address],
) {
    let members = known
        .iter()
        .filter(|a| client.approvers(&campaign_id, a))
        .count() as u32;
    let count = client.approvers_count(&campaign_id);
    assert_eq!(
        members, count,
        "INV-1 violated: campaign {} reports {} approvers but {} addresses are members",
        campaign_id, count, members
    );
}

/// INV-2: no address outside the approver set holds a vote on any request.
pub fn assert_only_approvers_voted(
    client: &CrowdfundLedgerClient,
    campaign_id: u64,
    known: &[Address],
) {
    let request_count = client.get_requests_count(&campaign_id);
    client.env.as_contract(&client.address, || {
        for index in 0..request_count {
            for address in known {
                if storage::has_approved(&client.env, campaign_id, index, address) {
                    assert!(
                        storage::is_approver(&client.env, campaign_id, address),
                        "INV-2 violated: campaign {} request {} has a vote from a non-approver",
                        campaign_id,
                        index
                    );
                }
            }
        }
    });
}

/// INV-3: a request never carries more votes than there are approvers.
pub fn assert_approvals_bounded(summary: &CampaignSummary, request: &SpendingRequest) {
    assert!(
        request.approval_count <= summary.approvers_count,
        "INV-3 violated: campaign {} request has {} approvals but only {} approvers",
        summary.id,
        request.approval_count,
        summary.approvers_count
    );
}

/// INV-3: votes are only ever added, so approval_count never decreases.
pub fn assert_approval_count_monotonic(count_before: u32, count_after: u32) {
    assert!(
        count_after >= count_before,
        "INV-3 violated: approval_count decreased from {} to {}",
        count_before,
        count_after
    );
}

/// INV-4: a finalized request never returns to open.
pub fn assert_complete_irreversible(before: &SpendingRequest, after: &SpendingRequest) {
    assert!(
        !before.complete || after.complete,
        "INV-4 violated: request reverted from complete to open"
    );
}

/// INV-5: the balance only drops by the value of a request that was finalized
/// between the two observations.
pub fn assert_balance_drop_matches_payouts(
    balance_before: i128,
    balance_after: i128,
    contributed: i128,
    paid_out: i128,
) {
    assert_eq!(
        balance_after,
        balance_before + contributed - paid_out,
        "INV-5 violated: {} + {} - {} != {}",
        balance_before,
        contributed,
        paid_out,
        balance_after
    );
}

/// INV-5 corollary: payouts never overdraw, so the balance is never negative.
pub fn assert_balance_non_negative(summary: &CampaignSummary) {
    assert!(
        summary.balance >= 0,
        "INV-5 violated: campaign {} has negative balance ({})",
        summary.id,
        summary.balance
    );
}

/// Request fields fixed at creation do not change.
pub fn assert_request_immutable_fields(original: &SpendingRequest, current: &SpendingRequest) {
    assert_eq!(
        original.description, current.description,
        "request description changed"
    );
    assert_eq!(original.value, current.value, "request value changed");
    assert_eq!(
        original.recipient, current.recipient,
        "request recipient changed"
    );
}

/// Run all stateless campaign invariants against every request of a campaign.
pub fn assert_all_campaign_invariants(client: &CrowdfundLedgerClient, campaign_id: u64) {
    let summary = client.get_summary(&campaign_id);
    assert_balance_non_negative(&summary);
    for index in 0..summary.request_count {
        let request = client.requests(&campaign_id, &index);
        assert_approvals_bounded(&summary, &request);
    }
}
