//! # Campaign state machine
//!
//! Business rules for a single campaign: contributions, approver membership,
//! spending-request proposals, votes and quorum-gated payouts.
//!
//! Every operation validates everything it can before writing anything. The
//! only step that can still fail after a write is the payout transfer in
//! [`finalize_request`]; it is performed last and a rejection is returned as
//! `TransferFailed`, which makes the host discard the writes that preceded it.

use soroban_sdk::{token, Address, Env, String};

use crate::storage;
use crate::types::SpendingRequest;
use crate::Error;

/// Result of an accepted contribution.
pub struct Contribution {
    /// Campaign balance after the contribution.
    pub balance: i128,
    /// Set when this contribution made the contributor an approver; holds the
    /// approver count after insertion.
    pub new_approvers_count: Option<u32>,
}

/// Strict majority of the *current* approver set.
///
/// With one approver a single vote suffices; with two, both are required; an
/// empty approver set can never be satisfied.
pub fn quorum_reached(approval_count: u32, approvers_count: u32) -> bool {
    u64::from(approval_count) * 2 > u64::from(approvers_count)
}

pub fn contribute(
    env: &Env,
    campaign_id: u64,
    contributor: &Address,
    amount: i128,
) -> Result<Contribution, Error> {
    let config = storage::load_campaign_config(env, campaign_id)?;
    if amount < config.minimum_contribution {
        return Err(Error::InsufficientContribution);
    }
    let token = storage::get_token(env)?;
    let mut state = storage::load_campaign_state(env, campaign_id)?;

    token::Client::new(env, &token).transfer(
        contributor,
        &env.current_contract_address(),
        &amount,
    );

    state.balance += amount;

    let new_approvers_count = if storage::is_approver(env, campaign_id, contributor) {
        None
    } else {
        storage::add_approver(env, campaign_id, contributor);
        state.approvers_count += 1;
        Some(state.approvers_count)
    };

    storage::save_campaign_state(env, campaign_id, &state);

    Ok(Contribution {
        balance: state.balance,
        new_approvers_count,
    })
}

/// Append a spending request and return its index.
pub fn create_request(
    env: &Env,
    campaign_id: u64,
    caller: &Address,
    description: String,
    value: i128,
    recipient: Address,
) -> Result<u32, Error> {
    let config = storage::load_campaign_config(env, campaign_id)?;
    if *caller != config.manager {
        return Err(Error::Unauthorized);
    }
    // Zero is a valid payout; the balance check is deferred to finalization.
    if value < 0 {
        return Err(Error::InvalidParameter);
    }

    let mut state = storage::load_campaign_state(env, campaign_id)?;
    let index = state.request_count;

    let request = SpendingRequest {
        description,
        value,
        recipient,
        complete: false,
        approval_count: 0,
    };
    storage::save_request(env, campaign_id, index, &request);

    state.request_count += 1;
    storage::save_campaign_state(env, campaign_id, &state);

    Ok(index)
}

/// Record `approver`'s vote on a request; returns the new approval count.
pub fn approve_request(
    env: &Env,
    campaign_id: u64,
    approver: &Address,
    index: u32,
) -> Result<u32, Error> {
    storage::load_campaign_config(env, campaign_id)?;
    let mut request = storage::load_request(env, campaign_id, index)?;

    if !storage::is_approver(env, campaign_id, approver) {
        return Err(Error::Unauthorized);
    }
    if storage::has_approved(env, campaign_id, index, approver) {
        return Err(Error::AlreadyApproved);
    }

    storage::record_approval(env, campaign_id, index, approver);
    request.approval_count += 1;
    storage::save_request(env, campaign_id, index, &request);

    Ok(request.approval_count)
}

/// Execute an approved request's payout; returns the finalized request.
pub fn finalize_request(
    env: &Env,
    campaign_id: u64,
    caller: &Address,
    index: u32,
) -> Result<SpendingRequest, Error> {
    let config = storage::load_campaign_config(env, campaign_id)?;
    if *caller != config.manager {
        return Err(Error::Unauthorized);
    }

    let mut request = storage::load_request(env, campaign_id, index)?;
    if request.complete {
        return Err(Error::AlreadyFinalized);
    }

    let mut state = storage::load_campaign_state(env, campaign_id)?;
    if !quorum_reached(request.approval_count, state.approvers_count) {
        return Err(Error::QuorumNotMet);
    }
    if request.value > state.balance {
        return Err(Error::InsufficientFunds);
    }
    let token = storage::get_token(env)?;

    request.complete = true;
    state.balance -= request.value;
    storage::save_request(env, campaign_id, index, &request);
    storage::save_campaign_state(env, campaign_id, &state);

    // Must stay last: a rejected transfer rolls back the two writes above.
    let transfer = token::Client::new(env, &token).try_transfer(
        &env.current_contract_address(),
        &request.recipient,
        &request.value,
    );
    match transfer {
        Ok(Ok(_)) => Ok(request),
        _ => Err(Error::TransferFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::quorum_reached;

    #[test]
    fn quorum_requires_strict_majority() {
        assert!(!quorum_reached(0, 0));
        assert!(!quorum_reached(0, 1));
        assert!(quorum_reached(1, 1));
        assert!(!quorum_reached(1, 2));
        assert!(quorum_reached(2, 2));
        assert!(quorum_reached(2, 3));
        assert!(!quorum_reached(2, 4));
        assert!(quorum_reached(3, 4));
    }

    #[test]
    fn quorum_does_not_overflow_at_u32_max() {
        assert!(quorum_reached(u32::MAX, u32::MAX));
        assert!(!quorum_reached(u32::MAX / 2, u32::MAX));
    }
}
