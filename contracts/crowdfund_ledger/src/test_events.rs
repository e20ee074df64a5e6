extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    ApproverAdded, CampaignCreated, ContributionReceived, RequestApproved, RequestCreated,
    RequestFinalized,
};
use crate::{CrowdfundLedger, CrowdfundLedgerClient};

fn setup() -> (Env, CrowdfundLedgerClient<'static>, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdfundLedger, ());
    let client = CrowdfundLedgerClient::new(&env, &contract_id);

    let token_admin = Address::generate(&env);
    let addr = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &addr.address());
    client.init(&token.address);
    (env, client, token)
}

fn mint(env: &Env, token: &token::Client, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, &token.address).mint(to, &amount);
}

#[test]
fn test_campaign_created_event() {
    let (env, client, _token) = setup();
    let manager = Address::generate(&env);

    let id = client.create_campaign(&manager, &100);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), campaign_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CampaignCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            campaign_id: id,
            manager: manager.clone(),
            minimum_contribution: 100,
        }
    );
}

#[test]
fn test_first_contribution_emits_funded_and_approver_events() {
    let (env, client, token) = setup();
    let manager = Address::generate(&env);
    let backer = Address::generate(&env);
    let id = client.create_campaign(&manager, &100);
    mint(&env, &token, &backer, 1_000);

    client.contribute(&id, &backer, &400);

    let all_events = env.events().all();
    let len = all_events.len();
    assert!(len >= 2);

    // Funded event precedes the approver event.
    let funded = all_events.get(len - 2).unwrap();
    assert_eq!(funded.0, client.address);
    assert_eq!(
        funded.1,
        vec![&env, symbol_short!("funded").into_val(&env), id.into_val(&env)]
    );
    let funded_data: ContributionReceived = funded.2.try_into_val(&env).unwrap();
    assert_eq!(
        funded_data,
        ContributionReceived {
            campaign_id: id,
            contributor: backer.clone(),
            amount: 400,
            balance: 400,
        }
    );

    let approver = all_events.get(len - 1).unwrap();
    assert_eq!(
        approver.1,
        vec![&env, symbol_short!("approver").into_val(&env), id.into_val(&env)]
    );
    let approver_data: ApproverAdded = approver.2.try_into_val(&env).unwrap();
    assert_eq!(
        approver_data,
        ApproverAdded {
            campaign_id: id,
            approver: backer.clone(),
            approvers_count: 1,
        }
    );
}

#[test]
fn test_repeat_contribution_emits_only_funded_event() {
    let (env, client, token) = setup();
    let manager = Address::generate(&env);
    let backer = Address::generate(&env);
    let id = client.create_campaign(&manager, &100);
    mint(&env, &token, &backer, 1_000);

    client.contribute(&id, &backer, &400);
    client.contribute(&id, &backer, &100);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("funded").into_val(&env), id.into_val(&env)]
    );
    let event_data: ContributionReceived = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.amount, 100);
    assert_eq!(event_data.balance, 500);
}

#[test]
fn test_request_lifecycle_events() {
    let (env, client, token) = setup();
    let manager = Address::generate(&env);
    let backer = Address::generate(&env);
    let recipient = Address::generate(&env);
    let id = client.create_campaign(&manager, &100);
    mint(&env, &token, &backer, 1_000);
    client.contribute(&id, &backer, &1_000);

    let description = String::from_str(&env, "hire a carpenter");
    let index = client.create_request(&id, &manager, &description, &600, &recipient);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("req_new").into_val(&env),
            id.into_val(&env),
            index.into_val(&env),
        ]
    );
    let created: RequestCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        created,
        RequestCreated {
            campaign_id: id,
            request_index: index,
            description,
            value: 600,
            recipient: recipient.clone(),
        }
    );

    client.approve_request(&id, &backer, &index);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("approved").into_val(&env),
            id.into_val(&env),
            index.into_val(&env),
        ]
    );
    let approved: RequestApproved = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        approved,
        RequestApproved {
            campaign_id: id,
            request_index: index,
            approver: backer.clone(),
            approval_count: 1,
        }
    );

    client.finalize_request(&id, &manager, &index);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("finalized").into_val(&env),
            id.into_val(&env),
            index.into_val(&env),
        ]
    );
    let finalized: RequestFinalized = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        finalized,
        RequestFinalized {
            campaign_id: id,
            request_index: index,
            recipient: recipient.clone(),
            value: 600,
        }
    );
}
