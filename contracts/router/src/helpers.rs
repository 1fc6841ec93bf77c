use leverage_common::constants::{MAX_BASKET_LEN, MAX_STEPS, TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::{AggregatorClient, ExecutorClient, FactoryClient, ProviderClient};
use leverage_common::keys::ticket_data;
use leverage_common::{ConnectorCall, Error, ExecutionOutcome, FlashTicket, Step};
use soroban_sdk::{panic_with_error, Address, BytesN, Env, Vec};

use crate::events::FlashRequested;
use crate::storage::*;

pub fn bump_core_ttl(env: &Env) {
    if env.storage().instance().has(&DataKey::Initialized) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_position_ttl(env: &Env, key: &BytesN<32>) {
    let key = DataKey::Position(key.clone());
    let persistent = env.storage().persistent();
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_index_ttl(env: &Env, owner: &Address) {
    let key = DataKey::PositionIndex(owner.clone());
    let persistent = env.storage().persistent();
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn provider_client(env: &Env) -> ProviderClient<'_> {
    ProviderClient::new(env, &read_provider(env))
}

pub fn factory_client<'a>(env: &'a Env, provider: &ProviderClient<'a>) -> FactoryClient<'a> {
    FactoryClient::new(env, &provider.get_account_proxy())
}

pub fn validate_basket(env: &Env, tokens: &Vec<Address>, amounts: &Vec<u128>) {
    if tokens.is_empty() || tokens.len() != amounts.len() || tokens.len() > MAX_BASKET_LEN {
        panic_with_error!(env, Error::LengthMismatch);
    }
    for amount in amounts.iter() {
        if amount == 0 {
            panic_with_error!(env, Error::InvalidInput);
        }
    }
}

pub fn validate_steps(env: &Env, steps: &Vec<Step>) {
    if steps.is_empty() || steps.len() > MAX_STEPS {
        panic_with_error!(env, Error::InvalidInput);
    }
}

/// Returns `(from_asset, to_asset, amount)` of a swap step.
pub fn swap_leg(env: &Env, step: &Step) -> (Address, Address, u128) {
    match &step.call {
        ConnectorCall::Swap(from_asset, to_asset, amount, _) => {
            (from_asset.clone(), to_asset.clone(), *amount)
        }
        _ => panic_with_error!(env, Error::InvalidInput),
    }
}

/// Arms the ticket on `account`, requests the funding and collects the
/// outcome. The in-flight flag brackets the whole exchange.
pub fn run_ticket(env: &Env, account: &Address, ticket: &FlashTicket) -> ExecutionOutcome {
    if read_in_flight(env).is_some() {
        panic_with_error!(env, Error::OperationInFlight);
    }
    write_in_flight(env, &ticket.id);

    let executor = ExecutorClient::new(env, account);
    executor.arm(ticket);
    FlashRequested {
        key: ticket.key.clone(),
        id: ticket.id.clone(),
        operation: ticket.operation,
        route: ticket.route,
        account: account.clone(),
    }
    .publish(env);

    AggregatorClient::new(env, &ticket.initiator).initiate(
        &ticket.route,
        &ticket.tokens,
        &ticket.amounts,
        account,
        &ticket_data(env, &ticket.id),
    );
    let outcome = executor.take_outcome(&ticket.id);

    clear_in_flight(env);
    outcome
}
