use leverage_common::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::ProviderClient;
use leverage_common::{Error, ExecutionOutcome, FlashTicket};
use soroban_sdk::{contracttype, panic_with_error, Address, BytesN, Env};

#[contracttype]
pub enum DataKey {
    Owner,
    Provider,
    Initialized,
    Pending,
    Outcome(BytesN<32>),
}

pub fn bump_core_ttl(env: &Env) {
    if env.storage().instance().has(&DataKey::Initialized) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn write_config(env: &Env, owner: &Address, provider: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    env.storage().instance().set(&DataKey::Provider, provider);
    env.storage().instance().set(&DataKey::Initialized, &true);
    bump_core_ttl(env);
}

pub fn owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

pub fn provider(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Provider)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

pub fn require_router(env: &Env) {
    ProviderClient::new(env, &provider(env))
        .get_router()
        .require_auth();
}

// Tickets and outcomes never outlive the invocation that created them.
pub fn read_pending(env: &Env) -> Option<FlashTicket> {
    env.storage().temporary().get(&DataKey::Pending)
}

pub fn write_pending(env: &Env, ticket: &FlashTicket) {
    env.storage().temporary().set(&DataKey::Pending, ticket);
}

pub fn clear_pending(env: &Env) {
    env.storage().temporary().remove(&DataKey::Pending);
}

pub fn write_outcome(env: &Env, id: &BytesN<32>, outcome: &ExecutionOutcome) {
    env.storage()
        .temporary()
        .set(&DataKey::Outcome(id.clone()), outcome);
}

pub fn take_outcome(env: &Env, id: &BytesN<32>) -> Option<ExecutionOutcome> {
    let key = DataKey::Outcome(id.clone());
    let outcome = env.storage().temporary().get(&key);
    if outcome.is_some() {
        env.storage().temporary().remove(&key);
    }
    outcome
}
