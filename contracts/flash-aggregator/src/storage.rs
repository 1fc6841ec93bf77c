use leverage_common::constants::{MAX_BASKET_LEN, TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::{Error, FlashProvider};
use soroban_sdk::{contracttype, panic_with_error, Address, Env, Vec};

#[contracttype]
pub enum DataKey {
    Admin,
    Initialized,
    Routes,
    Route(u32),
}

pub fn bump_core_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn require_admin(env: &Env, admin: &Address) {
    let stored: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
    if stored != *admin {
        panic_with_error!(env, Error::Unauthorized);
    }
    admin.require_auth();
}

pub fn read_routes(env: &Env) -> Vec<u32> {
    env.storage()
        .instance()
        .get(&DataKey::Routes)
        .unwrap_or(Vec::new(env))
}

/// Keeps route ids sorted ascending; that order is the tie-break priority.
pub fn insert_route_id(env: &Env, route: u32) {
    let routes = read_routes(env);
    let mut out = Vec::new(env);
    let mut placed = false;
    for existing in routes.iter() {
        if existing == route {
            return;
        }
        if !placed && route < existing {
            out.push_back(route);
            placed = true;
        }
        out.push_back(existing);
    }
    if !placed {
        out.push_back(route);
    }
    env.storage().instance().set(&DataKey::Routes, &out);
}

pub fn remove_route_id(env: &Env, route: u32) {
    let routes = read_routes(env);
    let mut out = Vec::new(env);
    for existing in routes.iter() {
        if existing != route {
            out.push_back(existing);
        }
    }
    env.storage().instance().set(&DataKey::Routes, &out);
}

pub fn read_provider(env: &Env, route: u32) -> Option<FlashProvider> {
    let key = DataKey::Route(route);
    let persistent = env.storage().persistent();
    let provider = persistent.get(&key);
    if provider.is_some() {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    provider
}

pub fn required_provider(env: &Env, route: u32) -> FlashProvider {
    read_provider(env, route).unwrap_or_else(|| panic_with_error!(env, Error::RouteUnavailable))
}

pub fn write_provider(env: &Env, route: u32, provider: &FlashProvider) {
    let key = DataKey::Route(route);
    env.storage().persistent().set(&key, provider);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn remove_provider(env: &Env, route: u32) {
    env.storage().persistent().remove(&DataKey::Route(route));
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
