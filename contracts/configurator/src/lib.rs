#![no_std]
//! Role-gated administration surface: connector registration goes to the
//! registry, fee changes go to the router.

use leverage_common::constants::{MAX_FEE_BPS, TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::{AclClient, ProviderClient, RegistryClient, RouterAdminClient};
use leverage_common::Error;
use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, Address, BytesN, Env, Symbol, Vec,
};

#[contracttype]
pub enum DataKey {
    Provider,
    Initialized,
}

#[contract]
pub struct Configurator;

#[contractimpl]
impl Configurator {
    pub fn initialize(env: Env, provider: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Provider, &provider);
        env.storage().instance().set(&DataKey::Initialized, &true);
        bump_ttl(&env);
    }

    pub fn provider(env: Env) -> Address {
        read_provider(&env)
    }

    /// Swaps the code behind this address; only the provider may do it.
    pub fn upgrade(env: Env, wasm_hash: BytesN<32>) {
        read_provider(&env).require_auth();
        env.deployer().update_current_contract_wasm(wasm_hash);
    }

    pub fn add_connectors(env: Env, caller: Address, names: Vec<Symbol>, addresses: Vec<Address>) {
        let provider = require_connector_admin(&env, &caller);
        RegistryClient::new(&env, &provider.get_connectors()).add_connectors(&names, &addresses);
    }

    pub fn update_connectors(
        env: Env,
        caller: Address,
        names: Vec<Symbol>,
        addresses: Vec<Address>,
    ) {
        let provider = require_connector_admin(&env, &caller);
        RegistryClient::new(&env, &provider.get_connectors())
            .update_connectors(&names, &addresses);
    }

    pub fn toggle_connectors(env: Env, caller: Address, names: Vec<Symbol>, enabled: bool) {
        let provider = require_connector_admin(&env, &caller);
        RegistryClient::new(&env, &provider.get_connectors()).toggle_connectors(&names, &enabled);
    }

    /// Protocol fee in basis points of the leveraged notional.
    pub fn set_fee(env: Env, caller: Address, fee_bps: u32) {
        let provider = require_router_admin(&env, &caller);
        if fee_bps > MAX_FEE_BPS {
            panic_with_error!(&env, Error::InvalidFee);
        }
        RouterAdminClient::new(&env, &provider.get_router()).set_fee(&fee_bps);
    }
}

fn bump_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn read_provider(env: &Env) -> Address {
    bump_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Provider)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

fn acl<'a>(env: &Env, provider: &ProviderClient<'a>) -> AclClient<'a> {
    AclClient::new(env, &provider.get_acl_manager())
}

fn require_connector_admin<'a>(env: &Env, caller: &Address) -> ProviderClient<'a> {
    let provider = ProviderClient::new(env, &read_provider(env));
    if !acl(env, &provider).is_connector_admin(caller) {
        panic_with_error!(env, Error::Unauthorized);
    }
    caller.require_auth();
    provider
}

fn require_router_admin<'a>(env: &Env, caller: &Address) -> ProviderClient<'a> {
    let provider = ProviderClient::new(env, &read_provider(env));
    if !acl(env, &provider).is_router_admin(caller) {
        panic_with_error!(env, Error::Unauthorized);
    }
    caller.require_auth();
    provider
}
