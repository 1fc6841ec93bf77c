#![no_std]
//! Bootstrap registry of the leverage router deployment.
//!
//! Pinned slots are written at most once. The router and configurator live
//! behind stable addresses bound on their first implementation; later
//! implementations are swapped into the same address in place.

mod events;
mod storage;

use leverage_common::interfaces::ProxyClient;
use leverage_common::keys::{is_zero_hash, proxy_salt};
use leverage_common::{AddressKey, Error, ProxyKind};
use soroban_sdk::{contract, contractimpl, panic_with_error, Address, BytesN, Env};

use crate::events::*;
use crate::storage::*;

#[contract]
pub struct AddressesProvider;

#[contractimpl]
impl AddressesProvider {
    pub fn initialize(env: Env, owner: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Initialized, &true);
        bump_instance_ttl(&env);
    }

    pub fn owner(env: Env) -> Address {
        bump_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    /// Writes a pinned slot. Fails with `AlreadySet` once the slot holds a value.
    pub fn set_address(env: Env, caller: Address, key: AddressKey, value: Address) {
        bump_instance_ttl(&env);
        require_owner(&env, &caller);
        write_pinned_address(&env, key, &value);
        AddressSet { key, value }.publish(&env);
    }

    pub fn get_address(env: Env, key: AddressKey) -> Option<Address> {
        read_address(&env, key)
    }

    pub fn get_acl_admin(env: Env) -> Address {
        required_address(&env, AddressKey::AclAdmin)
    }

    pub fn get_acl_manager(env: Env) -> Address {
        required_address(&env, AddressKey::AclManager)
    }

    pub fn get_connectors(env: Env) -> Address {
        required_address(&env, AddressKey::Connectors)
    }

    pub fn get_account_proxy(env: Env) -> Address {
        required_address(&env, AddressKey::AccountProxy)
    }

    pub fn get_treasury(env: Env) -> Address {
        required_address(&env, AddressKey::Treasury)
    }

    pub fn get_flashloan_aggregator(env: Env) -> Address {
        required_address(&env, AddressKey::FlashloanAggregator)
    }

    /// Pins the code every per-user account is deployed from.
    pub fn set_account_impl(env: Env, caller: Address, wasm_hash: BytesN<32>) {
        bump_instance_ttl(&env);
        require_owner(&env, &caller);
        if is_zero_hash(&wasm_hash) {
            panic_with_error!(&env, Error::ZeroAddress);
        }
        if read_account_impl(&env).is_some() {
            panic_with_error!(&env, Error::AlreadySet);
        }
        env.storage()
            .persistent()
            .set(&DataKey::AccountImpl, &wasm_hash);
        AccountImplSet { wasm_hash }.publish(&env);
    }

    pub fn get_account_impl(env: Env) -> BytesN<32> {
        read_account_impl(&env).unwrap_or_else(|| panic_with_error!(&env, Error::NotSet))
    }

    pub fn set_router_impl(env: Env, caller: Address, wasm_hash: BytesN<32>) {
        set_implementation(&env, &caller, ProxyKind::Router, wasm_hash);
    }

    pub fn set_configurator_impl(env: Env, caller: Address, wasm_hash: BytesN<32>) {
        set_implementation(&env, &caller, ProxyKind::Configurator, wasm_hash);
    }

    pub fn get_router(env: Env) -> Address {
        read_proxy(&env, ProxyKind::Router)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotSet))
    }

    pub fn get_configurator(env: Env) -> Address {
        read_proxy(&env, ProxyKind::Configurator)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotSet))
    }

    pub fn get_router_impl(env: Env) -> Option<BytesN<32>> {
        read_implementation(&env, ProxyKind::Router)
    }

    pub fn get_configurator_impl(env: Env) -> Option<BytesN<32>> {
        read_implementation(&env, ProxyKind::Configurator)
    }

    /// Address the proxy of `kind` is (or will be) bound to.
    pub fn predict_proxy(env: Env, kind: ProxyKind) -> Address {
        env.deployer()
            .with_current_contract(proxy_salt(&env, kind))
            .deployed_address()
    }
}

fn set_implementation(env: &Env, caller: &Address, kind: ProxyKind, wasm_hash: BytesN<32>) {
    bump_instance_ttl(env);
    require_owner(env, caller);
    if is_zero_hash(&wasm_hash) {
        panic_with_error!(env, Error::ZeroAddress);
    }
    match read_proxy(env, kind) {
        Some(proxy) => ProxyClient::new(env, &proxy).upgrade(&wasm_hash),
        None => {
            let proxy = bind_proxy(env, kind, &wasm_hash);
            write_proxy(env, kind, &proxy);
            ProxyCreated { kind, proxy }.publish(env);
        }
    }
    write_implementation(env, kind, &wasm_hash);
    ImplementationUpdated { kind, wasm_hash }.publish(env);
}

/// Adopts a component already living at the predicted address, or deploys it.
fn bind_proxy(env: &Env, kind: ProxyKind, wasm_hash: &BytesN<32>) -> Address {
    let deployer = env
        .deployer()
        .with_current_contract(proxy_salt(env, kind));
    let predicted = deployer.deployed_address();
    let existing = ProxyClient::new(env, &predicted).try_provider();
    match existing {
        Ok(Ok(provider)) if provider == env.current_contract_address() => predicted,
        Ok(_) => panic_with_error!(env, Error::AlreadySet),
        Err(_) => {
            let proxy = deployer.deploy_v2(wasm_hash.clone(), ());
            ProxyClient::new(env, &proxy).initialize(&env.current_contract_address());
            proxy
        }
    }
}
