use leverage_common::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::{AddressKey, Error, ProxyKind};
use soroban_sdk::{contracttype, panic_with_error, Address, BytesN, Env};

#[contracttype]
pub enum DataKey {
    Owner,
    Initialized,
    Address(AddressKey),
    AccountImpl,
    Proxy(ProxyKind),
    Implementation(ProxyKind),
}

pub fn bump_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn bump_persistent_ttl(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn require_owner(env: &Env, caller: &Address) {
    let owner: Address = env
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
    if owner != *caller {
        panic_with_error!(env, Error::Unauthorized);
    }
    caller.require_auth();
}

pub fn read_address(env: &Env, key: AddressKey) -> Option<Address> {
    let slot = DataKey::Address(key);
    bump_persistent_ttl(env, &slot);
    env.storage().persistent().get(&slot)
}

pub fn required_address(env: &Env, key: AddressKey) -> Address {
    read_address(env, key).unwrap_or_else(|| panic_with_error!(env, Error::NotSet))
}

pub fn write_pinned_address(env: &Env, key: AddressKey, value: &Address) {
    let slot = DataKey::Address(key);
    if env.storage().persistent().has(&slot) {
        panic_with_error!(env, Error::AlreadySet);
    }
    env.storage().persistent().set(&slot, value);
    bump_persistent_ttl(env, &slot);
}

pub fn read_account_impl(env: &Env) -> Option<BytesN<32>> {
    bump_persistent_ttl(env, &DataKey::AccountImpl);
    env.storage().persistent().get(&DataKey::AccountImpl)
}

pub fn read_proxy(env: &Env, kind: ProxyKind) -> Option<Address> {
    let key = DataKey::Proxy(kind);
    bump_persistent_ttl(env, &key);
    env.storage().persistent().get(&key)
}

pub fn write_proxy(env: &Env, kind: ProxyKind, proxy: &Address) {
    let key = DataKey::Proxy(kind);
    env.storage().persistent().set(&key, proxy);
    bump_persistent_ttl(env, &key);
}

pub fn read_implementation(env: &Env, kind: ProxyKind) -> Option<BytesN<32>> {
    let key = DataKey::Implementation(kind);
    bump_persistent_ttl(env, &key);
    env.storage().persistent().get(&key)
}

pub fn write_implementation(env: &Env, kind: ProxyKind, wasm_hash: &BytesN<32>) {
    let key = DataKey::Implementation(kind);
    env.storage().persistent().set(&key, wasm_hash);
    bump_persistent_ttl(env, &key);
}
