use leverage_common::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::{Error, Position};
use soroban_sdk::{contracttype, panic_with_error, Address, BytesN, Env};

use crate::helpers::{bump_index_ttl, bump_position_ttl};

#[contracttype]
pub enum DataKey {
    Provider,
    Initialized,
    Fee,
    Nonce,
    InFlight,
    PositionIndex(Address),
    Position(BytesN<32>),
    AssetLock(Address, Address),
}

pub fn read_provider(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Provider)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

pub fn read_fee(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Fee).unwrap_or(0)
}

pub fn write_fee(env: &Env, fee_bps: u32) {
    env.storage().instance().set(&DataKey::Fee, &fee_bps);
}

pub fn next_nonce(env: &Env) -> u64 {
    let nonce: u64 = env
        .storage()
        .instance()
        .get(&DataKey::Nonce)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&DataKey::Nonce, &nonce);
    nonce
}

pub fn read_in_flight(env: &Env) -> Option<BytesN<32>> {
    env.storage().instance().get(&DataKey::InFlight)
}

pub fn write_in_flight(env: &Env, id: &BytesN<32>) {
    env.storage().instance().set(&DataKey::InFlight, id);
}

pub fn clear_in_flight(env: &Env) {
    env.storage().instance().remove(&DataKey::InFlight);
}

pub fn read_index(env: &Env, owner: &Address) -> u64 {
    bump_index_ttl(env, owner);
    env.storage()
        .persistent()
        .get(&DataKey::PositionIndex(owner.clone()))
        .unwrap_or(0u64)
}

pub fn next_index(env: &Env, owner: &Address) -> u64 {
    let index = read_index(env, owner);
    if index == u64::MAX {
        panic_with_error!(env, Error::InvalidInput);
    }
    let index = index + 1;
    env.storage()
        .persistent()
        .set(&DataKey::PositionIndex(owner.clone()), &index);
    bump_index_ttl(env, owner);
    index
}

pub fn read_position(env: &Env, key: &BytesN<32>) -> Option<Position> {
    bump_position_ttl(env, key);
    env.storage()
        .persistent()
        .get(&DataKey::Position(key.clone()))
}

pub fn write_position(env: &Env, key: &BytesN<32>, position: &Position) {
    env.storage()
        .persistent()
        .set(&DataKey::Position(key.clone()), position);
    bump_position_ttl(env, key);
}

/// Open position of `owner` that holds `asset` as debt or collateral.
pub fn read_asset_lock(env: &Env, owner: &Address, asset: &Address) -> Option<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&DataKey::AssetLock(owner.clone(), asset.clone()))
}

pub fn lock_assets(env: &Env, key: &BytesN<32>, position: &Position) {
    for asset in [&position.debt_asset, &position.collateral_asset] {
        let lock = DataKey::AssetLock(position.owner.clone(), asset.clone());
        env.storage().persistent().set(&lock, key);
        env.storage()
            .persistent()
            .extend_ttl(&lock, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn unlock_assets(env: &Env, position: &Position) {
    for asset in [&position.debt_asset, &position.collateral_asset] {
        env.storage()
            .persistent()
            .remove(&DataKey::AssetLock(position.owner.clone(), asset.clone()));
    }
}
