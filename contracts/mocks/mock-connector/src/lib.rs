#![no_std]
use leverage_common::constants::MAX_AMOUNT;
use leverage_common::math::to_i128;
use leverage_common::Error;
use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, token, Address, Bytes, Env,
};

#[contracttype]
pub enum DataKey {
    Rate,
    Collateral(Address, Address),
    Debt(Address, Address),
}

/// Lending market and fixed-rate swap venue in one, exposing the connector
/// capability set. Inputs are pulled from `account` through allowances.
#[contract]
pub struct MockConnector;

#[contractimpl]
impl MockConnector {
    /// Swap output is `amount * numerator / denominator`.
    pub fn set_rate(env: Env, numerator: u128, denominator: u128) {
        if denominator == 0 {
            panic_with_error!(&env, Error::InvalidInput);
        }
        env.storage()
            .instance()
            .set(&DataKey::Rate, &(numerator, denominator));
    }

    pub fn collateral_of(env: Env, account: Address, asset: Address) -> u128 {
        read(&env, &DataKey::Collateral(account, asset))
    }

    pub fn debt_of(env: Env, account: Address, asset: Address) -> u128 {
        read(&env, &DataKey::Debt(account, asset))
    }

    /// Adds interest to an open debt.
    pub fn accrue(env: Env, account: Address, asset: Address, interest: u128) {
        let key = DataKey::Debt(account, asset);
        let debt = read(&env, &key);
        write(&env, &key, debt + interest);
    }

    pub fn deposit(env: Env, account: Address, asset: Address, amount: u128) -> u128 {
        account.require_auth();
        pull(&env, &asset, &account, amount);
        let key = DataKey::Collateral(account, asset);
        let held = read(&env, &key);
        write(&env, &key, held + amount);
        amount
    }

    pub fn borrow(env: Env, account: Address, asset: Address, amount: u128, _rate_mode: u32) -> u128 {
        account.require_auth();
        push(&env, &asset, &account, amount);
        let key = DataKey::Debt(account, asset);
        let debt = read(&env, &key);
        write(&env, &key, debt + amount);
        amount
    }

    pub fn payback(env: Env, account: Address, asset: Address, amount: u128, _rate_mode: u32) -> u128 {
        account.require_auth();
        let key = DataKey::Debt(account.clone(), asset.clone());
        let debt = read(&env, &key);
        let paid = if amount == MAX_AMOUNT { debt } else { amount.min(debt) };
        pull(&env, &asset, &account, paid);
        write(&env, &key, debt - paid);
        paid
    }

    pub fn withdraw(env: Env, account: Address, asset: Address, amount: u128) -> u128 {
        account.require_auth();
        let key = DataKey::Collateral(account.clone(), asset.clone());
        let held = read(&env, &key);
        let taken = if amount == MAX_AMOUNT { held } else { amount };
        if taken > held {
            panic_with_error!(&env, Error::InvalidInput);
        }
        write(&env, &key, held - taken);
        push(&env, &asset, &account, taken);
        taken
    }

    pub fn swap(
        env: Env,
        account: Address,
        from_asset: Address,
        to_asset: Address,
        amount: u128,
        _route: Bytes,
    ) -> u128 {
        account.require_auth();
        let (numerator, denominator): (u128, u128) = env
            .storage()
            .instance()
            .get(&DataKey::Rate)
            .unwrap_or((1, 1));
        pull(&env, &from_asset, &account, amount);
        let out = amount * numerator / denominator;
        push(&env, &to_asset, &account, out);
        out
    }
}

fn read(env: &Env, key: &DataKey) -> u128 {
    env.storage().persistent().get(key).unwrap_or(0)
}

fn write(env: &Env, key: &DataKey, value: u128) {
    env.storage().persistent().set(key, &value);
}

fn pull(env: &Env, asset: &Address, account: &Address, amount: u128) {
    if amount == 0 {
        return;
    }
    let this = env.current_contract_address();
    token::Client::new(env, asset).transfer_from(&this, account, &this, &to_i128(env, amount));
}

fn push(env: &Env, asset: &Address, account: &Address, amount: u128) {
    if amount == 0 {
        return;
    }
    token::Client::new(env, asset).transfer(
        &env.current_contract_address(),
        account,
        &to_i128(env, amount),
    );
}
