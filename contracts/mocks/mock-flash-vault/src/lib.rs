#![no_std]
use leverage_common::constants::SCALE_1E6;
use leverage_common::interfaces::VaultReceiverClient;
use leverage_common::math::{balance_of, to_i128};
use leverage_common::Error;
use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, token, Address, Bytes, Env,
};

#[contracttype]
pub enum DataKey {
    Underlying,
    FeeScaled,
}

/// Single-asset vault lending its idle underlying, fee scaled by 1e6.
#[contract]
pub struct MockFlashVault;

#[contractimpl]
impl MockFlashVault {
    pub fn initialize(env: Env, underlying: Address, fee_scaled: u128) {
        env.storage()
            .instance()
            .set(&DataKey::Underlying, &underlying);
        env.storage().instance().set(&DataKey::FeeScaled, &fee_scaled);
    }

    pub fn get_underlying_token(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Underlying)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    pub fn get_available_liquidity(env: Env) -> u128 {
        let underlying = Self::get_underlying_token(env.clone());
        balance_of(&env, &underlying, &env.current_contract_address())
    }

    pub fn get_flash_loan_fee(env: Env) -> u128 {
        env.storage()
            .instance()
            .get(&DataKey::FeeScaled)
            .unwrap_or(0)
    }

    pub fn flash_loan(env: Env, receiver: Address, amount: u128, data: Bytes) {
        if amount == 0 {
            panic_with_error!(&env, Error::InvalidInput);
        }
        let underlying = Self::get_underlying_token(env.clone());
        let this = env.current_contract_address();
        let balance_before = balance_of(&env, &underlying, &this);
        if balance_before < amount {
            panic_with_error!(&env, Error::RouteUnavailable);
        }
        let fee = amount.saturating_mul(Self::get_flash_loan_fee(env.clone())) / SCALE_1E6;

        token::Client::new(&env, &underlying).transfer(&this, &receiver, &to_i128(&env, amount));
        VaultReceiverClient::new(&env, &receiver).on_flash_loan(&this, &amount, &fee, &data);

        if balance_of(&env, &underlying, &this) < balance_before.saturating_add(fee) {
            panic_with_error!(&env, Error::InsufficientRepayment);
        }
    }
}
