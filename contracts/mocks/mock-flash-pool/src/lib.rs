#![no_std]
use leverage_common::interfaces::FlashReceiverClient;
use leverage_common::math::{balance_of, bps_fee, to_i128};
use leverage_common::Error;
use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, token, Address, Bytes, Env, Vec,
};

#[contracttype]
pub enum DataKey {
    FeeBps,
}

/// Multi-asset flash lender holding its own liquidity.
#[contract]
pub struct MockFlashPool;

#[contractimpl]
impl MockFlashPool {
    pub fn set_fee_bps(env: Env, fee_bps: u32) {
        env.storage().instance().set(&DataKey::FeeBps, &fee_bps);
    }

    pub fn flash_fee_bps(env: Env) -> u32 {
        env.storage().instance().get(&DataKey::FeeBps).unwrap_or(0)
    }

    pub fn max_flash_loan(env: Env, token: Address) -> u128 {
        balance_of(&env, &token, &env.current_contract_address())
    }

    pub fn flash_loan(
        env: Env,
        initiator: Address,
        receiver: Address,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        data: Bytes,
    ) {
        initiator.require_auth();
        if tokens.len() != amounts.len() {
            panic_with_error!(&env, Error::LengthMismatch);
        }
        let this = env.current_contract_address();
        let fee_bps = Self::flash_fee_bps(env.clone());

        let mut before = Vec::new(&env);
        let mut fees = Vec::new(&env);
        for (asset, amount) in tokens.iter().zip(amounts.iter()) {
            before.push_back(balance_of(&env, &asset, &this));
            let fee = bps_fee(amount, fee_bps)
                .unwrap_or_else(|| panic_with_error!(&env, Error::InvalidInput));
            fees.push_back(fee);
            token::Client::new(&env, &asset).transfer(&this, &receiver, &to_i128(&env, amount));
        }

        let accepted = FlashReceiverClient::new(&env, &receiver).on_funds_received(
            &this, &tokens, &amounts, &fees, &initiator, &data,
        );
        if !accepted {
            panic_with_error!(&env, Error::CallbackMismatch);
        }

        for i in 0..tokens.len() {
            let asset = tokens.get_unchecked(i);
            let required = before.get_unchecked(i).saturating_add(fees.get_unchecked(i));
            if balance_of(&env, &asset, &this) < required {
                panic_with_error!(&env, Error::InsufficientRepayment);
            }
        }
    }
}
