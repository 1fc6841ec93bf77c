use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS};
use crate::errors::Error;

/// Basis-point fee on `amount`, rounded down. `None` when the product
/// does not fit in a `u128`.
pub fn bps_fee(amount: u128, fee_bps: u32) -> Option<u128> {
    amount
        .checked_mul(fee_bps as u128)
        .map(|scaled| scaled / BPS_DENOMINATOR)
}

/// Leveraged notional of a position: `amount_in * leverage`.
pub fn notional(amount_in: u128, leverage: u32) -> Option<u128> {
    amount_in.checked_mul(leverage as u128)
}

/// Converts a 1e6-scaled fee rate to basis points, rounding up so a quote
/// never understates what the lender will charge.
pub fn scaled_fee_to_bps(fee_scaled: u128) -> u32 {
    let bps = fee_scaled.saturating_add(99) / 100;
    if bps > MAX_FEE_BPS as u128 {
        MAX_FEE_BPS
    } else {
        bps as u32
    }
}

pub fn to_i128(env: &Env, amount: u128) -> i128 {
    match i128::try_from(amount) {
        Ok(v) => v,
        Err(_) => panic_with_error!(env, Error::InvalidInput),
    }
}

pub fn balance_of(env: &Env, asset: &Address, holder: &Address) -> u128 {
    let balance = token::Client::new(env, asset).balance(holder);
    if balance < 0 {
        panic_with_error!(env, Error::InvalidInput);
    }
    balance as u128
}
