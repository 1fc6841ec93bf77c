use leverage_common::Operation;
use soroban_sdk::{contractevent, Address, BytesN};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionOpened {
    #[topic]
    pub owner: Address,
    #[topic]
    pub key: BytesN<32>,
    pub index: u64,
    pub amount_in: u128,
    pub leverage: u32,
    pub collateral_amount: u128,
    pub borrow_amount: u128,
    pub protocol_fee: u128,
    pub is_short: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionClosed {
    #[topic]
    pub owner: Address,
    #[topic]
    pub key: BytesN<32>,
    pub collateral_amount: u128,
    pub borrow_amount: u128,
    pub residual: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeUpdated {
    pub old_fee_bps: u32,
    pub new_fee_bps: u32,
}

/// A ticket was armed and funding requested on route `route`.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashRequested {
    #[topic]
    pub key: BytesN<32>,
    pub id: BytesN<32>,
    pub operation: Operation,
    pub route: u32,
    pub account: Address,
}
