use leverage_common::Operation;
use soroban_sdk::{contractevent, Address, BytesN};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TicketArmed {
    #[topic]
    pub key: BytesN<32>,
    pub id: BytesN<32>,
    pub lender: Address,
}

/// Funding was received, instructions executed and the lender repaid.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TicketSettled {
    #[topic]
    pub key: BytesN<32>,
    pub operation: Operation,
    pub collateral: u128,
    pub borrow: u128,
    pub residual: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Swept {
    #[topic]
    pub token: Address,
    pub amount: u128,
}
