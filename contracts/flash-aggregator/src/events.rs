use leverage_common::ProviderKind;
use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteSet {
    #[topic]
    pub route: u32,
    pub kind: ProviderKind,
    pub lender: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteRemoved {
    #[topic]
    pub route: u32,
}

/// Funding was requested from `lender` on behalf of `receiver`.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashInitiated {
    #[topic]
    pub route: u32,
    #[topic]
    pub receiver: Address,
    pub lender: Address,
}
