use leverage_common::{AddressKey, ProxyKind};
use soroban_sdk::{contractevent, Address, BytesN};

/// A pinned slot received its one and only value.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressSet {
    pub key: AddressKey,
    #[topic]
    pub value: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountImplSet {
    pub wasm_hash: BytesN<32>,
}

/// The stable address of an upgradeable component was bound.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProxyCreated {
    pub kind: ProxyKind,
    #[topic]
    pub proxy: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImplementationUpdated {
    pub kind: ProxyKind,
    pub wasm_hash: BytesN<32>,
}
