use soroban_sdk::{contracttype, Address, Bytes, BytesN, Symbol, Vec};

/// A leveraged position as recorded in the router ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub owner: Address,
    pub debt_asset: Address,
    pub collateral_asset: Address,
    pub amount_in: u128,
    pub leverage: u32,
    pub collateral_amount: u128,
    pub borrow_amount: u128,
    pub is_short: bool,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.collateral_amount > 0 || self.borrow_amount > 0
    }
}

/// Pinned address slots of the addresses provider.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressKey {
    AclAdmin,
    AclManager,
    Connectors,
    AccountProxy,
    Treasury,
    FlashloanAggregator,
}

/// Upgradeable components that live behind a stable address.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProxyKind {
    Router,
    Configurator,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectorRegistration {
    pub address: Address,
    pub enabled: bool,
}

/// One capability call against a connector. An amount of `0` consumes the
/// output of the previous step, `u128::MAX` means the whole balance or debt.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConnectorCall {
    /// (asset, amount)
    Deposit(Address, u128),
    /// (asset, amount, rate_mode)
    Borrow(Address, u128, u32),
    /// (asset, amount, rate_mode)
    Payback(Address, u128, u32),
    /// (asset, amount)
    Withdraw(Address, u128),
    /// (from_asset, to_asset, amount, route_data)
    Swap(Address, Address, u128, Bytes),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    pub connector: Symbol,
    pub call: ConnectorCall,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Open,
    Close,
}

/// Single-use capability issued by the router for one funding request. The
/// account that receives the funds only accepts a callback matching it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashTicket {
    pub id: BytesN<32>,
    pub operation: Operation,
    pub key: BytesN<32>,
    pub owner: Address,
    pub debt_asset: Address,
    pub collateral_asset: Address,
    pub route: u32,
    pub lender: Address,
    pub initiator: Address,
    pub tokens: Vec<Address>,
    pub amounts: Vec<u128>,
    pub notional: u128,
    pub protocol_fee: u128,
    pub treasury: Option<Address>,
    pub steps: Vec<Step>,
    pub extra: Option<Step>,
}

/// Realized amounts of a consumed ticket. On open `collateral`/`borrow` are
/// what was deposited and borrowed; on close what was withdrawn and repaid.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecutionOutcome {
    pub collateral: u128,
    pub borrow: u128,
    pub residual: u128,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProviderKind {
    /// Multi-asset lender calling `on_funds_received`.
    Basket,
    /// Single-asset receipt vault calling `on_flash_loan`.
    Vault,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashProvider {
    pub kind: ProviderKind,
    pub lender: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashQuote {
    pub routes: Vec<u32>,
    pub fees: Vec<u32>,
    pub best_route: u32,
    pub best_fee: u32,
}
