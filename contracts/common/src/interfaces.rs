use soroban_sdk::{Address, Bytes, BytesN, Env, Symbol, Vec};

use crate::types::{
    AddressKey, ConnectorRegistration, ExecutionOutcome, FlashProvider, FlashTicket, Step,
};

#[soroban_sdk::contractclient(name = "ProviderClient")]
pub trait AddressesProviderReader {
    fn get_address(env: Env, key: AddressKey) -> Option<Address>;
    fn get_acl_admin(env: Env) -> Address;
    fn get_acl_manager(env: Env) -> Address;
    fn get_connectors(env: Env) -> Address;
    fn get_account_proxy(env: Env) -> Address;
    fn get_account_impl(env: Env) -> BytesN<32>;
    fn get_treasury(env: Env) -> Address;
    fn get_flashloan_aggregator(env: Env) -> Address;
    fn get_router(env: Env) -> Address;
    fn get_configurator(env: Env) -> Address;
}

#[soroban_sdk::contractclient(name = "AclClient")]
pub trait AclReader {
    fn is_router_admin(env: Env, admin: Address) -> bool;
    fn is_connector_admin(env: Env, admin: Address) -> bool;
}

#[soroban_sdk::contractclient(name = "RegistryClient")]
pub trait ConnectorRegistry {
    fn add_connectors(env: Env, names: Vec<Symbol>, addresses: Vec<Address>);
    fn update_connectors(env: Env, names: Vec<Symbol>, addresses: Vec<Address>);
    fn toggle_connectors(env: Env, names: Vec<Symbol>, enabled: bool);
    fn resolve(env: Env, name: Symbol) -> Address;
    fn get_connector(env: Env, name: Symbol) -> Option<ConnectorRegistration>;
}

/// Surface shared by every component reachable through a stable proxy address.
#[soroban_sdk::contractclient(name = "ProxyClient")]
pub trait Upgradeable {
    fn initialize(env: Env, provider: Address);
    fn provider(env: Env) -> Address;
    fn upgrade(env: Env, wasm_hash: BytesN<32>);
}

#[soroban_sdk::contractclient(name = "RouterAdminClient")]
pub trait RouterAdmin {
    fn set_fee(env: Env, fee_bps: u32);
    fn fee(env: Env) -> u32;
}

#[soroban_sdk::contractclient(name = "FactoryClient")]
pub trait AccountFactoryInterface {
    fn predict_account(env: Env, owner: Address) -> Address;
    fn get_account(env: Env, owner: Address) -> Option<Address>;
    fn create_account(env: Env, owner: Address) -> Address;
}

/// Per-user execution account as seen by the router.
#[soroban_sdk::contractclient(name = "ExecutorClient")]
pub trait Executor {
    fn initialize(env: Env, owner: Address, provider: Address);
    fn owner(env: Env) -> Address;
    fn provider(env: Env) -> Address;
    fn arm(env: Env, ticket: FlashTicket);
    fn swap_in(env: Env, step: Step) -> u128;
    fn take_outcome(env: Env, id: BytesN<32>) -> ExecutionOutcome;
}

#[soroban_sdk::contractclient(name = "AggregatorClient")]
pub trait Aggregator {
    fn get_routes(env: Env) -> Vec<u32>;
    fn get_route(env: Env, route: u32) -> FlashProvider;
    fn route_quote(env: Env, route: u32, tokens: Vec<Address>, amounts: Vec<u128>) -> Option<u32>;
    fn initiate(
        env: Env,
        route: u32,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        receiver: Address,
        data: Bytes,
    );
}

/// Multi-asset flash lender.
#[soroban_sdk::contractclient(name = "BasketLenderClient")]
pub trait BasketLender {
    fn max_flash_loan(env: Env, token: Address) -> u128;
    fn flash_fee_bps(env: Env) -> u32;
    fn flash_loan(
        env: Env,
        initiator: Address,
        receiver: Address,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        data: Bytes,
    );
}

/// Single-asset receipt vault offering flash loans of its underlying.
#[soroban_sdk::contractclient(name = "VaultLenderClient")]
pub trait VaultLender {
    fn get_underlying_token(env: Env) -> Address;
    fn get_available_liquidity(env: Env) -> u128;
    fn get_flash_loan_fee(env: Env) -> u128;
    fn flash_loan(env: Env, receiver: Address, amount: u128, data: Bytes);
}

#[soroban_sdk::contractclient(name = "FlashReceiverClient")]
pub trait FlashReceiver {
    fn on_funds_received(
        env: Env,
        lender: Address,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        fees: Vec<u128>,
        initiator: Address,
        data: Bytes,
    ) -> bool;
}

#[soroban_sdk::contractclient(name = "VaultReceiverClient")]
pub trait VaultReceiver {
    fn on_flash_loan(env: Env, vault: Address, amount: u128, fee: u128, data: Bytes);
}

/// Capability set exposed by connectors. `account` is the ledger the effects
/// land in; connectors pull inputs from it through allowances and pay outputs
/// back to it.
#[soroban_sdk::contractclient(name = "ConnectorClient")]
pub trait Connector {
    fn deposit(env: Env, account: Address, asset: Address, amount: u128) -> u128;
    fn borrow(env: Env, account: Address, asset: Address, amount: u128, rate_mode: u32) -> u128;
    fn payback(env: Env, account: Address, asset: Address, amount: u128, rate_mode: u32) -> u128;
    fn withdraw(env: Env, account: Address, asset: Address, amount: u128) -> u128;
    fn swap(
        env: Env,
        account: Address,
        from_asset: Address,
        to_asset: Address,
        amount: u128,
        route: Bytes,
    ) -> u128;
}
