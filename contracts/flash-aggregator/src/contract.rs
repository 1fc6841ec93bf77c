use leverage_common::interfaces::{BasketLenderClient, VaultLenderClient};
use leverage_common::math::scaled_fee_to_bps;
use leverage_common::{Error, FlashProvider, ProviderKind};
use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Bytes, Env, Vec};

use crate::events::*;
use crate::storage::*;

#[contract]
pub struct FlashAggregator;

#[contractimpl]
impl FlashAggregator {
    pub fn initialize(env: Env, admin: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::Routes, &Vec::<u32>::new(&env));
        env.storage().instance().set(&DataKey::Initialized, &true);
        bump_core_ttl(&env);
    }

    pub fn set_route(env: Env, admin: Address, route: u32, provider: FlashProvider) {
        bump_core_ttl(&env);
        require_admin(&env, &admin);
        write_provider(&env, route, &provider);
        insert_route_id(&env, route);
        RouteSet {
            route,
            kind: provider.kind,
            lender: provider.lender,
        }
        .publish(&env);
    }

    pub fn remove_route(env: Env, admin: Address, route: u32) {
        bump_core_ttl(&env);
        require_admin(&env, &admin);
        required_provider(&env, route);
        remove_provider(&env, route);
        remove_route_id(&env, route);
        RouteRemoved { route }.publish(&env);
    }

    /// Route ids in priority order.
    pub fn get_routes(env: Env) -> Vec<u32> {
        bump_core_ttl(&env);
        read_routes(&env)
    }

    pub fn get_route(env: Env, route: u32) -> FlashProvider {
        required_provider(&env, route)
    }

    /// Fee in bps if `route` can lend every requested amount, `None` otherwise.
    pub fn route_quote(
        env: Env,
        route: u32,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
    ) -> Option<u32> {
        validate_basket(&env, &tokens, &amounts);
        let provider = required_provider(&env, route);
        quote(&env, &provider, &tokens, &amounts)
    }

    /// Borrows the basket from the route's lender for `receiver`. The lender
    /// calls the receiver back directly and enforces its own repayment.
    pub fn initiate(
        env: Env,
        route: u32,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        receiver: Address,
        data: Bytes,
    ) {
        bump_core_ttl(&env);
        validate_basket(&env, &tokens, &amounts);
        let provider = required_provider(&env, route);
        if quote(&env, &provider, &tokens, &amounts).is_none() {
            panic_with_error!(&env, Error::RouteUnavailable);
        }

        FlashInitiated {
            route,
            receiver: receiver.clone(),
            lender: provider.lender.clone(),
        }
        .publish(&env);

        match provider.kind {
            ProviderKind::Basket => {
                BasketLenderClient::new(&env, &provider.lender).flash_loan(
                    &env.current_contract_address(),
                    &receiver,
                    &tokens,
                    &amounts,
                    &data,
                );
            }
            ProviderKind::Vault => {
                let amount = amounts
                    .get(0)
                    .unwrap_or_else(|| panic_with_error!(&env, Error::LengthMismatch));
                VaultLenderClient::new(&env, &provider.lender).flash_loan(&receiver, &amount, &data);
            }
        }
    }
}

/// Lender failures while quoting disqualify the route instead of aborting.
fn quote(
    env: &Env,
    provider: &FlashProvider,
    tokens: &Vec<Address>,
    amounts: &Vec<u128>,
) -> Option<u32> {
    match provider.kind {
        ProviderKind::Basket => {
            let lender = BasketLenderClient::new(env, &provider.lender);
            for (token, amount) in tokens.iter().zip(amounts.iter()) {
                match lender.try_max_flash_loan(&token) {
                    Ok(Ok(ceiling)) if ceiling >= amount => {}
                    _ => return None,
                }
            }
            match lender.try_flash_fee_bps() {
                Ok(Ok(fee_bps)) => Some(fee_bps),
                _ => None,
            }
        }
        ProviderKind::Vault => {
            if tokens.len() != 1 {
                return None;
            }
            let vault = VaultLenderClient::new(env, &provider.lender);
            let underlying = match vault.try_get_underlying_token() {
                Ok(Ok(underlying)) => underlying,
                _ => return None,
            };
            if tokens.get(0) != Some(underlying) {
                return None;
            }
            let requested = amounts.get(0).unwrap_or(u128::MAX);
            match vault.try_get_available_liquidity() {
                Ok(Ok(available)) if available >= requested => {}
                _ => return None,
            }
            match vault.try_get_flash_loan_fee() {
                Ok(Ok(fee_scaled)) => Some(scaled_fee_to_bps(fee_scaled)),
                _ => None,
            }
        }
    }
}
