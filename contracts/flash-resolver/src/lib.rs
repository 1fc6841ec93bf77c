#![no_std]
//! Read-only route selection over the aggregator's lenders.

use leverage_common::constants::{MAX_BASKET_LEN, TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::AggregatorClient;
use leverage_common::{Error, FlashQuote};
use soroban_sdk::{contract, contractimpl, contracttype, panic_with_error, Address, Env, Vec};

#[contracttype]
pub enum DataKey {
    Aggregator,
}

#[contract]
pub struct FlashResolver;

#[contractimpl]
impl FlashResolver {
    pub fn initialize(env: Env, aggregator: Address) {
        if env.storage().instance().has(&DataKey::Aggregator) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        env.storage()
            .instance()
            .set(&DataKey::Aggregator, &aggregator);
        bump_ttl(&env);
    }

    pub fn aggregator(env: Env) -> Address {
        read_aggregator(&env)
    }

    /// Quotes every route able to lend the whole basket and picks the
    /// cheapest. Equal fees resolve to the earlier route.
    pub fn get_data(env: Env, tokens: Vec<Address>, amounts: Vec<u128>) -> Result<FlashQuote, Error> {
        if tokens.is_empty() || tokens.len() != amounts.len() || tokens.len() > MAX_BASKET_LEN {
            return Err(Error::LengthMismatch);
        }
        if amounts.iter().any(|amount| amount == 0) {
            return Err(Error::InvalidInput);
        }

        let aggregator = AggregatorClient::new(&env, &read_aggregator(&env));
        let mut routes = Vec::new(&env);
        let mut fees = Vec::new(&env);
        for route in aggregator.get_routes().iter() {
            if let Some(fee) = aggregator.route_quote(&route, &tokens, &amounts) {
                routes.push_back(route);
                fees.push_back(fee);
            }
        }

        let (best_route, best_fee) = select_best(&routes, &fees).ok_or(Error::RouteUnavailable)?;
        Ok(FlashQuote {
            routes,
            fees,
            best_route,
            best_fee,
        })
    }
}

fn bump_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn read_aggregator(env: &Env) -> Address {
    bump_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Aggregator)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// Lowest fee; the first of equal fees keeps its place.
pub fn select_best(routes: &Vec<u32>, fees: &Vec<u32>) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32)> = None;
    for (route, fee) in routes.iter().zip(fees.iter()) {
        match best {
            Some((_, best_fee)) if best_fee <= fee => {}
            _ => best = Some((route, fee)),
        }
    }
    best
}

#[cfg(test)]
mod test;
