use super::*;
use flash_aggregator::{FlashAggregator, FlashAggregatorClient};
use leverage_common::{FlashProvider, ProviderKind};
use mock_flash_pool::{MockFlashPool, MockFlashPoolClient};
use mock_flash_vault::{MockFlashVault, MockFlashVaultClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, vec};

struct Setup {
    env: Env,
    resolver: FlashResolverClient<'static>,
    debt: Address,
    collateral: Address,
}

fn mint(env: &Env, token: &Address, to: &Address, amount: u128) {
    token::StellarAssetClient::new(env, token).mint(to, &(amount as i128));
}

fn pool(env: &Env, fee_bps: u32) -> Address {
    let id = env.register(MockFlashPool, ());
    MockFlashPoolClient::new(env, &id).set_fee_bps(&fee_bps);
    id
}

// route 1: pool, 9 bps, deep debt liquidity plus some collateral
// route 2: pool, 5 bps, shallow debt liquidity
// route 3: vault, 5 bps, deep debt liquidity
// route 4: pool, 0 bps, collateral only
fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let debt = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let collateral = env.register_stellar_asset_contract_v2(admin.clone()).address();

    let aggregator_id = env.register(FlashAggregator, ());
    let aggregator = FlashAggregatorClient::new(&env, &aggregator_id);
    aggregator.initialize(&admin);

    let deep = pool(&env, 9);
    mint(&env, &debt, &deep, 1_000_000);
    mint(&env, &collateral, &deep, 1_000);
    let shallow = pool(&env, 5);
    mint(&env, &debt, &shallow, 100_000);
    let vault = env.register(MockFlashVault, ());
    MockFlashVaultClient::new(&env, &vault).initialize(&debt, &500);
    mint(&env, &debt, &vault, 1_000_000);
    let free = pool(&env, 0);
    mint(&env, &collateral, &free, 1_000_000);

    let basket = |lender: Address| FlashProvider {
        kind: ProviderKind::Basket,
        lender,
    };
    aggregator.set_route(&admin, &1, &basket(deep));
    aggregator.set_route(&admin, &2, &basket(shallow));
    aggregator.set_route(
        &admin,
        &3,
        &FlashProvider {
            kind: ProviderKind::Vault,
            lender: vault,
        },
    );
    aggregator.set_route(&admin, &4, &basket(free));

    let resolver_id = env.register(FlashResolver, ());
    let resolver = FlashResolverClient::new(&env, &resolver_id);
    resolver.initialize(&aggregator_id);

    Setup {
        env,
        resolver,
        debt,
        collateral,
    }
}

#[test]
fn test_equal_fees_resolve_by_priority() {
    let s = setup();
    let quote = s
        .resolver
        .get_data(&vec![&s.env, s.debt.clone()], &vec![&s.env, 50_000u128]);
    assert_eq!(quote.routes, vec![&s.env, 1u32, 2, 3]);
    assert_eq!(quote.fees, vec![&s.env, 9u32, 5, 5]);
    assert_eq!(quote.best_route, 2);
    assert_eq!(quote.best_fee, 5);
}

#[test]
fn test_shallow_lenders_are_disqualified() {
    let s = setup();
    let quote = s
        .resolver
        .get_data(&vec![&s.env, s.debt.clone()], &vec![&s.env, 500_000u128]);
    assert_eq!(quote.routes, vec![&s.env, 1u32, 3]);
    assert_eq!(quote.best_route, 3);
    assert_eq!(quote.best_fee, 5);
}

#[test]
fn test_every_basket_asset_must_be_covered() {
    let s = setup();
    let quote = s.resolver.get_data(
        &vec![&s.env, s.debt.clone(), s.collateral.clone()],
        &vec![&s.env, 10u128, 10u128],
    );
    assert_eq!(quote.routes, vec![&s.env, 1u32]);
    assert_eq!(quote.best_route, 1);
    assert_eq!(quote.best_fee, 9);

    let quote = s
        .resolver
        .get_data(&vec![&s.env, s.collateral.clone()], &vec![&s.env, 10_000u128]);
    assert_eq!(quote.best_route, 4);
    assert_eq!(quote.best_fee, 0);
}

#[test]
fn test_nothing_feasible_is_route_unavailable() {
    let s = setup();
    let res = s
        .resolver
        .try_get_data(&vec![&s.env, s.debt.clone()], &vec![&s.env, 5_000_000u128]);
    assert_eq!(res.err(), Some(Ok(Error::RouteUnavailable)));
}

#[test]
fn test_best_route_is_cheapest_feasible() {
    let s = setup();
    for amount in [1u128, 99_999, 100_000, 100_001, 999_999, 1_000_000] {
        let quote = s
            .resolver
            .get_data(&vec![&s.env, s.debt.clone()], &vec![&s.env, amount]);
        let mut cheapest = u32::MAX;
        for fee in quote.fees.iter() {
            cheapest = cheapest.min(fee);
        }
        assert_eq!(quote.best_fee, cheapest);
        let position = quote.routes.first_index_of(quote.best_route).unwrap();
        assert_eq!(quote.fees.get(position).unwrap(), cheapest);
    }
}

#[test]
fn test_malformed_requests_rejected() {
    let s = setup();
    let res = s
        .resolver
        .try_get_data(&vec![&s.env, s.debt.clone()], &Vec::new(&s.env));
    assert_eq!(res.err(), Some(Ok(Error::LengthMismatch)));
    let res = s
        .resolver
        .try_get_data(&vec![&s.env, s.debt.clone()], &vec![&s.env, 0u128]);
    assert_eq!(res.err(), Some(Ok(Error::InvalidInput)));
}

#[test]
fn test_select_best_prefers_lowest_then_earliest() {
    let env = Env::default();
    assert_eq!(select_best(&Vec::new(&env), &Vec::new(&env)), None);
    assert_eq!(
        select_best(&vec![&env, 1u32, 2, 3], &vec![&env, 9u32, 5, 5]),
        Some((2, 5))
    );
    assert_eq!(
        select_best(&vec![&env, 1u32, 2], &vec![&env, 0u32, 0]),
        Some((1, 0))
    );
}
