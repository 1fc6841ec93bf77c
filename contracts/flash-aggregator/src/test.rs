use super::*;
use leverage_common::{Error, FlashProvider, ProviderKind};
use mock_flash_pool::{MockFlashPool, MockFlashPoolClient};
use mock_flash_vault::{MockFlashVault, MockFlashVaultClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{
    contract, contractimpl, contracttype, token, vec, Address, Bytes, Env, Vec,
};

#[contracttype]
enum ReceiverKey {
    Initiator,
    Data,
    VaultToken,
}

/// Pays back principal plus fee out of its own balance.
#[contract]
struct FlashLoanRepayer;

#[contractimpl]
impl FlashLoanRepayer {
    pub fn set_vault_token(env: Env, token: Address) {
        env.storage().instance().set(&ReceiverKey::VaultToken, &token);
    }

    pub fn on_funds_received(
        env: Env,
        lender: Address,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        fees: Vec<u128>,
        initiator: Address,
        data: Bytes,
    ) -> bool {
        env.storage().instance().set(&ReceiverKey::Initiator, &initiator);
        env.storage().instance().set(&ReceiverKey::Data, &data);
        let this = env.current_contract_address();
        for i in 0..tokens.len() {
            let owed = amounts.get(i).unwrap() + fees.get(i).unwrap();
            token::Client::new(&env, &tokens.get(i).unwrap()).transfer(
                &this,
                &lender,
                &(owed as i128),
            );
        }
        true
    }

    pub fn on_flash_loan(env: Env, vault: Address, amount: u128, fee: u128, data: Bytes) {
        env.storage().instance().set(&ReceiverKey::Data, &data);
        let token: Address = env.storage().instance().get(&ReceiverKey::VaultToken).unwrap();
        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &vault,
            &((amount + fee) as i128),
        );
    }

    pub fn initiator(env: Env) -> Option<Address> {
        env.storage().instance().get(&ReceiverKey::Initiator)
    }

    pub fn data(env: Env) -> Option<Bytes> {
        env.storage().instance().get(&ReceiverKey::Data)
    }
}

/// Keeps the funds.
#[contract]
struct FlashLoanRenegade;

#[contractimpl]
impl FlashLoanRenegade {
    pub fn on_funds_received(
        _env: Env,
        _lender: Address,
        _tokens: Vec<Address>,
        _amounts: Vec<u128>,
        _fees: Vec<u128>,
        _initiator: Address,
        _data: Bytes,
    ) -> bool {
        true
    }
}

struct Setup {
    env: Env,
    admin: Address,
    aggregator: FlashAggregatorClient<'static>,
    pool: MockFlashPoolClient<'static>,
    vault: MockFlashVaultClient<'static>,
    debt: Address,
    collateral: Address,
}

fn err(e: Error) -> soroban_sdk::Error {
    e.into()
}

fn create_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone()).address()
}

fn mint(env: &Env, token: &Address, to: &Address, amount: u128) {
    token::StellarAssetClient::new(env, token).mint(to, &(amount as i128));
}

fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let debt = create_token(&env, &admin);
    let collateral = create_token(&env, &admin);

    let aggregator_id = env.register(FlashAggregator, ());
    let aggregator = FlashAggregatorClient::new(&env, &aggregator_id);
    aggregator.initialize(&admin);

    let pool_id = env.register(MockFlashPool, ());
    let pool = MockFlashPoolClient::new(&env, &pool_id);
    pool.set_fee_bps(&9);
    mint(&env, &debt, &pool_id, 1_000_000);

    let vault_id = env.register(MockFlashVault, ());
    let vault = MockFlashVaultClient::new(&env, &vault_id);
    vault.initialize(&debt, &500);
    mint(&env, &debt, &vault_id, 1_000_000);

    aggregator.set_route(
        &admin,
        &1,
        &FlashProvider {
            kind: ProviderKind::Basket,
            lender: pool_id,
        },
    );
    aggregator.set_route(
        &admin,
        &2,
        &FlashProvider {
            kind: ProviderKind::Vault,
            lender: vault_id,
        },
    );

    Setup {
        env,
        admin,
        aggregator,
        pool,
        vault,
        debt,
        collateral,
    }
}

#[test]
fn test_routes_keep_priority_order() {
    let s = setup();
    let lender = Address::generate(&s.env);
    s.aggregator.set_route(
        &s.admin,
        &0,
        &FlashProvider {
            kind: ProviderKind::Basket,
            lender,
        },
    );
    assert_eq!(s.aggregator.get_routes(), vec![&s.env, 0u32, 1, 2]);

    s.aggregator.remove_route(&s.admin, &1);
    assert_eq!(s.aggregator.get_routes(), vec![&s.env, 0u32, 2]);
    assert_eq!(
        s.aggregator.try_get_route(&1).err(),
        Some(Ok(err(Error::RouteUnavailable)))
    );
    assert_eq!(
        s.aggregator.try_remove_route(&s.admin, &7).err(),
        Some(Ok(err(Error::RouteUnavailable)))
    );
}

#[test]
fn test_only_admin_manages_routes() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let res = s.aggregator.try_set_route(
        &stranger,
        &5,
        &FlashProvider {
            kind: ProviderKind::Basket,
            lender: stranger.clone(),
        },
    );
    assert_eq!(res.err(), Some(Ok(err(Error::Unauthorized))));
    assert_eq!(s.aggregator.get_routes().len(), 2);
}

#[test]
fn test_quotes_reflect_liquidity_and_fee() {
    let s = setup();
    let one = |amount: u128| vec![&s.env, amount];

    assert_eq!(
        s.aggregator.route_quote(&1, &vec![&s.env, s.debt.clone()], &one(500_000)),
        Some(9)
    );
    assert_eq!(
        s.aggregator.route_quote(&2, &vec![&s.env, s.debt.clone()], &one(500_000)),
        Some(5)
    );
    assert_eq!(
        s.aggregator.route_quote(&1, &vec![&s.env, s.debt.clone()], &one(2_000_000)),
        None
    );
    // The pool holds no collateral token and the vault lends a single asset.
    let basket = vec![&s.env, s.debt.clone(), s.collateral.clone()];
    let amounts = vec![&s.env, 10u128, 10u128];
    assert_eq!(s.aggregator.route_quote(&1, &basket, &amounts), None);
    assert_eq!(s.aggregator.route_quote(&2, &basket, &amounts), None);
    assert_eq!(
        s.aggregator
            .route_quote(&2, &vec![&s.env, s.collateral.clone()], &one(10)),
        None
    );
}

#[test]
fn test_malformed_basket_rejected() {
    let s = setup();
    let res = s.aggregator.try_route_quote(
        &1,
        &vec![&s.env, s.debt.clone()],
        &vec![&s.env, 1u128, 2u128],
    );
    assert_eq!(res.err(), Some(Ok(err(Error::LengthMismatch))));
    let res = s
        .aggregator
        .try_route_quote(&1, &vec![&s.env, s.debt.clone()], &vec![&s.env, 0u128]);
    assert_eq!(res.err(), Some(Ok(err(Error::InvalidInput))));
}

#[test]
fn test_basket_loan_is_repaid_with_fee() {
    let s = setup();
    let receiver_id = s.env.register(FlashLoanRepayer, ());
    let receiver = FlashLoanRepayerClient::new(&s.env, &receiver_id);
    mint(&s.env, &s.debt, &receiver_id, 1_000);
    let data = Bytes::from_array(&s.env, &[7u8; 4]);

    s.aggregator.initiate(
        &1,
        &vec![&s.env, s.debt.clone()],
        &vec![&s.env, 100_000u128],
        &receiver_id,
        &data,
    );

    let debt = token::Client::new(&s.env, &s.debt);
    assert_eq!(debt.balance(&s.pool.address), 1_000_090);
    assert_eq!(debt.balance(&receiver_id), 910);
    assert_eq!(receiver.initiator(), Some(s.aggregator.address.clone()));
    assert_eq!(receiver.data(), Some(data));
}

#[test]
fn test_vault_loan_is_repaid_with_fee() {
    let s = setup();
    let receiver_id = s.env.register(FlashLoanRepayer, ());
    let receiver = FlashLoanRepayerClient::new(&s.env, &receiver_id);
    receiver.set_vault_token(&s.debt);
    mint(&s.env, &s.debt, &receiver_id, 1_000);

    s.aggregator.initiate(
        &2,
        &vec![&s.env, s.debt.clone()],
        &vec![&s.env, 200_000u128],
        &receiver_id,
        &Bytes::new(&s.env),
    );

    let debt = token::Client::new(&s.env, &s.debt);
    assert_eq!(debt.balance(&s.vault.address), 1_000_100);
    assert_eq!(debt.balance(&receiver_id), 900);
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn test_lender_rejects_unpaid_loan() {
    let s = setup();
    let receiver_id = s.env.register(FlashLoanRenegade, ());
    s.aggregator.initiate(
        &1,
        &vec![&s.env, s.debt.clone()],
        &vec![&s.env, 100_000u128],
        &receiver_id,
        &Bytes::new(&s.env),
    );
}

#[test]
fn test_uncovered_request_is_unavailable() {
    let s = setup();
    let receiver_id = s.env.register(FlashLoanRepayer, ());
    let res = s.aggregator.try_initiate(
        &1,
        &vec![&s.env, s.debt.clone()],
        &vec![&s.env, 5_000_000u128],
        &receiver_id,
        &Bytes::new(&s.env),
    );
    assert_eq!(res.err(), Some(Ok(err(Error::RouteUnavailable))));
}
