#![no_std]

use leverage_common::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::{ExecutorClient, ProviderClient};
use leverage_common::keys::owner_salt;
use leverage_common::Error;
use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, panic_with_error, Address, Env,
};

#[contract]
pub struct AccountFactory;

#[contracttype]
pub enum DataKey {
    Provider,
    Initialized,
    UserAccount(Address),
    AccountCount,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountCreated {
    #[topic]
    pub owner: Address,
    pub account: Address,
}

#[contractimpl]
impl AccountFactory {
    pub fn initialize(env: Env, provider: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Provider, &provider);
        env.storage()
            .instance()
            .set(&DataKey::Initialized, &true);
        bump_ttl(&env);
    }

    pub fn provider(env: Env) -> Address {
        bump_ttl(&env);
        read_provider(&env)
    }

    pub fn predict_account(env: Env, owner: Address) -> Address {
        env.deployer()
            .with_current_contract(owner_salt(&env, &owner))
            .deployed_address()
    }

    pub fn get_account(env: Env, owner: Address) -> Option<Address> {
        bump_ttl(&env);
        let key = DataKey::UserAccount(owner);
        let account = env.storage().persistent().get(&key);
        if account.is_some() {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
        }
        account
    }

    pub fn account_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::AccountCount)
            .unwrap_or(0u64)
    }

    /// Returns the owner's account, deploying it on first use. Router only.
    pub fn create_account(env: Env, owner: Address) -> Address {
        bump_ttl(&env);
        let provider_id = read_provider(&env);
        let provider = ProviderClient::new(&env, &provider_id);
        provider.get_router().require_auth();

        if let Some(account) = Self::get_account(env.clone(), owner.clone()) {
            return account;
        }

        let deployer = env
            .deployer()
            .with_current_contract(owner_salt(&env, &owner));
        let predicted = deployer.deployed_address();
        let existing = ExecutorClient::new(&env, &predicted).try_owner();
        let account = match existing {
            Ok(Ok(found)) if found == owner => predicted,
            Ok(_) => panic_with_error!(&env, Error::AccountMismatch),
            Err(_) => {
                let deployed = deployer.deploy_v2(provider.get_account_impl(), ());
                ExecutorClient::new(&env, &deployed).initialize(&owner, &provider_id);
                deployed
            }
        };

        let key = DataKey::UserAccount(owner.clone());
        env.storage().persistent().set(&key, &account);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        let count = Self::account_count(env.clone()).saturating_add(1);
        env.storage().instance().set(&DataKey::AccountCount, &count);
        AccountCreated {
            owner,
            account: account.clone(),
        }
        .publish(&env);

        account
    }
}

fn read_provider(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Provider)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

fn bump_ttl(env: &Env) {
    if env.storage().instance().has(&DataKey::Initialized) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use account::{Account, AccountClient};
    use addresses_provider::{AddressesProvider, AddressesProviderClient};
    use leverage_common::ProxyKind;
    use soroban_sdk::testutils::{Address as _, BytesN as _};
    use soroban_sdk::BytesN;

    #[contract]
    struct MockRouter;

    #[contracttype]
    enum MockKey {
        Provider,
    }

    #[contractimpl]
    impl MockRouter {
        pub fn initialize(env: Env, provider: Address) {
            env.storage().instance().set(&MockKey::Provider, &provider);
        }

        pub fn provider(env: Env) -> Address {
            env.storage().instance().get(&MockKey::Provider).unwrap()
        }

        pub fn upgrade(_env: Env, _wasm_hash: BytesN<32>) {}
    }

    fn err(e: Error) -> soroban_sdk::Error {
        e.into()
    }

    fn setup() -> (Env, Address, AccountFactoryClient<'static>) {
        let env = Env::default();
        env.mock_all_auths();
        let admin = Address::generate(&env);

        let provider_id = env.register(AddressesProvider, ());
        let provider = AddressesProviderClient::new(&env, &provider_id);
        provider.initialize(&admin);

        let router_at = provider.predict_proxy(&ProxyKind::Router);
        env.register_at(&router_at, MockRouter, ());
        MockRouterClient::new(&env, &router_at).initialize(&provider_id);
        provider.set_router_impl(&admin, &BytesN::random(&env));

        let factory_id = env.register(AccountFactory, ());
        let factory = AccountFactoryClient::new(&env, &factory_id);
        factory.initialize(&provider_id);
        (env, provider_id, factory)
    }

    fn place_account(env: &Env, factory: &AccountFactoryClient, owner: &Address, provider: &Address) -> Address {
        let at = factory.predict_account(owner);
        env.register_at(&at, Account, ());
        AccountClient::new(env, &at).initialize(owner, provider);
        at
    }

    #[test]
    fn test_predicted_addresses_are_per_owner() {
        let (env, _, factory) = setup();
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        assert_eq!(factory.predict_account(&alice), factory.predict_account(&alice));
        assert_ne!(factory.predict_account(&alice), factory.predict_account(&bob));
        assert_eq!(factory.get_account(&alice), None);
    }

    #[test]
    fn test_create_adopts_account_at_predicted_address() {
        let (env, provider, factory) = setup();
        let owner = Address::generate(&env);
        let placed = place_account(&env, &factory, &owner, &provider);

        let account = factory.create_account(&owner);
        assert_eq!(account, placed);
        assert_eq!(factory.get_account(&owner), Some(placed));
        assert_eq!(factory.account_count(), 1);
    }

    #[test]
    fn test_create_is_idempotent() {
        let (env, provider, factory) = setup();
        let owner = Address::generate(&env);
        place_account(&env, &factory, &owner, &provider);

        let first = factory.create_account(&owner);
        let second = factory.create_account(&owner);
        assert_eq!(first, second);
        assert_eq!(factory.account_count(), 1);
    }

    #[test]
    fn test_foreign_account_at_predicted_address_is_rejected() {
        let (env, provider, factory) = setup();
        let owner = Address::generate(&env);
        let at = factory.predict_account(&owner);
        env.register_at(&at, Account, ());
        AccountClient::new(&env, &at).initialize(&Address::generate(&env), &provider);

        let res = factory.try_create_account(&owner);
        assert_eq!(res.err(), Some(Ok(err(Error::AccountMismatch))));
    }

    #[test]
    fn test_create_requires_router() {
        let (env, provider, factory) = setup();
        let owner = Address::generate(&env);
        place_account(&env, &factory, &owner, &provider);
        env.set_auths(&[]);
        assert!(factory.try_create_account(&owner).is_err());
    }

    #[test]
    fn test_initialize_once() {
        let (env, _, factory) = setup();
        let res = factory.try_initialize(&Address::generate(&env));
        assert_eq!(res.err(), Some(Ok(err(Error::AlreadyInitialized))));
    }
}
