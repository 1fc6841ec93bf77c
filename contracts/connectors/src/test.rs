use super::*;
use addresses_provider::{AddressesProvider, AddressesProviderClient};
use leverage_common::{AddressKey, ProxyKind};
use soroban_sdk::testutils::{Address as _, BytesN as _};
use soroban_sdk::{symbol_short, vec, BytesN};

#[contract]
struct MockConfigurator;

#[contracttype]
enum MockKey {
    Provider,
}

#[contractimpl]
impl MockConfigurator {
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

fn setup() -> (Env, ConnectorsClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);

    let provider_id = env.register(AddressesProvider, ());
    let provider = AddressesProviderClient::new(&env, &provider_id);
    provider.initialize(&owner);

    let configurator_at = provider.predict_proxy(&ProxyKind::Configurator);
    env.register_at(&configurator_at, MockConfigurator, ());
    MockConfiguratorClient::new(&env, &configurator_at).initialize(&provider_id);
    provider.set_configurator_impl(&owner, &BytesN::random(&env));

    let connectors_id = env.register(Connectors, ());
    let connectors = ConnectorsClient::new(&env, &connectors_id);
    connectors.initialize(&provider_id);
    provider.set_address(&owner, &AddressKey::Connectors, &connectors_id);
    (env, connectors)
}

#[test]
fn test_registered_names_resolve_to_their_addresses() {
    let (env, connectors) = setup();
    let aave = Address::generate(&env);
    let swap = Address::generate(&env);
    let names = vec![&env, symbol_short!("AaveV3"), symbol_short!("OneInch")];

    connectors.add_connectors(&names, &vec![&env, aave.clone(), swap.clone()]);

    assert_eq!(connectors.resolve(&symbol_short!("AaveV3")), aave);
    assert_eq!(connectors.resolve(&symbol_short!("OneInch")), swap);
    assert_eq!(
        connectors.is_connectors(&names),
        (true, vec![&env, aave, swap])
    );
    assert_eq!(connectors.connector_names(), names);
}

#[test]
fn test_later_registration_overwrites() {
    let (env, connectors) = setup();
    let first = Address::generate(&env);
    let second = Address::generate(&env);
    let name = symbol_short!("AaveV2");

    connectors.add_connectors(&vec![&env, name.clone()], &vec![&env, first]);
    connectors.add_connectors(&vec![&env, name.clone()], &vec![&env, second.clone()]);

    assert_eq!(connectors.resolve(&name), second);
    assert_eq!(connectors.connector_names().len(), 1);
}

#[test]
fn test_unknown_or_disabled_names_do_not_resolve() {
    let (env, connectors) = setup();
    let target = Address::generate(&env);
    let name = symbol_short!("CompV3");

    assert_eq!(
        connectors.try_resolve(&name).err(),
        Some(Ok(err(Error::UnknownConnector)))
    );

    connectors.add_connectors(&vec![&env, name.clone()], &vec![&env, target.clone()]);
    connectors.toggle_connectors(&vec![&env, name.clone()], &false);
    assert_eq!(
        connectors.try_resolve(&name).err(),
        Some(Ok(err(Error::UnknownConnector)))
    );
    let (ok, _) = connectors.is_connectors(&vec![&env, name.clone()]);
    assert!(!ok);

    connectors.toggle_connectors(&vec![&env, name.clone()], &true);
    assert_eq!(connectors.resolve(&name), target);
}

#[test]
fn test_update_requires_existing_name() {
    let (env, connectors) = setup();
    let target = Address::generate(&env);
    let res = connectors.try_update_connectors(
        &vec![&env, symbol_short!("Missing")],
        &vec![&env, target.clone()],
    );
    assert_eq!(res.err(), Some(Ok(err(Error::UnknownConnector))));

    let name = symbol_short!("Uni");
    connectors.add_connectors(&vec![&env, name.clone()], &vec![&env, Address::generate(&env)]);
    connectors.update_connectors(&vec![&env, name.clone()], &vec![&env, target.clone()]);
    assert_eq!(connectors.resolve(&name), target);
}

#[test]
fn test_mismatched_batches_rejected() {
    let (env, connectors) = setup();
    let res = connectors.try_add_connectors(
        &vec![&env, symbol_short!("A"), symbol_short!("B")],
        &vec![&env, Address::generate(&env)],
    );
    assert_eq!(res.err(), Some(Ok(err(Error::LengthMismatch))));
    assert_eq!(connectors.connector_names().len(), 0);
}

#[test]
fn test_writes_require_configurator() {
    let (env, connectors) = setup();
    env.set_auths(&[]);
    let res = connectors.try_add_connectors(
        &vec![&env, symbol_short!("A")],
        &vec![&env, Address::generate(&env)],
    );
    assert!(res.is_err());
}
