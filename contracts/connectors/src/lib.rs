#![no_std]
//! Name-keyed registry of connectors. Registrations are written through the
//! configurator proxy; resolution is open to everyone.

use leverage_common::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::ProviderClient;
use leverage_common::{ConnectorRegistration, Error};
use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, panic_with_error, Address, Env, Symbol,
    Vec,
};

#[contracttype]
pub enum DataKey {
    Provider,
    Initialized,
    Names,
    Connector(Symbol),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectorAdded {
    #[topic]
    pub name: Symbol,
    pub connector: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectorUpdated {
    #[topic]
    pub name: Symbol,
    pub previous: Address,
    pub connector: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectorToggled {
    #[topic]
    pub name: Symbol,
    pub enabled: bool,
}

#[contract]
pub struct Connectors;

#[contractimpl]
impl Connectors {
    pub fn initialize(env: Env, provider: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Provider, &provider);
        env.storage().instance().set(&DataKey::Names, &Vec::<Symbol>::new(&env));
        env.storage().instance().set(&DataKey::Initialized, &true);
        bump_ttl(&env);
    }

    /// Bulk upsert; every listed name ends up enabled.
    pub fn add_connectors(env: Env, names: Vec<Symbol>, addresses: Vec<Address>) {
        require_configurator(&env);
        check_lengths(&env, names.len(), addresses.len());
        let mut known = read_names(&env);
        for (name, connector) in names.iter().zip(addresses.iter()) {
            if read_connector(&env, &name).is_none() {
                known.push_back(name.clone());
            }
            write_connector(
                &env,
                &name,
                &ConnectorRegistration {
                    address: connector.clone(),
                    enabled: true,
                },
            );
            ConnectorAdded { name, connector }.publish(&env);
        }
        env.storage().instance().set(&DataKey::Names, &known);
    }

    /// Repoints existing names; unknown names abort the whole batch.
    pub fn update_connectors(env: Env, names: Vec<Symbol>, addresses: Vec<Address>) {
        require_configurator(&env);
        check_lengths(&env, names.len(), addresses.len());
        for (name, connector) in names.iter().zip(addresses.iter()) {
            let mut registration = read_connector(&env, &name)
                .unwrap_or_else(|| panic_with_error!(&env, Error::UnknownConnector));
            let previous = registration.address.clone();
            registration.address = connector.clone();
            write_connector(&env, &name, &registration);
            ConnectorUpdated {
                name,
                previous,
                connector,
            }
            .publish(&env);
        }
    }

    pub fn toggle_connectors(env: Env, names: Vec<Symbol>, enabled: bool) {
        require_configurator(&env);
        if names.is_empty() {
            panic_with_error!(&env, Error::LengthMismatch);
        }
        for name in names.iter() {
            let mut registration = read_connector(&env, &name)
                .unwrap_or_else(|| panic_with_error!(&env, Error::UnknownConnector));
            registration.enabled = enabled;
            write_connector(&env, &name, &registration);
            ConnectorToggled { name, enabled }.publish(&env);
        }
    }

    /// Target of `name`; unknown and disabled names fail alike.
    pub fn resolve(env: Env, name: Symbol) -> Address {
        match read_connector(&env, &name) {
            Some(registration) if registration.enabled => registration.address,
            _ => panic_with_error!(&env, Error::UnknownConnector),
        }
    }

    pub fn is_connectors(env: Env, names: Vec<Symbol>) -> (bool, Vec<Address>) {
        let mut all_enabled = true;
        let mut resolved = Vec::new(&env);
        for name in names.iter() {
            match read_connector(&env, &name) {
                Some(registration) if registration.enabled => {
                    resolved.push_back(registration.address)
                }
                _ => {
                    all_enabled = false;
                    break;
                }
            }
        }
        (all_enabled, resolved)
    }

    pub fn get_connector(env: Env, name: Symbol) -> Option<ConnectorRegistration> {
        read_connector(&env, &name)
    }

    pub fn connector_names(env: Env) -> Vec<Symbol> {
        read_names(&env)
    }
}

fn bump_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn require_configurator(env: &Env) {
    bump_ttl(env);
    let provider: Address = env
        .storage()
        .instance()
        .get(&DataKey::Provider)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
    ProviderClient::new(env, &provider)
        .get_configurator()
        .require_auth();
}

fn check_lengths(env: &Env, names: u32, addresses: u32) {
    if names == 0 || names != addresses {
        panic_with_error!(env, Error::LengthMismatch);
    }
}

fn read_names(env: &Env) -> Vec<Symbol> {
    env.storage()
        .instance()
        .get(&DataKey::Names)
        .unwrap_or(Vec::new(env))
}

fn read_connector(env: &Env, name: &Symbol) -> Option<ConnectorRegistration> {
    let key = DataKey::Connector(name.clone());
    let persistent = env.storage().persistent();
    let registration = persistent.get(&key);
    if registration.is_some() {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    registration
}

fn write_connector(env: &Env, name: &Symbol, registration: &ConnectorRegistration) {
    let key = DataKey::Connector(name.clone());
    env.storage().persistent().set(&key, registration);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

#[cfg(test)]
mod test;
