#![no_std]
use leverage_common::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use leverage_common::interfaces::ProviderClient;
use leverage_common::Error;
use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, panic_with_error, Address, Env,
};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    RouterAdmin,
    ConnectorAdmin,
}

#[contracttype]
pub enum DataKey {
    Provider,
    Initialized,
    Member(Role, Address),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleGranted {
    pub role: Role,
    #[topic]
    pub account: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleRevoked {
    pub role: Role,
    #[topic]
    pub account: Address,
}

#[contract]
pub struct AclManager;

#[contractimpl]
impl AclManager {
    pub fn initialize(env: Env, provider: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Provider, &provider);
        env.storage().instance().set(&DataKey::Initialized, &true);
        bump_ttl(&env);
    }

    pub fn add_router_admin(env: Env, caller: Address, admin: Address) {
        grant(&env, &caller, Role::RouterAdmin, admin);
    }

    pub fn remove_router_admin(env: Env, caller: Address, admin: Address) {
        revoke(&env, &caller, Role::RouterAdmin, admin);
    }

    pub fn add_connector_admin(env: Env, caller: Address, admin: Address) {
        grant(&env, &caller, Role::ConnectorAdmin, admin);
    }

    pub fn remove_connector_admin(env: Env, caller: Address, admin: Address) {
        revoke(&env, &caller, Role::ConnectorAdmin, admin);
    }

    pub fn is_router_admin(env: Env, admin: Address) -> bool {
        has_role(&env, Role::RouterAdmin, admin)
    }

    pub fn is_connector_admin(env: Env, admin: Address) -> bool {
        has_role(&env, Role::ConnectorAdmin, admin)
    }
}

fn bump_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Role sets are mutated only by the ACL admin pinned in the provider.
fn require_acl_admin(env: &Env, caller: &Address) {
    bump_ttl(env);
    let provider: Address = env
        .storage()
        .instance()
        .get(&DataKey::Provider)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
    let acl_admin = ProviderClient::new(env, &provider).get_acl_admin();
    if acl_admin != *caller {
        panic_with_error!(env, Error::Unauthorized);
    }
    caller.require_auth();
}

fn grant(env: &Env, caller: &Address, role: Role, account: Address) {
    require_acl_admin(env, caller);
    let key = DataKey::Member(role, account.clone());
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    RoleGranted { role, account }.publish(env);
}

fn revoke(env: &Env, caller: &Address, role: Role, account: Address) {
    require_acl_admin(env, caller);
    let key = DataKey::Member(role, account.clone());
    if env.storage().persistent().has(&key) {
        env.storage().persistent().remove(&key);
        RoleRevoked { role, account }.publish(env);
    }
}

fn has_role(env: &Env, role: Role, account: Address) -> bool {
    let key = DataKey::Member(role, account);
    let persistent = env.storage().persistent();
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
        true
    } else {
        false
    }
}
