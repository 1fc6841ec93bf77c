use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::types::ProxyKind;

/// Ledger key of the `index`-th position of `owner`.
pub fn position_key(env: &Env, owner: &Address, index: u64) -> BytesN<32> {
    let mut payload = owner.clone().to_xdr(env);
    payload.extend_from_array(&index.to_be_bytes());
    env.crypto().sha256(&payload).to_bytes()
}

/// Deployment salt of the per-user account.
pub fn owner_salt(env: &Env, owner: &Address) -> BytesN<32> {
    env.crypto().sha256(&owner.clone().to_xdr(env)).to_bytes()
}

/// Deployment salt of a proxied component.
pub fn proxy_salt(env: &Env, kind: ProxyKind) -> BytesN<32> {
    let tag: &[u8] = match kind {
        ProxyKind::Router => b"ROUTER",
        ProxyKind::Configurator => b"CONFIGURATOR",
    };
    env.crypto().sha256(&Bytes::from_slice(env, tag)).to_bytes()
}

pub fn ticket_id(env: &Env, key: &BytesN<32>, nonce: u64) -> BytesN<32> {
    let mut payload = Bytes::from_array(env, &key.to_array());
    payload.extend_from_array(&nonce.to_be_bytes());
    env.crypto().sha256(&payload).to_bytes()
}

pub fn is_zero_hash(hash: &BytesN<32>) -> bool {
    hash.to_array() == [0u8; 32]
}

/// Payload carried through the lender back to the receiving account.
pub fn ticket_data(env: &Env, id: &BytesN<32>) -> Bytes {
    Bytes::from_array(env, &id.to_array())
}
