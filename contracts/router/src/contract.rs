use leverage_common::constants::{MAX_AMOUNT, MAX_FEE_BPS};
use leverage_common::interfaces::{AggregatorClient, ExecutorClient};
use leverage_common::keys::{position_key, ticket_id};
use leverage_common::math::{bps_fee, notional, to_i128};
use leverage_common::{AddressKey, Error, FlashTicket, Operation, Position, Step};
use soroban_sdk::{
    contract, contractimpl, panic_with_error, token, Address, BytesN, Env, Vec,
};

use crate::events::{FeeUpdated, PositionClosed, PositionOpened};
use crate::helpers::*;
use crate::storage::*;

/// Position ledger and orchestration entrypoint. Lives behind a stable
/// address bound by the addresses provider.
#[contract]
pub struct Router;

#[contractimpl]
impl Router {
    pub fn initialize(env: Env, provider: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Provider, &provider);
        env.storage().instance().set(&DataKey::Initialized, &true);
        bump_core_ttl(&env);
    }

    pub fn provider(env: Env) -> Address {
        bump_core_ttl(&env);
        read_provider(&env)
    }

    pub fn upgrade(env: Env, wasm_hash: BytesN<32>) {
        bump_core_ttl(&env);
        read_provider(&env).require_auth();
        env.deployer().update_current_contract_wasm(wasm_hash);
    }

    /// Protocol fee in basis points of the notional. Configurator only.
    pub fn set_fee(env: Env, fee_bps: u32) {
        bump_core_ttl(&env);
        provider_client(&env).get_configurator().require_auth();
        if fee_bps > MAX_FEE_BPS {
            panic_with_error!(&env, Error::InvalidFee);
        }
        let old_fee_bps = read_fee(&env);
        write_fee(&env, fee_bps);
        FeeUpdated {
            old_fee_bps,
            new_fee_bps: fee_bps,
        }
        .publish(&env);
    }

    pub fn fee(env: Env) -> u32 {
        bump_core_ttl(&env);
        read_fee(&env)
    }

    pub fn get_key(env: Env, owner: Address, index: u64) -> BytesN<32> {
        position_key(&env, &owner, index)
    }

    pub fn positions_index(env: Env, owner: Address) -> u64 {
        read_index(&env, &owner)
    }

    pub fn positions(env: Env, key: BytesN<32>) -> Option<Position> {
        read_position(&env, &key)
    }

    pub fn get_account(env: Env, owner: Address) -> Option<Address> {
        let provider = provider_client(&env);
        factory_client(&env, &provider).get_account(&owner)
    }

    /// Key of the open position of `owner` that holds `asset`, if any.
    pub fn asset_lock(env: Env, owner: Address, asset: Address) -> Option<BytesN<32>> {
        read_asset_lock(&env, &owner, &asset)
    }

    pub fn in_flight(env: Env) -> Option<BytesN<32>> {
        read_in_flight(&env)
    }

    /// Opens a leveraged position for `position.owner` and returns its key.
    ///
    /// The owner's `amount_in` of the debt asset (or the input of
    /// `extra_swap`, converted first) moves into the owner's account. The
    /// flash basket funds the rest of the notional, `steps` turn it into
    /// collateral and debt, and the account repays the lender before control
    /// returns here.
    pub fn open_position(
        env: Env,
        position: Position,
        is_short: bool,
        flash_tokens: Vec<Address>,
        flash_amounts: Vec<u128>,
        route: u32,
        steps: Vec<Step>,
        extra_swap: Option<Step>,
    ) -> BytesN<32> {
        bump_core_ttl(&env);
        let owner = position.owner.clone();
        owner.require_auth();
        if position.leverage == 0 {
            panic_with_error!(&env, Error::InvalidInput);
        }
        validate_basket(&env, &flash_tokens, &flash_amounts);
        validate_steps(&env, &steps);
        // One open position per owner and asset: an unwind clears the
        // account's whole market balance.
        if read_asset_lock(&env, &owner, &position.debt_asset).is_some()
            || read_asset_lock(&env, &owner, &position.collateral_asset).is_some()
        {
            panic_with_error!(&env, Error::AssetInUse);
        }

        let provider = provider_client(&env);
        let account = factory_client(&env, &provider).create_account(&owner);

        let amount_in = match &extra_swap {
            Some(step) => {
                let (from_asset, to_asset, amount) = swap_leg(&env, step);
                if to_asset != position.debt_asset || amount == 0 || amount == MAX_AMOUNT {
                    panic_with_error!(&env, Error::InvalidInput);
                }
                token::Client::new(&env, &from_asset).transfer(
                    &owner,
                    &account,
                    &to_i128(&env, amount),
                );
                ExecutorClient::new(&env, &account).swap_in(step)
            }
            None => {
                if position.amount_in == 0 {
                    panic_with_error!(&env, Error::InvalidInput);
                }
                token::Client::new(&env, &position.debt_asset).transfer(
                    &owner,
                    &account,
                    &to_i128(&env, position.amount_in),
                );
                position.amount_in
            }
        };

        let index = next_index(&env, &owner);
        let key = position_key(&env, &owner, index);
        let mut stored = Position {
            amount_in,
            collateral_amount: 0,
            borrow_amount: 0,
            is_short,
            ..position
        };
        write_position(&env, &key, &stored);

        let notional = notional(amount_in, stored.leverage)
            .unwrap_or_else(|| panic_with_error!(&env, Error::InvalidInput));
        let protocol_fee = bps_fee(notional, read_fee(&env))
            .unwrap_or_else(|| panic_with_error!(&env, Error::InvalidInput));
        let treasury = if protocol_fee > 0 {
            Some(provider.get_treasury())
        } else {
            provider.get_address(&AddressKey::Treasury)
        };

        let ticket = issue_ticket(
            &env,
            Operation::Open,
            &key,
            &stored,
            route,
            flash_tokens,
            flash_amounts,
            steps,
            None,
        );
        let ticket = FlashTicket {
            notional,
            protocol_fee,
            treasury,
            ..ticket
        };
        let outcome = run_ticket(&env, &account, &ticket);
        if outcome.collateral == 0 {
            panic_with_error!(&env, Error::InvalidInput);
        }

        stored.collateral_amount = outcome.collateral;
        stored.borrow_amount = outcome.borrow;
        write_position(&env, &key, &stored);
        lock_assets(&env, &key, &stored);

        PositionOpened {
            owner,
            key: key.clone(),
            index,
            amount_in,
            leverage: stored.leverage,
            collateral_amount: stored.collateral_amount,
            borrow_amount: stored.borrow_amount,
            protocol_fee,
            is_short,
        }
        .publish(&env);
        key
    }

    /// Unwinds the position under `key` and sends whatever is left to the owner.
    pub fn close_position(
        env: Env,
        key: BytesN<32>,
        flash_tokens: Vec<Address>,
        flash_amounts: Vec<u128>,
        route: u32,
        steps: Vec<Step>,
        extra: Option<Step>,
    ) {
        bump_core_ttl(&env);
        let mut position = read_position(&env, &key)
            .unwrap_or_else(|| panic_with_error!(&env, Error::PositionNotFound));
        position.owner.require_auth();
        if !position.is_open() {
            panic_with_error!(&env, Error::PositionNotOpen);
        }
        validate_basket(&env, &flash_tokens, &flash_amounts);
        validate_steps(&env, &steps);
        if let Some(step) = &extra {
            swap_leg(&env, step);
        }

        let provider = provider_client(&env);
        let account = factory_client(&env, &provider)
            .get_account(&position.owner)
            .unwrap_or_else(|| panic_with_error!(&env, Error::AccountMismatch));

        let ticket = issue_ticket(
            &env,
            Operation::Close,
            &key,
            &position,
            route,
            flash_tokens,
            flash_amounts,
            steps,
            extra,
        );
        let outcome = run_ticket(&env, &account, &ticket);
        if outcome.borrow < position.borrow_amount || outcome.collateral < position.collateral_amount {
            panic_with_error!(&env, Error::PositionNotUnwound);
        }

        let collateral_amount = position.collateral_amount;
        let borrow_amount = position.borrow_amount;
        position.collateral_amount = 0;
        position.borrow_amount = 0;
        write_position(&env, &key, &position);
        unlock_assets(&env, &position);

        PositionClosed {
            owner: position.owner,
            key,
            collateral_amount,
            borrow_amount,
            residual: outcome.residual,
        }
        .publish(&env);
    }
}

#[allow(clippy::too_many_arguments)]
fn issue_ticket(
    env: &Env,
    operation: Operation,
    key: &BytesN<32>,
    position: &Position,
    route: u32,
    tokens: Vec<Address>,
    amounts: Vec<u128>,
    steps: Vec<Step>,
    extra: Option<Step>,
) -> FlashTicket {
    let provider = provider_client(env);
    let aggregator = provider.get_flashloan_aggregator();
    let lender = AggregatorClient::new(env, &aggregator).get_route(&route).lender;
    FlashTicket {
        id: ticket_id(env, key, next_nonce(env)),
        operation,
        key: key.clone(),
        owner: position.owner.clone(),
        debt_asset: position.debt_asset.clone(),
        collateral_asset: position.collateral_asset.clone(),
        route,
        lender,
        initiator: aggregator,
        tokens,
        amounts,
        notional: 0,
        protocol_fee: 0,
        treasury: None,
        steps,
        extra,
    }
}
