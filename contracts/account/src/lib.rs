#![no_std]

mod events;
mod executor;
mod storage;

use leverage_common::constants::MAX_AMOUNT;
use leverage_common::keys::ticket_data;
use leverage_common::math::{balance_of, to_i128};
use leverage_common::{ConnectorCall, Error, ExecutionOutcome, FlashTicket, Operation, Step};
use soroban_sdk::{contract, contractimpl, panic_with_error, token, vec, Address, Bytes, BytesN, Env, Vec};

use crate::events::{Swept, TicketArmed, TicketSettled};

/// Per-user execution context. Holds the user's market balances, receives
/// flash funding armed by the router and runs connector steps against it.
///
/// # Example (doctest, no_run)
/// ```no_run
/// use soroban_sdk::{Env, Address};
/// use soroban_sdk::testutils::Address as _;
/// use account::{Account, AccountClient};
///
/// let env = Env::default();
/// let owner = Address::generate(&env);
/// let provider = Address::generate(&env);
/// let id = env.register(Account, ());
/// AccountClient::new(&env, &id).initialize(&owner, &provider);
/// ```
#[contract]
pub struct Account;

#[contractimpl]
impl Account {
    pub fn initialize(env: Env, owner: Address, provider: Address) {
        if storage::is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        storage::write_config(&env, &owner, &provider);
    }

    pub fn owner(env: Env) -> Address {
        storage::bump_core_ttl(&env);
        storage::owner(&env)
    }

    pub fn provider(env: Env) -> Address {
        storage::bump_core_ttl(&env);
        storage::provider(&env)
    }

    /// Stores the single ticket a lender callback may consume.
    pub fn arm(env: Env, ticket: FlashTicket) {
        storage::bump_core_ttl(&env);
        storage::require_router(&env);
        if ticket.owner != storage::owner(&env) {
            panic_with_error!(&env, Error::AccountMismatch);
        }
        if storage::read_pending(&env).is_some() {
            panic_with_error!(&env, Error::OperationInFlight);
        }
        storage::write_pending(&env, &ticket);
        TicketArmed {
            key: ticket.key.clone(),
            id: ticket.id.clone(),
            lender: ticket.lender.clone(),
        }
        .publish(&env);
    }

    /// Converts deposited owner funds before an open. Returns the output.
    pub fn swap_in(env: Env, step: Step) -> u128 {
        storage::bump_core_ttl(&env);
        storage::require_router(&env);
        match &step.call {
            ConnectorCall::Swap(_, _, amount, _) if *amount > 0 => {}
            _ => panic_with_error!(&env, Error::InvalidInput),
        }
        executor::run_steps(&env, &vec![&env, step], 0).last
    }

    /// Basket lender callback.
    pub fn on_funds_received(
        env: Env,
        lender: Address,
        tokens: Vec<Address>,
        amounts: Vec<u128>,
        fees: Vec<u128>,
        initiator: Address,
        data: Bytes,
    ) -> bool {
        lender.require_auth();
        let ticket = pending(&env);
        if initiator != ticket.initiator {
            panic_with_error!(&env, Error::CallbackMismatch);
        }
        verify(&env, &ticket, &lender, &tokens, &amounts, &data);
        settle(&env, &ticket, &fees);
        true
    }

    /// Single-asset vault callback.
    pub fn on_flash_loan(env: Env, vault: Address, amount: u128, fee: u128, data: Bytes) {
        vault.require_auth();
        let ticket = pending(&env);
        if ticket.tokens.len() != 1 {
            panic_with_error!(&env, Error::CallbackMismatch);
        }
        verify(&env, &ticket, &vault, &ticket.tokens, &vec![&env, amount], &data);
        settle(&env, &ticket, &vec![&env, fee]);
    }

    pub fn take_outcome(env: Env, id: BytesN<32>) -> ExecutionOutcome {
        storage::bump_core_ttl(&env);
        storage::require_router(&env);
        storage::take_outcome(&env, &id)
            .unwrap_or_else(|| panic_with_error!(&env, Error::CallbackNotReceived))
    }

    /// Sends idle balance to the owner. `u128::MAX` sweeps everything.
    pub fn sweep(env: Env, token: Address, amount: u128) {
        storage::bump_core_ttl(&env);
        let owner = storage::owner(&env);
        owner.require_auth();
        if storage::read_pending(&env).is_some() {
            panic_with_error!(&env, Error::OperationInFlight);
        }
        let this = env.current_contract_address();
        let amount = if amount == MAX_AMOUNT {
            balance_of(&env, &token, &this)
        } else {
            amount
        };
        token::Client::new(&env, &token).transfer(&this, &owner, &to_i128(&env, amount));
        Swept { token, amount }.publish(&env);
    }
}

fn pending(env: &Env) -> FlashTicket {
    storage::read_pending(env).unwrap_or_else(|| panic_with_error!(env, Error::CallbackNotReceived))
}

fn verify(
    env: &Env,
    ticket: &FlashTicket,
    lender: &Address,
    tokens: &Vec<Address>,
    amounts: &Vec<u128>,
    data: &Bytes,
) {
    if *lender != ticket.lender
        || *tokens != ticket.tokens
        || *amounts != ticket.amounts
        || *data != ticket_data(env, &ticket.id)
    {
        panic_with_error!(env, Error::CallbackMismatch);
    }
}

fn settle(env: &Env, ticket: &FlashTicket, fees: &Vec<u128>) {
    let outcome = match ticket.operation {
        Operation::Open => {
            let outcome = executor::open(env, ticket);
            executor::repay(env, &ticket.lender, &ticket.tokens, &ticket.amounts, fees);
            outcome
        }
        Operation::Close => {
            let totals = executor::close(env, ticket);
            executor::repay(env, &ticket.lender, &ticket.tokens, &ticket.amounts, fees);
            executor::finish_close(env, ticket, &totals)
        }
    };
    storage::clear_pending(env);
    storage::write_outcome(env, &ticket.id, &outcome);
    TicketSettled {
        key: ticket.key.clone(),
        operation: ticket.operation,
        collateral: outcome.collateral,
        borrow: outcome.borrow,
        residual: outcome.residual,
    }
    .publish(env);
}
