use leverage_common::constants::{CHAINED_AMOUNT, MAX_AMOUNT};
use leverage_common::interfaces::{ConnectorClient, ProviderClient, RegistryClient};
use leverage_common::math::{balance_of, to_i128};
use leverage_common::{ConnectorCall, Error, ExecutionOutcome, FlashTicket, Step};
use soroban_sdk::{panic_with_error, token, vec, Address, Env, Vec};

use crate::storage;

/// Amounts realized while running a list of steps. `last` is the output of
/// the most recent step and feeds the next chained amount.
#[derive(Default)]
pub struct Totals {
    pub deposited: u128,
    pub borrowed: u128,
    pub repaid: u128,
    pub withdrawn: u128,
    pub last: u128,
}

pub fn run_steps(env: &Env, steps: &Vec<Step>, start: u128) -> Totals {
    let mut totals = Totals {
        last: start,
        ..Totals::default()
    };
    if steps.is_empty() {
        return totals;
    }
    let registry = ProviderClient::new(env, &storage::provider(env)).get_connectors();
    let registry = RegistryClient::new(env, &registry);

    for step in steps.iter() {
        let connector = registry.resolve(&step.connector);
        let out = run_step(env, &connector, &step.call, totals.last);
        match step.call {
            ConnectorCall::Deposit(..) => totals.deposited += out,
            ConnectorCall::Borrow(..) => totals.borrowed += out,
            ConnectorCall::Payback(..) => totals.repaid += out,
            ConnectorCall::Withdraw(..) => totals.withdrawn += out,
            ConnectorCall::Swap(..) => {}
        }
        totals.last = out;
    }
    totals
}

fn run_step(env: &Env, connector: &Address, call: &ConnectorCall, running: u128) -> u128 {
    let this = env.current_contract_address();
    let client = ConnectorClient::new(env, connector);
    match call {
        ConnectorCall::Deposit(asset, amount) => {
            let amount = spendable(env, asset, chained(*amount, running));
            approve(env, asset, connector, amount);
            client.deposit(&this, asset, &amount)
        }
        ConnectorCall::Borrow(asset, amount, rate_mode) => {
            let amount = chained(*amount, running);
            if amount == MAX_AMOUNT {
                panic_with_error!(env, Error::InvalidInput);
            }
            client.borrow(&this, asset, &amount, rate_mode)
        }
        ConnectorCall::Payback(asset, amount, rate_mode) => {
            // MAX is forwarded so the market settles the live debt.
            let amount = chained(*amount, running);
            let allowance = spendable(env, asset, amount);
            approve(env, asset, connector, allowance);
            client.payback(&this, asset, &amount, rate_mode)
        }
        ConnectorCall::Withdraw(asset, amount) => {
            client.withdraw(&this, asset, &chained(*amount, running))
        }
        ConnectorCall::Swap(from_asset, to_asset, amount, route) => {
            let amount = spendable(env, from_asset, chained(*amount, running));
            approve(env, from_asset, connector, amount);
            client.swap(&this, from_asset, to_asset, &amount, route)
        }
    }
}

fn chained(amount: u128, running: u128) -> u128 {
    if amount == CHAINED_AMOUNT {
        running
    } else {
        amount
    }
}

/// Resolves the "everything" sentinel against the current balance.
fn spendable(env: &Env, asset: &Address, amount: u128) -> u128 {
    if amount == MAX_AMOUNT {
        balance_of(env, asset, &env.current_contract_address())
    } else {
        amount
    }
}

// Allowances live for the current ledger only.
fn approve(env: &Env, asset: &Address, spender: &Address, amount: u128) {
    token::Client::new(env, asset).approve(
        &env.current_contract_address(),
        spender,
        &to_i128(env, amount),
        &env.ledger().sequence(),
    );
}

pub fn open(env: &Env, ticket: &FlashTicket) -> ExecutionOutcome {
    if ticket.protocol_fee > 0 {
        let treasury = ticket
            .treasury
            .clone()
            .unwrap_or_else(|| panic_with_error!(env, Error::NotSet));
        token::Client::new(env, &ticket.debt_asset).transfer(
            &env.current_contract_address(),
            &treasury,
            &to_i128(env, ticket.protocol_fee),
        );
    }
    let start = ticket.notional.saturating_sub(ticket.protocol_fee);
    let totals = run_steps(env, &ticket.steps, start);
    ExecutionOutcome {
        collateral: totals.deposited,
        borrow: totals.borrowed,
        residual: 0,
    }
}

/// Runs the unwind steps. The lender must be repaid before the residual is
/// converted and released, see [`finish_close`].
pub fn close(env: &Env, ticket: &FlashTicket) -> Totals {
    let start = ticket.amounts.get(0).unwrap_or(0);
    run_steps(env, &ticket.steps, start)
}

pub fn finish_close(env: &Env, ticket: &FlashTicket, totals: &Totals) -> ExecutionOutcome {
    let this = env.current_contract_address();
    let mut settlement = ticket.debt_asset.clone();
    if let Some(extra) = &ticket.extra {
        if let ConnectorCall::Swap(_, to_asset, _, _) = &extra.call {
            settlement = to_asset.clone();
        }
        let residual = balance_of(env, &ticket.debt_asset, &this);
        run_steps(env, &vec![env, extra.clone()], residual);
    }

    let residual = release(env, &settlement, &ticket.owner);
    if ticket.debt_asset != settlement {
        release(env, &ticket.debt_asset, &ticket.owner);
    }
    if ticket.collateral_asset != settlement && ticket.collateral_asset != ticket.debt_asset {
        release(env, &ticket.collateral_asset, &ticket.owner);
    }

    ExecutionOutcome {
        collateral: totals.withdrawn,
        borrow: totals.repaid,
        residual,
    }
}

fn release(env: &Env, asset: &Address, owner: &Address) -> u128 {
    let this = env.current_contract_address();
    let amount = balance_of(env, asset, &this);
    if amount > 0 {
        token::Client::new(env, asset).transfer(&this, owner, &to_i128(env, amount));
    }
    amount
}

/// Returns principal plus fee for every borrowed asset.
pub fn repay(env: &Env, lender: &Address, tokens: &Vec<Address>, amounts: &Vec<u128>, fees: &Vec<u128>) {
    if fees.len() != tokens.len() {
        panic_with_error!(env, Error::CallbackMismatch);
    }
    let this = env.current_contract_address();
    for i in 0..tokens.len() {
        let asset = tokens.get_unchecked(i);
        let owed = amounts
            .get_unchecked(i)
            .checked_add(fees.get_unchecked(i))
            .unwrap_or_else(|| panic_with_error!(env, Error::InsufficientRepayment));
        if balance_of(env, &asset, &this) < owed {
            panic_with_error!(env, Error::InsufficientRepayment);
        }
        token::Client::new(env, &asset).transfer(&this, lender, &to_i128(env, owed));
    }
}
