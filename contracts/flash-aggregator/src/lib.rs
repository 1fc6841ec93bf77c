#![no_std]
//! Flash liquidity broker. Routes are numbered lenders; a lower route id has
//! priority when quotes tie.

mod contract;
mod events;
mod storage;

pub use contract::*;

#[cfg(test)]
mod test;
