#![no_std]

mod contract;
mod events;
mod helpers;
mod storage;

pub use contract::*;
pub use events::*;
