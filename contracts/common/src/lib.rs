#![no_std]
//! Types, error codes, cross-contract interfaces and arithmetic shared by the
//! leverage router contracts.

pub mod constants;
pub mod errors;
pub mod interfaces;
pub mod keys;
pub mod math;
pub mod types;

pub use errors::Error;
pub use types::*;
