//! Argument marshaling between the GAP interpreter and the Singular kernel.
//!
//! Interpreter values are modeled in [`gap`], kernel values in [`singular`].
//! [`bridge`] converts numbers across the two, resolves proxy paths into
//! kernel containers and binds call arguments with explicit ownership.

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
#[cfg(test)]
extern crate rand;

pub mod bridge;
pub mod config;
pub mod error;
pub mod gap;
pub mod logging;
pub mod singular;
