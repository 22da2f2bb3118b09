//! Type definitions module.
//!
//! Contains shared types used across the crate.

pub mod call;
pub mod chain;

pub use call::*;
pub use chain::*;
