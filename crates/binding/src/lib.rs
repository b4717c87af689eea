//! Contract bindings for the token being transferred.
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod token;
