//! Functional core for finbook.
//!
//! Domain types, pure functions and the traits the I/O shell implements.
//! Nothing in this crate touches the network, the database or the clock
//! except through arguments.

pub mod api;
pub mod auth;
pub mod cache;
pub mod finance;
pub mod storage;
