//! # quipu-core
//!
//! Core types, traits, configuration, and error handling for the Quipu
//! expense ledger.

pub mod config;
pub mod domain;
pub mod error;
pub mod traits;
