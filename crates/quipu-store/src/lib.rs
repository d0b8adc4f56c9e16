//! # quipu-store
//!
//! SQLite-backed persistence for organizations, users, and transactions.

mod store;

pub use store::Store;
