//! # quipu-engine
//!
//! The command dispatch and financial reporting engine: classifies an
//! inbound message into one supported command, authorizes the sender
//! against their organization, executes the command, and renders a single
//! localized reply.

pub mod commands;
pub mod dispatch;
pub mod i18n;
pub mod resolver;

pub use dispatch::Engine;
