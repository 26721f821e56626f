#![doc = concat!(
    "[![crates.io](https://img.shields.io/crates/v/", env!("CARGO_PKG_NAME"), ")](https://crates.io/crates/", env!("CARGO_PKG_NAME"), ")",
    " ",
    "[![docs.rs](https://img.shields.io/docsrs/", env!("CARGO_PKG_NAME"), ")](https://docs.rs/", env!("CARGO_PKG_NAME"), ")",
    " ",
    "![license](https://img.shields.io/crates/l/", env!("CARGO_PKG_NAME"), ")"
)]
#![doc = ""]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The crate interposes three interceptors between an SSH server's protocol
//! engine and the backend that actually executes things, mirroring the
//! backend's own connection → session → request structure:
//!
//! - [`Network`]: forwards the authentication phase untouched and, on
//!   handshake success, hands out a policy-enforcing connection handler.
//! - [`Connection`]: caps the number of session channels admitted on one
//!   connection.
//! - [`Session`]: applies the per-request policy (environment variables,
//!   PTY allocation, command execution, shell, subsystems, signals) and
//!   performs forced-command substitution.
//!
//! Each interceptor implements the same [`handler`] trait it wraps, making
//! the whole stack a drop-in substitute for the backend it guards.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    clippy::unwrap_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,
    clippy::undocumented_unsafe_blocks
)]
#![forbid(unsafe_code)]

/// The environment variable receiving the originally requested command
/// whenever the forced command is substituted for it.
pub const ORIGINAL_COMMAND_VARIABLE: &str = "SSH_ORIGINAL_COMMAND";

mod error;
pub use error::{InvalidConfig, OpenRejection, Rejection, Result};

mod config;
pub use config::{Config, Mode, Rule};

pub mod handler;
pub mod report;

mod network;
pub use network::Network;

mod connection;
pub use connection::Connection;

mod session;
pub use session::Session;
