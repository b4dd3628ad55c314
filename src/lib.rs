//! Connects a browser wallet, checks it is on Goerli and greets the account
//! by its ENS name.

pub mod address;
pub mod chain;
pub mod components;
pub mod config;
pub mod controller;
pub mod ens;
pub mod error;
pub mod ethereum;
pub mod hooks;
pub mod provider;

pub use controller::{ConnectOutcome, ConnectionController, ConnectionPhase, ConnectionState, Identity};
pub use error::{ConnectError, ConnectResult};
