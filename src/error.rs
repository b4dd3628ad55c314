use thiserror::Error;

use crate::chain::chain_name;

pub type ConnectResult<T> = std::result::Result<T, ConnectError>;

/// Why a connection attempt ended without a connected wallet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    /// No injected wallet, injected detection disabled, or the user rejected the prompt.
    #[error("wallet connection declined: {0}")]
    Declined(String),

    #[error("connected to {}, expected {}", chain_label(.actual), chain_label(.expected))]
    WrongNetwork { expected: u64, actual: u64 },

    /// Provider, account or ENS lookup failure after the wallet connected.
    #[error("resolution failed: {0}")]
    Resolution(String),
}

fn chain_label(id: &u64) -> std::borrow::Cow<'static, str> {
    chain_name(*id)
}

impl ConnectError {
    /// Text for a blocking alert, if this error warrants one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ConnectError::WrongNetwork { expected, .. } => {
                Some(format!("Change the network to {}", chain_name(*expected)))
            }
            _ => None,
        }
    }
}

impl From<web3::Error> for ConnectError {
    fn from(err: web3::Error) -> Self {
        ConnectError::Resolution(err.to_string())
    }
}

impl From<web3::ethabi::Error> for ConnectError {
    fn from(err: web3::ethabi::Error) -> Self {
        ConnectError::Resolution(format!("abi decode: {}", err))
    }
}
