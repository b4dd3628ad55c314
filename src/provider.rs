//! Capabilities the connection controller drives.
//!
//! A [`ConnectionHandle`] asks the wallet for a session and hands back a raw
//! connection; the [`NetworkProvider`] wraps that connection and answers
//! network, account and name queries over it.

use async_trait::async_trait;
use web3::types::Address;

use crate::error::ConnectResult;

/// Wallet-connection capability, built once from the modal options.
#[async_trait(?Send)]
pub trait ConnectionHandle {
    type Connection;
    type Provider: NetworkProvider + From<Self::Connection>;

    /// Requests a session. May show a wallet approval prompt.
    async fn connect(&self) -> ConnectResult<Self::Connection>;
}

#[async_trait(?Send)]
pub trait NetworkProvider {
    type Signer: AccountSigner;

    async fn chain_id(&self) -> ConnectResult<u64>;

    fn signer(&self) -> Self::Signer;

    /// Reverse resolution; `Ok(None)` when no name is bound to `address`.
    async fn lookup_address(&self, address: Address) -> ConnectResult<Option<String>>;
}

#[async_trait(?Send)]
pub trait AccountSigner {
    async fn address(&self) -> ConnectResult<Address>;
}
