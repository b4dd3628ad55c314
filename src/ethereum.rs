//! Browser wallet over the EIP-1193 provider injected at `window.ethereum`.

use std::rc::Rc;

use async_trait::async_trait;
use js_sys::Reflect;
use log::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use web3::transports::eip_1193::{Eip1193, Provider};
use web3::types::{Address, Bytes, CallRequest, U256};
use web3::Web3;

use crate::config::{ModalOptions, NetworkConfig};
use crate::controller::ConnectionController;
use crate::ens::{ContractCaller, Ens};
use crate::error::{ConnectError, ConnectResult};
use crate::provider::{AccountSigner, ConnectionHandle, NetworkProvider};

const WALLET_FLAGS: &[(&str, &str)] = &[
    ("isMetaMask", "MetaMask"),
    ("isCoinbaseWallet", "Coinbase Wallet"),
    ("isBraveWallet", "Brave Wallet"),
];

pub type BrowserController = ConnectionController<InjectedWallet>;

pub fn browser_controller(network: NetworkConfig) -> BrowserController {
    let registry = network.ens_registry;
    ConnectionController::new(network, move |options| {
        InjectedWallet::new(options, registry)
    })
}

/// Best effort text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

fn wallet_kind(ethereum: &JsValue) -> &'static str {
    WALLET_FLAGS
        .iter()
        .find(|(flag, _)| {
            Reflect::get(ethereum, &JsValue::from_str(flag))
                .ok()
                .and_then(|value| value.as_bool())
                .unwrap_or(false)
        })
        .map(|(_, name)| *name)
        .unwrap_or("unknown wallet")
}

pub struct InjectedWallet {
    options: ModalOptions,
    ens_registry: Address,
}

impl InjectedWallet {
    pub fn new(options: &ModalOptions, ens_registry: Address) -> Self {
        Self {
            options: options.clone(),
            ens_registry,
        }
    }

    fn detect(&self) -> ConnectResult<Provider> {
        if self.options.disable_injected_provider {
            return Err(ConnectError::Declined(
                "injected provider detection is disabled".into(),
            ));
        }
        let window = web_sys::window()
            .ok_or_else(|| ConnectError::Declined("no browser window".into()))?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
            .map_err(|err| ConnectError::Declined(describe(&err)))?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return Err(ConnectError::Declined(
                "no injected wallet found, install MetaMask".into(),
            ));
        }
        info!("detected {}", wallet_kind(&ethereum));
        Ok(ethereum.unchecked_into::<Provider>())
    }
}

/// An approved wallet session.
pub struct Web3Connection {
    web3: Web3<Eip1193>,
    ens_registry: Address,
}

#[async_trait(?Send)]
impl ConnectionHandle for InjectedWallet {
    type Connection = Web3Connection;
    type Provider = Web3Provider;

    async fn connect(&self) -> ConnectResult<Web3Connection> {
        let provider = self.detect()?;
        let web3 = Web3::new(Eip1193::new(provider));
        let accounts = web3
            .eth()
            .request_accounts()
            .await
            .map_err(|err| ConnectError::Declined(err.to_string()))?;
        debug!("wallet granted {} account(s)", accounts.len());
        Ok(Web3Connection {
            web3,
            ens_registry: self.ens_registry,
        })
    }
}

pub struct Web3Provider {
    web3: Rc<Web3<Eip1193>>,
    ens_registry: Address,
}

impl From<Web3Connection> for Web3Provider {
    fn from(connection: Web3Connection) -> Self {
        Self {
            web3: Rc::new(connection.web3),
            ens_registry: connection.ens_registry,
        }
    }
}

#[async_trait(?Send)]
impl ContractCaller for Web3Provider {
    async fn call(&self, to: Address, data: Vec<u8>) -> ConnectResult<Vec<u8>> {
        let request = CallRequest {
            to: Some(to),
            data: Some(Bytes(data)),
            ..Default::default()
        };
        let output = self.web3.eth().call(request, None).await?;
        Ok(output.0)
    }
}

#[async_trait(?Send)]
impl NetworkProvider for Web3Provider {
    type Signer = Web3Signer;

    async fn chain_id(&self) -> ConnectResult<u64> {
        let chain_id = self.web3.eth().chain_id().await?;
        if chain_id > U256::from(u64::MAX) {
            return Err(ConnectError::Resolution(format!(
                "chain id {} out of range",
                chain_id
            )));
        }
        Ok(chain_id.as_u64())
    }

    fn signer(&self) -> Web3Signer {
        Web3Signer {
            web3: Rc::clone(&self.web3),
        }
    }

    async fn lookup_address(&self, address: Address) -> ConnectResult<Option<String>> {
        Ens::new(self, self.ens_registry).lookup_address(address).await
    }
}

/// The wallet's currently selected account.
pub struct Web3Signer {
    web3: Rc<Web3<Eip1193>>,
}

#[async_trait(?Send)]
impl AccountSigner for Web3Signer {
    async fn address(&self) -> ConnectResult<Address> {
        let accounts = self.web3.eth().accounts().await?;
        accounts
            .first()
            .copied()
            .ok_or_else(|| ConnectError::Resolution("wallet exposed no accounts".into()))
    }
}
