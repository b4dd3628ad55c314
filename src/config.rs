use serde::Serialize;
use serde_json::{Map, Value};
use web3::types::Address;

use crate::chain::{chain_name, GOERLI};

/// ENS registry, deployed at the same address on mainnet and the public testnets.
const ENS_REGISTRY_BYTES: [u8; 20] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97,
    0xba, 0x6c, 0x7d, 0x2e, 0x1e,
];

/// The single network this page accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub ens_registry: Address,
}

impl NetworkConfig {
    pub fn goerli() -> Self {
        Self {
            name: "goerli".to_string(),
            chain_id: GOERLI,
            ens_registry: Address::from(ENS_REGISTRY_BYTES),
        }
    }

    pub fn label(&self) -> String {
        chain_name(self.chain_id).into_owned()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::goerli()
    }
}

/// Options handed to the wallet-connection handle when it is constructed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalOptions {
    pub network: String,
    pub provider_options: Map<String, Value>,
    pub disable_injected_provider: bool,
}

impl ModalOptions {
    pub fn for_network(network: &NetworkConfig) -> Self {
        Self {
            network: network.name.clone(),
            provider_options: Map::new(),
            disable_injected_provider: false,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| format!("<unserializable: {}>", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goerli_defaults() {
        let network = NetworkConfig::default();
        assert_eq!(network.name, "goerli");
        assert_eq!(network.chain_id, 5);
        assert_eq!(network.label(), "Goerli");
        assert_eq!(
            format!("{:?}", network.ens_registry),
            "0x00000000000c2e074ec69a0dfb2997ba6c7d2e1e"
        );
    }

    #[test]
    fn test_modal_options_json() {
        let options = ModalOptions::for_network(&NetworkConfig::goerli());
        assert_eq!(
            options.to_json(),
            r#"{"network":"goerli","providerOptions":{},"disableInjectedProvider":false}"#
        );
    }
}
