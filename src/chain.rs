use std::borrow::Cow;

pub const MAINNET: u64 = 1;
pub const GOERLI: u64 = 5;
pub const SEPOLIA: u64 = 11_155_111;

const KNOWN_CHAINS: &[(u64, &str)] = &[
    (MAINNET, "Ethereum Mainnet"),
    (GOERLI, "Goerli"),
    (SEPOLIA, "Sepolia"),
    (10, "Optimism"),
    (137, "Polygon"),
    (42_161, "Arbitrum One"),
];

/// Human readable name for a chain id.
pub fn chain_name(id: u64) -> Cow<'static, str> {
    KNOWN_CHAINS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| Cow::Borrowed(*name))
        .unwrap_or_else(|| Cow::Owned(format!("chain {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_chains() {
        assert_eq!(chain_name(GOERLI), "Goerli");
        assert_eq!(chain_name(MAINNET), "Ethereum Mainnet");
        assert_eq!(chain_name(SEPOLIA), "Sepolia");
    }

    #[test]
    fn test_unknown_chain() {
        assert_eq!(chain_name(31_337), "chain 31337");
    }
}
