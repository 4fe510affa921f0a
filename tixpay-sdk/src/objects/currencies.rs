use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// All currencies the payment widget can settle in.
///
/// Each identifier names an asset together with the network it settles on.
/// The set is closed: anything else is rejected by the playground validator.
pub enum CurrencyId {
    #[serde(rename = "ETH-sepolia-sepolia")]
    EthSepolia,
    #[serde(rename = "fUSDC-sepolia")]
    FakeUsdcSepolia,
    #[serde(rename = "fUSDT-sepolia")]
    FakeUsdtSepolia,
    #[serde(rename = "FAU-sepolia")]
    FauSepolia,
    #[serde(rename = "ETH-mainnet")]
    EthMainnet,
    #[serde(rename = "USDC-mainnet")]
    UsdcMainnet,
    #[serde(rename = "USDT-mainnet")]
    UsdtMainnet,
    #[serde(rename = "DAI-mainnet")]
    DaiMainnet,
    #[serde(rename = "MATIC-matic")]
    MaticPolygon,
    #[serde(rename = "USDC-matic")]
    UsdcPolygon,
    #[serde(rename = "USDT-matic")]
    UsdtPolygon,
    #[serde(rename = "DAI-matic")]
    DaiPolygon,
    #[serde(rename = "ETH-optimism-optimism")]
    EthOptimism,
    #[serde(rename = "USDC-optimism")]
    UsdcOptimism,
    #[serde(rename = "USDT-optimism")]
    UsdtOptimism,
    #[serde(rename = "DAI-optimism")]
    DaiOptimism,
    #[serde(rename = "ETH-arbitrum-one-arbitrum-one")]
    EthArbitrumOne,
    #[serde(rename = "USDC-arbitrum-one")]
    UsdcArbitrumOne,
    #[serde(rename = "USDT-arbitrum-one")]
    UsdtArbitrumOne,
    #[serde(rename = "ETH-base-base")]
    EthBase,
    #[serde(rename = "USDC-base")]
    UsdcBase,
    #[serde(rename = "BNB-bsc")]
    BnbBsc,
    #[serde(rename = "USDC-bsc")]
    UsdcBsc,
    #[serde(rename = "USDT-bsc")]
    UsdtBsc,
    #[serde(rename = "xDAI-xdai")]
    XdaiGnosis,
    #[serde(rename = "USDC-xdai")]
    UsdcGnosis,
}

impl CurrencyId {
    /// Every supported currency, in display order.
    pub const ALL: [CurrencyId; 26] = [
        CurrencyId::EthSepolia,
        CurrencyId::FakeUsdcSepolia,
        CurrencyId::FakeUsdtSepolia,
        CurrencyId::FauSepolia,
        CurrencyId::EthMainnet,
        CurrencyId::UsdcMainnet,
        CurrencyId::UsdtMainnet,
        CurrencyId::DaiMainnet,
        CurrencyId::MaticPolygon,
        CurrencyId::UsdcPolygon,
        CurrencyId::UsdtPolygon,
        CurrencyId::DaiPolygon,
        CurrencyId::EthOptimism,
        CurrencyId::UsdcOptimism,
        CurrencyId::UsdtOptimism,
        CurrencyId::DaiOptimism,
        CurrencyId::EthArbitrumOne,
        CurrencyId::UsdcArbitrumOne,
        CurrencyId::UsdtArbitrumOne,
        CurrencyId::EthBase,
        CurrencyId::UsdcBase,
        CurrencyId::BnbBsc,
        CurrencyId::UsdcBsc,
        CurrencyId::UsdtBsc,
        CurrencyId::XdaiGnosis,
        CurrencyId::UsdcGnosis,
    ];

    /// Canonical identifier, exactly as the widget expects it.
    pub const fn as_str(self) -> &'static str {
        match self {
            CurrencyId::EthSepolia => "ETH-sepolia-sepolia",
            CurrencyId::FakeUsdcSepolia => "fUSDC-sepolia",
            CurrencyId::FakeUsdtSepolia => "fUSDT-sepolia",
            CurrencyId::FauSepolia => "FAU-sepolia",
            CurrencyId::EthMainnet => "ETH-mainnet",
            CurrencyId::UsdcMainnet => "USDC-mainnet",
            CurrencyId::UsdtMainnet => "USDT-mainnet",
            CurrencyId::DaiMainnet => "DAI-mainnet",
            CurrencyId::MaticPolygon => "MATIC-matic",
            CurrencyId::UsdcPolygon => "USDC-matic",
            CurrencyId::UsdtPolygon => "USDT-matic",
            CurrencyId::DaiPolygon => "DAI-matic",
            CurrencyId::EthOptimism => "ETH-optimism-optimism",
            CurrencyId::UsdcOptimism => "USDC-optimism",
            CurrencyId::UsdtOptimism => "USDT-optimism",
            CurrencyId::DaiOptimism => "DAI-optimism",
            CurrencyId::EthArbitrumOne => "ETH-arbitrum-one-arbitrum-one",
            CurrencyId::UsdcArbitrumOne => "USDC-arbitrum-one",
            CurrencyId::UsdtArbitrumOne => "USDT-arbitrum-one",
            CurrencyId::EthBase => "ETH-base-base",
            CurrencyId::UsdcBase => "USDC-base",
            CurrencyId::BnbBsc => "BNB-bsc",
            CurrencyId::UsdcBsc => "USDC-bsc",
            CurrencyId::UsdtBsc => "USDT-bsc",
            CurrencyId::XdaiGnosis => "xDAI-xdai",
            CurrencyId::UsdcGnosis => "USDC-xdai",
        }
    }

    /// Asset ticker, the part of the identifier before the first `-`.
    pub fn symbol(self) -> &'static str {
        let id = self.as_str();
        id.split_once('-').map_or(id, |(symbol, _)| symbol)
    }

    /// Network the asset settles on.
    pub const fn network(self) -> &'static str {
        match self {
            CurrencyId::EthSepolia
            | CurrencyId::FakeUsdcSepolia
            | CurrencyId::FakeUsdtSepolia
            | CurrencyId::FauSepolia => "sepolia",
            CurrencyId::EthMainnet
            | CurrencyId::UsdcMainnet
            | CurrencyId::UsdtMainnet
            | CurrencyId::DaiMainnet => "mainnet",
            CurrencyId::MaticPolygon
            | CurrencyId::UsdcPolygon
            | CurrencyId::UsdtPolygon
            | CurrencyId::DaiPolygon => "matic",
            CurrencyId::EthOptimism
            | CurrencyId::UsdcOptimism
            | CurrencyId::UsdtOptimism
            | CurrencyId::DaiOptimism => "optimism",
            CurrencyId::EthArbitrumOne
            | CurrencyId::UsdcArbitrumOne
            | CurrencyId::UsdtArbitrumOne => "arbitrum-one",
            CurrencyId::EthBase | CurrencyId::UsdcBase => "base",
            CurrencyId::BnbBsc | CurrencyId::UsdcBsc | CurrencyId::UsdtBsc => "bsc",
            CurrencyId::XdaiGnosis | CurrencyId::UsdcGnosis => "xdai",
        }
    }

    /// Human-readable label, e.g. `USDC (Base)`.
    pub fn label(self) -> String {
        let network = match self.network() {
            "sepolia" => "Sepolia",
            "mainnet" => "Ethereum",
            "matic" => "Polygon",
            "optimism" => "Optimism",
            "arbitrum-one" => "Arbitrum One",
            "base" => "Base",
            "bsc" => "BNB Chain",
            "xdai" => "Gnosis",
            other => other,
        };
        format!("{} ({network})", self.symbol())
    }

    /// Look up an identifier. Matching is exact; `usdc-base` is not `USDC-base`.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the supported currency identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency `{0}`")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyId {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownCurrency(s.to_owned()))
    }
}

/// Entry of the currency listing exposed to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOption {
    pub value: CurrencyId,
    pub label: String,
}

impl From<CurrencyId> for CurrencyOption {
    fn from(value: CurrencyId) -> Self {
        Self {
            value,
            label: value.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_canonical_ids() {
        for currency in CurrencyId::ALL {
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, format!("\"{}\"", currency.as_str()));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            "ETH-sepolia-sepolia".parse::<CurrencyId>(),
            Ok(CurrencyId::EthSepolia)
        );
        assert!("eth-sepolia-sepolia".parse::<CurrencyId>().is_err());
        assert!("BTC-bitcoin".parse::<CurrencyId>().is_err());
    }

    #[test]
    fn test_symbol_and_label() {
        assert_eq!(CurrencyId::FakeUsdcSepolia.symbol(), "fUSDC");
        assert_eq!(CurrencyId::EthArbitrumOne.network(), "arbitrum-one");
        assert_eq!(CurrencyId::UsdcBase.label(), "USDC (Base)");
    }
}
