use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::forge_utils::ContractSpec;

pub const DEFAULT_FORGE_ROOT: &str = "./contracts";
pub const DEFAULT_REVIEW_CONTRACT: &str = "AssetReview";
pub const DEFAULT_AUCTION_CONTRACT: &str = "ERC1155Auction";
pub const DEFAULT_LINK_FUNCTION: &str = "setAuctionContract";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Root of the forge project holding the contract sources
    #[serde(default = "default_forge_root")]
    pub root: PathBuf,
    /// Contract name, optionally qualified as `path/to/File.sol:Name`
    #[serde(default = "default_review_contract")]
    pub review: String,
    #[serde(default = "default_auction_contract")]
    pub auction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default)]
    pub policy: LinkPolicy,
    /// Entry point on the review contract that records the auction address
    #[serde(default = "default_link_function")]
    pub function: String,
    /// Optional view function on the review contract returning the linked
    /// auction address. When set, a checked link is read back and compared.
    #[serde(default)]
    pub verify_getter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasConfig {
    #[serde(default)]
    pub gas_limit: Option<u64>,
    /// In wei
    #[serde(default)]
    pub gas_price: Option<u64>,
    /// In wei
    #[serde(default)]
    pub priority_gas_price: Option<u64>,
}

/// Whether the cross-link call has to be confirmed before the deployment is
/// considered complete.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Await the receipt and fail on revert
    #[default]
    #[display(fmt = "checked")]
    Checked,
    /// Submit the call without awaiting it
    #[display(fmt = "unchecked")]
    Unchecked,
}

impl Config {
    pub fn with_link_policy(mut self, policy: Option<LinkPolicy>) -> Self {
        if let Some(policy) = policy {
            self.link.policy = policy;
        }
        self
    }
}

impl ContractsConfig {
    pub fn review_spec(&self) -> ContractSpec {
        ContractSpec::parse(&self.review)
    }

    pub fn auction_spec(&self) -> ContractSpec {
        ContractSpec::parse(&self.auction)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contracts: ContractsConfig::default(),
            link: LinkConfig::default(),
            gas: GasConfig::default(),
            confirmations: default_confirmations(),
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            root: default_forge_root(),
            review: default_review_contract(),
            auction: default_auction_contract(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            policy: LinkPolicy::default(),
            function: default_link_function(),
            verify_getter: None,
        }
    }
}

fn default_confirmations() -> usize {
    1
}

fn default_forge_root() -> PathBuf {
    PathBuf::from(DEFAULT_FORGE_ROOT)
}

fn default_review_contract() -> String {
    DEFAULT_REVIEW_CONTRACT.to_string()
}

fn default_auction_contract() -> String {
    DEFAULT_AUCTION_CONTRACT.to_string()
}

fn default_link_function() -> String {
    DEFAULT_LINK_FUNCTION.to_string()
}
