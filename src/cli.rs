use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub mod private_key;

pub use private_key::PrivateKey;
use reqwest::Url;

use crate::config::LinkPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum DeploymentType {
    /// Deploy both contracts and link them
    Full,
    /// Deploy both contracts without linking them
    Contracts,
    /// Link contracts already recorded in the deployment report
    Link,
}

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case")]
pub struct Args {
    #[clap(short, long, env = "DEPLOYMENT_TARGET", default_value = "full")]
    pub target: DeploymentType,

    /// Path to the deployment configuration file
    #[clap(short, long, env)]
    pub config: Option<PathBuf>,

    /// The name of the deployment
    ///
    /// Should be something meaningful like 'auction-sepolia-2023-04-18'
    #[clap(short, long, env)]
    pub deployment_name: Option<String>,

    /// Private key to use for the deployment
    #[clap(short, long, env)]
    pub private_key: Option<PrivateKey>,

    /// The RPC Url to use for the deployment
    #[clap(short, long, env)]
    pub rpc_url: Option<Url>,

    /// The etherscan API key to use
    #[clap(short, long, env)]
    pub etherscan_api_key: Option<String>,

    /// Overrides the link policy from the configuration file
    #[clap(short, long, env)]
    pub link_policy: Option<LinkPolicy>,

    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub yes: bool,
}
