use std::path::PathBuf;

use reqwest::Url;

use crate::cli::{DeploymentType, PrivateKey};
use crate::config::LinkPolicy;

pub struct Cmd {
    pub target: DeploymentType,
    pub config: PathBuf,
    pub deployment_name: String,
    pub private_key: PrivateKey,
    pub rpc_url: Url,
    pub etherscan_api_key: Option<String>,
    pub link_policy: Option<LinkPolicy>,
}
