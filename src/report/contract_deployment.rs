use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::forge_utils::ForgeOutput;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ContractDeployment {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<H256>,
}

impl From<ForgeOutput> for ContractDeployment {
    fn from(value: ForgeOutput) -> Self {
        Self {
            address: value.deployed_to,
            transaction_hash: Some(value.transaction_hash),
        }
    }
}
