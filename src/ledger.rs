//! The chain facing side of a deployment.
//!
//! Steps only talk to a [`Ledger`], so the ordering and failure handling of
//! a deployment does not depend on how transactions reach the network.

use std::fmt;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, H256};

use crate::forge_utils::ContractSpec;
use crate::report::ContractDeployment;

pub mod ethers_ledger;
#[cfg(test)]
pub mod mock;

pub use self::ethers_ledger::EthersLedger;

/// A state mutating call on an already deployed contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub contract: ContractSpec,
    pub to: Address,
    pub function_name: String,
    pub args: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallReceipt {
    pub transaction_hash: H256,
    pub success: bool,
}

#[async_trait]
pub trait Ledger: fmt::Debug + Send + Sync {
    /// Deploys `contract` and returns once the creation is confirmed.
    async fn deploy(
        &self,
        contract: &ContractSpec,
        constructor_args: Vec<String>,
    ) -> eyre::Result<ContractDeployment>;

    /// Broadcasts `call` and returns its transaction hash without waiting
    /// for it to be mined.
    async fn submit_call(&self, call: ContractCall) -> eyre::Result<H256>;

    /// Waits for a previously submitted call to be mined.
    async fn confirm_call(&self, tx_hash: H256) -> eyre::Result<CallReceipt>;

    /// Calls a view function returning a single address.
    async fn read_address(
        &self,
        contract: &ContractSpec,
        at: Address,
        getter: &str,
    ) -> eyre::Result<Address>;
}
