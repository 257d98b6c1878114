use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, H256};
use tokio::sync::Mutex;

use super::{CallReceipt, ContractCall, Ledger};
use crate::forge_utils::ContractSpec;
use crate::report::ContractDeployment;

/// Everything a deployment asked the ledger to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    Deploy {
        contract: String,
        constructor_args: Vec<String>,
        address: Address,
    },
    Submit {
        to: Address,
        function_name: String,
        args: Vec<Token>,
        tx_hash: H256,
    },
    Confirm {
        tx_hash: H256,
    },
    Read {
        at: Address,
        getter: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    events: Vec<LedgerEvent>,
    next_id: u64,
    failing_deployments: HashSet<String>,
    reject_calls: bool,
    revert_calls: bool,
    drop_calls: bool,
    misreported_link: Option<Address>,
    reverted: HashSet<H256>,
    linked: HashMap<Address, Address>,
}

/// In-memory ledger: each deployment gets a fresh address and a call
/// stores its first address argument on the target contract.
#[derive(Debug, Default)]
pub struct MockLedger {
    state: Mutex<MockState>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploying `contract` fails as if its constructor reverted.
    pub async fn fail_deployment_of(&self, contract: &str) {
        self.state
            .lock()
            .await
            .failing_deployments
            .insert(contract.to_string());
    }

    /// Calls are mined but revert.
    pub async fn revert_calls(&self) {
        self.state.lock().await.revert_calls = true;
    }

    /// Calls are refused before reaching the network.
    pub async fn reject_calls(&self) {
        self.state.lock().await.reject_calls = true;
    }

    /// Submitted calls never get a receipt.
    pub async fn drop_calls(&self) {
        self.state.lock().await.drop_calls = true;
    }

    /// View calls return `address` instead of the stored value.
    pub async fn misreport_link(&self, address: Address) {
        self.state.lock().await.misreported_link = Some(address);
    }

    pub async fn events(&self) -> Vec<LedgerEvent> {
        self.state.lock().await.events.clone()
    }

    pub async fn deployed_address_of(&self, contract: &str) -> Option<Address> {
        self.events().await.into_iter().find_map(|event| match event {
            LedgerEvent::Deploy {
                contract: deployed,
                address,
                ..
            } if deployed == contract => Some(address),
            _ => None,
        })
    }

    /// The address last stored on the contract at `at`.
    pub async fn linked_address(&self, at: Address) -> Option<Address> {
        self.state.lock().await.linked.get(&at).copied()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn deploy(
        &self,
        contract: &ContractSpec,
        constructor_args: Vec<String>,
    ) -> eyre::Result<ContractDeployment> {
        let mut state = self.state.lock().await;

        if state.failing_deployments.contains(&contract.name) {
            eyre::bail!("forge create failed: {} constructor reverted", contract);
        }

        state.next_id += 1;
        let address = Address::from_low_u64_be(0x1000 + state.next_id);
        let transaction_hash = H256::from_low_u64_be(state.next_id);

        state.events.push(LedgerEvent::Deploy {
            contract: contract.name.clone(),
            constructor_args,
            address,
        });

        Ok(ContractDeployment {
            address,
            transaction_hash: Some(transaction_hash),
        })
    }

    async fn submit_call(&self, call: ContractCall) -> eyre::Result<H256> {
        let mut state = self.state.lock().await;

        if state.reject_calls {
            eyre::bail!("Send transaction: insufficient funds");
        }

        state.next_id += 1;
        let tx_hash = H256::from_low_u64_be(state.next_id);

        if state.revert_calls {
            state.reverted.insert(tx_hash);
        } else if let Some(Token::Address(value)) = call.args.first() {
            state.linked.insert(call.to, *value);
        }

        state.events.push(LedgerEvent::Submit {
            to: call.to,
            function_name: call.function_name,
            args: call.args,
            tx_hash,
        });

        Ok(tx_hash)
    }

    async fn confirm_call(&self, tx_hash: H256) -> eyre::Result<CallReceipt> {
        let mut state = self.state.lock().await;

        state.events.push(LedgerEvent::Confirm { tx_hash });

        if state.drop_calls {
            eyre::bail!("Transaction dropped from the mempool");
        }

        Ok(CallReceipt {
            transaction_hash: tx_hash,
            success: !state.reverted.contains(&tx_hash),
        })
    }

    async fn read_address(
        &self,
        _contract: &ContractSpec,
        at: Address,
        getter: &str,
    ) -> eyre::Result<Address> {
        let mut state = self.state.lock().await;

        state.events.push(LedgerEvent::Read {
            at,
            getter: getter.to_string(),
        });

        if let Some(misreported) = state.misreported_link {
            return Ok(misreported);
        }

        Ok(state.linked.get(&at).copied().unwrap_or_default())
    }
}
