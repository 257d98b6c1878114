use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Abi;
use ethers::contract::Contract;
use ethers::prelude::SignerMiddleware;
use ethers::providers::{Middleware, Provider};
use ethers::signers::{Signer, Wallet};
use ethers::types::{Address, H256};
use eyre::WrapErr;
use reqwest::Url;
use tracing::{info, instrument};

use super::{CallReceipt, ContractCall, Ledger};
use crate::cli::PrivateKey;
use crate::config::{Config, GasConfig};
use crate::ethers_utils::{self, RpcSigner, TransactionBuilder};
use crate::forge_utils::{ContractSpec, ForgeCreate, ForgeInspectAbi};
use crate::report::ContractDeployment;

/// Deploys through `forge create` and sends calls through an ethers signer.
///
/// Both paths share one locally tracked nonce so that transactions sent in
/// quick succession never collide.
#[derive(Debug)]
pub struct EthersLedger {
    signer: Arc<RpcSigner>,
    private_key: PrivateKey,
    rpc_url: Url,
    etherscan_api_key: Option<String>,
    forge_root: PathBuf,
    gas: GasConfig,
    confirmations: usize,
    nonce: AtomicU64,
}

impl EthersLedger {
    #[instrument(skip_all, fields(rpc_url = %rpc_url))]
    pub async fn connect(
        private_key: PrivateKey,
        rpc_url: Url,
        etherscan_api_key: Option<String>,
        config: &Config,
    ) -> eyre::Result<Self> {
        let provider = Provider::try_from(rpc_url.as_str())?;
        let chain_id = provider
            .get_chainid()
            .await
            .wrap_err("Fetching chain id")?;
        let wallet = Wallet::from(private_key.key.clone())
            .with_chain_id(chain_id.as_u64());

        let wallet_address = wallet.address();

        let signer = SignerMiddleware::new(provider, wallet);

        let nonce = signer
            .get_transaction_count(wallet_address, None)
            .await
            .wrap_err("Fetching account nonce")?;

        info!(
            chain_id = chain_id.as_u64(),
            deployer = ?wallet_address,
            nonce = nonce.as_u64(),
            "Connected"
        );

        Ok(Self {
            signer: Arc::new(RpcSigner(Arc::new(signer))),
            private_key,
            rpc_url,
            etherscan_api_key,
            forge_root: config.contracts.root.clone(),
            gas: config.gas.clone(),
            confirmations: config.confirmations,
            nonce: AtomicU64::new(nonce.as_u64()),
        })
    }

    fn next_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::SeqCst)
    }

    fn forge_create(&self, contract_spec: ContractSpec) -> ForgeCreate {
        let mut forge_create = ForgeCreate::new(contract_spec)
            .with_cwd(&self.forge_root)
            .with_private_key(self.private_key.clone())
            .with_rpc_url(self.rpc_url.to_string())
            .with_gas(self.gas.clone())
            .with_override_nonce(self.next_nonce());

        if let Some(etherscan_api_key) = self.etherscan_api_key.as_ref() {
            forge_create =
                forge_create.with_verification_api_key(etherscan_api_key);
        }

        forge_create
    }

    async fn inspect_abi(
        &self,
        contract_spec: &ContractSpec,
    ) -> eyre::Result<Abi> {
        ForgeInspectAbi::new(contract_spec.clone())
            .with_cwd(&self.forge_root)
            .run()
            .await
    }
}

#[async_trait]
impl Ledger for EthersLedger {
    async fn deploy(
        &self,
        contract: &ContractSpec,
        constructor_args: Vec<String>,
    ) -> eyre::Result<ContractDeployment> {
        let forge_create = constructor_args
            .into_iter()
            .fold(self.forge_create(contract.clone()), |forge_create, arg| {
                forge_create.with_constructor_arg(arg)
            });

        let output = forge_create.run().await?;

        Ok(output.into())
    }

    #[instrument(
        skip_all,
        fields(to = ?call.to, function = %call.function_name)
    )]
    async fn submit_call(&self, call: ContractCall) -> eyre::Result<H256> {
        let abi = self.inspect_abi(&call.contract).await?;

        let tx = TransactionBuilder::default()
            .signer(self.signer.clone())
            .abi(abi)
            .function_name(&call.function_name)
            .args(call.args)
            .to(call.to)
            .nonce(self.next_nonce())
            .gas(self.gas.clone())
            .build()?;

        let tx_hash = tx.submit().await?;

        info!(?tx_hash, "Submitted");

        Ok(tx_hash)
    }

    #[instrument(skip(self))]
    async fn confirm_call(&self, tx_hash: H256) -> eyre::Result<CallReceipt> {
        let receipt = ethers_utils::await_receipt(
            &self.signer,
            tx_hash,
            self.confirmations,
        )
        .await?;

        Ok(CallReceipt {
            transaction_hash: tx_hash,
            success: receipt.status == Some(1.into()),
        })
    }

    #[instrument(skip(self, contract))]
    async fn read_address(
        &self,
        contract: &ContractSpec,
        at: Address,
        getter: &str,
    ) -> eyre::Result<Address> {
        let abi = self.inspect_abi(contract).await?;

        let contract = Contract::new(at, abi, self.signer.0.clone());

        let address = contract
            .method::<_, Address>(getter, ())?
            .call()
            .await
            .wrap_err_with(|| format!("Calling {getter}"))?;

        Ok(address)
    }
}
