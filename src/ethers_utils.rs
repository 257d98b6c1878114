use std::sync::Arc;

use ethers::abi::{Abi, Token};
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use eyre::{ContextCompat, WrapErr};

use crate::config::GasConfig;

// TODO: Allow for different wallet kinds
#[derive(Debug)]
pub struct RpcSigner(pub Arc<SignerMiddleware<Provider<Http>, LocalWallet>>);

pub struct Transaction {
    call_data: Bytes,
    signer: Arc<RpcSigner>,
    to: Address,
    nonce: u64,
    gas: GasConfig,
}

#[derive(Default, Clone, Debug)]
pub struct TransactionBuilder {
    abi: Option<Abi>,
    function_name: Option<String>,
    args: Vec<Token>,
    signer: Option<Arc<RpcSigner>>,
    to: Option<Address>,
    nonce: Option<u64>,
    gas: GasConfig,
}

impl TransactionBuilder {
    pub fn abi(mut self, abi: Abi) -> Self {
        self.abi = Some(abi);
        self
    }

    pub fn function_name(mut self, function_name: impl ToString) -> Self {
        self.function_name = Some(function_name.to_string());
        self
    }

    pub fn args(mut self, args: Vec<Token>) -> Self {
        self.args = args;
        self
    }

    pub fn signer(mut self, signer: Arc<RpcSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn gas(mut self, gas: GasConfig) -> Self {
        self.gas = gas;
        self
    }

    pub fn build(self) -> eyre::Result<Transaction> {
        let abi = self.abi.context("TransactionBuilder missing abi")?;
        let function_name = self
            .function_name
            .context("TransactionBuilder missing function_name")?;

        Ok(Transaction {
            call_data: encode_call(&abi, &function_name, &self.args)?,
            signer: self.signer.context("TransactionBuilder missing signer")?,
            to: self.to.context("TransactionBuilder missing to")?,
            nonce: self.nonce.context("TransactionBuilder missing nonce")?,
            gas: self.gas,
        })
    }
}

pub fn encode_call(
    abi: &Abi,
    function_name: &str,
    args: &[Token],
) -> eyre::Result<Bytes> {
    let func = abi
        .function(function_name)
        .wrap_err_with(|| format!("Missing function {function_name} in abi"))?;

    let call_data = func
        .encode_input(args)
        .wrap_err_with(|| format!("Encoding arguments of {function_name}"))?;

    Ok(call_data.into())
}

impl Transaction {
    /// Broadcasts the transaction without waiting for it to be mined.
    pub async fn submit(self) -> eyre::Result<H256> {
        let mut request = Eip1559TransactionRequest::new()
            .to(self.to)
            .data(self.call_data)
            .nonce(self.nonce);

        if let Some(gas_limit) = self.gas.gas_limit {
            request = request.gas(gas_limit);
        }

        if let Some(gas_price) = self.gas.gas_price {
            request = request.max_fee_per_gas(gas_price);
        }

        if let Some(priority_gas_price) = self.gas.priority_gas_price {
            request = request.max_priority_fee_per_gas(priority_gas_price);
        }

        let mut tx = TypedTransaction::Eip1559(request);

        self.signer.0.fill_transaction(&mut tx, None).await?;

        let pending = self
            .signer
            .0
            .send_transaction(tx, None)
            .await
            .wrap_err("Send transaction")?;

        Ok(pending.tx_hash())
    }
}

pub async fn await_receipt(
    signer: &RpcSigner,
    tx_hash: H256,
    confirmations: usize,
) -> eyre::Result<TransactionReceipt> {
    let receipt = PendingTransaction::new(tx_hash, signer.0.provider())
        .confirmations(confirmations)
        .await
        .wrap_err("Awaiting receipt")?
        .context("Transaction dropped from the mempool")?;

    Ok(receipt)
}
