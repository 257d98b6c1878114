use std::path::{Path, PathBuf};

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::ContractSpec;
use crate::cli::PrivateKey;
use crate::config::GasConfig;

#[derive(Debug)]
pub struct ForgeCreate {
    cwd: Option<PathBuf>,
    contract_spec: ContractSpec,
    private_key: Option<PrivateKey>,
    rpc_url: Option<String>,
    override_nonce: Option<u64>,
    constructor_args: Vec<String>,
    gas: GasConfig,
    verification_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeOutput {
    pub deployer: Address,
    pub deployed_to: Address,
    pub transaction_hash: H256,
}

impl ForgeCreate {
    pub fn new(contract_spec: ContractSpec) -> Self {
        Self {
            cwd: None,
            contract_spec,
            override_nonce: None,
            private_key: None,
            rpc_url: None,
            constructor_args: vec![],
            gas: GasConfig::default(),
            verification_api_key: None,
        }
    }

    pub fn with_verification_api_key(
        mut self,
        verification_api_key: impl ToString,
    ) -> Self {
        self.verification_api_key = Some(verification_api_key.to_string());
        self
    }

    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_owned());
        self
    }

    pub fn with_override_nonce(mut self, override_nonce: u64) -> Self {
        self.override_nonce = Some(override_nonce);
        self
    }

    pub fn with_private_key(mut self, private_key: PrivateKey) -> Self {
        self.private_key = Some(private_key);
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: String) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub fn with_gas(mut self, gas: GasConfig) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_constructor_arg(mut self, arg: impl ToString) -> Self {
        self.constructor_args.push(arg.to_string());
        self
    }

    fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new("forge");
        cmd.arg("create");

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.arg(self.contract_spec.to_string());

        if let Some(private_key) = &self.private_key {
            cmd.arg("--private-key");
            cmd.arg(format!("{private_key:#}"));
        }

        if let Some(rpc_url) = &self.rpc_url {
            cmd.arg("--rpc-url");
            cmd.arg(rpc_url);
        }

        if let Some(nonce) = self.override_nonce {
            cmd.arg("--nonce");
            cmd.arg(nonce.to_string());
        }

        if let Some(gas_limit) = self.gas.gas_limit {
            cmd.arg("--gas-limit");
            cmd.arg(gas_limit.to_string());
        }

        if let Some(gas_price) = self.gas.gas_price {
            cmd.arg("--gas-price");
            cmd.arg(gas_price.to_string());
        }

        if let Some(priority_gas_price) = self.gas.priority_gas_price {
            cmd.arg("--priority-gas-price");
            cmd.arg(priority_gas_price.to_string());
        }

        if let Some(verification_api_key) = &self.verification_api_key {
            cmd.arg("--etherscan-api-key");
            cmd.arg(verification_api_key);
            cmd.arg("--verify");
        }

        cmd.arg("--broadcast");
        cmd.arg("--json");

        // Must stay last, forge reads every following value as an argument
        if !self.constructor_args.is_empty() {
            cmd.arg("--constructor-args");
            cmd.args(&self.constructor_args);
        }

        cmd
    }

    #[instrument(
        name = "forge_create",
        skip_all,
        fields(contract = %self.contract_spec)
    )]
    pub async fn run(&self) -> eyre::Result<ForgeOutput> {
        info!(
            nonce = ?self.override_nonce,
            constructor_args = ?self.constructor_args,
            "Creating contract"
        );

        let output = self.command().output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eyre::bail!("forge create failed: {}", stderr);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let s = strip_non_json(&stdout);

        let output: ForgeOutput = serde_json::from_str(s)?;

        info!("Created: {output:?}");

        Ok(output)
    }
}

fn strip_non_json(s: &str) -> &str {
    let start = s.find('{').unwrap_or(0);

    if let Some(last_closing_brace) = s.rfind('}') {
        &s[start..=last_closing_brace]
    } else {
        &s[start..]
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    const KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn args_of(forge_create: &ForgeCreate) -> Vec<String> {
        forge_create
            .command()
            .as_std()
            .get_args()
            .map(OsStr::to_string_lossy)
            .map(|arg| arg.into_owned())
            .collect()
    }

    #[test]
    fn builds_create_command() -> eyre::Result<()> {
        let forge_create = ForgeCreate::new(ContractSpec::name("ERC1155Auction"))
            .with_cwd("./contracts")
            .with_private_key(KEY.parse()?)
            .with_rpc_url("http://localhost:8545".to_string())
            .with_override_nonce(7)
            .with_gas(GasConfig {
                gas_limit: Some(3_000_000),
                gas_price: None,
                priority_gas_price: Some(2),
            })
            .with_constructor_arg(
                "0x00000000000000000000000000000000000000aa",
            );

        assert_eq!(
            args_of(&forge_create),
            [
                "create",
                "ERC1155Auction",
                "--private-key",
                KEY,
                "--rpc-url",
                "http://localhost:8545",
                "--nonce",
                "7",
                "--gas-limit",
                "3000000",
                "--priority-gas-price",
                "2",
                "--broadcast",
                "--json",
                "--constructor-args",
                "0x00000000000000000000000000000000000000aa",
            ]
        );

        Ok(())
    }

    #[test]
    fn verifies_only_with_api_key() {
        let plain = ForgeCreate::new(ContractSpec::name("AssetReview"));
        assert!(!args_of(&plain).contains(&"--verify".to_string()));

        let verified = ForgeCreate::new(ContractSpec::name("AssetReview"))
            .with_verification_api_key("api-key");
        let args = args_of(&verified);
        assert!(args.contains(&"--verify".to_string()));
        assert!(args.contains(&"api-key".to_string()));
    }

    #[test]
    fn strips_compiler_noise_around_json() -> eyre::Result<()> {
        let stdout = "Compiling 3 files with 0.8.19\n{\"deployer\":\"0x00000000000000000000000000000000000000aa\",\"deployedTo\":\"0x00000000000000000000000000000000000000bb\",\"transactionHash\":\"0x00000000000000000000000000000000000000000000000000000000000000cc\"}\n";

        let output: ForgeOutput = serde_json::from_str(strip_non_json(stdout))?;

        assert_eq!(output.deployer, Address::from_low_u64_be(0xaa));
        assert_eq!(output.deployed_to, Address::from_low_u64_be(0xbb));
        assert_eq!(output.transaction_hash, H256::from_low_u64_be(0xcc));

        Ok(())
    }
}
