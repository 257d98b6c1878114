use std::sync::Arc;

use ethers::types::Address;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::deployment::DeploymentContext;
use crate::report::ContractDeployment;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionDeployment {
    #[serde(flatten)]
    pub deployment: ContractDeployment,
    /// Review contract passed to the auction constructor
    pub review_address: Address,
}

#[instrument(name = "auction", skip_all)]
pub async fn deploy(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
    review: &ContractDeployment,
) -> eyre::Result<AuctionDeployment> {
    if review.address.is_zero() {
        eyre::bail!("Review contract address is unknown");
    }

    if let Some(previous_deployment) = context.report.auction.as_ref() {
        if previous_deployment.review_address == review.address {
            info!(
                address = ?previous_deployment.deployment.address,
                "Existing auction contract deployment found. Skipping."
            );
            return Ok(previous_deployment.clone());
        }

        warn!(
            previous_review = ?previous_deployment.review_address,
            current_review = ?review.address,
            "Existing auction contract points at another review contract. Redeploying."
        );
    }

    let deployment = context
        .ledger
        .deploy(
            &config.contracts.auction_spec(),
            vec![format!("{:?}", review.address)],
        )
        .await
        .wrap_err("deploying auction contract")?;

    info!(address = ?deployment.address, "Auction contract deployed");

    Ok(AuctionDeployment {
        deployment,
        review_address: review.address,
    })
}
