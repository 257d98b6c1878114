use std::sync::Arc;

use eyre::WrapErr;
use tracing::{info, instrument};

use crate::config::Config;
use crate::deployment::DeploymentContext;
use crate::report::ContractDeployment;

#[instrument(name = "review", skip_all)]
pub async fn deploy(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
) -> eyre::Result<ContractDeployment> {
    if let Some(previous_deployment) = context.report.review.as_ref() {
        info!(
            address = ?previous_deployment.address,
            "Existing review contract deployment found. Skipping."
        );
        return Ok(previous_deployment.clone());
    }

    let deployment = context
        .ledger
        .deploy(&config.contracts.review_spec(), vec![])
        .await
        .wrap_err("deploying review contract")?;

    info!(address = ?deployment.address, "Review contract deployed");

    Ok(deployment)
}
