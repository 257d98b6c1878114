use std::sync::Arc;

use tracing::instrument;

use super::auction::AuctionDeployment;
use super::link::LinkReport;
use crate::config::Config;
use crate::deployment::DeploymentContext;
use crate::report::{ContractDeployment, Report};
use crate::serde_utils;

pub const REPORT_PATH: &str = "report.yml";

#[instrument(skip_all)]
pub async fn assemble_report(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
    review: Option<&ContractDeployment>,
    auction: Option<&AuctionDeployment>,
    link: Option<&LinkReport>,
) -> eyre::Result<Report> {
    let report = Report {
        config: config.as_ref().clone(),
        review: review.cloned(),
        auction: auction.cloned(),
        link: link.cloned(),
    };

    serde_utils::write_serialize(context.report_path(), &report).await?;

    Ok(report)
}
