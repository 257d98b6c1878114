use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::ContextCompat;
use tracing::info;

use self::steps::assemble_report::{self, REPORT_PATH};
use self::steps::{auction, link, review};
use crate::cli::DeploymentType;
use crate::config::Config;
use crate::ledger::EthersLedger;
use crate::report::Report;
use crate::serde_utils;

pub mod cmd;
pub mod deployment_context;
pub mod steps;

pub use self::cmd::Cmd;
pub use self::deployment_context::DeploymentContext;

pub async fn run_deployment(cmd: Cmd) -> eyre::Result<()> {
    let config: Config = serde_utils::read_deserialize(&cmd.config).await?;
    let config = config.with_link_policy(cmd.link_policy);

    let deployment_dir = PathBuf::from(&cmd.deployment_name);

    tokio::fs::create_dir_all(&deployment_dir).await?;

    let report = load_report(&deployment_dir, &config).await?;

    let ledger = EthersLedger::connect(
        cmd.private_key,
        cmd.rpc_url,
        cmd.etherscan_api_key,
        &config,
    )
    .await?;

    let context = DeploymentContext {
        deployment_dir,
        report,
        ledger: Arc::new(ledger),
    };

    let context = Arc::new(context);
    let config = Arc::new(config);

    let report = match cmd.target {
        DeploymentType::Full => full_deployment(context, config).await?,
        DeploymentType::Contracts => {
            contracts_deployment(context, config).await?
        }
        DeploymentType::Link => link_deployment(context, config).await?,
    };

    log_report(&report);

    Ok(())
}

/// Loads the report of a previous run under `deployment_dir`, dropping the
/// steps that no longer match `config`.
pub async fn load_report(
    deployment_dir: &Path,
    config: &Config,
) -> eyre::Result<Report> {
    let report_path = deployment_dir.join(REPORT_PATH);

    if !report_path.exists() {
        return Ok(Report::default_with_config(config));
    }

    let mut report: Report =
        serde_utils::read_deserialize(&report_path).await?;
    report.reconcile_with_config(config);

    Ok(report)
}

/// Deploys the review contract, then the auction contract pointing at it,
/// then records the auction contract on the review contract.
///
/// Every step is awaited before the next one starts and the report is
/// written after each of them.
pub async fn full_deployment(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
) -> eyre::Result<Report> {
    let review = review::deploy(context.clone(), config.clone()).await?;

    assemble_report::assemble_report(
        context.clone(),
        config.clone(),
        Some(&review),
        None,
        None,
    )
    .await?;

    let auction =
        auction::deploy(context.clone(), config.clone(), &review).await?;

    assemble_report::assemble_report(
        context.clone(),
        config.clone(),
        Some(&review),
        Some(&auction),
        None,
    )
    .await?;

    let link =
        link::link(context.clone(), config.clone(), &review, &auction).await?;

    assemble_report::assemble_report(
        context,
        config,
        Some(&review),
        Some(&auction),
        Some(&link),
    )
    .await
}

pub async fn contracts_deployment(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
) -> eyre::Result<Report> {
    let review = review::deploy(context.clone(), config.clone()).await?;

    assemble_report::assemble_report(
        context.clone(),
        config.clone(),
        Some(&review),
        None,
        None,
    )
    .await?;

    let auction =
        auction::deploy(context.clone(), config.clone(), &review).await?;

    let previous_link = context.report.link.as_ref().filter(|link| {
        link.links(review.address, auction.deployment.address)
    });

    assemble_report::assemble_report(
        context.clone(),
        config,
        Some(&review),
        Some(&auction),
        previous_link,
    )
    .await
}

pub async fn link_deployment(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
) -> eyre::Result<Report> {
    let review = context
        .report
        .review
        .clone()
        .context("No review contract in the report, deploy contracts first")?;

    let auction = context
        .report
        .auction
        .clone()
        .context("No auction contract in the report, deploy contracts first")?;

    let link =
        link::link(context.clone(), config.clone(), &review, &auction).await?;

    assemble_report::assemble_report(
        context,
        config,
        Some(&review),
        Some(&auction),
        Some(&link),
    )
    .await
}

fn log_report(report: &Report) {
    if let Some(review) = report.review.as_ref() {
        info!(address = ?review.address, "Review contract");
    }

    if let Some(auction) = report.auction.as_ref() {
        info!(address = ?auction.deployment.address, "Auction contract");
    }

    if let Some(link) = report.link.as_ref() {
        info!(status = %link.status, tx_hash = ?link.transaction_hash, "Link");
    }
}
