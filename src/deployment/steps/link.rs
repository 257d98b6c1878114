use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::{Address, H256};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::auction::AuctionDeployment;
use crate::config::{Config, LinkPolicy};
use crate::deployment::DeploymentContext;
use crate::ledger::ContractCall;
use crate::report::ContractDeployment;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Handed to the ledger, receipt never awaited
    #[display(fmt = "submitted")]
    Submitted,
    #[display(fmt = "confirmed")]
    Confirmed,
    /// Confirmed and read back from the review contract
    #[display(fmt = "verified")]
    Verified,
    /// Could not be submitted, ignored under the unchecked policy
    #[display(fmt = "failed")]
    Failed,
}

impl LinkStatus {
    pub fn is_settled(self) -> bool {
        matches!(self, LinkStatus::Confirmed | LinkStatus::Verified)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub review_address: Address,
    pub auction_address: Address,
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    pub status: LinkStatus,
}

impl LinkReport {
    pub fn links(
        &self,
        review_address: Address,
        auction_address: Address,
    ) -> bool {
        self.review_address == review_address
            && self.auction_address == auction_address
    }
}

/// Records the auction address on the review contract.
#[instrument(name = "link", skip_all)]
pub async fn link(
    context: Arc<DeploymentContext>,
    config: Arc<Config>,
    review: &ContractDeployment,
    auction: &AuctionDeployment,
) -> eyre::Result<LinkReport> {
    let review_address = review.address;
    let auction_address = auction.deployment.address;

    if let Some(previous_link) = context.report.link.as_ref() {
        if previous_link.status.is_settled()
            && previous_link.links(review_address, auction_address)
        {
            info!(
                status = %previous_link.status,
                "Auction contract already linked. Skipping."
            );
            return Ok(previous_link.clone());
        }
    }

    if auction.review_address != review_address {
        eyre::bail!(
            "Auction contract {auction_address:?} was constructed with review contract {:?}, not {review_address:?}",
            auction.review_address
        );
    }

    let call = ContractCall {
        contract: config.contracts.review_spec(),
        to: review_address,
        function_name: config.link.function.clone(),
        args: vec![Token::Address(auction_address)],
    };

    info!(
        policy = %config.link.policy,
        ?review_address,
        ?auction_address,
        "Linking auction contract into review contract"
    );

    match config.link.policy {
        LinkPolicy::Checked => {
            link_checked(context.as_ref(), config.as_ref(), call, auction_address)
                .await
        }
        LinkPolicy::Unchecked => {
            Ok(link_unchecked(context.as_ref(), call, auction_address).await)
        }
    }
}

async fn link_checked(
    context: &DeploymentContext,
    config: &Config,
    call: ContractCall,
    auction_address: Address,
) -> eyre::Result<LinkReport> {
    let review_address = call.to;
    let contract = call.contract.clone();
    let function_name = call.function_name.clone();

    let tx_hash = context
        .ledger
        .submit_call(call)
        .await
        .wrap_err_with(|| format!("submitting {function_name}"))?;

    let receipt = context
        .ledger
        .confirm_call(tx_hash)
        .await
        .wrap_err_with(|| format!("confirming {function_name}"))?;

    if !receipt.success {
        eyre::bail!(
            "{function_name} reverted in transaction {:?}",
            receipt.transaction_hash
        );
    }

    let mut status = LinkStatus::Confirmed;

    if let Some(getter) = config.link.verify_getter.as_deref() {
        let linked = context
            .ledger
            .read_address(&contract, review_address, getter)
            .await
            .wrap_err("reading back linked auction contract")?;

        if linked != auction_address {
            eyre::bail!(
                "Review contract returns {linked:?} from {getter}, expected {auction_address:?}"
            );
        }

        status = LinkStatus::Verified;
    }

    info!(?tx_hash, %status, "Auction contract linked");

    Ok(LinkReport {
        review_address,
        auction_address,
        transaction_hash: Some(tx_hash),
        status,
    })
}

/// Submits the call and moves on, the deployment succeeds regardless of
/// what happens to the transaction.
async fn link_unchecked(
    context: &DeploymentContext,
    call: ContractCall,
    auction_address: Address,
) -> LinkReport {
    let review_address = call.to;

    let (transaction_hash, status) = match context.ledger.submit_call(call).await
    {
        Ok(tx_hash) => {
            info!(?tx_hash, "Link submitted, not awaiting its receipt");
            (Some(tx_hash), LinkStatus::Submitted)
        }
        Err(err) => {
            warn!("Link submission failed, ignored under the unchecked policy: {err:?}");
            (None, LinkStatus::Failed)
        }
    };

    LinkReport {
        review_address,
        auction_address,
        transaction_hash,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mock::MockLedger;
    use crate::report::Report;

    fn deployment(address: u64) -> ContractDeployment {
        ContractDeployment {
            address: Address::from_low_u64_be(address),
            transaction_hash: None,
        }
    }

    #[tokio::test]
    async fn refuses_auction_built_for_another_review() -> eyre::Result<()> {
        let ledger = Arc::new(MockLedger::new());
        let config = Arc::new(Config::default());
        let context = Arc::new(DeploymentContext {
            deployment_dir: "unused".into(),
            report: Report::default_with_config(&config),
            ledger: ledger.clone(),
        });

        let review = deployment(0xb1);
        let auction = AuctionDeployment {
            deployment: deployment(0xa1),
            review_address: Address::from_low_u64_be(0xb2),
        };

        let err = link(context, config, &review, &auction).await.unwrap_err();

        assert!(err.to_string().contains("was constructed with"));
        assert!(ledger.events().await.is_empty());

        Ok(())
    }

    #[test]
    fn only_confirmed_links_are_settled() {
        assert!(!LinkStatus::Submitted.is_settled());
        assert!(!LinkStatus::Failed.is_settled());
        assert!(LinkStatus::Confirmed.is_settled());
        assert!(LinkStatus::Verified.is_settled());
    }
}
