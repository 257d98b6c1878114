use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::deployment::steps::auction::AuctionDeployment;
use crate::deployment::steps::link::LinkReport;

pub mod contract_deployment;

pub use self::contract_deployment::ContractDeployment;

/// Everything deployed so far under one deployment name.
///
/// Steps recorded here are reused when the deployment is resumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub config: Config,

    #[serde(default)]
    pub review: Option<ContractDeployment>,

    #[serde(default)]
    pub auction: Option<AuctionDeployment>,

    #[serde(default)]
    pub link: Option<LinkReport>,
}

impl Report {
    pub fn default_with_config(config: &Config) -> Self {
        Self {
            config: config.clone(),
            review: Default::default(),
            auction: Default::default(),
            link: Default::default(),
        }
    }

    pub fn invalidate_link(&mut self) {
        self.link = None;
    }

    pub fn invalidate_auction(&mut self) {
        self.auction = None;
        self.invalidate_link();
    }

    pub fn invalidate_all(&mut self) {
        self.review = None;
        self.invalidate_auction();
    }

    /// Drops recorded steps that were deployed from a different contract
    /// setup than `config` describes.
    pub fn reconcile_with_config(&mut self, config: &Config) {
        let previous = &self.config;

        if previous.contracts.root != config.contracts.root
            || previous.contracts.review != config.contracts.review
        {
            warn!("Review contract changed, discarding previous deployment");
            self.invalidate_all();
        } else if previous.contracts.auction != config.contracts.auction {
            warn!("Auction contract changed, discarding previous deployment");
            self.invalidate_auction();
        } else if previous.link.function != config.link.function {
            warn!("Link function changed, discarding previous link");
            self.invalidate_link();
        }

        self.config = config.clone();
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, H256};
    use indoc::indoc;

    use super::*;
    use crate::deployment::steps::link::LinkStatus;

    fn deployment(n: u64) -> ContractDeployment {
        ContractDeployment {
            address: Address::from_low_u64_be(n),
            transaction_hash: Some(H256::from_low_u64_be(n)),
        }
    }

    fn complete_report() -> Report {
        Report {
            config: Config::default(),
            review: Some(deployment(1)),
            auction: Some(AuctionDeployment {
                deployment: deployment(2),
                review_address: Address::from_low_u64_be(1),
            }),
            link: Some(LinkReport {
                review_address: Address::from_low_u64_be(1),
                auction_address: Address::from_low_u64_be(2),
                transaction_hash: Some(H256::from_low_u64_be(3)),
                status: LinkStatus::Confirmed,
            }),
        }
    }

    #[test]
    fn parses_partial_report() -> eyre::Result<()> {
        let report: Report = serde_yaml::from_str(indoc! {r#"
            config:
              contracts:
                review: AssetReview
                auction: ERC1155Auction
            review:
              address: "0x00000000000000000000000000000000000000aa"
        "#})?;

        assert_eq!(
            report.review.map(|review| review.address),
            Some(Address::from_low_u64_be(0xaa))
        );
        assert!(report.auction.is_none());
        assert!(report.link.is_none());

        Ok(())
    }

    #[test]
    fn unchanged_config_keeps_everything() {
        let mut report = complete_report();

        report.reconcile_with_config(&Config::default());

        assert_eq!(report, complete_report());
    }

    #[test]
    fn changed_auction_contract_drops_auction_and_link() {
        let mut report = complete_report();
        let mut config = Config::default();
        config.contracts.auction = "DutchAuction".to_string();

        report.reconcile_with_config(&config);

        assert!(report.review.is_some());
        assert!(report.auction.is_none());
        assert!(report.link.is_none());
        assert_eq!(report.config, config);
    }

    #[test]
    fn changed_review_contract_drops_everything() {
        let mut report = complete_report();
        let mut config = Config::default();
        config.contracts.review = "Review".to_string();

        report.reconcile_with_config(&config);

        assert_eq!(report, Report::default_with_config(&config));
    }

    #[test]
    fn changed_link_function_only_drops_link() {
        let mut report = complete_report();
        let mut config = Config::default();
        config.link.function = "setAuction".to_string();

        report.reconcile_with_config(&config);

        assert!(report.review.is_some());
        assert!(report.auction.is_some());
        assert!(report.link.is_none());
    }
}
