use std::path::PathBuf;

use self::create_config::create_config_interactive;
use crate::cli::Args;
use crate::config::Config;
use crate::deployment::steps::assemble_report::REPORT_PATH;
use crate::deployment::Cmd;
use crate::report::Report;
use crate::serde_utils;

mod create_config;
mod utils;

#[derive(Clone, Debug, derive_more::Display)]
enum MainMenu {
    #[display(fmt = "Proceed")]
    Proceed,
    #[display(fmt = "Redeploy auction contract")]
    RedeployAuction,
    #[display(fmt = "Start over")]
    StartOver,
}

/// Fills in whatever `cmd` is missing by prompting and lets the user review
/// the deployment before anything is sent.
pub async fn run_interactive_session(cmd: Args) -> eyre::Result<Cmd> {
    let deployment_name = if let Some(name) = cmd.deployment_name.as_ref() {
        println!("Currently working on deployment: {}", name);
        name.clone()
    } else {
        inquire::Text::new("Deployment name:").prompt()?
    };

    let private_key = if let Some(private_key) = cmd.private_key.as_ref() {
        println!("Using private key: {private_key}");
        private_key.clone()
    } else {
        let private_key = inquire::Password::new("Private key:")
            .without_confirmation()
            .prompt()?;
        private_key.parse()?
    };

    let rpc_url = if let Some(rpc_url) = cmd.rpc_url.as_ref() {
        println!("Using RPC: {rpc_url}");
        rpc_url.clone()
    } else {
        let rpc_url = inquire::Text::new("Rpc Url:").prompt()?;
        rpc_url.trim().parse()?
    };

    let etherscan_api_key =
        if let Some(etherscan_api_key) = cmd.etherscan_api_key.as_ref() {
            println!("Using Etherscan API key: {etherscan_api_key}");
            Some(etherscan_api_key.clone())
        } else if cmd.yes {
            None
        } else {
            let etherscan_api_key =
                inquire::Text::new("Etherscan API key (leave empty to skip):")
                    .prompt()?;

            if etherscan_api_key.trim().is_empty() {
                None
            } else {
                Some(etherscan_api_key)
            }
        };

    let config_path = if let Some(config) = cmd.config.as_ref() {
        println!("Using config at: {}", config.display());
        config.clone()
    } else {
        let config_path =
            inquire::Text::new("Path to config (leave empty to create):")
                .prompt()?;

        if config_path.trim().is_empty() {
            create_config_interactive().await?
        } else {
            PathBuf::from(config_path.trim())
        }
    };

    let deployment_dir = PathBuf::from(&deployment_name);
    let report_path = deployment_dir.join(REPORT_PATH);

    loop {
        let config = serde_utils::read_deserialize::<Config>(&config_path)
            .await?
            .with_link_policy(cmd.link_policy);

        println!("Deployment name: {deployment_name}");
        print_deployment_info(&config);

        if !report_path.exists() {
            if cmd.yes {
                break;
            }

            let proceed = inquire::Confirm::new(
                "No report found, do you want to proceed with this deployment?",
            )
            .prompt()?;

            if !proceed {
                std::process::exit(0);
            }

            break;
        }

        let mut report: Report =
            serde_utils::read_deserialize(&report_path).await?;

        print_report(&report);

        if cmd.yes {
            break;
        }

        match inquire::Select::new(
            "Menu:",
            vec![
                MainMenu::Proceed,
                MainMenu::RedeployAuction,
                MainMenu::StartOver,
            ],
        )
        .prompt_skippable()?
        {
            Some(MainMenu::Proceed) => break,
            Some(MainMenu::RedeployAuction) => report.invalidate_auction(),
            Some(MainMenu::StartOver) => {
                let confirmed = inquire::Confirm::new(
                    "This forgets every recorded contract, continue?",
                )
                .prompt()?;

                if !confirmed {
                    continue;
                }

                report.invalidate_all();
            }
            None => std::process::exit(0),
        }

        serde_utils::write_serialize(&report_path, &report).await?;
    }

    Ok(Cmd {
        target: cmd.target,
        config: config_path,
        deployment_name,
        private_key,
        rpc_url,
        etherscan_api_key,
        link_policy: cmd.link_policy,
    })
}

fn print_deployment_info(config: &Config) {
    println!("Contracts (forge root {}):", config.contracts.root.display());
    println!("  Review: {}", config.contracts.review);
    println!("  Auction: {}", config.contracts.auction);
    println!("Link:");
    println!("  Function: {}", config.link.function);
    println!("  Policy: {}", config.link.policy);
    if let Some(getter) = config.link.verify_getter.as_ref() {
        println!("  Verified through: {getter}");
    }
    println!("Confirmations: {}", config.confirmations);
}

fn print_report(report: &Report) {
    println!("Recorded deployment:");

    if let Some(review) = report.review.as_ref() {
        println!("  Review contract: {:?}", review.address);
    } else {
        println!("  Review contract: (undeployed)");
    }

    if let Some(auction) = report.auction.as_ref() {
        println!("  Auction contract: {:?}", auction.deployment.address);
    } else {
        println!("  Auction contract: (undeployed)");
    }

    if let Some(link) = report.link.as_ref() {
        println!("  Link: {}", link.status);
    } else {
        println!("  Link: (not sent)");
    }
}
