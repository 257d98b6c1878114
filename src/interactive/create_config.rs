use std::path::PathBuf;

use crate::config::{Config, LinkPolicy};

use super::print_deployment_info;
use super::utils::{prompt_parsed, prompt_parsed_skippable};

pub async fn create_config_interactive() -> eyre::Result<PathBuf> {
    let config_path = loop {
        let filename = inquire::Text::new("Config filename:").prompt()?;

        let config_path = PathBuf::from(filename);

        if config_path.exists() {
            let overwrite =
                inquire::Confirm::new("Overwrite existing file?").prompt()?;

            if !overwrite {
                continue;
            }
        }

        break config_path;
    };

    let mut config = Config::default();

    config.contracts.root = inquire::Text::new("Forge project root:")
        .with_default(&config.contracts.root.display().to_string())
        .prompt()?
        .into();

    config.contracts.review = inquire::Text::new("Review contract name:")
        .with_default(&config.contracts.review)
        .prompt()?;

    config.contracts.auction = inquire::Text::new("Auction contract name:")
        .with_default(&config.contracts.auction)
        .prompt()?;

    config.link.policy = inquire::Select::new(
        "Link policy:",
        vec![LinkPolicy::Checked, LinkPolicy::Unchecked],
    )
    .prompt()?;

    if config.link.policy == LinkPolicy::Checked {
        config.link.verify_getter = prompt_parsed_skippable(
            "Getter returning the linked auction contract (Esc to skip):",
        )?;
    }

    config.confirmations = prompt_parsed("Confirmations:")?;

    print_deployment_info(&config);

    crate::serde_utils::write_serialize(&config_path, config).await?;

    Ok(config_path)
}
