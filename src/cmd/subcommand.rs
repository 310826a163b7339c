use anyhow::Result;
use clap::Parser;

use crate::{config::ProviderConfig, features::scope::provider::build_provider};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub enum SubCommand {
    /// Print the scopes of the configured provider and exit
    List,
}

impl SubCommand {
    pub fn run(self, config: &ProviderConfig) -> Result<()> {
        match self {
            SubCommand::List => print_scopes(config),
        }
    }
}

fn print_scopes(config: &ProviderConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (provider, _) = build_provider(config).await?;

        let list = provider.fetch().await?;

        list.items.iter().for_each(|scope| {
            println!("{}", scope);
        });

        list.errors.iter().for_each(|err| {
            eprintln!("{}", err);
        });

        anyhow::Ok(())
    })
}
