mod controller;
mod worker;

pub use controller::*;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use tokio::runtime::Runtime;

use crate::{
    config::ProviderConfig, features::scope::provider::build_provider, logger, message::Message,
    panic_set_hook,
};

/// Runs the remote side of the scope selector: list fetches and cluster
/// connection checks.
#[derive(Debug, Clone)]
pub struct ScopeWorker {
    tx: Sender<Message>,
    rx: Receiver<Message>,
    tx_shutdown: Sender<Result<()>>,
    config: ProviderConfig,
}

impl ScopeWorker {
    pub fn new(
        tx: Sender<Message>,
        rx: Receiver<Message>,
        tx_shutdown: Sender<Result<()>>,
        config: ProviderConfig,
    ) -> Self {
        ScopeWorker {
            tx,
            rx,
            tx_shutdown,
            config,
        }
    }

    pub fn start(self) {
        logger!(info, "ScopeWorker start");

        let ret = Runtime::new()
            .map_err(anyhow::Error::from)
            .and_then(|rt| rt.block_on(start_controller(self.tx, self.rx, self.config)));

        if let Err(e) = &ret {
            logger!(error, "{}", e);
        }

        logger!(info, "ScopeWorker end");

        if self.tx_shutdown.send(ret).is_err() {
            logger!(error, "Failed to send shutdown signal");
        }
    }

    pub fn set_panic_hook(&self) {
        let tx_shutdown = self.tx_shutdown.clone();

        panic_set_hook!({
            let _ = tx_shutdown.send(Err(anyhow::anyhow!("panic occurred in ScopeWorker worker")));
        });
    }
}

async fn start_controller(
    tx: Sender<Message>,
    rx: Receiver<Message>,
    config: ProviderConfig,
) -> Result<()> {
    let (provider, connector) = build_provider(&config).await?;

    ScopeController::new(tx, rx, Arc::from(provider), connector)
        .run()
        .await
}
