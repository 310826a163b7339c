use std::{thread::sleep, time::Duration};

use anyhow::Result;
use crossbeam::channel::Sender;

use crate::{logger, message::Message, panic_set_hook};

/// Drives time based updates of the render thread, such as the delayed
/// focus of the selector input.
pub struct Tick {
    tx: Sender<Message>,
    duration: Duration,
    tx_shutdown: Sender<Result<()>>,
}

impl Tick {
    pub fn new(tx: Sender<Message>, rate: Duration, tx_shutdown: Sender<Result<()>>) -> Self {
        Self {
            tx,
            duration: rate,
            tx_shutdown,
        }
    }

    pub fn start(&self) {
        logger!(info, "tick start");

        let ret = self.tick();

        if let Err(e) = &ret {
            logger!(error, "{}", e);
        }

        logger!(info, "tick end");

        if self.tx_shutdown.send(ret).is_err() {
            logger!(error, "Failed to send shutdown signal");
        }
    }

    pub fn set_panic_hook(&self) {
        let tx_shutdown = self.tx_shutdown.clone();

        panic_set_hook!({
            let _ = tx_shutdown.send(Err(anyhow::anyhow!("panic occurred in Tick worker")));
        });
    }

    fn tick(&self) -> Result<()> {
        loop {
            sleep(self.duration);

            self.tx.send(Message::Tick)?;
        }
    }
}
