mod action;
mod view;

pub use action::{RenderAction, RenderState};

use std::{io, time::Instant};

use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};

use crate::{
    config::{LoggingConfig, ScopeConfig},
    logger,
    message::Message,
    panic_set_hook,
};

pub struct Render {
    tx: Sender<Message>,
    rx: Receiver<Message>,
    tx_shutdown: Sender<Result<()>>,
    config: ScopeConfig,
    logging: LoggingConfig,
}

impl Render {
    pub fn new(
        tx: Sender<Message>,
        rx: Receiver<Message>,
        tx_shutdown: Sender<Result<()>>,
        config: ScopeConfig,
        logging: LoggingConfig,
    ) -> Self {
        Self {
            tx,
            rx,
            tx_shutdown,
            config,
            logging,
        }
    }

    pub fn start(&self) {
        logger!(info, "render start");

        let ret = self.render();

        if let Err(e) = &ret {
            logger!(error, "{}", e);
        }

        logger!(info, "render end");

        if self.tx_shutdown.send(ret).is_err() {
            logger!(error, "Failed to send shutdown signal");
        }
    }

    pub fn set_panic_hook(&self) {
        let tx_shutdown = self.tx_shutdown.clone();

        panic_set_hook!({
            let _ = tx_shutdown.send(Err(anyhow::anyhow!("panic occurred in Render worker")));
        });
    }

    fn render(&self) -> Result<()> {
        let mut state = RenderState::new(
            &self.config,
            self.logging.notifications(),
            self.tx.clone(),
        );

        state.init();

        let mut terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Fullscreen,
            },
        )?;

        terminal.clear()?;

        loop {
            terminal.draw(|f| {
                view::draw(f, &state);
            })?;

            let msg = self.rx.recv()?;

            if let RenderAction::Quit = state.update(msg, Instant::now()) {
                break;
            }
        }

        state.destroy();

        Ok(())
    }
}
