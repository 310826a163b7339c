use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Sender;
use ratatui::crossterm::event::{poll, read, Event, KeyEventKind};

use crate::{
    logger,
    message::{Message, UserEvent},
    panic_set_hook,
};

const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Forwards key presses and focus changes to the render thread.
pub struct UserInput {
    tx: Sender<Message>,
    tx_shutdown: Sender<Result<()>>,
}

impl UserInput {
    pub fn new(tx: Sender<Message>, tx_shutdown: Sender<Result<()>>) -> Self {
        Self { tx, tx_shutdown }
    }

    pub fn start(&self) {
        logger!(info, "user_input start");

        let ret = self.forward_events();

        if let Err(e) = &ret {
            logger!(error, "{}", e);
        }

        logger!(info, "user_input end");

        if self.tx_shutdown.send(ret).is_err() {
            logger!(error, "Failed to send shutdown signal");
        }
    }

    pub fn set_panic_hook(&self) {
        let tx_shutdown = self.tx_shutdown.clone();

        panic_set_hook!({
            let _ = tx_shutdown.send(Err(anyhow::anyhow!("panic occurred in UserInput worker")));
        });
    }

    /// Returns when the render thread is gone or the terminal fails.
    fn forward_events(&self) -> Result<()> {
        loop {
            if !poll(POLL_TIMEOUT)? {
                continue;
            }

            let ev = read()?;

            if let Some(ev) = user_event(ev) {
                logger!(debug, "{:?}", ev);

                self.tx.send(ev.into())?;
            }
        }
    }
}

/// Key releases, mouse, paste and resize events are not used by any view.
fn user_event(ev: Event) -> Option<UserEvent> {
    match ev {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(UserEvent::Key(key))
        }
        Event::FocusGained => Some(UserEvent::FocusGained),
        Event::FocusLost => Some(UserEvent::FocusLost),
        _ => None,
    }
}
