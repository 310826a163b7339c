use std::{thread, time::Duration};

use anyhow::Result;
use crossbeam::channel::{bounded, Receiver, Sender};

use crate::{
    config::Config,
    logger,
    message::Message,
    workers::{Render, ScopeWorker, Tick, UserInput},
};

const TICK_RATE: Duration = Duration::from_millis(50);

pub struct App;

impl App {
    pub fn run(config: Config) -> Result<()> {
        let (tx_input, rx_main): (Sender<Message>, Receiver<Message>) = bounded(128);
        let (tx_main, rx_scope): (Sender<Message>, Receiver<Message>) = bounded(256);
        let tx_scope = tx_input.clone();
        let tx_tick = tx_input.clone();

        let (tx_shutdown, rx_shutdown) = bounded::<Result<()>>(1);

        let user_input = UserInput::new(tx_input.clone(), tx_shutdown.clone());

        let scope = ScopeWorker::new(
            tx_scope,
            rx_scope,
            tx_shutdown.clone(),
            config.provider.clone(),
        );

        let tick = Tick::new(tx_tick, TICK_RATE, tx_shutdown.clone());

        let render = Render::new(
            tx_main,
            rx_main,
            tx_shutdown.clone(),
            config.scope.clone(),
            config.logging.clone(),
        );

        logger!(info, "app start");

        thread::spawn(move || {
            scope.set_panic_hook();
            scope.start();
        });

        thread::spawn(move || {
            tick.set_panic_hook();
            tick.start();
        });

        thread::spawn(move || {
            user_input.set_panic_hook();
            user_input.start();
        });

        thread::spawn(move || {
            render.set_panic_hook();
            render.start();
        });

        let result = rx_shutdown.recv()?;

        logger!(info, "app end");

        result
    }
}
