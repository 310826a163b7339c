use std::{io, panic};

use anyhow::Result;
use ratatui::crossterm::{
    cursor::Show,
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use kubescope::{
    app::App,
    cmd::Command,
    config::Config,
    logging::Logger,
    signal::signal_handler,
};

fn enable_raw_mode() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)
}

fn disable_raw_mode() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    terminal::disable_raw_mode()
}

fn main() -> Result<()> {
    let cmd = Command::init();

    let mut config = Config::load(cmd.config_load_option()?)?;

    cmd.apply(&mut config);

    if cmd.logging {
        Logger::init()?;
    }

    if let Some(subcommand) = cmd.subcommand {
        return subcommand.run(&config.provider);
    }

    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();

        eprintln!("\x1b[31mPanic! disable raw mode\x1b[39m");

        default_hook(info);
    }));

    signal_handler()?;

    enable_raw_mode()?;

    let result = App::run(config);

    disable_raw_mode()?;

    result
}
