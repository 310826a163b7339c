use anyhow::Result;
use ratatui::crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

pub fn signal_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();

        std::process::exit(0);
    })?;

    Ok(())
}
