use std::{
    fs::File,
    io::{self, stdout},
    path::Path,
    sync::Mutex,
};

use clap::Parser;
use colored::Colorize;
use drunkchess::{cli::Cli, error::AppError, game::PieceColor, tui::Tui};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.to_owned(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Runs `body` between `enter` and `leave`. `leave` runs even when `enter`
/// or `body` fails; the first error wins.
fn bracket<T>(
    enter: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> io::Result<T>,
    leave: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    let outcome = enter().and_then(|()| body());
    let left = leave();
    let outcome = outcome?;
    left?;
    Ok(outcome)
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    info!(mode = ?cli.mode, seed = ?cli.seed, "starting");

    let mut terminal = ratatui::init();
    let outcome = bracket(
        || execute!(stdout(), EnableMouseCapture),
        || Tui::new(cli.mode, cli.seed).run(&mut terminal),
        || {
            let released = execute!(stdout(), DisableMouseCapture);
            ratatui::restore();
            released
        },
    )?;

    match outcome {
        Some(winner) => {
            let message = format!("{winner} wins!");
            let message = match winner {
                PieceColor::White => message.white(),
                PieceColor::Black => message.bright_black(),
            };
            println!("{}", message.bold());
        }
        None => println!("{}", "Game abandoned.".dimmed()),
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, io};

    use super::bracket;

    #[test]
    fn leave_runs_when_enter_fails() {
        let left = Cell::new(false);
        let ran = Cell::new(false);
        let outcome = bracket(
            || Err(io::Error::other("no mouse")),
            || {
                ran.set(true);
                Ok(1)
            },
            || {
                left.set(true);
                Ok(())
            },
        );
        assert_eq!(outcome.map_err(|err| err.to_string()), Err("no mouse".into()));
        assert!(!ran.get());
        assert!(left.get());
    }

    #[test]
    fn leave_error_surfaces_after_a_clean_body() {
        let outcome = bracket(|| Ok(()), || Ok(7), || Err(io::Error::other("stuck")));
        assert_eq!(outcome.map_err(|err| err.to_string()), Err("stuck".into()));
        assert_eq!(bracket(|| Ok(()), || Ok(7), || Ok(())).ok(), Some(7));
    }
}
