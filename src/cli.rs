use std::path::PathBuf;

use clap::Parser;

use crate::game::ModeKind;

/// Chess in the terminal, sober or otherwise.
///
/// Click a piece, then click where it should go; right click drops the
/// selection. Set RUST_LOG to control what goes into the log file.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Rules to start with; switch at any time with 1 and 2
    #[arg(long, value_enum, default_value_t = ModeKind::Classic)]
    pub mode: ModeKind,

    /// Seed for drunk chess, for reproducible staggering
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write logs; nothing is logged without it
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
