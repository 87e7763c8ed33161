use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// c8mon: front-end monitor for a CHIP-8 interpreter. Disassembles ROM
/// images and opens an interactive memory monitor with nibble-level editing.
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(ValueEnum, Clone, Copy)]
pub enum LogLevelOption {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevelOption {
    pub fn to_level(self) -> Level {
        match self {
            LogLevelOption::Trace => Level::Trace,
            LogLevelOption::Debug => Level::Debug,
            LogLevelOption::Info => Level::Info,
            LogLevelOption::Warn => Level::Warn,
            LogLevelOption::Error => Level::Error,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevelOption::Trace => LevelFilter::Trace,
            LogLevelOption::Debug => LevelFilter::Debug,
            LogLevelOption::Info => LevelFilter::Info,
            LogLevelOption::Warn => LevelFilter::Warn,
            LogLevelOption::Error => LevelFilter::Error,
        }
    }
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// DASM: Disassembles a CHIP-8 ROM to stdout
    Dasm {
        /// Path of the ROM to load
        #[arg(value_name = "ROM")]
        path: PathBuf,

        /// Enable logging
        #[arg(short, long, value_enum, value_name = "LEVEL")]
        log: Option<LogLevelOption>,
    },

    /// RUN: Loads a CHIP-8 ROM and opens the interactive monitor
    Run {
        /// Path of the ROM to load
        #[arg(value_name = "ROM")]
        path: PathBuf,

        /// Enable logging
        #[arg(short, long, value_enum, value_name = "LEVEL")]
        log: Option<LogLevelOption>,
    },
}
