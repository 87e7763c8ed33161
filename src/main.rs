mod cli;
mod dasm;
mod input;
mod mem;
mod monitor;
mod render;
mod rom;
mod util;

use crate::{
    cli::{Cli, CliCommand, LogLevelOption},
    input::Key,
    mem::{allocate_memory, PROGRAM_STARTING_ADDRESS},
    monitor::{Monitor, MonitorReply},
    render::{cleanup_terminal, setup_terminal, Renderer},
    rom::Rom,
    util::PollInterval,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::LevelFilter;

use std::{path::PathBuf, time::Duration};

const POLL_INTERVAL: Duration = Duration::from_millis(16);
const POLL_MAX_QUANTUM: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Dasm { path, log } => {
            if let Some(level) = log {
                simple_logger::init_with_level(level.to_level())?;
            }
            dump_listing(path)
        }
        CliCommand::Run { path, log } => run(path, log),
    }
}

/// Prints every word of the program image as `ADDR: HIHI LOLO mnemonic`.
fn dump_listing(path: PathBuf) -> Result<()> {
    let rom = Rom::read(&path).with_context(|| format!("Failed to read ROM {:?}", path))?;
    let memory = allocate_memory(&rom);

    let program_end = PROGRAM_STARTING_ADDRESS + rom.data.len() as u16;
    for addr in (PROGRAM_STARTING_ADDRESS..program_end).step_by(2) {
        println!(
            "{:04X}: {:02X}{:02X} {}",
            addr,
            memory[addr as usize],
            memory[addr as usize + 1],
            dasm::decode(&memory, addr)
        );
    }

    Ok(())
}

fn run(path: PathBuf, log: Option<LogLevelOption>) -> Result<()> {
    let logger_level = log.map_or(LevelFilter::Off, LogLevelOption::to_level_filter);
    let logging = logger_level != LevelFilter::Off;
    if logging {
        tui_logger::init_logger(logger_level)?;
        tui_logger::set_default_level(logger_level);
    }

    let rom = Rom::read(&path).with_context(|| format!("Failed to read ROM {:?}", path))?;
    let mut memory = allocate_memory(&rom);
    let mut monitor = Monitor::default();

    let renderer = Renderer {
        rom_name: rom.name.clone(),
        logging,
    };

    let mut terminal = setup_terminal()?;
    let mut interval = PollInterval::new(POLL_INTERVAL, POLL_MAX_QUANTUM);
    let mut should_draw = true;

    let result = 'event_loop: loop {
        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(event) = read() else { continue };

            match event {
                Event::Resize(_, _) => {
                    should_draw = true;
                }
                Event::Key(key_event) => {
                    // Esc or Ctrl+C exit the front-end
                    if key_event.code == KeyCode::Esc
                        || key_event.modifiers.contains(KeyModifiers::CONTROL)
                            && (key_event.code == KeyCode::Char('c')
                                || key_event.code == KeyCode::Char('C'))
                    {
                        break 'event_loop Ok(());
                    }

                    if let KeyEventKind::Press | KeyEventKind::Repeat = key_event.kind {
                        let Ok(key) = Key::try_from(key_event.code) else {
                            continue;
                        };

                        if monitor.is_active() || key == Key::Monitor {
                            match monitor.handle_event(key.to_monitor_event(), &mut memory) {
                                MonitorReply::Redraw => should_draw = true,
                                MonitorReply::Commit => {
                                    // persistence is the host's job and this
                                    // host keeps edits in memory only
                                    log::info!("commit requested; edits stay in memory");
                                }
                                MonitorReply::None => {}
                            }
                        } else if let Some(code) = key.keypad_code() {
                            // the interpreter is an external collaborator;
                            // this host only forwards and traces keypresses
                            log::debug!("keypad key {:X} pressed", code);
                        }
                    }
                }
                _ => (),
            }
        }

        // the logger pane refreshes on its own cadence
        if logging {
            should_draw = true;
        }

        if let Err(e) = renderer.step(&mut terminal, &monitor, &memory, should_draw) {
            break 'event_loop Err(e);
        }
        should_draw = false;

        interval.sleep();
    };

    cleanup_terminal(&mut terminal)?;
    result
}
