use crate::{dasm, mem::MEMORY_SIZE};

use std::fmt::Write;

pub const MONITOR_STARTING_ADDRESS: u16 = 0x200;
pub const MONITOR_LAST_ADDRESS: u16 = (MEMORY_SIZE - 2) as u16;

pub const MONITOR_ROWS: u16 = 5;
pub const MONITOR_CURSOR_ROW: u16 = 1; // cursor word renders as the second row

// fixed column layout of a monitor row: "01FE: ABCD  mnemonic"
pub const ADDRESS_COLUMN: u16 = 0;
pub const HEX_COLUMN: u16 = 6;
pub const ASM_COLUMN: u16 = 12;

/// Fixed-width cell text sink supplied by the host. `inverted` selects the
/// highlighted style used for the cursor nibble.
pub trait TextGrid {
    fn draw_text(&mut self, text: &str, column: u16, row: u16, inverted: bool);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MonitorEvent {
    MoveLeft,
    MoveRight,
    Toggle,
    Digit(u8),
    Commit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MonitorReply {
    /// Event consumed without a visible state change.
    None,
    /// State changed and the view must be repainted.
    Redraw,
    /// Operator asked for edits to be persisted. Persistence belongs to the
    /// host; the monitor itself performs no I/O.
    Commit,
}

/// Interactive memory monitor: a cursor over 2-byte words with hex-nibble
/// editing. A single instance owns all monitor state (mode flag, cursor
/// address, cursor nibble).
///
/// While active the monitor is the only writer of the shared memory buffer;
/// the host must not let the interpreter execute concurrently.
pub struct Monitor {
    active: bool,
    addr: u16,
    nibble: u8,
}

impl Default for Monitor {
    fn default() -> Self {
        Monitor {
            active: false,
            addr: MONITOR_STARTING_ADDRESS,
            nibble: 0,
        }
    }
}

impl Monitor {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn addr(&self) -> u16 {
        self.addr
    }

    pub fn nibble(&self) -> u8 {
        self.nibble
    }

    /// Handles one monitor event, mutating `memory` only for digit writes
    /// while active. Events other than `Toggle` are ignored while inactive;
    /// the host routes those to the interpreter keypad instead.
    pub fn handle_event(&mut self, event: MonitorEvent, memory: &mut [u8]) -> MonitorReply {
        if let MonitorEvent::Toggle = event {
            self.active = !self.active;
            if self.active {
                // the cursor never persists across sessions
                self.addr = MONITOR_STARTING_ADDRESS;
                self.nibble = 0;
                log::debug!("monitor activated at {:#05X}", self.addr);
            } else {
                log::debug!("monitor deactivated");
            }
            return MonitorReply::Redraw;
        }

        if !self.active {
            return MonitorReply::None;
        }

        match event {
            MonitorEvent::MoveLeft => {
                if self.addr >= MONITOR_STARTING_ADDRESS + 2 {
                    self.addr -= 2;
                    self.nibble = 0;
                    MonitorReply::Redraw
                } else {
                    MonitorReply::None
                }
            }
            MonitorEvent::MoveRight => {
                if self.addr < MONITOR_LAST_ADDRESS {
                    self.addr += 2;
                    self.nibble = 0;
                    MonitorReply::Redraw
                } else {
                    MonitorReply::None
                }
            }
            MonitorEvent::Digit(digit) => {
                self.write_nibble(digit & 0xF, memory);
                MonitorReply::Redraw
            }
            MonitorEvent::Commit => {
                log::info!("commit requested at {:#05X}", self.addr);
                MonitorReply::Commit
            }
            MonitorEvent::Toggle => unreachable!("toggle is handled above"),
        }
    }

    /// Replaces the nibble at the cursor and steps the cursor one nibble
    /// forward, rolling into the next word past nibble 3. Nibbles 0/1 are
    /// the high/low halves of the word's first byte, 2/3 of its second.
    fn write_nibble(&mut self, digit: u8, memory: &mut [u8]) {
        let slot = &mut memory[self.addr as usize + (self.nibble / 2) as usize];
        *slot = if self.nibble % 2 == 0 {
            (*slot & 0x0F) | digit << 4
        } else {
            (*slot & 0xF0) | digit
        };

        self.nibble += 1;
        if self.nibble == 4 {
            self.nibble = 0;
            // soft clamp at the top of memory, same as MoveRight
            if self.addr < MONITOR_LAST_ADDRESS {
                self.addr += 2;
            }
        }
    }

    /// Paints the five-row window: the cursor word is the second row, so the
    /// rows cover `addr - 2 ..= addr + 6`. Each row shows the address, the
    /// raw word as four hex nibble cells, and the decoded mnemonic. Exactly
    /// one nibble cell is drawn inverted: the cursor nibble on the cursor
    /// row. Rows past the last addressable word are left blank; the cursor
    /// word itself is always in range, so the highlight survives.
    pub fn render<G: TextGrid>(&self, memory: &[u8], grid: &mut G) {
        let mut line = String::with_capacity(16);

        for row in 0..MONITOR_ROWS {
            let addr = self.addr - 2 + 2 * row;
            if addr > MONITOR_LAST_ADDRESS {
                break;
            }

            line.clear();
            write!(line, "{:04X}:", addr).ok();
            grid.draw_text(&line, ADDRESS_COLUMN, row, false);

            line.clear();
            write!(line, "{:02X}{:02X}", memory[addr as usize], memory[addr as usize + 1]).ok();
            for n in 0..4u16 {
                let inverted = row == MONITOR_CURSOR_ROW && n == self.nibble as u16;
                grid.draw_text(&line[n as usize..n as usize + 1], HEX_COLUMN + n, row, inverted);
            }

            let asm = dasm::decode(memory, addr);
            if !asm.is_empty() {
                grid.draw_text(asm.as_str(), ASM_COLUMN, row, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingGrid {
        calls: Vec<(String, u16, u16, bool)>,
    }

    impl TextGrid for RecordingGrid {
        fn draw_text(&mut self, text: &str, column: u16, row: u16, inverted: bool) {
            self.calls.push((text.to_string(), column, row, inverted));
        }
    }

    fn active_monitor() -> (Monitor, Vec<u8>) {
        let mut monitor = Monitor::default();
        let mut memory = vec![0u8; MEMORY_SIZE];
        monitor.handle_event(MonitorEvent::Toggle, &mut memory);
        assert!(monitor.is_active());
        (monitor, memory)
    }

    #[test]
    fn starts_inactive_and_ignores_non_toggle_events() {
        let mut monitor = Monitor::default();
        let mut memory = vec![0u8; MEMORY_SIZE];

        for event in [
            MonitorEvent::MoveLeft,
            MonitorEvent::MoveRight,
            MonitorEvent::Digit(0xF),
            MonitorEvent::Commit,
        ] {
            assert_eq!(monitor.handle_event(event, &mut memory), MonitorReply::None);
        }

        assert!(!monitor.is_active());
        assert!(memory.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn nibble_write_round_trip() {
        let (mut monitor, mut memory) = active_monitor();

        for digit in [0x1, 0x2, 0x3, 0x4] {
            assert_eq!(
                monitor.handle_event(MonitorEvent::Digit(digit), &mut memory),
                MonitorReply::Redraw
            );
        }

        assert_eq!(&memory[0x200..0x202], &[0x12, 0x34]);
        assert_eq!(monitor.addr(), 0x202);
        assert_eq!(monitor.nibble(), 0);
    }

    #[test]
    fn nibble_writes_preserve_the_other_half_of_each_byte() {
        let (mut monitor, mut memory) = active_monitor();
        memory[0x200] = 0xAB;
        memory[0x201] = 0xCD;

        monitor.handle_event(MonitorEvent::Digit(0x5), &mut memory);
        assert_eq!(memory[0x200], 0x5B);

        monitor.handle_event(MonitorEvent::Digit(0x6), &mut memory);
        assert_eq!(memory[0x200], 0x56);

        monitor.handle_event(MonitorEvent::Digit(0x7), &mut memory);
        assert_eq!(memory[0x201], 0x7D);

        monitor.handle_event(MonitorEvent::Digit(0x8), &mut memory);
        assert_eq!(memory[0x201], 0x78);
    }

    #[test]
    fn movement_resets_nibble_and_clamps_at_boundaries() {
        let (mut monitor, mut memory) = active_monitor();

        assert_eq!(
            monitor.handle_event(MonitorEvent::MoveLeft, &mut memory),
            MonitorReply::None
        );
        assert_eq!(monitor.addr(), MONITOR_STARTING_ADDRESS);

        monitor.handle_event(MonitorEvent::Digit(0xA), &mut memory);
        assert_eq!(monitor.nibble(), 1);

        monitor.handle_event(MonitorEvent::MoveRight, &mut memory);
        assert_eq!(monitor.addr(), 0x202);
        assert_eq!(monitor.nibble(), 0);

        monitor.handle_event(MonitorEvent::MoveLeft, &mut memory);
        assert_eq!(monitor.addr(), 0x200);

        // walk to the last word then verify the right edge is a no-op that
        // leaves the nibble untouched
        while monitor.addr() < MONITOR_LAST_ADDRESS {
            monitor.handle_event(MonitorEvent::MoveRight, &mut memory);
        }
        monitor.handle_event(MonitorEvent::Digit(0xB), &mut memory);
        assert_eq!(monitor.nibble(), 1);
        assert_eq!(
            monitor.handle_event(MonitorEvent::MoveRight, &mut memory),
            MonitorReply::None
        );
        assert_eq!(monitor.addr(), MONITOR_LAST_ADDRESS);
        assert_eq!(monitor.nibble(), 1);
    }

    #[test]
    fn digit_wrap_clamps_at_the_last_word() {
        let (mut monitor, mut memory) = active_monitor();
        while monitor.addr() < MONITOR_LAST_ADDRESS {
            monitor.handle_event(MonitorEvent::MoveRight, &mut memory);
        }

        for digit in [0xD, 0xE, 0xA, 0xD] {
            monitor.handle_event(MonitorEvent::Digit(digit), &mut memory);
        }

        assert_eq!(&memory[MEMORY_SIZE - 2..], &[0xDE, 0xAD]);
        assert_eq!(monitor.addr(), MONITOR_LAST_ADDRESS);
        assert_eq!(monitor.nibble(), 0);
    }

    #[test]
    fn reentry_resets_the_cursor_instead_of_restoring_it() {
        let (mut monitor, mut memory) = active_monitor();

        monitor.handle_event(MonitorEvent::MoveRight, &mut memory);
        monitor.handle_event(MonitorEvent::Digit(0x9), &mut memory);
        assert_eq!(monitor.addr(), 0x202);
        assert_eq!(monitor.nibble(), 1);

        monitor.handle_event(MonitorEvent::Toggle, &mut memory);
        assert!(!monitor.is_active());
        monitor.handle_event(MonitorEvent::Toggle, &mut memory);
        assert!(monitor.is_active());

        assert_eq!(monitor.addr(), MONITOR_STARTING_ADDRESS);
        assert_eq!(monitor.nibble(), 0);
    }

    #[test]
    fn toggling_twice_returns_to_the_inactive_state() {
        let mut monitor = Monitor::default();
        let mut memory = vec![0u8; MEMORY_SIZE];

        monitor.handle_event(MonitorEvent::Toggle, &mut memory);
        monitor.handle_event(MonitorEvent::Toggle, &mut memory);

        assert!(!monitor.is_active());
        assert_eq!(
            monitor.handle_event(MonitorEvent::Digit(0x1), &mut memory),
            MonitorReply::None
        );
        assert!(memory.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn commit_signals_the_host_without_touching_memory() {
        let (mut monitor, mut memory) = active_monitor();
        let before = memory.clone();

        assert_eq!(
            monitor.handle_event(MonitorEvent::Commit, &mut memory),
            MonitorReply::Commit
        );
        assert_eq!(memory, before);
        assert_eq!(monitor.addr(), MONITOR_STARTING_ADDRESS);
    }

    #[test]
    fn render_window_centers_the_cursor_as_the_second_row() {
        let (mut monitor, mut memory) = active_monitor();
        monitor.handle_event(MonitorEvent::MoveRight, &mut memory);

        let mut grid = RecordingGrid::default();
        monitor.render(&memory, &mut grid);

        let addresses: Vec<String> = grid
            .calls
            .iter()
            .filter(|(_, column, _, _)| *column == ADDRESS_COLUMN)
            .map(|(text, _, _, _)| text.clone())
            .collect();
        assert_eq!(
            addresses,
            ["0200:", "0202:", "0204:", "0206:", "0208:"]
        );
    }

    #[test]
    fn render_at_the_last_word_blanks_rows_past_memory() {
        let (mut monitor, mut memory) = active_monitor();
        while monitor.addr() < MONITOR_LAST_ADDRESS {
            monitor.handle_event(MonitorEvent::MoveRight, &mut memory);
        }

        let mut grid = RecordingGrid::default();
        monitor.render(&memory, &mut grid);

        // only the two in-range rows are drawn, cursor word still second
        let addresses: Vec<String> = grid
            .calls
            .iter()
            .filter(|(_, column, _, _)| *column == ADDRESS_COLUMN)
            .map(|(text, _, _, _)| text.clone())
            .collect();
        assert_eq!(addresses, ["0FFC:", "0FFE:"]);
        assert!(grid.calls.iter().all(|(_, _, row, _)| *row <= MONITOR_CURSOR_ROW));

        let highlighted: Vec<_> = grid
            .calls
            .iter()
            .filter(|(_, _, _, inverted)| *inverted)
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].1, HEX_COLUMN);
        assert_eq!(highlighted[0].2, MONITOR_CURSOR_ROW);
    }

    #[test]
    fn render_near_the_top_of_memory_truncates_the_window() {
        let (mut monitor, mut memory) = active_monitor();
        while monitor.addr() < 0xFFA {
            monitor.handle_event(MonitorEvent::MoveRight, &mut memory);
        }

        let mut grid = RecordingGrid::default();
        monitor.render(&memory, &mut grid);

        let addresses: Vec<String> = grid
            .calls
            .iter()
            .filter(|(_, column, _, _)| *column == ADDRESS_COLUMN)
            .map(|(text, _, _, _)| text.clone())
            .collect();
        assert_eq!(addresses, ["0FF8:", "0FFA:", "0FFC:", "0FFE:"]);

        let highlighted: Vec<_> = grid
            .calls
            .iter()
            .filter(|(_, _, _, inverted)| *inverted)
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].2, MONITOR_CURSOR_ROW);
    }

    #[test]
    fn render_shows_mnemonics_and_raw_hex_per_row() {
        let (mut monitor, mut memory) = active_monitor();
        memory[0x200] = 0x00;
        memory[0x201] = 0xE0;
        memory[0x202] = 0x61;
        memory[0x203] = 0x0A;

        let mut grid = RecordingGrid::default();
        monitor.render(&memory, &mut grid);

        // cursor row (0x200) is row 1
        assert!(grid
            .calls
            .iter()
            .any(|call| call == &("cls".to_string(), ASM_COLUMN, 1, false)));
        assert!(grid
            .calls
            .iter()
            .any(|call| call == &("ld v1,0A".to_string(), ASM_COLUMN, 2, false)));

        let row_1_hex: String = grid
            .calls
            .iter()
            .filter(|(_, column, row, _)| *row == 1 && (HEX_COLUMN..HEX_COLUMN + 4).contains(column))
            .map(|(text, _, _, _)| text.as_str())
            .collect();
        assert_eq!(row_1_hex, "00E0");
    }

    #[test]
    fn exactly_one_nibble_cell_is_highlighted() {
        let (mut monitor, mut memory) = active_monitor();

        for _ in 0..3 {
            let mut grid = RecordingGrid::default();
            monitor.render(&memory, &mut grid);

            let highlighted: Vec<_> = grid
                .calls
                .iter()
                .filter(|(_, _, _, inverted)| *inverted)
                .collect();
            assert_eq!(highlighted.len(), 1);

            let &(_, column, row, _) = &highlighted[0];
            assert_eq!(*row, MONITOR_CURSOR_ROW);
            assert_eq!(*column, HEX_COLUMN + monitor.nibble() as u16);

            monitor.handle_event(MonitorEvent::Digit(0xC), &mut memory);
        }
    }
}
