use crate::monitor::{Monitor, TextGrid, MONITOR_ROWS};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::Backend,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use std::io::{self, stdout};

pub type Terminal = tui::Terminal<CrosstermBackend<io::Stdout>>;

const MONITOR_WIDTH: u16 = 30;

pub fn setup_terminal() -> Result<Terminal> {
    // alternate screen so the user keeps their terminal history on exit,
    // raw mode so we own event handling and output
    enable_raw_mode().context("Failed to enable terminal raw mode")?;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate terminal screen")?;

    tui::Terminal::new(CrosstermBackend::new(stdout))
        .context("Failed to create interface to terminal backend")
}

pub fn cleanup_terminal(terminal: &mut Terminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable terminal raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate terminal screen")?;
    terminal
        .show_cursor()
        .context("Failed to show terminal cursor")?;
    Ok(())
}

/// Adapts a tui draw buffer to the monitor's fixed-width cell contract.
struct BufferGrid<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl TextGrid for BufferGrid<'_> {
    fn draw_text(&mut self, text: &str, column: u16, row: u16, inverted: bool) {
        if row >= self.area.height || column >= self.area.width {
            return;
        }

        let style = if inverted {
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        self.buf.set_stringn(
            self.area.x + column,
            self.area.y + row,
            text,
            (self.area.width - column) as usize,
            style,
        );
    }
}

pub struct MonitorWidget<'a> {
    pub monitor: &'a Monitor,
    pub memory: &'a [u8],
}

impl Widget for MonitorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.area() == 0 {
            return;
        }
        let mut grid = BufferGrid { buf, area };
        self.monitor.render(self.memory, &mut grid);
    }
}

pub struct Renderer {
    pub rom_name: String,
    pub logging: bool,
}

impl Renderer {
    pub fn step(
        &self,
        terminal: &mut Terminal,
        monitor: &Monitor,
        memory: &[u8],
        should_draw: bool,
    ) -> Result<()> {
        if should_draw {
            terminal.draw(|f| self.draw(f, monitor, memory))?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, f: &mut Frame<B>, monitor: &Monitor, memory: &[u8]) {
        let area = f.size();

        let [content_area, bottom_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(area.height.saturating_sub(1)),
                Constraint::Length(1),
            ])
            .split(area)[..] else { unreachable!() };

        let [panel_column, logger_column] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(MONITOR_WIDTH + 2),
                Constraint::Length(content_area.width.saturating_sub(MONITOR_WIDTH + 2)),
            ])
            .split(content_area)[..] else { unreachable!() };

        let panel_block = Block::default()
            .title(format!(" {} ", self.rom_name))
            .borders(Borders::ALL);
        let panel_area = panel_block.inner(panel_column);
        f.render_widget(panel_block, panel_column);

        let [monitor_area, hint_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(MONITOR_ROWS + 1),
                Constraint::Length(panel_area.height.saturating_sub(MONITOR_ROWS + 1)),
            ])
            .split(panel_area)[..] else { unreachable!() };

        if monitor.is_active() {
            f.render_widget(
                MonitorWidget { monitor, memory },
                monitor_area,
            );
            f.render_widget(
                Paragraph::new("0-F edit  \u{2190}/\u{2192} word  enter commit")
                    .style(Style::default().fg(Color::DarkGray)),
                hint_area,
            );
        } else {
            f.render_widget(
                Paragraph::new(
                    "Monitor inactive.\n\nHex keys feed the interpreter\nkeypad. Press m to inspect\nand edit memory.",
                ),
                monitor_area.union(hint_area),
            );
        }

        if self.logging {
            f.render_widget(logger_widget(), logger_column);
        }

        let bottom_style = Style::default().bg(Color::White).fg(Color::Black);
        f.render_widget(
            Paragraph::new(" m to toggle the monitor, Esc or Ctrl+C to exit").style(bottom_style),
            bottom_area,
        );
    }
}

fn logger_widget() -> TuiLoggerWidget<'static> {
    TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Log ")
                .border_style(Style::default().fg(Color::White))
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S%.3f".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_debug(Style::default().fg(Color::Cyan))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_trace(Style::default().fg(Color::White))
        .style_info(Style::default().fg(Color::Green))
}
