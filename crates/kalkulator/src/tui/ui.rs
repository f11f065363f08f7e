//! TUI rendering
//!
//! The display lines are rendered as literal text: right-aligned, one line
//! each, cut with a trailing ellipsis when they overflow.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
    Frame,
};

use super::app::CalculatorApp;
use super::keypad::KeypadWidget;

/// Renders the calculator UI and returns the area the keypad occupies
pub fn render(app: &CalculatorApp, frame: &mut Frame) -> Rect {
    let area = frame.area();
    let keypad_area = CalculatorUI::keypad_area(area);
    frame.render_widget(CalculatorUI::new(app), area);
    keypad_area
}

/// Shortens `text` to at most `width` characters, ending in `…` if cut
#[must_use]
pub fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

/// Calculator UI widget
#[derive(Debug)]
pub struct CalculatorUI<'a> {
    app: &'a CalculatorApp,
}

impl<'a> CalculatorUI<'a> {
    /// Creates a new calculator UI widget
    #[must_use]
    pub fn new(app: &'a CalculatorApp) -> Self {
        Self { app }
    }

    /// Splits the screen into the calculator column and the tape sidebar
    fn create_horizontal_layout(area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Min(28), Constraint::Length(26)])
            .split(area)
            .to_vec()
    }

    /// Splits the calculator column into display, keypad and help line
    fn create_layout(area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Expression
                Constraint::Length(3), // Result
                Constraint::Min(12),   // Keypad
                Constraint::Length(1), // Help
            ])
            .split(area)
            .to_vec()
    }

    /// Where the keypad lands for a given screen area
    #[must_use]
    pub fn keypad_area(area: Rect) -> Rect {
        let columns = Self::create_horizontal_layout(area);
        Self::create_layout(columns[0])[2]
    }

    fn render_line(text: &str, style: Style, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(2) as usize;
        Paragraph::new(Span::styled(truncate_with_ellipsis(text, width), style))
            .alignment(Alignment::Right)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buf);
    }

    fn render_expression(&self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::DIM);
        Self::render_line(&self.app.display().expression, style, area, buf);
    }

    fn render_result(&self, area: Rect, buf: &mut Buffer) {
        let display = self.app.display();
        let text = if display.has_result() {
            format!("= {}", display.result)
        } else {
            String::new()
        };
        let color = if display.result == "Error" {
            Color::Red
        } else {
            Color::White
        };
        let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        Self::render_line(&text, style, area, buf);
    }

    fn render_tape(&self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .app
            .engine()
            .history()
            .iter_rev()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        truncate_with_ellipsis(&entry.display(), width),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();

        List::new(items)
            .block(
                Block::default()
                    .title(" Tape ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .render(area, buf);
    }

    fn render_help(area: Rect, buf: &mut Buffer) {
        Paragraph::new(Span::styled(
            HELP_LINE,
            Style::default().fg(Color::DarkGray),
        ))
        .render(area, buf);
    }
}

impl Widget for CalculatorUI<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .render(area, buf);

        let columns = Self::create_horizontal_layout(area);
        let chunks = Self::create_layout(columns[0]);

        self.render_expression(chunks[0], buf);
        self.render_result(chunks[1], buf);
        KeypadWidget::new(self.app.keypad())
            .focus(self.app.focus())
            .render(chunks[2], buf);
        Self::render_help(chunks[3], buf);
        self.render_tape(columns[1], buf);
    }
}

/// Window title
pub const TITLE: &str = " Kalkulator ";

/// One-line usage hint under the keypad
pub const HELP_LINE: &str = "click / ←↑↓→ + Enter · q quit";
