//! On-screen keypad for the terminal calculator
//!
//! The grid mirrors a phone calculator:
//!
//! ```text
//! [ C ] [ % ] [DEL] [ ÷ ]
//! [ 7 ] [ 8 ] [ 9 ] [ × ]
//! [ 4 ] [ 5 ] [ 6 ] [ - ]
//! [ 1 ] [ 2 ] [ 3 ] [ + ]
//! [    0    ] [ . ] [ = ]
//! ```
//!
//! Buttons can be clicked with the mouse or reached with the arrow keys.
//! Colors only tell button groups apart; they carry no meaning for the engine.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::core::{CalculatorEvent, Operation};

/// Visual grouping of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Clear and delete
    Control,
    /// Binary operators
    Operator,
    /// Equals
    Equals,
    /// Digits and the decimal point
    Digit,
}

impl ButtonKind {
    /// Resting style for buttons of this kind
    #[must_use]
    pub fn style(self) -> Style {
        match self {
            Self::Control => Style::default().fg(Color::Red),
            Self::Operator => Style::default().fg(Color::Yellow),
            Self::Equals => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            Self::Digit => Style::default().fg(Color::White),
        }
    }
}

/// A single keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// Text on the button
    pub label: &'static str,
    /// Event sent to the engine when pressed
    pub event: CalculatorEvent,
    /// Color group
    pub kind: ButtonKind,
    /// Whether the button is currently highlighted as pressed
    pub pressed: bool,
    /// Grid row
    pub row: usize,
    /// First grid column
    pub col: usize,
    /// Number of columns the button covers
    pub span: usize,
}

impl KeypadButton {
    fn new(label: &'static str, event: CalculatorEvent, kind: ButtonKind) -> Self {
        Self {
            label,
            event,
            kind,
            pressed: false,
            row: 0,
            col: 0,
            span: 1,
        }
    }

    /// Creates a digit button
    #[must_use]
    pub fn digit(d: u8) -> Self {
        const LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        let label = LABELS.get(usize::from(d)).copied().unwrap_or("?");
        Self::new(label, CalculatorEvent::Digit(d), ButtonKind::Digit)
    }

    /// Creates an operator button
    #[must_use]
    pub fn operator(op: Operation) -> Self {
        Self::new(op.symbol(), CalculatorEvent::Operator(op), ButtonKind::Operator)
    }

    /// Creates the decimal point button
    #[must_use]
    pub fn decimal() -> Self {
        Self::new(".", CalculatorEvent::Decimal, ButtonKind::Digit)
    }

    /// Creates the equals button
    #[must_use]
    pub fn equals() -> Self {
        Self::new("=", CalculatorEvent::Calculate, ButtonKind::Equals)
    }

    /// Creates the clear button
    #[must_use]
    pub fn clear() -> Self {
        Self::new("C", CalculatorEvent::Clear, ButtonKind::Control)
    }

    /// Creates the delete button
    #[must_use]
    pub fn delete() -> Self {
        Self::new("DEL", CalculatorEvent::Backspace, ButtonKind::Control)
    }

    /// Sets the pressed state
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Returns true if the button covers grid cell (row, col)
    #[must_use]
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row == row && col >= self.col && col < self.col + self.span
    }
}

/// Direction for keyboard focus movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    /// One row up
    Up,
    /// One row down
    Down,
    /// One column left
    Left,
    /// One column right
    Right,
}

/// The keypad layout - 5 rows x 4 columns, with a double-width 0
#[derive(Debug, Clone)]
pub struct Keypad {
    buttons: Vec<KeypadButton>,
    cols: usize,
    rows: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    /// Creates the standard keypad
    #[must_use]
    pub fn new() -> Self {
        let layout: Vec<Vec<(KeypadButton, usize)>> = vec![
            vec![
                (KeypadButton::clear(), 1),
                (KeypadButton::operator(Operation::Percent), 1),
                (KeypadButton::delete(), 1),
                (KeypadButton::operator(Operation::Divide), 1),
            ],
            vec![
                (KeypadButton::digit(7), 1),
                (KeypadButton::digit(8), 1),
                (KeypadButton::digit(9), 1),
                (KeypadButton::operator(Operation::Multiply), 1),
            ],
            vec![
                (KeypadButton::digit(4), 1),
                (KeypadButton::digit(5), 1),
                (KeypadButton::digit(6), 1),
                (KeypadButton::operator(Operation::Subtract), 1),
            ],
            vec![
                (KeypadButton::digit(1), 1),
                (KeypadButton::digit(2), 1),
                (KeypadButton::digit(3), 1),
                (KeypadButton::operator(Operation::Add), 1),
            ],
            vec![
                (KeypadButton::digit(0), 2),
                (KeypadButton::decimal(), 1),
                (KeypadButton::equals(), 1),
            ],
        ];

        let mut buttons = Vec::new();
        for (row, entries) in layout.into_iter().enumerate() {
            let mut col = 0;
            for (mut button, span) in entries {
                button.row = row;
                button.col = col;
                button.span = span;
                col += span;
                buttons.push(button);
            }
        }

        Self {
            buttons,
            cols: 4,
            rows: 5,
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets a button by index
    #[must_use]
    pub fn get_button(&self, index: usize) -> Option<&KeypadButton> {
        self.buttons.get(index)
    }

    /// Index of the button covering grid cell (row, col)
    #[must_use]
    pub fn index_at(&self, row: usize, col: usize) -> Option<usize> {
        self.buttons.iter().position(|b| b.covers(row, col))
    }

    /// Gets the button covering grid cell (row, col)
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButton> {
        self.index_at(row, col).and_then(|i| self.buttons.get(i))
    }

    /// Finds a button by its label
    #[must_use]
    pub fn find_button_by_label(&self, label: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b.label == label)
    }

    /// Finds the button that sends `event`
    #[must_use]
    pub fn find_button_by_event(&self, event: CalculatorEvent) -> Option<usize> {
        self.buttons.iter().position(|b| b.event == event)
    }

    /// Highlights one button, releasing all others
    pub fn press_button(&mut self, index: usize) {
        self.release_all();
        if let Some(btn) = self.buttons.get_mut(index) {
            btn.set_pressed(true);
        }
    }

    /// Releases all buttons
    pub fn release_all(&mut self) {
        for btn in &mut self.buttons {
            btn.set_pressed(false);
        }
    }

    /// Returns an iterator over all buttons
    pub fn buttons(&self) -> impl Iterator<Item = &KeypadButton> {
        self.buttons.iter()
    }

    /// Moves focus from button `from` one step in `direction`.
    ///
    /// Stops at the grid edge. Moving onto a wide button lands on it; moving
    /// off it continues from its first column.
    #[must_use]
    pub fn step(&self, from: usize, direction: FocusMove) -> usize {
        let Some(btn) = self.buttons.get(from) else {
            return 0;
        };
        let (row, col) = match direction {
            FocusMove::Up => (btn.row.saturating_sub(1), btn.col),
            FocusMove::Down => ((btn.row + 1).min(self.rows - 1), btn.col),
            FocusMove::Left => (btn.row, btn.col.saturating_sub(1)),
            FocusMove::Right => (btn.row, (btn.col + btn.span).min(self.cols - 1)),
        };
        self.index_at(row, col).unwrap_or(from)
    }

    /// Converts a click position to a button index
    #[must_use]
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<usize> {
        if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
            return None;
        }

        let rel_x = x - area.x;
        let rel_y = y - area.y;

        // Border is one cell on each side
        if rel_x == 0 || rel_y == 0 || rel_x >= area.width - 1 || rel_y >= area.height - 1 {
            return None;
        }

        let btn_width = (area.width - 2) / self.cols as u16;
        let btn_height = (area.height - 2) / self.rows as u16;

        if btn_width == 0 || btn_height == 0 {
            return None;
        }

        let col = ((rel_x - 1) / btn_width) as usize;
        let row = ((rel_y - 1) / btn_height) as usize;

        if row < self.rows && col < self.cols {
            self.index_at(row, col)
        } else {
            None
        }
    }
}

/// Keypad widget for rendering
#[derive(Debug)]
pub struct KeypadWidget<'a> {
    keypad: &'a Keypad,
    focus: Option<usize>,
}

impl<'a> KeypadWidget<'a> {
    /// Creates a new keypad widget
    #[must_use]
    pub fn new(keypad: &'a Keypad) -> Self {
        Self {
            keypad,
            focus: None,
        }
    }

    /// Marks the keyboard-focused button
    #[must_use]
    pub fn focus(mut self, index: usize) -> Self {
        self.focus = Some(index);
        self
    }
}

impl Widget for KeypadWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(" Keypad ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .render(area, buf);

        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };

        let (rows, cols) = self.keypad.dimensions();
        if inner.width < cols as u16 * 3 || inner.height < rows as u16 {
            return;
        }

        let btn_width = inner.width / cols as u16;
        let btn_height = inner.height / rows as u16;

        for (index, btn) in self.keypad.buttons().enumerate() {
            let x = inner.x + (btn.col as u16 * btn_width);
            let y = inner.y + (btn.row as u16 * btn_height);
            let width = btn_width * btn.span as u16;

            let mut style = if btn.pressed {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                btn.kind.style()
            };
            if self.focus == Some(index) {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let label = format!("[{}]", btn.label);
            let label_len = label.chars().count() as u16;
            let label_x = x + width.saturating_sub(label_len) / 2;
            let label_y = y + btn_height / 2;

            if label_y < inner.y + inner.height && label_x < inner.x + inner.width {
                buf.set_span(label_x, label_y, &Span::styled(label, style), width);
            }
        }
    }
}
