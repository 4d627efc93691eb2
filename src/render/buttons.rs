use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::Action;

const BUTTON_HEIGHT: u16 = 3;
const BUTTON_PADDING: u16 = 4;
const BUTTON_GAP: u16 = 2;

/// A clickable labelled box bound to an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub action: Action,
    /// Screen area from the last layout pass
    pub area: Rect,
}

impl Button {
    pub fn new(label: &'static str, action: Action) -> Self {
        Self {
            label,
            action,
            area: Rect::default(),
        }
    }

    fn width(&self) -> u16 {
        self.label.chars().count() as u16 + BUTTON_PADDING
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.right()
            && row >= self.area.y
            && row < self.area.bottom()
    }
}

/// Row of control buttons under the board
#[derive(Debug, Clone)]
pub struct ButtonBar {
    buttons: Vec<Button>,
}

impl ButtonBar {
    pub fn new() -> Self {
        Self {
            buttons: vec![
                Button::new("Restart", Action::Restart),
                Button::new("Pause/Resume", Action::TogglePause),
            ],
        }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Center the buttons inside `area` and remember where each one landed
    pub fn layout(&mut self, area: Rect) {
        let constraints = self.buttons.iter().map(|b| Constraint::Length(b.width()));
        let areas = Layout::horizontal(constraints)
            .flex(Flex::Center)
            .spacing(BUTTON_GAP)
            .split(area);

        for (button, rect) in self.buttons.iter_mut().zip(areas.iter()) {
            button.area = Rect {
                height: rect.height.min(BUTTON_HEIGHT),
                ..*rect
            };
        }
    }

    /// Action of the button under the given terminal cell, if any
    pub fn hit(&self, column: u16, row: u16) -> Option<Action> {
        self.buttons
            .iter()
            .find(|b| b.contains(column, row))
            .map(|b| b.action)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, paused: bool) {
        self.layout(area);

        for button in &self.buttons {
            let highlighted = paused && button.action == Action::TogglePause;
            let border_color = if highlighted { Color::Yellow } else { Color::White };

            let widget = Paragraph::new(button.label)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(border_color)),
                );
            frame.render_widget(widget, button.area);
        }
    }
}

impl Default for ButtonBar {
    fn default() -> Self {
        Self::new()
    }
}
