use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::buttons::ButtonBar;
use crate::game::{GameConfig, GameState, GameStatus, Position};
use crate::metrics::GameMetrics;

pub struct Renderer {
    tile_size: usize,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tile_size: config.tile_size.max(1) as usize,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        buttons: &mut ButtonBar,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Buttons
                Constraint::Length(1), // Key help
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        let board_area = self.board_area(chunks[1], state);
        if state.running {
            let grid = self.render_grid(state);
            frame.render_widget(grid, board_area);
        } else {
            let game_over = self.render_game_over(state);
            frame.render_widget(game_over, board_area);
        }

        buttons.render(frame, chunks[2], state.paused);

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[3]);
    }

    /// Board rectangle sized to the grid plus borders, centered in `area`
    fn board_area(&self, area: Rect, state: &GameState) -> Rect {
        let width = (state.grid_width * self.tile_size + 2).min(u16::MAX as usize) as u16;
        let height = (state.grid_height + 2).min(u16::MAX as usize) as u16;

        let [column] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [board] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(column);
        board
    }

    fn filled_tile(&self) -> String {
        "█".repeat(self.tile_size)
    }

    fn empty_tile(&self) -> String {
        format!("{:<width$}", "·", width = self.tile_size)
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        self.filled_tile(),
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.collides_with_body(pos) {
                    Span::styled(self.filled_tile(), Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(self.filled_tile(), Style::default().fg(Color::Red))
                } else {
                    Span::styled(self.empty_tile(), Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let (title, border_color) = match state.status() {
            GameStatus::Paused => (" Paused ", Color::Yellow),
            _ => (" Snake ", Color::White),
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color))
                .title(title),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let status = match state.status() {
            GameStatus::Playing => "Playing",
            GameStatus::Paused => "Paused",
            GameStatus::GameOver => "Game Over",
        };

        let text = vec![Line::from(vec![
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.snake.len().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Status: ", Style::default().fg(Color::Yellow)),
            Span::styled(status, Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Game Over",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.snake.len().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or click Restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}
