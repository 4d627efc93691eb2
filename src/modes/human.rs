use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use tokio::time::interval;

use crate::game::{Action, GameConfig, GameEngine, GameStatus, TickOutcome};
use crate::input::{InputAction, InputHandler};
use crate::metrics::GameMetrics;
use crate::render::{ButtonBar, Renderer};

/// Interactive play in the terminal: keyboard, mouse buttons and a fixed tick timer
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    buttons: ButtonBar,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let renderer = Renderer::new(&config);
        let engine = GameEngine::new(config);

        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer,
            buttons: ButtonBar::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal; once raw mode is on, every exit path goes through restore_terminal
        enable_raw_mode().context("Failed to enable raw mode")?;

        let result = match setup_terminal() {
            Ok(mut terminal) => {
                info!(
                    "Session started on a {}x{} grid, tick every {}ms",
                    self.engine.config().grid_width,
                    self.engine.config().grid_height,
                    self.engine.config().tick_interval_ms
                );
                self.run_game_loop(&mut terminal).await
            }
            Err(err) => Err(err),
        };

        // Cleanup terminal
        let restored = restore_terminal();

        info!(
            "Session ended after {} finished games",
            self.metrics.games_played
        );

        result?;
        restored
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.engine.config().tick_interval());

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            self.draw(terminal)?;
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.metrics
            .update(self.engine.status() == GameStatus::Playing);

        terminal
            .draw(|frame| {
                self.renderer.render(
                    frame,
                    self.engine.state(),
                    &self.metrics,
                    &mut self.buttons,
                );
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.input_handler.handle_mouse_event(mouse, &self.buttons),
            _ => InputAction::None,
        };

        match action {
            InputAction::GameAction(action) => self.apply(action),
            InputAction::Quit => {
                self.should_quit = true;
            }
            InputAction::None => {}
        }
    }

    fn apply(&mut self, action: Action) {
        // Keep the clock in step before the status flips
        self.metrics
            .update(self.engine.status() == GameStatus::Playing);

        self.engine.apply(action);

        if action == Action::Restart {
            self.metrics.on_game_start();
        }
    }

    fn update_game(&mut self) {
        if let TickOutcome::Collided(_) = self.engine.tick() {
            self.metrics.on_game_over();
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Undo everything setup may have done, even if only part of it succeeded
fn restore_terminal() -> Result<()> {
    let mut stderr = stderr();
    first_failure([
        ("Failed to disable raw mode", disable_raw_mode()),
        (
            "Failed to leave alternate screen",
            execute!(stderr, LeaveAlternateScreen, DisableMouseCapture),
        ),
        ("Failed to show cursor", execute!(stderr, Show)),
    ])
}

/// Every step has already been attempted; report the first one that failed
fn first_failure<const N: usize>(steps: [(&'static str, io::Result<()>); N]) -> Result<()> {
    let mut first = None;
    for (label, outcome) in steps {
        if let Err(err) = outcome {
            error!("{label}: {err}");
            if first.is_none() {
                first = Some(anyhow::Error::new(err).context(label));
            }
        }
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::layout::Rect;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn step(attempted: &mut usize, ok: bool) -> io::Result<()> {
        *attempted += 1;
        if ok {
            Ok(())
        } else {
            Err(io::Error::other("terminal gone"))
        }
    }

    #[test]
    fn test_restore_attempts_every_step() {
        let mut attempted = 0;
        let result = first_failure([
            ("Failed to disable raw mode", step(&mut attempted, true)),
            ("Failed to leave alternate screen", step(&mut attempted, false)),
            ("Failed to show cursor", step(&mut attempted, false)),
        ]);

        assert_eq!(attempted, 3);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Failed to leave alternate screen");
    }

    #[test]
    fn test_restore_first_step_failure_still_runs_the_rest() {
        let mut attempted = 0;
        let result = first_failure([
            ("Failed to disable raw mode", step(&mut attempted, false)),
            ("Failed to leave alternate screen", step(&mut attempted, true)),
            ("Failed to show cursor", step(&mut attempted, true)),
        ]);

        assert_eq!(attempted, 3);
        assert_eq!(result.unwrap_err().to_string(), "Failed to disable raw mode");
    }

    #[test]
    fn test_restore_all_ok() {
        let mut attempted = 0;
        let result = first_failure([
            ("Failed to disable raw mode", step(&mut attempted, true)),
            ("Failed to show cursor", step(&mut attempted, true)),
        ]);

        assert_eq!(attempted, 2);
        assert!(result.is_ok());
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default());
        assert!(mode.engine.is_running());
        assert_eq!(mode.engine.snake(), &[Position::new(5, 5)]);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_keys_drive_engine() {
        let mut mode = HumanMode::new(GameConfig::default());

        mode.handle_event(press(KeyCode::Down));
        assert_eq!(mode.engine.direction(), Direction::Down);

        mode.handle_event(press(KeyCode::Char(' ')));
        assert!(mode.engine.is_paused());

        mode.handle_event(press(KeyCode::Char('r')));
        assert!(!mode.engine.is_paused());
        assert_eq!(mode.engine.direction(), Direction::Right);

        mode.handle_event(press(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = HumanMode::new(GameConfig::default());
        let mut release = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        mode.handle_event(Event::Key(release));
        assert_eq!(mode.engine.direction(), Direction::Right);
    }

    #[test]
    fn test_pause_button_click() {
        let mut mode = HumanMode::new(GameConfig::default());
        mode.buttons.layout(Rect::new(0, 30, 80, 3));
        let pause = mode.buttons.buttons()[1].area;

        mode.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: pause.x + 2,
            row: pause.y + 1,
            modifiers: KeyModifiers::NONE,
        }));
        assert!(mode.engine.is_paused());
    }

    #[test]
    fn test_game_over_counts_game() {
        let config = GameConfig {
            start_x: 9,
            ..GameConfig::small()
        };
        let mut mode = HumanMode::new(config);

        // One step right of column 9 leaves the 10-wide grid
        mode.update_game();
        assert!(!mode.engine.is_running());
        assert_eq!(mode.metrics.games_played, 1);

        // Further ticks after game over do not count again
        mode.update_game();
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(press(KeyCode::Char('r')));
        assert!(mode.engine.is_running());
    }
}
