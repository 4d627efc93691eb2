use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, GameStatus, Position, Snake},
};
use log::{debug, info, trace, warn};
use rand::Rng;
use rand::rngs::ThreadRng;

/// What a single tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is paused or over; nothing moved
    Idle,
    /// The snake advanced one cell
    Moved,
    /// The snake advanced onto the food and grew
    AteFood,
    /// The move ended the game
    Collided(CollisionType),
}

/// The game engine that owns the state and handles all game logic.
///
/// The random source is a type parameter so callers can supply a seeded
/// generator; the default pulls from the thread-local RNG.
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    state: GameState,
    rng: R,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine in its starting state using `rng` for food placement
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let state = Self::initial_state(&config);
        let mut engine = Self { config, state, rng };
        engine.spawn_food();
        engine
    }

    /// Resume from an arbitrary state, e.g. a hand-built board
    pub fn from_state(config: GameConfig, state: GameState, rng: R) -> Self {
        Self { config, state, rng }
    }

    fn initial_state(config: &GameConfig) -> GameState {
        let start = config.start();
        // Food is placed by spawn_food right after construction
        GameState::new(
            Snake::new(start, Direction::Right, 1),
            start,
            config.grid_width,
            config.grid_height,
        )
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running || self.state.paused {
            return TickOutcome::Idle;
        }

        let snake = &mut self.state.snake;
        let new_head = snake.head().moved_in_direction(snake.direction);
        let ate_food = new_head == self.state.food;

        // Keep the tail when eating so the snake grows by one
        snake.move_snake(ate_food);

        if ate_food {
            debug!(
                "Ate food at ({}, {}), length now {}",
                new_head.x,
                new_head.y,
                self.state.snake.len()
            );
            self.spawn_food();
        }

        if let Some(collision) = self.check_collision() {
            return TickOutcome::Collided(collision);
        }

        if ate_food {
            TickOutcome::AteFood
        } else {
            TickOutcome::Moved
        }
    }

    /// Stop the game if the head left the grid or ran into the body
    pub fn check_collision(&mut self) -> Option<CollisionType> {
        let head = self.state.snake.head();

        let collision = if !self.state.is_in_bounds(head) {
            Some(CollisionType::Wall)
        } else if self.state.snake.collides_with_body(head) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if let Some(kind) = collision {
            self.state.running = false;
            info!(
                "Game over: {:?} at ({}, {}) with length {}",
                kind,
                head.x,
                head.y,
                self.state.snake.len()
            );
        }

        collision
    }

    /// Place food on a random cell not covered by the snake.
    ///
    /// Leaves the food untouched when the snake fills the whole grid.
    pub fn spawn_food(&mut self) {
        if self.state.snake.len() >= self.config.cell_count() {
            warn!(
                "No free cell left for food on the {}x{} grid",
                self.config.grid_width, self.config.grid_height
            );
            return;
        }

        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !self.state.is_occupied_by_snake(pos) {
                self.state.food = pos;
                return;
            }
        }
    }

    /// Steer the snake; a 180-degree reversal is ignored.
    ///
    /// Returns whether the direction was accepted.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        let current = self.state.snake.direction;
        if current.is_opposite(requested) {
            trace!("Ignoring reversal from {:?} to {:?}", current, requested);
            return false;
        }

        self.state.snake.direction = requested;
        true
    }

    pub fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
        debug!("Paused: {}", self.state.paused);
    }

    /// Reset to the starting state and place fresh food
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.config);
        self.spawn_food();
        info!("Game restarted");
    }

    /// Route a player action to the matching operation
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Turn(direction) => {
                self.set_direction(direction);
            }
            Action::TogglePause => self.toggle_pause(),
            Action::Restart => self.restart(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &[Position] {
        &self.state.snake.body
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn score(&self) -> usize {
        self.state.score()
    }
}
