//! Terminal presentation of the game state

pub mod buttons;
pub mod renderer;

pub use buttons::ButtonBar;
pub use renderer::Renderer;
