//! Grid Snake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic (game module)
//! - TUI rendering with clickable buttons (render module)
//! - Keyboard and mouse mapping (input module)
//! - Per-session bookkeeping (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
