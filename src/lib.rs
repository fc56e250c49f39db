//! Realms engine - event-sourced rules engine for a space deck-building game
//!
//! A match is an append-only list of events folded by a pure reducer. Card
//! abilities expand player actions into follow-up events, so a saved log
//! replays to the same state without re-running any rule.

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod game;
pub mod loader;
pub mod zones;

pub use error::{RealmsError, Result};
