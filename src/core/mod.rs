//! Core bookkeeping types: player identity, the player registry, and the
//! match configuration store.
//!
//! Everything here is game-agnostic. Game-specific per-player state lives in
//! the concrete game, keyed by [`PlayerId`].

pub mod config;
pub mod player;

pub use config::{Configuration, SettingValue};
pub use player::{Player, PlayerId, PlayerRegistry};
