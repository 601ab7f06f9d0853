//! # arena-engine
//!
//! A generic host-side engine for turn-based multi-bot competitions.
//!
//! The engine is the process an external match *wrapper* launches to run one
//! game. It learns the participating bots from the wrapper over a
//! line-oriented channel, drives a generic turn loop over a pluggable game
//! model, and reports the winner, score, and full replay back over the same
//! channel.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: the engine never interprets game state. Rules,
//!    state shape, and termination all live behind the [`Game`] and
//!    [`Processor`] contracts that a concrete game supplies.
//!
//! 2. **One Channel**: all contact with the outside world goes through a
//!    single [`Channel`]. Everything else is pure in-process bookkeeping.
//!
//! 3. **Caller Owns the Process**: `Engine::run` returns a [`GameOutcome`]
//!    or an [`EngineError`]; it never exits the process or installs global
//!    handlers. The binary boundary decides the exit code.
//!
//! ## Modules
//!
//! - `io`: line-oriented message channel to the wrapper
//! - `core`: player registry and configuration store
//! - `game`: the `Game`/`Processor` contracts a concrete game implements
//! - `engine`: setup handshake, turn loop, finish handshake

pub mod core;
pub mod engine;
pub mod game;
pub mod io;

// Re-export commonly used types
pub use crate::core::{Configuration, Player, PlayerId, PlayerRegistry, SettingValue};
pub use crate::engine::{Engine, EngineError, GameLoop, GameOutcome, TurnLoop};
pub use crate::game::{Game, Processor};
pub use crate::io::{Channel, ChannelError};
