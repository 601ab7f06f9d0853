//! Contracts between the generic engine and a concrete game.
//!
//! A game plugs into the engine through two traits:
//!
//! - [`Game`] is the factory side: it builds players, the processor, and the
//!   initial state, delivers game settings to bots, and serializes the
//!   finished game for the replay viewer.
//! - [`Processor`] is the rules side: it advances the game one round at a
//!   time, decides when the game is over, and names the winner and score.
//!
//! The engine treats `State` as an opaque value threaded through the loop.
//! Whatever shape a game gives it — a board, a history chain, a snapshot per
//! round — is invisible to the core.

use crate::core::{Configuration, Player, PlayerId, PlayerRegistry};

/// Per-round rules driver for one game.
///
/// Created once per run, after setup. Must be deterministic with respect to
/// its inputs if replays are expected to be reproducible, but the engine
/// itself does not depend on that.
///
/// ## Implementation Notes
///
/// - `play_round` receives the registry mutably: games that track per-bot
///   bookkeeping on the core `Player` handles may update it, and processors
///   that talk to bot subprocesses do that fan-out here, on their own.
/// - `has_ended` is checked *before* every round, so a processor that is
///   terminal from the start never plays a round.
/// - A processor that never reports terminal loops forever; guarding against
///   that (e.g. a round cap) is the game's job, not the engine's.
pub trait Processor {
    /// Snapshot of the game world at a turn boundary. Opaque to the engine.
    type State: Clone;

    /// Hook called once between setup and the first round.
    fn pre_game_phase(&mut self) {}

    /// Advance the game by one round, returning the successor state.
    ///
    /// `round` starts at 1 for the first round played.
    fn play_round(
        &mut self,
        round: u32,
        state: &Self::State,
        players: &mut PlayerRegistry,
    ) -> Self::State;

    /// Whether the game has reached a terminal condition.
    fn has_ended(&self, state: &Self::State) -> bool;

    /// The winning player, or `None` for a draw or aborted game.
    fn winner(&self, state: &Self::State) -> Option<PlayerId>;

    /// The final score reported to the wrapper.
    fn score(&self, state: &Self::State) -> f64;
}

/// Factory contract a concrete game supplies to the engine.
///
/// The engine calls these in a fixed order: `create_player` per id from the
/// `bot_ids` line, `create_processor` once setup completes, then
/// `send_game_settings` per player in registry order, `initial_state` once
/// before the loop, and `played_game` during the finish handshake.
pub trait Game {
    /// Snapshot of the game world. Must match the processor's state type.
    type State: Clone;

    /// The rules driver this game runs on.
    type Processor: Processor<State = Self::State>;

    /// Build the player handle for a wrapper-assigned id.
    ///
    /// Most games only need the id itself and keep their per-player state
    /// keyed by [`PlayerId`], so the default just wraps the id.
    fn create_player(&mut self, id: PlayerId) -> Player {
        Player::new(id)
    }

    /// Build the processor for this run.
    ///
    /// Returning `None` is a fatal configuration error: the run cannot
    /// produce a valid game without one.
    fn create_processor(
        &mut self,
        configuration: &Configuration,
        players: &PlayerRegistry,
    ) -> Option<Self::Processor>;

    /// Produce the initial (mostly empty) game state.
    fn initial_state(&mut self, players: &PlayerRegistry) -> Self::State;

    /// Deliver this game's settings to one bot.
    ///
    /// Called once per player, in registry order. How the settings reach the
    /// bot (via the wrapper, a subprocess pipe, a file) is the game's
    /// concern.
    fn send_game_settings(&mut self, player: &Player, configuration: &Configuration);

    /// Serialize the entire played game for the replay viewer, starting
    /// from the initial state.
    fn played_game(&self, initial_state: &Self::State) -> String;

    /// Parse one game-specific setup line.
    ///
    /// `command` is the line's first whitespace-delimited token, `args` the
    /// remaining tokens. The default ignores everything, which keeps the
    /// setup stream forward-compatible; games override this to fill the
    /// [`Configuration`].
    fn parse_setting(&mut self, configuration: &mut Configuration, command: &str, args: &[&str]) {
        let _ = (configuration, command, args);
    }
}
