//! The generic turn loop.
//!
//! The loop is a driver, not a rules engine: it asks the processor whether
//! the game is over and, while it is not, asks it to play one more round.
//! All domain decisions stay inside the processor.

use tracing::debug;

use crate::core::PlayerRegistry;
use crate::game::Processor;

/// Swappable loop strategy.
///
/// The engine runs [`TurnLoop`] unless a different strategy is installed
/// before `run` (e.g. a loop that snapshots state between rounds).
pub trait GameLoop<P: Processor> {
    /// Drive `processor` from `initial` until it reports terminal and
    /// return the last state produced.
    fn run(
        &mut self,
        initial: P::State,
        processor: &mut P,
        players: &mut PlayerRegistry,
    ) -> P::State;
}

/// Default synchronous loop: one `play_round` per iteration, terminal check
/// first. Returns the initial state untouched when the processor is
/// terminal from the start.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnLoop;

impl<P: Processor> GameLoop<P> for TurnLoop {
    fn run(
        &mut self,
        initial: P::State,
        processor: &mut P,
        players: &mut PlayerRegistry,
    ) -> P::State {
        let mut state = initial;
        let mut round: u32 = 0;

        while !processor.has_ended(&state) {
            round += 1;
            debug!(round, "playing round");
            state = processor.play_round(round, &state, players);
        }

        debug!(rounds = round, "game loop finished");
        state
    }
}
