//! The engine: setup handshake, game loop, finish handshake.
//!
//! One [`Engine`] runs one game. The wrapper drives it through three strictly
//! sequential phases on a single thread:
//!
//! 1. **Setup** — wait for `initialize`, acknowledge with `ok`, consume
//!    setting lines until `start`, build the player registry from `bot_ids`,
//!    and obtain the processor from the game.
//! 2. **Loop** — drive the processor from the initial state until it reports
//!    terminal (see [`game_loop`]).
//! 3. **Finish** — send `end`, answer the wrapper's `details` and `game`
//!    requests with the result summary and the serialized replay.
//!
//! `run` returns the outcome instead of exiting; mapping `Ok` to exit code 0
//! is the embedding binary's decision.

pub mod game_loop;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::core::{Configuration, PlayerId, PlayerRegistry};
use crate::game::{Game, Processor};
use crate::io::{Channel, ChannelError};

pub use game_loop::{GameLoop, TurnLoop};

/// Fatal failures that end a run without a reportable game.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The wrapper channel failed mid-handshake.
    #[error("wrapper channel failed: {0}")]
    Channel(#[from] ChannelError),

    /// The game's `create_processor` returned `None`.
    #[error("game produced no processor")]
    MissingProcessor,
}

/// Result of a completed run, as reported to the wrapper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameOutcome {
    /// Winning player, or `None` for a draw or aborted game.
    pub winner: Option<PlayerId>,
    /// Final score.
    pub score: f64,
}

/// Host-side engine for one game run.
///
/// Generic over the game it hosts and the channel endpoints, so the whole
/// protocol can be exercised against in-memory buffers in tests.
pub struct Engine<G: Game, R = BufReader<Stdin>, W = Stdout> {
    game: G,
    channel: Channel<R, W>,
    players: PlayerRegistry,
    configuration: Configuration,
    game_loop: Box<dyn GameLoop<G::Processor>>,
    bot_input_files: Option<Vec<PathBuf>>,
}

impl<G: Game> Engine<G> {
    /// Engine over the process's standard streams, as launched by a live
    /// wrapper.
    pub fn new(game: G) -> Self {
        Self::with_channel(game, Channel::stdio())
    }
}

impl<G: Game> Engine<G, BufReader<File>, Stdout> {
    /// Engine in file-driven debug mode: wrapper protocol lines come from
    /// `wrapper_input`, and each player is bound to the input file at its
    /// `bot_ids` position.
    pub fn from_files(
        game: G,
        wrapper_input: impl AsRef<Path>,
        bot_input_files: Vec<PathBuf>,
    ) -> io::Result<Self> {
        let mut engine = Self::with_channel(game, Channel::from_input_file(wrapper_input)?);
        engine.bot_input_files = Some(bot_input_files);
        Ok(engine)
    }
}

impl<G: Game, R: BufRead, W: Write> Engine<G, R, W> {
    /// Engine over an explicit channel.
    pub fn with_channel(game: G, channel: Channel<R, W>) -> Self {
        Self {
            game,
            channel,
            players: PlayerRegistry::new(),
            configuration: Configuration::new(),
            game_loop: Box::new(TurnLoop),
            bot_input_files: None,
        }
    }

    /// Replace the loop strategy. Must happen before `run`.
    pub fn set_game_loop(&mut self, game_loop: Box<dyn GameLoop<G::Processor>>) {
        self.game_loop = game_loop;
    }

    /// Builder form of [`set_game_loop`](Self::set_game_loop).
    #[must_use]
    pub fn with_game_loop(mut self, game_loop: Box<dyn GameLoop<G::Processor>>) -> Self {
        self.game_loop = game_loop;
        self
    }

    /// The players registered during setup, in `bot_ids` order.
    #[must_use]
    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    /// The settings received during setup.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The hosted game.
    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Consume the engine, returning the channel so its endpoints can be
    /// inspected.
    pub fn into_channel(self) -> Channel<R, W> {
        self.channel
    }

    /// Run one game start to finish and return the reported outcome.
    pub fn run(&mut self) -> Result<GameOutcome, EngineError> {
        info!("starting engine");

        let mut processor = self.setup()?;

        info!("running pre-game phase");
        processor.pre_game_phase();

        info!("starting game loop");
        let initial_state = self.game.initial_state(&self.players);
        let final_state =
            self.game_loop
                .run(initial_state.clone(), &mut processor, &mut self.players);

        self.finish(&processor, &initial_state, &final_state)
    }

    /// Setup handshake: learn the players and settings, build the processor.
    fn setup(&mut self) -> Result<G::Processor, EngineError> {
        info!("setting up engine, waiting for initialize");

        if let Err(err) = self.channel.wait_for("initialize") {
            error!(%err, "transport failure during setup");
            return Err(err.into());
        }
        self.channel.send("ok")?;

        info!("got initialize, parsing settings");

        loop {
            let line = match self.channel.next_message() {
                Ok(line) => line,
                Err(err) => {
                    error!(%err, "transport failure while reading setup lines");
                    return Err(err.into());
                }
            };
            if line == "start" {
                break;
            }
            self.parse_setup_line(&line);
        }

        let processor = self
            .game
            .create_processor(&self.configuration, &self.players)
            .ok_or(EngineError::MissingProcessor)?;

        info!("got start, sending game settings to bots");

        for player in self.players.iter() {
            self.game.send_game_settings(player, &self.configuration);
        }

        info!("setup done");
        Ok(processor)
    }

    /// Dispatch one setup line on its first token.
    ///
    /// `bot_ids` builds the registry; everything else goes to the game's
    /// `parse_setting` hook, which ignores unknown commands by default.
    fn parse_setup_line(&mut self, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return;
        };
        let args: Vec<&str> = tokens.collect();

        if command == "bot_ids" {
            let Some(ids) = args.first() else {
                warn!("bot_ids line carried no ids");
                return;
            };
            for (position, token) in ids.split(',').enumerate() {
                match token.trim().parse::<i32>() {
                    Ok(id) => self.register_player(PlayerId::new(id), position),
                    Err(_) => warn!(token, "skipping unparseable bot id"),
                }
            }
        } else {
            self.game
                .parse_setting(&mut self.configuration, command, &args);
        }
    }

    fn register_player(&mut self, id: PlayerId, position: usize) {
        let mut player = self.game.create_player(id);
        if let Some(files) = &self.bot_input_files {
            if let Some(path) = files.get(position) {
                player.bind_input_file(path.clone());
            }
        }
        self.players.push(player);
    }

    /// Finish handshake: report winner, score, and replay to the wrapper.
    fn finish(
        &mut self,
        processor: &G::Processor,
        initial_state: &G::State,
        final_state: &G::State,
    ) -> Result<GameOutcome, EngineError> {
        self.channel.send("end")?;
        self.channel.wait_for("details")?;

        let winner = processor.winner(final_state);
        let score = processor.score(final_state);
        let winner_field = winner.map_or_else(|| "null".to_string(), |id| id.to_string());

        info!(winner = %winner_field, score, "reporting game results");

        let details = json!({ "winner": winner_field, "score": score });
        self.channel.send(&details.to_string())?;

        self.channel.wait_for("game")?;
        let replay = self.game.played_game(initial_state);
        self.channel.send(&replay)?;

        Ok(GameOutcome { winner, score })
    }
}
