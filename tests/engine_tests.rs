//! Full-protocol engine tests.
//!
//! These drive a complete run — setup handshake, game loop, finish
//! handshake — against an in-memory channel and inspect both the reported
//! outcome and the exact lines the engine wrote.

use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

use arena_engine::{
    Channel, Configuration, Engine, EngineError, Game, GameLoop, GameOutcome, Player, PlayerId,
    PlayerRegistry, Processor,
};
use serde_json::Value;

/// State for the tick game: a plain countdown.
#[derive(Clone, Debug, PartialEq)]
struct TickState {
    ticks_left: u32,
}

struct TickProcessor {
    winner: Option<PlayerId>,
    score: f64,
    advances: Rc<Cell<u32>>,
}

impl Processor for TickProcessor {
    type State = TickState;

    fn play_round(&mut self, _round: u32, state: &TickState, _players: &mut PlayerRegistry) -> TickState {
        self.advances.set(self.advances.get() + 1);
        TickState {
            ticks_left: state.ticks_left - 1,
        }
    }

    fn has_ended(&self, state: &TickState) -> bool {
        state.ticks_left == 0
    }

    fn winner(&self, _state: &TickState) -> Option<PlayerId> {
        self.winner
    }

    fn score(&self, _state: &TickState) -> f64 {
        self.score
    }
}

/// Toy game: runs for a fixed number of rounds, then reports a preset
/// winner and score. Records what the engine asked of it.
struct TickGame {
    rounds: u32,
    winner: Option<PlayerId>,
    score: f64,
    provide_processor: bool,
    advances: Rc<Cell<u32>>,
    settings_sent_to: Vec<PlayerId>,
}

impl TickGame {
    fn new(rounds: u32, winner: Option<PlayerId>, score: f64) -> Self {
        Self {
            rounds,
            winner,
            score,
            provide_processor: true,
            advances: Rc::new(Cell::new(0)),
            settings_sent_to: Vec::new(),
        }
    }
}

impl Game for TickGame {
    type State = TickState;
    type Processor = TickProcessor;

    fn create_processor(
        &mut self,
        _configuration: &Configuration,
        _players: &PlayerRegistry,
    ) -> Option<TickProcessor> {
        if !self.provide_processor {
            return None;
        }
        Some(TickProcessor {
            winner: self.winner,
            score: self.score,
            advances: Rc::clone(&self.advances),
        })
    }

    fn initial_state(&mut self, _players: &PlayerRegistry) -> TickState {
        TickState {
            ticks_left: self.rounds,
        }
    }

    fn send_game_settings(&mut self, player: &Player, _configuration: &Configuration) {
        self.settings_sent_to.push(player.id());
    }

    fn played_game(&self, initial_state: &TickState) -> String {
        format!("replay from {} ticks", initial_state.ticks_left)
    }
}

type TestEngine = Engine<TickGame, Cursor<Vec<u8>>, Vec<u8>>;

fn engine_with_input(game: TickGame, input: &str) -> TestEngine {
    let channel = Channel::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    Engine::with_channel(game, channel)
}

fn output_lines(engine: TestEngine) -> Vec<String> {
    let (_, writer) = engine.into_channel().into_parts();
    String::from_utf8(writer)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

const HAPPY_PATH: &str = "initialize\nbot_ids 0,1\nstart\ndetails\ngame\n";

#[test]
fn test_full_run_reports_outcome() {
    let game = TickGame::new(3, Some(PlayerId::new(1)), 12.0);
    let mut engine = engine_with_input(game, HAPPY_PATH);

    let outcome = engine.run().unwrap();

    assert_eq!(
        outcome,
        GameOutcome {
            winner: Some(PlayerId::new(1)),
            score: 12.0,
        }
    );
    assert_eq!(engine.game().advances.get(), 3);
}

#[test]
fn test_setup_builds_players_and_leaves_configuration_empty() {
    let game = TickGame::new(1, None, 0.0);
    let mut engine = engine_with_input(game, HAPPY_PATH);

    engine.run().unwrap();

    let ids: Vec<_> = engine.players().ids().collect();
    assert_eq!(ids, vec![PlayerId::new(0), PlayerId::new(1)]);
    assert!(engine.configuration().is_empty());
}

#[test]
fn test_game_settings_delivered_in_registry_order() {
    let game = TickGame::new(1, None, 0.0);
    let mut engine = engine_with_input(game, "initialize\nbot_ids 5,2,8\nstart\ndetails\ngame\n");

    engine.run().unwrap();

    assert_eq!(
        engine.game().settings_sent_to,
        vec![PlayerId::new(5), PlayerId::new(2), PlayerId::new(8)]
    );
}

#[test]
fn test_protocol_output_sequence() {
    let game = TickGame::new(2, Some(PlayerId::new(0)), 7.5);
    let mut engine = engine_with_input(game, HAPPY_PATH);

    engine.run().unwrap();
    let lines = output_lines(engine);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "ok");
    assert_eq!(lines[1], "end");

    let details: Value = serde_json::from_str(&lines[2]).unwrap();
    assert_eq!(details["winner"], "0");
    assert_eq!(details["score"], 7.5);

    assert_eq!(lines[3], "replay from 2 ticks");
}

#[test]
fn test_draw_reports_null_sentinel() {
    let game = TickGame::new(1, None, 0.0);
    let mut engine = engine_with_input(game, HAPPY_PATH);

    engine.run().unwrap();
    let lines = output_lines(engine);

    let details: Value = serde_json::from_str(&lines[2]).unwrap();
    assert_eq!(details["winner"], "null");
}

#[test]
fn test_zero_round_game_returns_initial_state() {
    let game = TickGame::new(0, None, 0.0);
    let mut engine = engine_with_input(game, HAPPY_PATH);

    engine.run().unwrap();

    assert_eq!(engine.game().advances.get(), 0);
    let lines = output_lines(engine);
    assert_eq!(lines[3], "replay from 0 ticks");
}

#[test]
fn test_missing_processor_is_fatal() {
    let mut game = TickGame::new(1, None, 0.0);
    game.provide_processor = false;
    let mut engine = engine_with_input(game, HAPPY_PATH);

    assert!(matches!(engine.run(), Err(EngineError::MissingProcessor)));
}

#[test]
fn test_noisy_wrapper_lines_are_discarded() {
    let game = TickGame::new(1, Some(PlayerId::new(0)), 1.0);
    let input = "chatter\ninitialize\nbot_ids 0\nstart\nchatter\ndetails\nmore chatter\ngame\n";
    let mut engine = engine_with_input(game, input);

    engine.run().unwrap();
    let lines = output_lines(engine);

    assert_eq!(lines[0], "ok");
    assert_eq!(lines[1], "end");
    assert_eq!(lines[3], "replay from 1 ticks");
}

#[test]
fn test_stream_closed_during_setup_is_fatal() {
    let game = TickGame::new(1, None, 0.0);
    let mut engine = engine_with_input(game, "initialize\nbot_ids 0\n");

    assert!(matches!(engine.run(), Err(EngineError::Channel(_))));
}

#[test]
fn test_stream_closed_before_details_is_fatal() {
    let game = TickGame::new(1, None, 0.0);
    let mut engine = engine_with_input(game, "initialize\nbot_ids 0\nstart\n");

    assert!(matches!(engine.run(), Err(EngineError::Channel(_))));
}

/// Loop strategy that refuses to play more than a fixed number of rounds.
struct CappedLoop {
    cap: u32,
}

impl<P: Processor> GameLoop<P> for CappedLoop {
    fn run(&mut self, initial: P::State, processor: &mut P, players: &mut PlayerRegistry) -> P::State {
        let mut state = initial;
        for round in 1..=self.cap {
            if processor.has_ended(&state) {
                break;
            }
            state = processor.play_round(round, &state, players);
        }
        state
    }
}

#[test]
fn test_custom_game_loop_strategy() {
    let game = TickGame::new(10, None, 0.0);
    let mut engine = engine_with_input(game, HAPPY_PATH).with_game_loop(Box::new(CappedLoop { cap: 4 }));

    engine.run().unwrap();

    assert_eq!(engine.game().advances.get(), 4);
}

#[test]
fn test_file_driven_debug_mode_binds_bot_inputs() {
    use std::io::Write as _;

    let dir = tempfile::tempdir().unwrap();
    let wrapper_path = dir.path().join("wrapper.txt");
    let bot_a = dir.path().join("bot_a.txt");
    let bot_b = dir.path().join("bot_b.txt");

    std::fs::File::create(&bot_a).unwrap();
    std::fs::File::create(&bot_b).unwrap();
    let mut wrapper = std::fs::File::create(&wrapper_path).unwrap();
    wrapper.write_all(HAPPY_PATH.as_bytes()).unwrap();

    let game = TickGame::new(1, None, 0.0);
    let mut engine =
        Engine::from_files(game, &wrapper_path, vec![bot_a.clone(), bot_b.clone()]).unwrap();

    engine.run().unwrap();

    assert_eq!(engine.players()[0].input_file(), Some(bot_a.as_path()));
    assert_eq!(engine.players()[1].input_file(), Some(bot_b.as_path()));
}
