//! Player handles and the ordered player registry.
//!
//! ## PlayerId
//!
//! The integer identity the wrapper assigns to each bot, stable for the
//! whole run. `Display` prints the bare number because the finish handshake
//! serializes ids directly into the result summary.
//!
//! ## PlayerRegistry
//!
//! Append-only, ordered collection of players. It is filled once during
//! setup from the `bot_ids` line and its size and order are fixed after
//! that: registry order is `bot_ids` order, and that order is also the
//! order in which game settings are delivered.

use std::ops::Index;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Wrapper-assigned player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub i32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PlayerId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A bot participating in the game.
///
/// Holds only what the engine itself needs: the identity and, in file-driven
/// debug mode, the path of the input file this bot's moves are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    input_file: Option<PathBuf>,
}

impl Player {
    /// Create a player with no bound input file.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            input_file: None,
        }
    }

    /// The wrapper-assigned identity.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Bind this player to a local input file (debug mode only).
    pub fn bind_input_file(&mut self, path: PathBuf) {
        self.input_file = Some(path);
    }

    /// The bound input file, if running in file-driven debug mode.
    #[must_use]
    pub fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }
}

/// Ordered collection of players, fixed once setup completes.
#[derive(Clone, Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a player. Only called during setup; order is significant.
    pub fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Number of registered players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Player at a registry position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Look a player up by id.
    #[must_use]
    pub fn by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Iterate players in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Iterate players mutably, in registry order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Iterate the ids in registry order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(Player::id)
    }
}

impl Index<usize> for PlayerRegistry {
    type Output = Player;

    fn index(&self, index: usize) -> &Self::Output {
        &self.players[index]
    }
}

impl<'a> IntoIterator for &'a PlayerRegistry {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}
