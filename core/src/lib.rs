#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Expedition mini-game.
//!
//! This crate defines the message surface that connects the chat-facing
//! collaborator, the authoritative expedition state, and pure systems.
//! Collaborators submit [`Command`] values describing desired mutations, the
//! expedition executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values describing what actually happened. Adapters
//! consume read-only snapshots to render the grid between commands.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when a new expedition session starts.
pub const WELCOME_BANNER: &str = "Welcome to the Expedition.";

/// Grid width used by the chat collaborator when none is configured.
pub const DEFAULT_GRID_WIDTH: u32 = 12;
/// Grid height used by the chat collaborator when none is configured.
pub const DEFAULT_GRID_HEIGHT: u32 = 12;
/// Number of buff event tiles placed per level by default.
pub const DEFAULT_EVENT_TILE_COUNT: usize = 15;
/// Level a fresh expedition starts on by default.
pub const DEFAULT_STARTING_LEVEL: u32 = 1;

/// Commands that express all permissible expedition mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player advance a single step in the given direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events broadcast by the expedition after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two tiles.
    MoveCommitted {
        /// Direction the player travelled in.
        direction: Direction,
        /// Tile the player occupied before moving.
        from: GridCoord,
        /// Tile the player occupies after completing the move.
        to: GridCoord,
    },
    /// Reports that a move request was rejected and the position reverted.
    MoveBlocked {
        /// Direction the player attempted to travel in.
        direction: Direction,
        /// Tile the player still occupies after the rejection.
        from: GridCoord,
        /// Specific reason the move was rejected.
        reason: BlockedReason,
    },
    /// Confirms that the player consumed a buff event tile.
    BuffTriggered {
        /// Tile whose buff membership was consumed.
        cell: GridCoord,
    },
    /// Announces that the player reached the boss tile while it was present.
    BossAwakened {
        /// Tile the boss occupied when the encounter was triggered.
        cell: GridCoord,
    },
    /// Announces that the expedition advanced to a freshly generated level.
    LevelAdvanced {
        /// Level that became active after the advance.
        level: Level,
    },
}

/// Reasons a move request may be rejected by the expedition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockedReason {
    /// The step would have left the `[1, width] x [1, height]` grid.
    OutOfBounds,
    /// The step would have entered a barrier tile guarding the exit.
    Barrier,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y` coordinates.
    Up,
    /// Movement toward decreasing `y` coordinates.
    Down,
    /// Movement toward decreasing `x` coordinates.
    Left,
    /// Movement toward increasing `x` coordinates.
    Right,
}

impl Direction {
    /// Returns the direction that exactly undoes this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Location of a single grid tile expressed as 1-based `x` and `y` coordinates.
///
/// The start tile is `(1, 1)` and the exit tile is `(width, height)`; `y`
/// grows away from the start, so renderers place `y = height` on the first
/// output row to keep the start tile visually at the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new 1-based grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the coordinate, counted from 1.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Vertical component of the coordinate, counted from 1.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the coordinate one step away in the provided direction.
    ///
    /// Yields `None` when the step would drop a component below 1; upper
    /// bounds are owned by the expedition, which knows the grid dimensions.
    #[must_use]
    pub const fn stepped(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up => Some(Self::new(self.x, self.y + 1)),
            Direction::Right => Some(Self::new(self.x + 1, self.y)),
            Direction::Down => {
                if self.y > 1 {
                    Some(Self::new(self.x, self.y - 1))
                } else {
                    None
                }
            }
            Direction::Left => {
                if self.x > 1 {
                    Some(Self::new(self.x - 1, self.y))
                } else {
                    None
                }
            }
        }
    }
}

/// Dimensions of the rectangular expedition grid measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tile columns laid out in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows laid out in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles contained in the grid.
    #[must_use]
    pub const fn tile_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the provided 1-based coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.x() >= 1 && coord.x() <= self.width && coord.y() >= 1 && coord.y() <= self.height
    }
}

/// Expedition level counter, starting at 1 and monotonically increasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Level(u32);

impl Level {
    /// Creates a new level wrapper with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Configuration parameters required to start an expedition session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionConfig {
    width: u32,
    height: u32,
    event_tile_count: usize,
    starting_level: u32,
    rng_seed: u64,
}

impl ExpeditionConfig {
    /// Creates a new configuration with explicit parameters.
    #[must_use]
    pub const fn new(
        width: u32,
        height: u32,
        event_tile_count: usize,
        starting_level: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            width,
            height,
            event_tile_count,
            starting_level,
            rng_seed,
        }
    }

    /// Creates the configuration the chat collaborator uses by default.
    #[must_use]
    pub const fn with_defaults(rng_seed: u64) -> Self {
        Self::new(
            DEFAULT_GRID_WIDTH,
            DEFAULT_GRID_HEIGHT,
            DEFAULT_EVENT_TILE_COUNT,
            DEFAULT_STARTING_LEVEL,
            rng_seed,
        )
    }

    /// Number of tile columns requested for the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows requested for the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of buff event tiles placed on every level.
    #[must_use]
    pub const fn event_tile_count(&self) -> usize {
        self.event_tile_count
    }

    /// Level the expedition begins on.
    #[must_use]
    pub const fn starting_level(&self) -> u32 {
        self.starting_level
    }

    /// Seed driving deterministic event-tile placement.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Semantic tile categories used when composing a renderable grid snapshot.
///
/// The concrete glyph assigned to each category is a rendering concern; the
/// core only guarantees that each category is distinct and stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Default background tile with no special behaviour.
    Ground,
    /// Tile the player currently occupies.
    Player,
    /// Exit tile at `(width, height)` that advances the level.
    Exit,
    /// Remaining buff event tile.
    Event,
    /// Boss tile, present until the boss encounter has been triggered.
    Boss,
    /// Impassable barrier tile adjacent to the exit.
    Barrier,
}

/// Stub chat-UI controls that surround the directional buttons.
///
/// None of these carry behaviour yet; the interaction system routes them
/// through a capability hook with a no-op default so future features slot in
/// without touching the expedition state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionSlot {
    /// Health potion button in the top-left control slot.
    HealthPotion,
    /// Stamina potion button in the top-right control slot.
    StaminaPotion,
    /// Attack button in the middle control slot.
    Attack,
    /// Retreat button in the bottom-left control slot.
    Retreat,
    /// Buff button in the bottom-right control slot.
    Buff,
}

#[cfg(test)]
mod tests {
    use super::{
        BlockedReason, Direction, ExpeditionConfig, GridCoord, GridDimensions, Level, TileKind,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(7, 3));
    }

    #[test]
    fn blocked_reason_round_trips_through_bincode() {
        assert_round_trip(&BlockedReason::Barrier);
    }

    #[test]
    fn tile_kind_round_trips_through_bincode() {
        assert_round_trip(&TileKind::Boss);
    }

    #[test]
    fn expedition_config_round_trips_through_bincode() {
        assert_round_trip(&ExpeditionConfig::with_defaults(0x5eed));
    }

    #[test]
    fn opposite_directions_pair_up() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn stepped_moves_one_tile_in_each_direction() {
        let origin = GridCoord::new(5, 5);
        assert_eq!(origin.stepped(Direction::Up), Some(GridCoord::new(5, 6)));
        assert_eq!(origin.stepped(Direction::Down), Some(GridCoord::new(5, 4)));
        assert_eq!(origin.stepped(Direction::Left), Some(GridCoord::new(4, 5)));
        assert_eq!(origin.stepped(Direction::Right), Some(GridCoord::new(6, 5)));
    }

    #[test]
    fn stepped_rejects_leaving_the_lower_edge() {
        let start = GridCoord::new(1, 1);
        assert_eq!(start.stepped(Direction::Down), None);
        assert_eq!(start.stepped(Direction::Left), None);
    }

    #[test]
    fn dimensions_contain_only_one_based_coordinates() {
        let grid = GridDimensions::new(12, 12);
        assert!(grid.contains(GridCoord::new(1, 1)));
        assert!(grid.contains(GridCoord::new(12, 12)));
        assert!(!grid.contains(GridCoord::new(0, 5)));
        assert!(!grid.contains(GridCoord::new(13, 5)));
        assert!(!grid.contains(GridCoord::new(5, 13)));
    }

    #[test]
    fn level_advances_monotonically() {
        let level = Level::new(1);
        assert_eq!(level.next(), Level::new(2));
        assert!(level.next() > level);
    }

    #[test]
    fn default_config_matches_chat_collaborator_expectations() {
        let config = ExpeditionConfig::with_defaults(9);
        assert_eq!(config.width(), 12);
        assert_eq!(config.height(), 12);
        assert_eq!(config.event_tile_count(), 15);
        assert_eq!(config.starting_level(), 1);
        assert_eq!(config.rng_seed(), 9);
    }
}
