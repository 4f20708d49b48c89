#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative expedition state management.
//!
//! An [`Expedition`] owns the grid for the current level, the player position,
//! the level counter and the special-tile sets. It is mutated exclusively
//! through [`apply`], which executes a [`Command`] and broadcasts [`Event`]
//! values describing the outcome, and through [`consume_notice`], which hands
//! the one-shot narrative line to the collaborator exactly once.

use std::collections::BTreeSet;

use expedition_core::{
    BlockedReason, Command, Direction, Event, ExpeditionConfig, GridCoord, GridDimensions, Level,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Tile every expedition and every level starts from.
pub const START_TILE: GridCoord = GridCoord::new(1, 1);

/// Notice shown after a move was rejected for leaving the map.
pub const OUT_OF_BOUNDS_NOTICE: &str = "You cannot move out of the map.";
/// Notice shown after a move was rejected for entering a barrier.
pub const BARRIER_NOTICE: &str = "You cannot move into a barrier.";
/// Notice shown after the player consumed a buff event tile.
pub const BUFF_NOTICE: &str = "You've triggered a buff event.";
/// Notice shown after the player awakened the boss on the exit tile.
pub const BOSS_NOTICE: &str = "You've triggered a boss event.";

/// The generation attempt cap is this multiple of the free placeable tiles.
const GENERATION_ATTEMPT_FACTOR: u64 = 10;

/// Failures surfaced by expedition construction and level advancement.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExpeditionError {
    /// The requested configuration can never produce a playable grid.
    #[error("invalid expedition configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// Event-tile placement failed to converge within the attempt cap.
    ///
    /// The original mini-game retried placement forever; the cap turns a
    /// potential livelock into a typed failure that aborts the session.
    #[error("event-tile placement did not converge after {attempts} attempts")]
    Generation {
        /// Number of rejection-sampling draws performed before giving up.
        attempts: u64,
    },
}

/// Reasons an expedition configuration is rejected before any state exists.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The grid must leave room for the start, exit and barrier tiles.
    #[error("grid must be at least 2x2, got {width}x{height}")]
    GridTooSmall {
        /// Requested number of tile columns.
        width: u32,
        /// Requested number of tile rows.
        height: u32,
    },
    /// The event-tile count must leave free tiles next to the reserved ones.
    #[error("{requested} event tiles do not fit a {width}x{height} grid (limit {limit})")]
    TooManyEventTiles {
        /// Requested number of buff event tiles.
        requested: usize,
        /// Requested number of tile columns.
        width: u32,
        /// Requested number of tile rows.
        height: u32,
        /// Exclusive upper bound on the event-tile count for this grid.
        limit: u64,
    },
    /// Levels are counted from 1.
    #[error("starting level must be at least 1, got {level}")]
    StartingLevelTooLow {
        /// Requested starting level.
        level: u32,
    },
}

/// Represents the authoritative state of one expedition session.
#[derive(Clone, Debug)]
pub struct Expedition {
    grid: GridDimensions,
    position: GridCoord,
    level: Level,
    exit: GridCoord,
    boss_tile: Option<GridCoord>,
    barrier_tiles: [GridCoord; 2],
    event_tiles: BTreeSet<GridCoord>,
    event_tile_count: usize,
    pending_notice: String,
    boss_encounter_active: bool,
    rng: ChaCha8Rng,
}

impl Expedition {
    /// Creates a new expedition ready for its first move.
    ///
    /// The player starts at `(1, 1)`, the exit sits at `(width, height)` with
    /// the boss tile on top of it, and two barrier tiles guard the row below
    /// the exit. Buff event tiles are placed by uniform rejection sampling
    /// over the interior `[1, width-1] x [1, height-1]` region.
    pub fn new(config: ExpeditionConfig) -> Result<Self, ExpeditionError> {
        validate(&config)?;

        let grid = GridDimensions::new(config.width(), config.height());
        let exit = GridCoord::new(grid.width(), grid.height());
        let barrier_tiles = barrier_tiles_for(exit);
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed());
        let event_tiles = generate_event_tiles(
            &mut rng,
            grid,
            exit,
            barrier_tiles,
            config.event_tile_count(),
        )?;
        let level = Level::new(config.starting_level());

        Ok(Self {
            grid,
            position: START_TILE,
            level,
            exit,
            boss_tile: Some(exit),
            barrier_tiles,
            event_tiles,
            event_tile_count: config.event_tile_count(),
            pending_notice: format!(
                "Started a new expedition. You're currently at level {}!",
                level.get()
            ),
            boss_encounter_active: false,
            rng,
        })
    }

    fn block_move(&mut self, direction: Direction, reason: BlockedReason, out_events: &mut Vec<Event>) {
        self.pending_notice = match reason {
            BlockedReason::OutOfBounds => OUT_OF_BOUNDS_NOTICE.to_owned(),
            BlockedReason::Barrier => BARRIER_NOTICE.to_owned(),
        };
        out_events.push(Event::MoveBlocked {
            direction,
            from: self.position,
            reason,
        });
    }

    fn move_player(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ExpeditionError> {
        let before = self.position;
        let candidate = match before.stepped(direction) {
            Some(candidate) if self.grid.contains(candidate) => candidate,
            _ => {
                self.block_move(direction, BlockedReason::OutOfBounds, out_events);
                return Ok(());
            }
        };

        if self.barrier_tiles.contains(&candidate) {
            self.block_move(direction, BlockedReason::Barrier, out_events);
            return Ok(());
        }

        self.position = candidate;
        self.pending_notice = format!("You've moved {}.", direction_word(direction));
        out_events.push(Event::MoveCommitted {
            direction,
            from: before,
            to: candidate,
        });

        if self.event_tiles.remove(&candidate) {
            self.pending_notice = BUFF_NOTICE.to_owned();
            out_events.push(Event::BuffTriggered { cell: candidate });
        }

        if candidate == self.exit {
            if let Some(boss) = self.boss_tile.take() {
                self.boss_encounter_active = true;
                self.pending_notice = BOSS_NOTICE.to_owned();
                out_events.push(Event::BossAwakened { cell: boss });
            }
            self.advance_level(out_events)?;
        }

        Ok(())
    }

    /// Regenerates the grid for the next level.
    ///
    /// Tiles are generated before any state is committed so a generation
    /// failure leaves the expedition untouched; the caller must still discard
    /// the session on error, matching the one-shot failure contract.
    fn advance_level(&mut self, out_events: &mut Vec<Event>) -> Result<(), ExpeditionError> {
        let event_tiles = generate_event_tiles(
            &mut self.rng,
            self.grid,
            self.exit,
            self.barrier_tiles,
            self.event_tile_count,
        )?;

        self.level = self.level.next();
        self.position = START_TILE;
        self.boss_tile = Some(self.exit);
        self.event_tiles = event_tiles;
        self.pending_notice = format!("You're now at level {}!", self.level.get());
        out_events.push(Event::LevelAdvanced { level: self.level });
        Ok(())
    }
}

/// Applies the provided command to the expedition, mutating state in place.
///
/// Emitted events describe the outcome: a rejected step yields
/// [`Event::MoveBlocked`] and leaves the position untouched, a committed step
/// yields [`Event::MoveCommitted`] followed by any tile events it resolved.
/// The only error path is event-tile regeneration failing during a level
/// advance, which is fatal to the session.
pub fn apply(
    expedition: &mut Expedition,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), ExpeditionError> {
    match command {
        Command::Move { direction } => expedition.move_player(direction, out_events),
    }
}

/// Returns the pending one-shot notice and clears it.
///
/// The second consecutive call with no intervening command returns an empty
/// string, matching the "describe the last event exactly once" contract.
pub fn consume_notice(expedition: &mut Expedition) -> String {
    std::mem::take(&mut expedition.pending_notice)
}

/// Query functions that provide read-only access to the expedition state.
pub mod query {
    use expedition_core::{GridCoord, GridDimensions, Level, TileKind};

    use super::Expedition;

    /// Dimensions of the grid for the current level.
    #[must_use]
    pub fn grid(expedition: &Expedition) -> GridDimensions {
        expedition.grid
    }

    /// Tile the player currently occupies.
    #[must_use]
    pub fn position(expedition: &Expedition) -> GridCoord {
        expedition.position
    }

    /// Level the expedition is currently on.
    #[must_use]
    pub fn level(expedition: &Expedition) -> Level {
        expedition.level
    }

    /// Exit tile that advances the level, fixed at `(width, height)`.
    #[must_use]
    pub fn exit(expedition: &Expedition) -> GridCoord {
        expedition.exit
    }

    /// Boss tile for the current level, absent once the boss was triggered.
    #[must_use]
    pub fn boss_tile(expedition: &Expedition) -> Option<GridCoord> {
        expedition.boss_tile
    }

    /// The two impassable barrier tiles guarding the exit.
    #[must_use]
    pub fn barrier_tiles(expedition: &Expedition) -> [GridCoord; 2] {
        expedition.barrier_tiles
    }

    /// Remaining buff event tiles in deterministic order.
    #[must_use]
    pub fn event_tiles(expedition: &Expedition) -> Vec<GridCoord> {
        expedition.event_tiles.iter().copied().collect()
    }

    /// Whether the boss encounter has been triggered on the current run.
    ///
    /// The flag records the state transition only; nothing consumes it yet.
    #[must_use]
    pub fn boss_encounter_active(expedition: &Expedition) -> bool {
        expedition.boss_encounter_active
    }

    /// Composes an immutable render of the grid as rows of tile categories.
    ///
    /// Row 0 corresponds to `y = height` so the start tile sits visually at
    /// the bottom. Tiles are painted in a fixed order and later writes win:
    /// ground everywhere, then the exit, the player, each remaining event
    /// tile, and finally the boss tile plus the two barriers so they are
    /// never obscured.
    #[must_use]
    pub fn snapshot(expedition: &Expedition) -> GridSnapshot {
        let mut snapshot = GridSnapshot::filled_with_ground(expedition.grid);
        snapshot.paint(expedition.exit, TileKind::Exit);
        snapshot.paint(expedition.position, TileKind::Player);
        for cell in &expedition.event_tiles {
            snapshot.paint(*cell, TileKind::Event);
        }
        if let Some(boss) = expedition.boss_tile {
            snapshot.paint(boss, TileKind::Boss);
            for barrier in expedition.barrier_tiles {
                snapshot.paint(barrier, TileKind::Barrier);
            }
        }
        snapshot
    }

    /// Immutable `height x width` matrix of tile categories.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct GridSnapshot {
        grid: GridDimensions,
        rows: Vec<Vec<TileKind>>,
    }

    impl GridSnapshot {
        fn filled_with_ground(grid: GridDimensions) -> Self {
            let width = grid.width() as usize;
            let height = grid.height() as usize;
            Self {
                grid,
                rows: vec![vec![TileKind::Ground; width]; height],
            }
        }

        fn paint(&mut self, coord: GridCoord, kind: TileKind) {
            let row = (self.grid.height() - coord.y()) as usize;
            let column = (coord.x() - 1) as usize;
            self.rows[row][column] = kind;
        }

        /// Rows of the snapshot from `y = height` down to `y = 1`.
        #[must_use]
        pub fn rows(&self) -> &[Vec<TileKind>] {
            &self.rows
        }

        /// Dimensions of the rendered grid.
        #[must_use]
        pub fn dimensions(&self) -> GridDimensions {
            self.grid
        }

        /// Tile category at the provided 1-based grid coordinate.
        #[must_use]
        pub fn tile_at(&self, coord: GridCoord) -> Option<TileKind> {
            if !self.grid.contains(coord) {
                return None;
            }
            let row = (self.grid.height() - coord.y()) as usize;
            let column = (coord.x() - 1) as usize;
            Some(self.rows[row][column])
        }
    }
}

fn validate(config: &ExpeditionConfig) -> Result<(), ConfigurationError> {
    if config.width() < 2 || config.height() < 2 {
        return Err(ConfigurationError::GridTooSmall {
            width: config.width(),
            height: config.height(),
        });
    }

    // Four tiles are always reserved: start, exit/boss and the two barriers.
    let limit = u64::from(config.width()) * u64::from(config.height()) - 4;
    if config.event_tile_count() as u64 >= limit {
        return Err(ConfigurationError::TooManyEventTiles {
            requested: config.event_tile_count(),
            width: config.width(),
            height: config.height(),
            limit,
        });
    }

    if config.starting_level() < 1 {
        return Err(ConfigurationError::StartingLevelTooLow {
            level: config.starting_level(),
        });
    }

    Ok(())
}

fn barrier_tiles_for(exit: GridCoord) -> [GridCoord; 2] {
    [
        GridCoord::new(exit.x(), exit.y() - 1),
        GridCoord::new(exit.x() - 1, exit.y() - 1),
    ]
}

/// Places event tiles by uniform rejection sampling over the grid interior.
///
/// Draws `(x, y)` uniformly from `[1, width-1] x [1, height-1]`, rejecting the
/// start tile, the boss tile, barrier tiles and already-chosen tiles. The
/// number of draws is capped at ten times the free-cell count so an
/// over-constrained grid fails instead of spinning forever.
fn generate_event_tiles(
    rng: &mut ChaCha8Rng,
    grid: GridDimensions,
    exit: GridCoord,
    barrier_tiles: [GridCoord; 2],
    event_tile_count: usize,
) -> Result<BTreeSet<GridCoord>, ExpeditionError> {
    let mut tiles = BTreeSet::new();
    if event_tile_count == 0 {
        return Ok(tiles);
    }

    let mut reserved: BTreeSet<GridCoord> = BTreeSet::new();
    let _ = reserved.insert(START_TILE);
    let _ = reserved.insert(exit);
    for barrier in barrier_tiles {
        let _ = reserved.insert(barrier);
    }

    let interior = GridDimensions::new(grid.width() - 1, grid.height() - 1);
    let reserved_in_interior = reserved
        .iter()
        .filter(|coord| interior.contains(**coord))
        .count() as u64;
    let free_cells = interior.tile_count().saturating_sub(reserved_in_interior);
    let attempt_cap = free_cells.saturating_mul(GENERATION_ATTEMPT_FACTOR);

    let mut attempts = 0_u64;
    while tiles.len() < event_tile_count {
        if attempts >= attempt_cap {
            return Err(ExpeditionError::Generation { attempts });
        }
        attempts += 1;

        let candidate = GridCoord::new(
            rng.gen_range(1..grid.width()),
            rng.gen_range(1..grid.height()),
        );
        if reserved.contains(&candidate) {
            continue;
        }
        let _ = tiles.insert(candidate);
    }

    Ok(tiles)
}

fn direction_word(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

#[cfg(test)]
mod tests {
    use expedition_core::TileKind;

    use super::*;

    fn small_expedition() -> Expedition {
        Expedition::new(ExpeditionConfig::new(4, 4, 2, 1, 7)).expect("valid configuration")
    }

    #[test]
    fn construction_places_reserved_tiles() {
        let expedition = small_expedition();
        assert_eq!(query::position(&expedition), START_TILE);
        assert_eq!(query::exit(&expedition), GridCoord::new(4, 4));
        assert_eq!(query::boss_tile(&expedition), Some(GridCoord::new(4, 4)));
        assert_eq!(
            query::barrier_tiles(&expedition),
            [GridCoord::new(4, 3), GridCoord::new(3, 3)]
        );
        assert!(!query::boss_encounter_active(&expedition));
    }

    #[test]
    fn construction_seeds_the_opening_notice() {
        let mut expedition = small_expedition();
        assert_eq!(
            consume_notice(&mut expedition),
            "Started a new expedition. You're currently at level 1!"
        );
        assert_eq!(consume_notice(&mut expedition), "");
    }

    #[test]
    fn rejects_grids_smaller_than_two_by_two() {
        let error = Expedition::new(ExpeditionConfig::new(1, 8, 0, 1, 0))
            .expect_err("grid too small");
        assert_eq!(
            error,
            ExpeditionError::Configuration(ConfigurationError::GridTooSmall {
                width: 1,
                height: 8,
            })
        );
    }

    #[test]
    fn rejects_event_tile_counts_without_free_room() {
        let error = Expedition::new(ExpeditionConfig::new(3, 3, 5, 1, 0))
            .expect_err("too many event tiles");
        assert_eq!(
            error,
            ExpeditionError::Configuration(ConfigurationError::TooManyEventTiles {
                requested: 5,
                width: 3,
                height: 3,
                limit: 5,
            })
        );
    }

    #[test]
    fn rejects_starting_level_zero() {
        let error =
            Expedition::new(ExpeditionConfig::new(4, 4, 0, 0, 0)).expect_err("level too low");
        assert_eq!(
            error,
            ExpeditionError::Configuration(ConfigurationError::StartingLevelTooLow { level: 0 })
        );
    }

    #[test]
    fn generation_caps_attempts_on_infeasible_grids() {
        // Passes the coarse w*h-4 check but the sampled interior is a single
        // column with nine free tiles, so fifteen tiles can never converge.
        let error = Expedition::new(ExpeditionConfig::new(2, 12, 15, 1, 3))
            .expect_err("placement cannot converge");
        assert!(matches!(error, ExpeditionError::Generation { .. }));
    }

    #[test]
    fn generation_avoids_every_reserved_tile() {
        for seed in 0..16 {
            let expedition =
                Expedition::new(ExpeditionConfig::new(6, 5, 8, 1, seed)).expect("valid");
            let tiles = query::event_tiles(&expedition);
            assert_eq!(tiles.len(), 8);
            for tile in &tiles {
                assert!(tile.x() >= 1 && tile.x() < 6);
                assert!(tile.y() >= 1 && tile.y() < 5);
                assert_ne!(*tile, START_TILE);
                assert_ne!(*tile, query::exit(&expedition));
                assert!(!query::barrier_tiles(&expedition).contains(tile));
            }
        }
    }

    #[test]
    fn snapshot_paints_in_overwrite_order() {
        let expedition = small_expedition();
        let snapshot = query::snapshot(&expedition);

        // Boss is painted after the exit, so the shared cell shows the boss.
        assert_eq!(
            snapshot.tile_at(GridCoord::new(4, 4)),
            Some(TileKind::Boss)
        );
        assert_eq!(
            snapshot.tile_at(GridCoord::new(4, 3)),
            Some(TileKind::Barrier)
        );
        assert_eq!(
            snapshot.tile_at(GridCoord::new(3, 3)),
            Some(TileKind::Barrier)
        );
        assert_eq!(
            snapshot.tile_at(START_TILE),
            Some(TileKind::Player)
        );

        // Row 0 is the top of the map, so the player sits on the last row.
        assert_eq!(snapshot.rows().len(), 4);
        assert_eq!(snapshot.rows()[3][0], TileKind::Player);
        assert_eq!(snapshot.rows()[0][3], TileKind::Boss);
    }

    #[test]
    fn snapshot_shows_remaining_event_tiles() {
        let expedition = small_expedition();
        let snapshot = query::snapshot(&expedition);
        let painted_events = snapshot
            .rows()
            .iter()
            .flatten()
            .filter(|kind| **kind == TileKind::Event)
            .count();
        assert_eq!(painted_events, query::event_tiles(&expedition).len());
    }
}
