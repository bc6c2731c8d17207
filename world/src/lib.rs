#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Treasure Hunt.

use std::{collections::BTreeMap, fmt};

use log::debug;
use thiserror::Error;
use treasure_hunt_core::{
    AdventurerId, Command, Coordinate, Event, GridSize, Movement, Orientation, RetireReason, Tile,
};

/// Errors raised while constructing a grid.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero.
    #[error("grid dimensions must be at least 1x1, got {width}x{height}")]
    EmptyDimensions {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

/// Bounded grid with a sparse mapping of materialized tiles.
///
/// A coordinate without an entry is a plain without treasure or occupant. Only
/// mountains, treasure-bearing tiles and occupied tiles are stored, so memory
/// stays proportional to the interesting cells rather than the grid area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    tiles: BTreeMap<Coordinate, Tile>,
}

impl Grid {
    /// Creates an empty grid, rejecting dimensions below 1x1.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        Ok(Self {
            size: GridSize::new(width, height),
            tiles: BTreeMap::new(),
        })
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Returns the materialized tile at the coordinate, if any.
    #[must_use]
    pub fn tile(&self, at: Coordinate) -> Option<&Tile> {
        self.tiles.get(&at)
    }

    /// Returns the tile at the coordinate, falling back to the default plain.
    #[must_use]
    pub fn tile_or_default(&self, at: Coordinate) -> Tile {
        self.tiles.get(&at).copied().unwrap_or_default()
    }

    /// Iterates over materialized tiles in ascending coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = (Coordinate, &Tile)> {
        self.tiles.iter().map(|(coordinate, tile)| (*coordinate, tile))
    }

    /// Number of materialized tiles.
    #[must_use]
    pub fn materialized(&self) -> usize {
        self.tiles.len()
    }

    /// Stores a tile, replacing any previous declaration.
    ///
    /// Callers are responsible for keeping the coordinate inside the grid.
    pub fn insert_tile(&mut self, at: Coordinate, tile: Tile) {
        let _ = self.tiles.insert(at, tile);
    }

    /// Marks the tile at `at` as occupied, materializing a plain if needed.
    pub fn enter(&mut self, at: Coordinate) {
        self.tiles.entry(at).or_default().occupy();
    }

    /// Clears the occupant of the tile at `at`.
    ///
    /// Tiles that still carry terrain or treasure are kept, default tiles are
    /// dropped from the sparse mapping.
    pub fn leave(&mut self, at: Coordinate) {
        let Some(tile) = self.tiles.get_mut(&at) else {
            return;
        };
        if tile.carries_state() {
            tile.vacate();
        } else {
            let _ = self.tiles.remove(&at);
        }
    }

    /// Takes a single treasure from the tile, returning how many remain.
    pub fn collect_treasure(&mut self, at: Coordinate) -> Option<u32> {
        let tile = self.tiles.get_mut(&at)?;
        if tile.take_treasure() {
            Some(tile.treasures())
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                match self.tile(Coordinate::new(x, y)) {
                    Some(tile) if tile.is_occupied() => f.write_str("A")?,
                    Some(tile) if tile.is_mountain() => f.write_str("M")?,
                    Some(tile) => write!(f, "{}", tile.treasures())?,
                    None => f.write_str(".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Starting description of an adventurer, as read from a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recruit {
    /// Display name of the adventurer.
    pub name: String,
    /// Starting cell, possibly outside the grid.
    pub position: Coordinate,
    /// Starting orientation.
    pub orientation: Orientation,
    /// Moves to perform, one per turn.
    pub script: Vec<Movement>,
}

/// Adventurer record owned by the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adventurer {
    id: AdventurerId,
    name: String,
    position: Coordinate,
    orientation: Orientation,
    script: Vec<Movement>,
    treasures: u32,
    out_of_bound: bool,
    retirement: Option<RetireReason>,
}

impl Adventurer {
    fn from_recruit(id: AdventurerId, recruit: Recruit) -> Self {
        Self {
            id,
            name: recruit.name,
            position: recruit.position,
            orientation: recruit.orientation,
            script: recruit.script,
            treasures: 0,
            out_of_bound: false,
            retirement: None,
        }
    }

    /// Identifier allocated from the adventurer's input order.
    #[must_use]
    pub const fn id(&self) -> AdventurerId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current cell, or the last legal cell once retired.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Current orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Move scheduled for the provided turn, if the script reaches that far.
    #[must_use]
    pub fn next_move(&self, turn: u32) -> Option<Movement> {
        let index = usize::try_from(turn).ok()?;
        self.script.get(index).copied()
    }

    /// Treasures collected so far.
    #[must_use]
    pub const fn treasures(&self) -> u32 {
        self.treasures
    }

    /// Reports whether the adventurer was flagged as out of bound.
    #[must_use]
    pub const fn is_out_of_bound(&self) -> bool {
        self.out_of_bound
    }

    /// Why the adventurer retired, if it did.
    #[must_use]
    pub const fn retirement(&self) -> Option<RetireReason> {
        self.retirement
    }
}

/// Represents the authoritative Treasure Hunt world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    adventurers: Vec<Adventurer>,
    occupants: BTreeMap<Coordinate, AdventurerId>,
    active: Vec<AdventurerId>,
    retired: Vec<AdventurerId>,
    turn: u32,
}

impl World {
    /// Creates a world at turn zero with every recruit active in input order.
    #[must_use]
    pub fn new(grid: Grid, recruits: Vec<Recruit>) -> Self {
        let adventurers: Vec<Adventurer> = recruits
            .into_iter()
            .enumerate()
            .map(|(index, recruit)| {
                let id = AdventurerId::new(u32::try_from(index).unwrap_or(u32::MAX));
                Adventurer::from_recruit(id, recruit)
            })
            .collect();
        let active = adventurers.iter().map(Adventurer::id).collect();
        Self {
            grid,
            adventurers,
            occupants: BTreeMap::new(),
            active,
            retired: Vec::new(),
            turn: 0,
        }
    }

    fn slot(&self, id: AdventurerId) -> Option<usize> {
        let index = usize::try_from(id.get()).ok()?;
        (index < self.adventurers.len()).then_some(index)
    }

    fn is_active(&self, id: AdventurerId) -> bool {
        self.slot(id)
            .is_some_and(|index| self.adventurers[index].retirement.is_none())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Deploy { adventurer } => {
            let Some(index) = active_slot(world, adventurer) else {
                return;
            };
            let at = world.adventurers[index].position;
            world.grid.enter(at);
            let _ = world.occupants.insert(at, adventurer);
            out_events.push(Event::AdventurerDeployed { adventurer, at });
        }
        Command::Rotate { adventurer, to } => {
            let Some(index) = active_slot(world, adventurer) else {
                return;
            };
            let record = &mut world.adventurers[index];
            let from = record.orientation;
            record.orientation = to;
            out_events.push(Event::AdventurerRotated {
                adventurer,
                from,
                to,
            });
        }
        Command::Advance { adventurer, to } => {
            let Some(index) = active_slot(world, adventurer) else {
                return;
            };
            let record = &mut world.adventurers[index];
            let from = record.position;
            world.grid.leave(from);
            world.grid.enter(to);
            let _ = world.occupants.remove(&from);
            let _ = world.occupants.insert(to, adventurer);
            record.position = to;
            out_events.push(Event::AdventurerAdvanced {
                adventurer,
                from,
                to,
            });

            if to != from {
                if let Some(remaining) = world.grid.collect_treasure(to) {
                    record.treasures = record.treasures.saturating_add(1);
                    out_events.push(Event::TreasureCollected {
                        adventurer,
                        at: to,
                        remaining,
                    });
                }
            }
        }
        Command::Hold {
            adventurer,
            obstacle,
        } => {
            let Some(index) = active_slot(world, adventurer) else {
                return;
            };
            out_events.push(Event::AdventurerBlocked {
                adventurer,
                at: world.adventurers[index].position,
                obstacle,
            });
        }
        Command::Retire { adventurer, reason } => {
            let Some(index) = active_slot(world, adventurer) else {
                return;
            };
            let record = &mut world.adventurers[index];
            if reason == RetireReason::WanderedOff {
                world.grid.leave(record.position);
                let _ = world.occupants.remove(&record.position);
            }
            if reason.flags_out_of_bound() {
                record.out_of_bound = true;
            }
            record.retirement = Some(reason);
            world.retired.push(adventurer);
            out_events.push(Event::AdventurerRetired { adventurer, reason });
        }
        Command::EndTurn => {
            let adventurers = &world.adventurers;
            world.active.retain(|id| {
                usize::try_from(id.get())
                    .ok()
                    .and_then(|index| adventurers.get(index))
                    .is_some_and(|record| record.retirement.is_none())
            });
            out_events.push(Event::TurnCompleted { turn: world.turn });
            world.turn = world.turn.saturating_add(1);
        }
    }
}

fn active_slot(world: &World, adventurer: AdventurerId) -> Option<usize> {
    let index = world.slot(adventurer)?;
    if world.is_active(adventurer) {
        Some(index)
    } else {
        debug!(
            "ignoring command for inactive adventurer {}",
            adventurer.get()
        );
        None
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Adventurer, Grid, World};
    use treasure_hunt_core::{AdventurerId, Coordinate};

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current zero-based turn number.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Identifiers of active adventurers in processing order.
    pub fn active(world: &World) -> impl Iterator<Item = AdventurerId> + '_ {
        world
            .active
            .iter()
            .copied()
            .filter(move |id| world.is_active(*id))
    }

    /// Identifiers of retired adventurers in retirement order.
    #[must_use]
    pub fn retired(world: &World) -> &[AdventurerId] {
        &world.retired
    }

    /// Reports whether the simulation has no active adventurer left.
    #[must_use]
    pub fn is_finished(world: &World) -> bool {
        active(world).next().is_none()
    }

    /// Looks up an adventurer by identifier.
    #[must_use]
    pub fn adventurer(world: &World, id: AdventurerId) -> Option<&Adventurer> {
        world.slot(id).map(|index| &world.adventurers[index])
    }

    /// Iterates over every adventurer in input order.
    pub fn adventurers(world: &World) -> impl Iterator<Item = &Adventurer> {
        world.adventurers.iter()
    }

    /// Iterates over retired adventurers in retirement order.
    pub fn retired_adventurers(world: &World) -> impl Iterator<Item = &Adventurer> {
        world
            .retired
            .iter()
            .filter_map(move |id| adventurer(world, *id))
    }

    /// Returns the adventurer standing on the cell, if any.
    ///
    /// Adventurers that wandered off the grid or never took their starting
    /// tile stand nowhere.
    #[must_use]
    pub fn occupant(world: &World, at: Coordinate) -> Option<&Adventurer> {
        let id = world.occupants.get(&at)?;
        adventurer(world, *id)
    }
}
