#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement resolver that turns scripted moves into commands.
//!
//! The resolver never mutates the world. It reads an adventurer and the grid,
//! decides what the scripted move amounts to, and answers with a single
//! [`Command`] for the world to apply.

use treasure_hunt_core::{
    Command, Coordinate, GridSize, Movement, Obstacle, Orientation, RetireReason,
};
use treasure_hunt_world::{Adventurer, Grid};

/// Pure system that maps adventurer moves onto world commands.
#[derive(Debug, Default)]
pub struct Resolver;

impl Resolver {
    /// Decides whether an adventurer may take its starting tile.
    ///
    /// Starts outside the grid, on a mountain or on an occupied tile retire the
    /// adventurer before it ever moves.
    #[must_use]
    pub fn deploy(&self, adventurer: &Adventurer, grid: &Grid) -> Command {
        let start = adventurer.position();
        let blocked = is_out_of_bound(i64::from(start.x()), i64::from(start.y()), grid.size())
            || grid
                .tile(start)
                .is_some_and(|tile| tile.is_mountain() || tile.is_occupied());

        if blocked {
            Command::Retire {
                adventurer: adventurer.id(),
                reason: RetireReason::IllegalStart,
            }
        } else {
            Command::Deploy {
                adventurer: adventurer.id(),
            }
        }
    }

    /// Resolves the move scheduled for `turn` into a world command.
    #[must_use]
    pub fn step(&self, adventurer: &Adventurer, turn: u32, grid: &Grid) -> Command {
        let id = adventurer.id();
        let Some(movement) = adventurer.next_move(turn) else {
            return Command::Retire {
                adventurer: id,
                reason: RetireReason::ScriptExhausted,
            };
        };

        match movement {
            Movement::TurnLeft | Movement::TurnRight => Command::Rotate {
                adventurer: id,
                to: rotate(adventurer.orientation(), movement),
            },
            Movement::Advance => {
                let (x, y) = candidate(adventurer.position(), adventurer.orientation());
                let destination = match Coordinate::from_signed(x, y) {
                    Some(cell) if !is_out_of_bound(x, y, grid.size()) => cell,
                    _ => {
                        return Command::Retire {
                            adventurer: id,
                            reason: RetireReason::WanderedOff,
                        }
                    }
                };

                match obstacle_at(grid, destination) {
                    Some(obstacle) => Command::Hold {
                        adventurer: id,
                        obstacle,
                    },
                    None => Command::Advance {
                        adventurer: id,
                        to: destination,
                    },
                }
            }
        }
    }
}

/// Returns the orientation reached after applying a rotation command.
///
/// `TurnLeft` cycles North, West, South, East; `TurnRight` runs the cycle the
/// other way. `Advance` leaves the orientation untouched.
#[must_use]
pub const fn rotate(orientation: Orientation, command: Movement) -> Orientation {
    match (command, orientation) {
        (Movement::Advance, _) => orientation,
        (Movement::TurnLeft, Orientation::North) => Orientation::West,
        (Movement::TurnLeft, Orientation::West) => Orientation::South,
        (Movement::TurnLeft, Orientation::South) => Orientation::East,
        (Movement::TurnLeft, Orientation::East) => Orientation::North,
        (Movement::TurnRight, Orientation::North) => Orientation::East,
        (Movement::TurnRight, Orientation::East) => Orientation::South,
        (Movement::TurnRight, Orientation::South) => Orientation::West,
        (Movement::TurnRight, Orientation::West) => Orientation::North,
    }
}

/// Offset applied to a position by a single advance.
#[must_use]
pub const fn advance_delta(orientation: Orientation) -> (i64, i64) {
    match orientation {
        Orientation::North => (0, -1),
        Orientation::South => (0, 1),
        Orientation::East => (1, 0),
        Orientation::West => (-1, 0),
    }
}

/// Position reached by advancing once from `position`, possibly off the grid.
#[must_use]
pub fn candidate(position: Coordinate, orientation: Orientation) -> (i64, i64) {
    let (dx, dy) = advance_delta(orientation);
    (i64::from(position.x()) + dx, i64::from(position.y()) + dy)
}

/// Reports whether the signed position falls outside the grid.
#[must_use]
pub fn is_out_of_bound(x: i64, y: i64, size: GridSize) -> bool {
    !size.contains(x, y)
}

fn obstacle_at(grid: &Grid, cell: Coordinate) -> Option<Obstacle> {
    let tile = grid.tile_or_default(cell);
    if tile.is_mountain() {
        Some(Obstacle::Mountain)
    } else if tile.is_occupied() {
        Some(Obstacle::Adventurer)
    } else {
        None
    }
}
