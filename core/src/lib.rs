#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Treasure Hunt engine.
//!
//! This crate defines the value types and the message surface that connect the
//! authoritative world, the pure movement resolver and the turn engine. The
//! engine submits [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what actually happened.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates grow eastward along `x` and southward along `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: u32,
    y: u32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Converts signed components into a coordinate, rejecting negatives.
    #[must_use]
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        Some(Self { x, y })
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Textual key of the coordinate, formatted as `"x-y"`.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// Dimensions of a grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the signed position lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }
}

/// Cardinal directions an adventurer may face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Facing decreasing row indices.
    North,
    /// Facing increasing column indices.
    East,
    /// Facing increasing row indices.
    South,
    /// Facing decreasing column indices.
    West,
}

impl Orientation {
    /// Every orientation in clockwise order starting from north.
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// Parses the single-letter scenario notation (`N`, `E`, `S`, `O`).
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "N" => Some(Self::North),
            "E" => Some(Self::East),
            "S" => Some(Self::South),
            "O" => Some(Self::West),
            _ => None,
        }
    }

    /// Single-letter scenario notation of the orientation.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'O',
        }
    }
}

/// Scripted instruction consumed by an adventurer on each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Step one cell forward in the facing direction.
    Advance,
    /// Rotate a quarter turn counter-clockwise.
    TurnLeft,
    /// Rotate a quarter turn clockwise.
    TurnRight,
}

impl Movement {
    /// Parses the single-character scenario notation (`A`, `G`, `D`).
    #[must_use]
    pub const fn from_char(symbol: char) -> Option<Self> {
        match symbol {
            'A' => Some(Self::Advance),
            'G' => Some(Self::TurnLeft),
            'D' => Some(Self::TurnRight),
            _ => None,
        }
    }

    /// Parses a whole script, failing on the first unknown symbol.
    #[must_use]
    pub fn parse_script(script: &str) -> Option<Vec<Self>> {
        script.chars().map(Self::from_char).collect()
    }
}

/// Terrain carried by a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Walkable ground that may hold treasure.
    #[default]
    Plain,
    /// Impassable ground.
    Mountain,
}

/// State of a single materialized grid cell.
///
/// The default tile is a plain without treasure or occupant. Grids only store
/// tiles that differ from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    terrain: Terrain,
    treasures: u32,
    occupied: bool,
}

impl Tile {
    /// Creates an unoccupied plain holding the provided number of treasures.
    #[must_use]
    pub const fn plain(treasures: u32) -> Self {
        Self {
            terrain: Terrain::Plain,
            treasures,
            occupied: false,
        }
    }

    /// Creates an unoccupied mountain. Mountains never hold treasure.
    #[must_use]
    pub const fn mountain() -> Self {
        Self {
            terrain: Terrain::Mountain,
            treasures: 0,
            occupied: false,
        }
    }

    /// Terrain of the tile.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Number of treasures left on the tile.
    #[must_use]
    pub const fn treasures(&self) -> u32 {
        self.treasures
    }

    /// Reports whether an adventurer stands on the tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Reports whether the tile is a mountain.
    #[must_use]
    pub fn is_mountain(&self) -> bool {
        self.terrain == Terrain::Mountain
    }

    /// Reports whether the tile must stay materialized once vacated.
    #[must_use]
    pub fn carries_state(&self) -> bool {
        self.is_mountain() || self.treasures > 0
    }

    /// Marks the tile as occupied by an adventurer.
    pub fn occupy(&mut self) {
        self.occupied = true;
    }

    /// Clears the occupant flag.
    pub fn vacate(&mut self) {
        self.occupied = false;
    }

    /// Removes a single treasure, returning `false` when none is left.
    pub fn take_treasure(&mut self) -> bool {
        if self.treasures == 0 {
            return false;
        }
        self.treasures -= 1;
        true
    }

    /// Combines a second terrain declaration for the same cell.
    ///
    /// A plain adopts the incoming terrain while a mountain flips back to a
    /// plain. Treasure counts add up, except that a merged mountain keeps none.
    #[must_use]
    pub fn merge(self, incoming: Tile) -> Self {
        let terrain = match self.terrain {
            Terrain::Plain => incoming.terrain,
            Terrain::Mountain => Terrain::Plain,
        };
        let treasures = match terrain {
            Terrain::Plain => self.treasures.saturating_add(incoming.treasures),
            Terrain::Mountain => 0,
        };
        Self {
            terrain,
            treasures,
            occupied: self.occupied || incoming.occupied,
        }
    }
}

/// Unique identifier assigned to an adventurer, matching its input order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdventurerId(u32);

impl AdventurerId {
    /// Creates a new adventurer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons an adventurer leaves the active roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetireReason {
    /// Started outside the grid, on a mountain, or on an occupied tile.
    IllegalStart,
    /// Advanced past the edge of the grid.
    WanderedOff,
    /// Ran out of scripted moves.
    ScriptExhausted,
}

impl RetireReason {
    /// Reports whether retirement flags the adventurer as out of bound.
    #[must_use]
    pub const fn flags_out_of_bound(self) -> bool {
        matches!(self, Self::IllegalStart | Self::WanderedOff)
    }
}

/// Obstacles that absorb an advance as a no-op turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Obstacle {
    /// The destination tile is a mountain.
    Mountain,
    /// Another adventurer stands on the destination tile.
    Adventurer,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places an adventurer on its starting tile.
    Deploy {
        /// Adventurer entering the grid.
        adventurer: AdventurerId,
    },
    /// Turns an adventurer to face a new orientation.
    Rotate {
        /// Adventurer turning in place.
        adventurer: AdventurerId,
        /// Orientation after the rotation.
        to: Orientation,
    },
    /// Moves an adventurer onto a free, in-bounds tile.
    Advance {
        /// Adventurer stepping forward.
        adventurer: AdventurerId,
        /// Destination of the step.
        to: Coordinate,
    },
    /// Records that an advance was absorbed by an obstacle.
    Hold {
        /// Adventurer that stays in place.
        adventurer: AdventurerId,
        /// What blocked the step.
        obstacle: Obstacle,
    },
    /// Removes an adventurer from the active roster.
    Retire {
        /// Adventurer leaving the game.
        adventurer: AdventurerId,
        /// Why the adventurer retires.
        reason: RetireReason,
    },
    /// Closes the current turn.
    EndTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that an adventurer occupies its starting tile.
    AdventurerDeployed {
        /// Adventurer that entered the grid.
        adventurer: AdventurerId,
        /// Starting tile.
        at: Coordinate,
    },
    /// Confirms that an adventurer turned in place.
    AdventurerRotated {
        /// Adventurer that turned.
        adventurer: AdventurerId,
        /// Orientation before the rotation.
        from: Orientation,
        /// Orientation after the rotation.
        to: Orientation,
    },
    /// Confirms that an adventurer moved between two cells.
    AdventurerAdvanced {
        /// Adventurer that moved.
        adventurer: AdventurerId,
        /// Cell occupied before the move.
        from: Coordinate,
        /// Cell occupied after the move.
        to: Coordinate,
    },
    /// Reports that an advance was absorbed by an obstacle.
    AdventurerBlocked {
        /// Adventurer that stayed in place.
        adventurer: AdventurerId,
        /// Cell the adventurer still occupies.
        at: Coordinate,
        /// What blocked the step.
        obstacle: Obstacle,
    },
    /// Confirms that an adventurer picked up a treasure.
    TreasureCollected {
        /// Adventurer that collected the treasure.
        adventurer: AdventurerId,
        /// Tile the treasure was taken from.
        at: Coordinate,
        /// Treasures left on the tile.
        remaining: u32,
    },
    /// Announces that an adventurer left the active roster.
    AdventurerRetired {
        /// Adventurer that retired.
        adventurer: AdventurerId,
        /// Why the adventurer retired.
        reason: RetireReason,
    },
    /// Announces that a turn finished.
    TurnCompleted {
        /// Zero-based index of the completed turn.
        turn: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, GridSize, Movement, Orientation, RetireReason, Terrain, Tile};
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
    fn coordinate_key_uses_dash_separator() {
        assert_eq!(Coordinate::new(3, 4).key(), "3-4");
    }

    #[test]
    fn coordinate_rejects_negative_components() {
        assert_eq!(Coordinate::from_signed(-1, 0), None);
        assert_eq!(Coordinate::from_signed(0, -1), None);
        assert_eq!(Coordinate::from_signed(2, 5), Some(Coordinate::new(2, 5)));
    }

    #[test]
    fn grid_size_contains_is_boundary_exact() {
        let size = GridSize::new(3, 4);
        assert!(size.contains(2, 3));
        assert!(!size.contains(3, 3));
        assert!(!size.contains(2, 4));
        assert!(!size.contains(-1, 0));
    }

    #[test]
    fn orientation_letters_round_trip() {
        for orientation in Orientation::ALL {
            let letter = orientation.letter().to_string();
            assert_eq!(Orientation::from_letter(&letter), Some(orientation));
        }
        assert_eq!(Orientation::from_letter("W"), None);
    }

    #[test]
    fn script_parsing_rejects_unknown_symbols() {
        assert_eq!(
            Movement::parse_script("AGD"),
            Some(vec![Movement::Advance, Movement::TurnLeft, Movement::TurnRight])
        );
        assert_eq!(Movement::parse_script("AADADAGGE"), None);
        assert_eq!(Movement::parse_script(""), Some(Vec::new()));
    }

    #[test]
    fn take_treasure_never_goes_below_zero() {
        let mut tile = Tile::plain(1);
        assert!(tile.take_treasure());
        assert_eq!(tile.treasures(), 0);
        assert!(!tile.take_treasure());
        assert_eq!(tile.treasures(), 0);
    }

    #[test]
    fn merging_treasures_sums_counts() {
        let merged = Tile::plain(3).merge(Tile::plain(2));
        assert_eq!(merged.terrain(), Terrain::Plain);
        assert_eq!(merged.treasures(), 5);
    }

    #[test]
    fn merging_into_mountain_flips_back_to_plain() {
        let merged = Tile::mountain().merge(Tile::plain(2));
        assert_eq!(merged.terrain(), Terrain::Plain);
        assert_eq!(merged.treasures(), 2);
    }

    #[test]
    fn merging_mountain_onto_treasure_drops_treasure() {
        let merged = Tile::plain(4).merge(Tile::mountain());
        assert_eq!(merged.terrain(), Terrain::Mountain);
        assert_eq!(merged.treasures(), 0);
    }

    #[test]
    fn only_out_of_grid_reasons_flag_out_of_bound() {
        assert!(RetireReason::IllegalStart.flags_out_of_bound());
        assert!(RetireReason::WanderedOff.flags_out_of_bound());
        assert!(!RetireReason::ScriptExhausted.flags_out_of_bound());
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        let mut tile = Tile::plain(2);
        tile.occupy();
        assert_round_trip(&tile);
    }

    #[test]
    fn retire_reason_round_trips_through_bincode() {
        assert_round_trip(&RetireReason::WanderedOff);
    }
}
