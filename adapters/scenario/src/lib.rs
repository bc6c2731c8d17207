#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-oriented scenario reader for Treasure Hunt.
//!
//! A scenario lists one entry per line, fields separated by `" - "`:
//!
//! ```text
//! C - 3 - 4
//! M - 1 - 3
//! T - 1 - 1 - 3
//! # comment
//! A - John - 1 - 1 - S - AADADAGG
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Terrain must lie
//! inside the grid; adventurers may start anywhere, the turn engine retires
//! those that start outside.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::warn;
use thiserror::Error;
use treasure_hunt_core::{Coordinate, Movement, Orientation, Tile};
use treasure_hunt_world::{Grid, GridError, Recruit, World};

const SEPARATOR: &str = " - ";

/// Errors reported while reading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("could not read scenario file {}", path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The line starts with an unknown entry code.
    #[error("{code} is not a valid entry | line {line}")]
    UnknownEntry {
        /// Offending entry code.
        code: String,
        /// One-based line number.
        line: usize,
    },
    /// The entry has the wrong number of fields.
    #[error("invalid number of parameters | line {line}")]
    ParameterCount {
        /// One-based line number.
        line: usize,
    },
    /// A numeric field could not be parsed.
    #[error("non-numeric parameters | line {line}")]
    NonNumeric {
        /// One-based line number.
        line: usize,
    },
    /// A coordinate is negative.
    #[error("negative coordinates | line {line}")]
    NegativeCoordinates {
        /// One-based line number.
        line: usize,
    },
    /// The map dimensions are zero or negative.
    #[error("map dimensions should be strictly positive | line {line}")]
    NonPositiveDimensions {
        /// One-based line number.
        line: usize,
    },
    /// The treasure count is zero or negative.
    #[error("number of treasures should be strictly positive | line {line}")]
    NonPositiveTreasure {
        /// One-based line number.
        line: usize,
    },
    /// The orientation letter is unknown.
    #[error("{value} is not a valid orientation | line {line}")]
    InvalidOrientation {
        /// Offending orientation field.
        value: String,
        /// One-based line number.
        line: usize,
    },
    /// The movement script contains an unknown symbol.
    #[error("{value} is not a valid movement script | line {line}")]
    InvalidScript {
        /// Offending script field.
        value: String,
        /// One-based line number.
        line: usize,
    },
    /// Terrain was declared outside the grid.
    #[error("terrain at {at} lies outside the map | line {line}")]
    OutOfBounds {
        /// Declared coordinate.
        at: Coordinate,
        /// One-based line number.
        line: usize,
    },
    /// No `C` line declared the grid.
    #[error("scenario does not declare a map")]
    MissingMap,
    /// The declared grid cannot be built.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parsed scenario, ready to become a world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    grid: Grid,
    recruits: Vec<Recruit>,
}

impl Scenario {
    /// Grid with terrain and treasure populated.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Adventurers in declaration order.
    #[must_use]
    pub fn recruits(&self) -> &[Recruit] {
        &self.recruits
    }

    /// Builds the turn-zero world described by the scenario.
    #[must_use]
    pub fn into_world(self) -> World {
        World::new(self.grid, self.recruits)
    }
}

/// Reads and parses the scenario stored at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

/// Parses scenario text.
///
/// The first `C` line fixes the grid; later ones are ignored. Terrain
/// declared twice on the same cell is merged with [`Tile::merge`].
pub fn parse(input: &str) -> Result<Scenario, ScenarioError> {
    let mut dimensions: Option<(u32, u32)> = None;
    let mut terrain: Vec<(Coordinate, Tile, usize)> = Vec::new();
    let mut recruits: Vec<Recruit> = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(SEPARATOR).collect();
        match parse_entry(&fields, line)? {
            Entry::Map { width, height } => {
                if dimensions.is_none() {
                    dimensions = Some((width, height));
                }
            }
            Entry::Terrain { at, tile } => terrain.push((at, tile, line)),
            Entry::Adventurer(recruit) => recruits.push(recruit),
        }
    }

    let (width, height) = dimensions.ok_or(ScenarioError::MissingMap)?;
    let mut grid = Grid::new(width, height)?;

    let mut declared: BTreeMap<Coordinate, Tile> = BTreeMap::new();
    for (at, tile, line) in terrain {
        if at.x() >= width || at.y() >= height {
            return Err(ScenarioError::OutOfBounds { at, line });
        }
        let merged = match declared.get(&at) {
            Some(existing) => {
                let merged = existing.merge(tile);
                let offered = existing.treasures().saturating_add(tile.treasures());
                if merged.is_mountain() && offered > 0 {
                    warn!("mountain declared over treasure at {at} (line {line}); treasure dropped");
                }
                merged
            }
            None => tile,
        };
        let _ = declared.insert(at, merged);
    }
    for (at, tile) in declared {
        if tile.carries_state() {
            grid.insert_tile(at, tile);
        }
    }

    Ok(Scenario { grid, recruits })
}

enum Entry {
    Map { width: u32, height: u32 },
    Terrain { at: Coordinate, tile: Tile },
    Adventurer(Recruit),
}

fn parse_entry(fields: &[&str], line: usize) -> Result<Entry, ScenarioError> {
    let code = fields.first().copied().unwrap_or_default();
    match code {
        "C" => {
            expect_fields(fields, 3, line)?;
            let width = number(fields[1], line)?;
            let height = number(fields[2], line)?;
            if width < 1 || height < 1 {
                return Err(ScenarioError::NonPositiveDimensions { line });
            }
            Ok(Entry::Map {
                width: u32::try_from(width).map_err(|_| ScenarioError::NonNumeric { line })?,
                height: u32::try_from(height).map_err(|_| ScenarioError::NonNumeric { line })?,
            })
        }
        "M" => {
            expect_fields(fields, 3, line)?;
            Ok(Entry::Terrain {
                at: coordinate(fields[1], fields[2], line)?,
                tile: Tile::mountain(),
            })
        }
        "T" => {
            expect_fields(fields, 4, line)?;
            let at = coordinate(fields[1], fields[2], line)?;
            let count = number(fields[3], line)?;
            if count < 1 {
                return Err(ScenarioError::NonPositiveTreasure { line });
            }
            let count = u32::try_from(count).map_err(|_| ScenarioError::NonNumeric { line })?;
            Ok(Entry::Terrain {
                at,
                tile: Tile::plain(count),
            })
        }
        "A" => {
            expect_fields(fields, 6, line)?;
            let position = coordinate(fields[2], fields[3], line)?;
            let orientation = Orientation::from_letter(fields[4]).ok_or_else(|| {
                ScenarioError::InvalidOrientation {
                    value: fields[4].to_owned(),
                    line,
                }
            })?;
            let script =
                Movement::parse_script(fields[5]).ok_or_else(|| ScenarioError::InvalidScript {
                    value: fields[5].to_owned(),
                    line,
                })?;
            Ok(Entry::Adventurer(Recruit {
                name: fields[1].to_owned(),
                position,
                orientation,
                script,
            }))
        }
        other => Err(ScenarioError::UnknownEntry {
            code: other.to_owned(),
            line,
        }),
    }
}

fn expect_fields(fields: &[&str], expected: usize, line: usize) -> Result<(), ScenarioError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(ScenarioError::ParameterCount { line })
    }
}

fn number(field: &str, line: usize) -> Result<i64, ScenarioError> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| ScenarioError::NonNumeric { line })
}

fn coordinate(x: &str, y: &str, line: usize) -> Result<Coordinate, ScenarioError> {
    let x = number(x, line)?;
    let y = number(y, line)?;
    if x < 0 || y < 0 {
        return Err(ScenarioError::NegativeCoordinates { line });
    }
    Coordinate::from_signed(x, y).ok_or(ScenarioError::NonNumeric { line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use treasure_hunt_core::Terrain;

    const JOHN: &str = "C - 3 - 4\nM - 1 - 3\nT - 1 - 1 - 3\nT - 1 - 1 - 2\n#Commentaire\n A - John - 1 - 1 - S - AADADAGG\n";

    #[test]
    fn parses_reference_map() {
        let scenario = parse(JOHN).expect("scenario parses");
        let grid = scenario.grid();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.materialized(), 2);
        assert_eq!(
            grid.tile(Coordinate::new(1, 1)).map(Tile::treasures),
            Some(5)
        );
        assert_eq!(
            grid.tile(Coordinate::new(1, 3)).map(Tile::terrain),
            Some(Terrain::Mountain)
        );

        let recruits = scenario.recruits();
        assert_eq!(recruits.len(), 1);
        assert_eq!(recruits[0].name, "John");
        assert_eq!(recruits[0].position, Coordinate::new(1, 1));
        assert_eq!(recruits[0].orientation, Orientation::South);
        assert_eq!(recruits[0].script.len(), 8);
    }

    #[test]
    fn keeps_names_with_spaces() {
        let scenario =
            parse("C - 5 - 5\nA - Benjamin Gates - 3 - 4 - S - AAGD").expect("scenario parses");
        let recruit = &scenario.recruits()[0];
        assert_eq!(recruit.name, "Benjamin Gates");
        assert_eq!(
            recruit.script,
            vec![
                Movement::Advance,
                Movement::Advance,
                Movement::TurnLeft,
                Movement::TurnRight
            ]
        );
    }

    #[test]
    fn first_map_line_wins() {
        let scenario = parse("C - 2 - 2\nC - 9 - 9").expect("scenario parses");
        assert_eq!(scenario.grid().width(), 2);
    }

    #[test]
    fn adventurers_may_start_outside_the_map() {
        let scenario = parse("C - 2 - 2\nA - Lost - 5 - 5 - N - A").expect("scenario parses");
        assert_eq!(scenario.recruits()[0].position, Coordinate::new(5, 5));
    }

    #[test]
    fn rejects_negative_terrain_coordinates() {
        let error = parse("M - -1 - 0").expect_err("negative x");
        assert_eq!(error.to_string(), "negative coordinates | line 1");
        let error = parse("C - 3 - 3\nM - 2 - -1").expect_err("negative y");
        assert_eq!(error.to_string(), "negative coordinates | line 2");
    }

    #[test]
    fn rejects_scenarios_without_map() {
        assert!(matches!(
            parse("M - 2 - 1"),
            Err(ScenarioError::MissingMap)
        ));
    }

    #[test]
    fn rejects_invalid_script() {
        assert!(matches!(
            parse("C - 3 - 3\n A - John - 1 - 1 - N - AADADAGGE"),
            Err(ScenarioError::InvalidScript { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_invalid_orientation() {
        assert!(matches!(
            parse("C - 3 - 3\nA - John - 1 - 1 - W - A"),
            Err(ScenarioError::InvalidOrientation { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_negative_starting_position() {
        assert!(matches!(
            parse("C - 3 - 3\nA - John - -1 - 1 - E - AADADAGG"),
            Err(ScenarioError::NegativeCoordinates { line: 2 })
        ));
    }

    #[test]
    fn rejects_unknown_entry_code() {
        let error = parse(" E - John - -1 - 1 - E - AADADAGG").expect_err("unknown code");
        assert_eq!(error.to_string(), "E is not a valid entry | line 1");
    }

    #[test]
    fn rejects_wrong_parameter_counts() {
        assert!(matches!(
            parse("C - 3"),
            Err(ScenarioError::ParameterCount { line: 1 })
        ));
        assert!(matches!(
            parse("C - 3 - 3\nT - 3 - 4"),
            Err(ScenarioError::ParameterCount { line: 2 })
        ));
        assert!(matches!(
            parse("C - 3 - 3\n\nA - Benjamin - 1 - 2 - N"),
            Err(ScenarioError::ParameterCount { line: 3 })
        ));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(matches!(
            parse("C - a - 0"),
            Err(ScenarioError::NonNumeric { line: 1 })
        ));
        assert!(matches!(
            parse("C - 3 - 3\nT - a - 4 - 0"),
            Err(ScenarioError::NonNumeric { line: 2 })
        ));
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(matches!(
            parse("C - 3 - -4"),
            Err(ScenarioError::NonPositiveDimensions { line: 1 })
        ));
        assert!(matches!(
            parse("C - 3 - 3\nT - 1 - 1 - 0"),
            Err(ScenarioError::NonPositiveTreasure { line: 2 })
        ));
    }

    #[test]
    fn rejects_terrain_outside_map() {
        assert!(matches!(
            parse("C - 3 - 3\nM - 3 - 0"),
            Err(ScenarioError::OutOfBounds { line: 2, .. })
        ));
    }

    #[test]
    fn duplicate_mountain_flips_back_to_empty_plain() {
        let scenario = parse("C - 3 - 3\nM - 1 - 1\nM - 1 - 1").expect("scenario parses");
        assert!(scenario.grid().tile(Coordinate::new(1, 1)).is_none());
    }

    #[test]
    fn treasure_over_mountain_becomes_plain_treasure() {
        let scenario = parse("C - 3 - 3\nM - 1 - 1\nT - 1 - 1 - 2").expect("scenario parses");
        assert_eq!(
            scenario.grid().tile(Coordinate::new(1, 1)).copied(),
            Some(Tile::plain(2))
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let error = load("/definitely/not/here.txt").expect_err("missing file");
        assert!(matches!(error, ScenarioError::Io { .. }));
    }
}
