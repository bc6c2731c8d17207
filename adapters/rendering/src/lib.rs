#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rendering adapters that turn a finished Treasure Hunt world into text.

use std::fmt;

use anyhow::Result as AnyResult;
use serde::Serialize;
use thiserror::Error;
use treasure_hunt_core::{Coordinate, Orientation};
use treasure_hunt_world::{query, World};

/// Errors that can occur when constructing renderers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Board cells must be at least one character wide.
    #[error("cell width must be positive (received {cell_width})")]
    InvalidCellWidth {
        /// Provided width that failed validation.
        cell_width: usize,
    },
}

/// Treasure left on a tile at the end of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TreasureLine {
    /// Tile holding the treasure.
    pub at: Coordinate,
    /// Number of treasures left.
    pub count: u32,
}

/// Final standing of an adventurer listed in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdventurerLine {
    /// Display name.
    pub name: String,
    /// Last cell the adventurer stood on.
    pub position: Coordinate,
    /// Final orientation.
    pub orientation: Orientation,
    /// Treasures collected.
    pub treasures: u32,
}

/// Summary of a final world in the scenario notation.
///
/// Adventurers flagged out of bound, whether they wandered off the grid or never
/// took a legal starting tile, are left out. Everyone else is listed in
/// retirement order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Number of turns played.
    pub turns: u32,
    /// Mountain cells in ascending coordinate order.
    pub mountains: Vec<Coordinate>,
    /// Remaining treasure in ascending coordinate order.
    pub treasures: Vec<TreasureLine>,
    /// Reported adventurers in retirement order.
    pub adventurers: Vec<AdventurerLine>,
}

impl Report {
    /// Captures the report for the provided world.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let grid = query::grid(world);
        let mountains = grid
            .tiles()
            .filter(|(_, tile)| tile.is_mountain())
            .map(|(at, _)| at)
            .collect();
        let treasures = grid
            .tiles()
            .filter(|(_, tile)| tile.treasures() > 0)
            .map(|(at, tile)| TreasureLine {
                at,
                count: tile.treasures(),
            })
            .collect();
        let adventurers = query::retired_adventurers(world)
            .filter(|adventurer| !adventurer.is_out_of_bound())
            .map(|adventurer| AdventurerLine {
                name: adventurer.name().to_owned(),
                position: adventurer.position(),
                orientation: adventurer.orientation(),
                treasures: adventurer.treasures(),
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            turns: query::turn(world),
            mountains,
            treasures,
            adventurers,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "C - {} - {}", self.width, self.height)?;
        for at in &self.mountains {
            writeln!(f, "M - {} - {}", at.x(), at.y())?;
        }
        for treasure in &self.treasures {
            writeln!(
                f,
                "T - {} - {} - {}",
                treasure.at.x(),
                treasure.at.y(),
                treasure.count
            )?;
        }
        for adventurer in &self.adventurers {
            writeln!(
                f,
                "A - {} - {} - {} - {} - {}",
                adventurer.name,
                adventurer.position.x(),
                adventurer.position.y(),
                adventurer.orientation.letter(),
                adventurer.treasures
            )?;
        }
        Ok(())
    }
}

/// Renders the final report in scenario notation.
#[must_use]
pub fn render_report(world: &World) -> String {
    Report::from_world(world).to_string()
}

/// Renders the board with every cell padded or clipped to `cell_width`.
pub fn render_grid(world: &World, cell_width: usize) -> Result<String, RenderingError> {
    let view = BoardView::new(cell_width)?;
    Ok(view.draw(world))
}

/// Output format capable of presenting a finished world.
pub trait Renderer {
    /// Renders the world into a printable document.
    fn render(&self, world: &World) -> AnyResult<String>;
}

/// Scenario-notation report, the same line format scenarios are written in.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextReport;

impl Renderer for TextReport {
    fn render(&self, world: &World) -> AnyResult<String> {
        Ok(render_report(world))
    }
}

/// Report serialized as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonReport {
    /// Whether to indent the document.
    pub pretty: bool,
}

impl Renderer for JsonReport {
    fn render(&self, world: &World) -> AnyResult<String> {
        let report = Report::from_world(world);
        let mut document = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        document.push('\n');
        Ok(document)
    }
}

/// Human-readable board with one fixed-width cell per tile.
#[derive(Clone, Copy, Debug)]
pub struct BoardView {
    cell_width: usize,
}

impl BoardView {
    /// Default number of characters per cell.
    pub const DEFAULT_CELL_WIDTH: usize = 10;

    /// Creates a board renderer; `cell_width` must be positive.
    pub fn new(cell_width: usize) -> Result<Self, RenderingError> {
        if cell_width == 0 {
            return Err(RenderingError::InvalidCellWidth { cell_width });
        }
        Ok(Self { cell_width })
    }

    fn cell_label(world: &World, at: Coordinate) -> String {
        let Some(tile) = query::grid(world).tile(at) else {
            return ".".to_owned();
        };
        if let Some(adventurer) = query::occupant(world, at) {
            format!("A ({})", adventurer.name())
        } else if tile.is_mountain() {
            "M".to_owned()
        } else if tile.is_occupied() {
            "A".to_owned()
        } else {
            format!("T ({})", tile.treasures())
        }
    }
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_width: Self::DEFAULT_CELL_WIDTH,
        }
    }
}

impl Renderer for BoardView {
    fn render(&self, world: &World) -> AnyResult<String> {
        Ok(self.draw(world))
    }
}

impl BoardView {
    fn draw(&self, world: &World) -> String {
        let grid = query::grid(world);
        let mut board = String::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let label = Self::cell_label(world, Coordinate::new(x, y));
                let clipped: String = label.chars().take(self.cell_width).collect();
                board.push_str(&format!("{clipped:<width$}", width = self.cell_width));
            }
            board.push('\n');
        }
        board
    }
}
