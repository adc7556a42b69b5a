//! Coarse-to-fine subgrid projection.
//!
//! Each collapsed world tile is split into a 2x2 block of terrain labels on the
//! game grid. The top row is taken from the tile's north edge code and the
//! bottom row from its south edge code, half a code per quadrant.
//!
//! NOTE: this reads edge codes as interior terrain. It matches the authored
//! tile sheets but is not a general property of edge-coded tiles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{EMPTY_TERRAIN_GLYPH, SUBGRID_FACTOR};
use crate::grid::{Cell, Grid, GridError, Position};
use crate::rules::{TileRule, Tileset};
use crate::walkability::{self, Walkability};

/// Single-letter terrain label, or the empty label for unknown terrain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainLabel(Option<char>);

impl TerrainLabel {
    pub const EMPTY: TerrainLabel = TerrainLabel(None);

    pub const fn new(letter: char) -> Self {
        Self(Some(letter))
    }

    pub fn letter(&self) -> Option<char> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Letter for text dumps, `.` for the empty label
    pub fn glyph(&self) -> char {
        self.0.unwrap_or(EMPTY_TERRAIN_GLYPH)
    }
}

impl fmt::Display for TerrainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(letter) => write!(f, "{}", letter),
            None => Ok(()),
        }
    }
}

/// 2x2 terrain labels of one coarse tile, `[row][col]` with row 0 on top
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainQuadrant(pub [[TerrainLabel; 2]; 2]);

impl TerrainQuadrant {
    pub const EMPTY: TerrainQuadrant = TerrainQuadrant([[TerrainLabel::EMPTY; 2]; 2]);

    pub fn from_rule(rule: &TileRule) -> Self {
        Self([
            [
                TerrainLabel::new(rule.north.left()),
                TerrainLabel::new(rule.north.right()),
            ],
            [
                TerrainLabel::new(rule.south.left()),
                TerrainLabel::new(rule.south.right()),
            ],
        ])
    }

    pub fn top_left(&self) -> TerrainLabel {
        self.0[0][0]
    }

    pub fn top_right(&self) -> TerrainLabel {
        self.0[0][1]
    }

    pub fn bottom_left(&self) -> TerrainLabel {
        self.0[1][0]
    }

    pub fn bottom_right(&self) -> TerrainLabel {
        self.0[1][1]
    }
}

/// Quadrant labels of a collapsed cell; uncollapsed or rule-less cells are empty
pub fn quadrant_for(cell: &Cell, tileset: &Tileset) -> TerrainQuadrant {
    cell.resolved()
        .and_then(|tile| tileset.rule(tile))
        .map(TerrainQuadrant::from_rule)
        .unwrap_or(TerrainQuadrant::EMPTY)
}

/// The game-resolution terrain grid, twice the world grid on each axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FineGrid {
    labels: Grid<TerrainLabel>,
}

impl FineGrid {
    /// All-empty fine grid for a `world_width` x `world_height` coarse grid
    pub fn new(world_width: usize, world_height: usize) -> Self {
        Self {
            labels: Grid::new(
                world_width * SUBGRID_FACTOR,
                world_height * SUBGRID_FACTOR,
                TerrainLabel::EMPTY,
            ),
        }
    }

    pub fn width(&self) -> usize {
        self.labels.width()
    }

    pub fn height(&self) -> usize {
        self.labels.height()
    }

    pub fn labels(&self) -> &Grid<TerrainLabel> {
        &self.labels
    }

    pub fn terrain_at(&self, x: usize, y: usize) -> Result<TerrainLabel, GridError> {
        self.labels.cell_at(Position::new(x, y)).copied()
    }

    pub fn walkability_at(&self, x: usize, y: usize) -> Result<Walkability, GridError> {
        self.terrain_at(x, y).map(walkability::classify)
    }

    /// Write one coarse cell's quadrant into its 2x2 block
    pub fn write_quadrant(
        &mut self,
        world: Position,
        quadrant: &TerrainQuadrant,
    ) -> Result<(), GridError> {
        let fx = world.x * SUBGRID_FACTOR;
        let fy = world.y * SUBGRID_FACTOR;
        self.labels
            .set(Position::new(fx, fy), quadrant.bottom_left())?;
        self.labels
            .set(Position::new(fx, fy + 1), quadrant.top_left())?;
        self.labels
            .set(Position::new(fx + 1, fy), quadrant.bottom_right())?;
        self.labels
            .set(Position::new(fx + 1, fy + 1), quadrant.top_right())?;
        Ok(())
    }

    /// Project one coarse cell; touches only that cell's block
    pub fn project_cell(&mut self, cell: &Cell, tileset: &Tileset) -> Result<(), GridError> {
        self.write_quadrant(cell.position(), &quadrant_for(cell, tileset))
    }

    pub fn walkability(&self) -> Grid<Walkability> {
        self.labels.map(|_, label| walkability::classify(*label))
    }

    /// Count of each label, empty label included
    pub fn label_counts(&self) -> Vec<(TerrainLabel, usize)> {
        let mut counts: Vec<(TerrainLabel, usize)> = Vec::new();
        for label in self.labels.cells() {
            match counts.iter_mut().find(|(l, _)| l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((*label, 1)),
            }
        }
        counts.sort_by_key(|(label, _)| label.letter());
        counts
    }
}

/// Text dump, top row first
impl fmt::Display for FineGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height()).rev() {
            for x in 0..self.width() {
                let glyph = self
                    .labels
                    .get(Position::new(x, y))
                    .map(TerrainLabel::glyph)
                    .unwrap_or(EMPTY_TERRAIN_GLYPH);
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Expand every cell of a coarse grid. Uncollapsed cells leave empty blocks.
pub fn project_grid(coarse: &Grid<Cell>, tileset: &Tileset) -> FineGrid {
    let mut fine = FineGrid::new(coarse.width(), coarse.height());
    for (_, cell) in coarse.iter() {
        if cell.is_collapsed() {
            // Every coarse position maps inside the fine grid
            let _ = fine.project_cell(cell, tileset);
        }
    }
    fine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid;
    use crate::rules::{RuleTable, TileEntry};

    fn single_tile(rule: TileRule) -> Tileset {
        let table = RuleTable::from_entries([TileEntry::new("t", rule)]).unwrap();
        Tileset::from_rules(&table).unwrap()
    }

    #[test]
    fn test_quadrant_from_rule_splits_north_and_south() {
        let rule = TileRule::parse("GS", "XX", "BW", "XX").unwrap();
        let q = TerrainQuadrant::from_rule(&rule);
        assert_eq!(q.top_left(), TerrainLabel::new('G'));
        assert_eq!(q.top_right(), TerrainLabel::new('S'));
        assert_eq!(q.bottom_left(), TerrainLabel::new('B'));
        assert_eq!(q.bottom_right(), TerrainLabel::new('W'));
    }

    #[test]
    fn test_project_cell_positions() {
        let tileset = single_tile(TileRule::parse("GS", "XX", "BW", "XX").unwrap());
        let mut coarse = grid::initialize(2, 2, &tileset.full_domain());
        let pos = Position::new(1, 0);
        coarse.get_mut(pos).unwrap().collapse_to(crate::rules::TileId(0));

        let fine = project_grid(&coarse, &tileset);
        assert_eq!(fine.width(), 4);
        assert_eq!(fine.height(), 4);
        assert_eq!(fine.terrain_at(2, 0).unwrap(), TerrainLabel::new('B'));
        assert_eq!(fine.terrain_at(2, 1).unwrap(), TerrainLabel::new('G'));
        assert_eq!(fine.terrain_at(3, 0).unwrap(), TerrainLabel::new('W'));
        assert_eq!(fine.terrain_at(3, 1).unwrap(), TerrainLabel::new('S'));
        // uncollapsed cells stay empty
        assert!(fine.terrain_at(0, 0).unwrap().is_empty());
        assert!(fine.terrain_at(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_ruleless_tile_projects_empty() {
        let table = RuleTable::from_entries(Vec::<TileEntry>::new()).unwrap();
        let tileset = Tileset::with_names(["ghost"], &table).unwrap();
        let mut coarse = grid::initialize(1, 1, &tileset.full_domain());
        coarse
            .get_mut(Position::new(0, 0))
            .unwrap()
            .collapse_to(crate::rules::TileId(0));
        let cell = coarse.get(Position::new(0, 0)).unwrap();
        assert_eq!(quadrant_for(cell, &tileset), TerrainQuadrant::EMPTY);
    }

    #[test]
    fn test_terrain_at_out_of_bounds() {
        let fine = FineGrid::new(2, 3);
        assert!(fine.terrain_at(3, 5).is_ok());
        assert!(fine.terrain_at(4, 0).is_err());
        assert!(fine.terrain_at(0, 6).is_err());
    }

    #[test]
    fn test_display_top_row_first() {
        let tileset = single_tile(TileRule::parse("GS", "XX", "BW", "XX").unwrap());
        let mut coarse = grid::initialize(1, 1, &tileset.full_domain());
        coarse
            .get_mut(Position::new(0, 0))
            .unwrap()
            .collapse_to(crate::rules::TileId(0));
        let fine = project_grid(&coarse, &tileset);
        assert_eq!(fine.to_string(), "GS\nBW\n");
    }

    #[test]
    fn test_label_counts() {
        let tileset = single_tile(TileRule::parse("GG", "GG", "GS", "GG").unwrap());
        let mut coarse = grid::initialize(2, 1, &tileset.full_domain());
        coarse
            .get_mut(Position::new(0, 0))
            .unwrap()
            .collapse_to(crate::rules::TileId(0));
        let fine = project_grid(&coarse, &tileset);
        let counts = fine.label_counts();
        assert_eq!(
            counts,
            vec![
                (TerrainLabel::EMPTY, 4),
                (TerrainLabel::new('G'), 3),
                (TerrainLabel::new('S'), 1),
            ]
        );
    }
}
