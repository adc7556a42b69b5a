//! Wave Function Collapse solver.
//!
//! A pull-based stepper over a coarse `Grid<Cell>`: every call to `step`
//! selects a minimum-entropy cell, collapses it to a random candidate and
//! narrows the domains of its four immediate neighbours. Propagation is local
//! only; domains further away are narrowed later, when their own neighbours
//! collapse.
//!
//! Randomness comes from a single injected `Rng`, consumed by both the
//! tie-break among candidates and the collapse choice, so a seeded generator
//! reproduces a build step for step.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::grid::{self, Cell, Grid, GridError, Position};
use crate::rules::{TileId, Tileset};

/// Error type for explicit solver operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("Tile {0} is not part of the tileset")]
    UnknownTile(String),
    #[error("Tile {tile} is not a candidate at {position}")]
    TileNotInDomain { position: Position, tile: TileId },
    #[error("Cell at {0} is already collapsed")]
    AlreadyCollapsed(Position),
    #[error("Build already finished")]
    Finished,
}

/// Phase of the collapse loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverState {
    /// Grid initialized, no step taken yet
    Idle,
    Selecting,
    Collapsing,
    Propagating,
    Done,
}

/// How a build terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    /// Every cell collapsed
    Completed,
    /// Selection ran dry while `unresolved` cells were still uncollapsed
    ContradictionReached { unresolved: usize },
}

impl BuildOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::ContradictionReached { .. } => "contradiction",
        }
    }
}

/// Notification emitted once per collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    /// Zero-based collapse counter within the build
    pub step: usize,
    pub position: Position,
    pub tile: TileId,
}

/// Stepped WFC build over a fixed-size grid
#[derive(Debug, Clone)]
pub struct WfcSolver<R: Rng> {
    tileset: Arc<Tileset>,
    grid: Grid<Cell>,
    rng: R,
    state: SolverState,
    outcome: Option<BuildOutcome>,
    steps: usize,
}

impl<R: Rng> WfcSolver<R> {
    /// Fresh build: every cell starts with the full tileset as its domain
    pub fn new(width: usize, height: usize, tileset: Arc<Tileset>, rng: R) -> Self {
        let grid = grid::initialize(width, height, &tileset.full_domain());
        tracing::debug!(
            target: "terrain_core::solver",
            width,
            height,
            tiles = tileset.len(),
            "solver initialized"
        );
        Self {
            tileset,
            grid,
            rng,
            state: SolverState::Idle,
            outcome: None,
            steps: 0,
        }
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn into_grid(self) -> Grid<Cell> {
        self.grid
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SolverState::Done
    }

    /// Terminal outcome, `None` while the build can still advance
    pub fn outcome(&self) -> Option<BuildOutcome> {
        self.outcome
    }

    /// Collapses performed so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn cell_at(&self, pos: Position) -> Result<&Cell, GridError> {
        self.grid.cell_at(pos)
    }

    /// Positions tied for the lowest entropy among uncollapsed, non-empty cells.
    ///
    /// Cells are scanned column by column (x outer, y inner); the order of the
    /// returned positions follows that scan and feeds the random tie-break.
    pub fn find_lowest_entropy(&self) -> Vec<Position> {
        let mut candidates = Vec::new();
        let mut lowest = self.tileset.len();
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                let pos = Position::new(x, y);
                let Some(cell) = self.grid.get(pos) else {
                    continue;
                };
                if cell.is_collapsed() || cell.entropy() == 0 {
                    continue;
                }
                let entropy = cell.entropy();
                if entropy < lowest {
                    lowest = entropy;
                    candidates.clear();
                    candidates.push(pos);
                } else if entropy == lowest {
                    candidates.push(pos);
                }
            }
        }
        candidates
    }

    /// Advance one select -> collapse -> propagate iteration.
    ///
    /// Returns `None` once the build is done; the terminal outcome is then
    /// available from `outcome()`.
    pub fn step(&mut self) -> Option<StepEvent> {
        self.advance().ok()
    }

    /// Run until done, handing every step to `sink`
    pub fn run(&mut self, mut sink: impl FnMut(&StepEvent)) -> BuildOutcome {
        loop {
            match self.advance() {
                Ok(event) => sink(&event),
                Err(outcome) => return outcome,
            }
        }
    }

    /// One iteration, or the terminal outcome once nothing is left to collapse
    fn advance(&mut self) -> Result<StepEvent, BuildOutcome> {
        if let Some(outcome) = self.outcome {
            return Err(outcome);
        }

        self.state = SolverState::Selecting;
        let candidates = self.find_lowest_entropy();
        if candidates.is_empty() {
            return Err(self.finish());
        }
        let position = candidates[self.rng.gen_range(0..candidates.len())];

        self.state = SolverState::Collapsing;
        let Some(tile) = self.collapse(position) else {
            return Err(self.finish());
        };

        self.state = SolverState::Propagating;
        self.propagate(position, tile);

        Ok(self.record_step(position, tile))
    }

    /// Collapse `pos` to a chosen `tile` and propagate, counting as one step
    pub fn pin(&mut self, pos: Position, tile: TileId) -> Result<StepEvent, SolverError> {
        if self.state == SolverState::Done {
            return Err(SolverError::Finished);
        }
        let cell = self.grid.cell_at_mut(pos)?;
        if cell.is_collapsed() {
            return Err(SolverError::AlreadyCollapsed(pos));
        }
        if !cell.domain().contains(&tile) {
            return Err(SolverError::TileNotInDomain {
                position: pos,
                tile,
            });
        }
        cell.collapse_to(tile);
        self.state = SolverState::Propagating;
        self.propagate(pos, tile);
        Ok(self.record_step(pos, tile))
    }

    /// `pin` by tile name
    pub fn pin_named(&mut self, pos: Position, name: &str) -> Result<StepEvent, SolverError> {
        let tile = self
            .tileset
            .id_of(name)
            .ok_or_else(|| SolverError::UnknownTile(name.to_string()))?;
        self.pin(pos, tile)
    }

    fn record_step(&mut self, position: Position, tile: TileId) -> StepEvent {
        let event = StepEvent {
            step: self.steps,
            position,
            tile,
        };
        self.steps += 1;
        self.state = SolverState::Selecting;
        tracing::trace!(
            target: "terrain_core::solver",
            step = event.step,
            x = position.x,
            y = position.y,
            tile = self.tileset.name(tile).unwrap_or("?"),
            "cell collapsed"
        );
        event
    }

    /// Pick one candidate uniformly and fix the cell to it
    fn collapse(&mut self, pos: Position) -> Option<TileId> {
        let cell = self.grid.get_mut(pos)?;
        if cell.domain().is_empty() {
            return None;
        }
        let chosen = cell.domain()[self.rng.gen_range(0..cell.domain().len())];
        cell.collapse_to(chosen);
        Some(chosen)
    }

    /// Narrow the uncollapsed neighbours of `pos` to tiles whose facing edge
    /// matches the collapsed tile's edge. Rule-less tiles do not propagate and
    /// rule-less candidates are pruned.
    fn propagate(&mut self, pos: Position, tile: TileId) {
        let Some(rule) = self.tileset.rule(tile).copied() else {
            tracing::debug!(
                target: "terrain_core::solver",
                x = pos.x,
                y = pos.y,
                tile = self.tileset.name(tile).unwrap_or("?"),
                "tile has no rule, propagation skipped"
            );
            return;
        };

        let tileset = &self.tileset;
        for direction in grid::Direction::ALL {
            let Some(neighbor_pos) = self.grid.neighbor(pos, direction) else {
                continue;
            };
            let Some(neighbor) = self.grid.get_mut(neighbor_pos) else {
                continue;
            };
            if neighbor.is_collapsed() {
                continue;
            }
            let removed = neighbor.retain(|candidate| {
                tileset
                    .rule(*candidate)
                    .is_some_and(|other| rule.accepts(direction, other))
            });
            if removed > 0 && neighbor.entropy() == 0 {
                tracing::debug!(
                    target: "terrain_core::solver",
                    x = neighbor_pos.x,
                    y = neighbor_pos.y,
                    "domain exhausted"
                );
            }
        }
    }

    fn finish(&mut self) -> BuildOutcome {
        let unresolved = self
            .grid
            .cells()
            .iter()
            .filter(|cell| !cell.is_collapsed())
            .count();
        let outcome = if unresolved == 0 {
            tracing::info!(
                target: "terrain_core::solver",
                steps = self.steps,
                "build completed"
            );
            BuildOutcome::Completed
        } else {
            tracing::warn!(
                target: "terrain_core::solver",
                steps = self.steps,
                unresolved,
                "build halted on contradiction"
            );
            BuildOutcome::ContradictionReached { unresolved }
        };
        self.outcome = Some(outcome);
        self.state = SolverState::Done;
        outcome
    }
}

impl<R: Rng> Iterator for WfcSolver<R> {
    type Item = StepEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}
