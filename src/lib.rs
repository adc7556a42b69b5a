//! Terrain Core - WFC terrain generation library
//!
//! This crate builds tile-based terrain maps and derives game-resolution data
//! from them:
//! - Adjacency rule tables (edge-coded tiles, built-in or JSON/RON)
//! - WFC solver (minimum-entropy selection, local propagation, stepped)
//! - Subgrid projection (each world tile becomes a 2x2 block of terrain)
//! - Walkability classification of the fine grid
//! - World generator with seeded retries and terrain queries
//! - Parallel batch surveys
//! - Bevy plugin for frame-paced builds

pub mod config;
pub mod constants;
pub mod grid;
pub mod logging;
pub mod plugin;
pub mod projection;
pub mod rules;
pub mod solver;
pub mod survey;
pub mod walkability;
pub mod world;

pub use config::GeneratorConfig;
pub use grid::{Direction, Grid, GridError, Position};
pub use projection::{FineGrid, TerrainLabel};
pub use rules::{RuleTable, TileId, TileRule, Tileset};
pub use solver::{BuildOutcome, StepEvent, WfcSolver};
pub use walkability::Walkability;
pub use world::{WorldError, WorldGenerator, WorldMap};
