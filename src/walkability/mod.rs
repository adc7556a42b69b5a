//! Terrain walkability.
//!
//! Total mapping from terrain label to whether a unit can stand on it. Unknown
//! and empty labels are blocked.

use serde::{Deserialize, Serialize};

use crate::constants::WALKABLE_TERRAIN;
use crate::projection::TerrainLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Walkability {
    Walkable,
    Blocked,
}

impl Walkability {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Self::Walkable)
    }
}

pub fn classify(label: TerrainLabel) -> Walkability {
    match label.letter() {
        Some(letter) if WALKABLE_TERRAIN.contains(&letter) => Walkability::Walkable,
        _ => Walkability::Blocked,
    }
}
