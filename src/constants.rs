//! Centralized constants for the terrain core.
//!
//! Defaults shared by the config layer, the world generator and the preview
//! binary. Terrain letters live here so the projector and the walkability
//! classifier agree on a single alphabet.

// =====================================================
// World defaults
// =====================================================

/// Default coarse (world) grid width in tiles
pub const DEFAULT_WORLD_WIDTH: usize = 25;

/// Default coarse (world) grid height in tiles
pub const DEFAULT_WORLD_HEIGHT: usize = 25;

/// Default base seed for builds
pub const DEFAULT_SEED: u64 = 42;

/// Default world-units per coarse tile (view geometry only)
pub const DEFAULT_GRID_SCALE: f32 = 1.0;

/// Default number of build attempts; 1 means contradictions are not retried
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Default solver steps advanced per host frame
pub const DEFAULT_STEPS_PER_FRAME: usize = 1;

// =====================================================
// Subgrid projection
// =====================================================

/// Each coarse cell expands into a SUBGRID_FACTOR x SUBGRID_FACTOR fine block
pub const SUBGRID_FACTOR: usize = 2;

// =====================================================
// Terrain alphabet
// =====================================================

pub const TERRAIN_GRASS: char = 'G';
pub const TERRAIN_SAND: char = 'S';
pub const TERRAIN_BRUSH: char = 'B';
pub const TERRAIN_WATER: char = 'W';

/// Terrain labels a unit can stand on; everything else is blocked
pub const WALKABLE_TERRAIN: &[char] = &[TERRAIN_GRASS, TERRAIN_SAND];

/// Glyph used by text dumps for cells with no terrain label
pub const EMPTY_TERRAIN_GLYPH: char = '.';
