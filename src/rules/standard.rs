//! Built-in terrain tile set.
//!
//! Six 16-tile families laid out as 4x4 sprite sheets plus four plain alt-grass
//! tiles. Edge codes read left-to-right along the edge; terrain letters are
//! G (grass), S (sand), B (brush) and W (water).

type Row = (&'static str, &'static [u8; 2], &'static [u8; 2], &'static [u8; 2], &'static [u8; 2]);

/// (name, north, east, south, west)
pub(super) const STANDARD_TILES: &[Row] = &[
    // Dirt
    ("Tile 01_0", b"GG", b"GS", b"GS", b"GG"),
    ("Tile 01_1", b"GG", b"GS", b"SS", b"GS"),
    ("Tile 01_2", b"GG", b"GS", b"SS", b"GS"),
    ("Tile 01_3", b"GG", b"GG", b"SG", b"GS"),
    ("Tile 01_4", b"GS", b"SS", b"GS", b"GG"),
    ("Tile 01_5", b"SS", b"SS", b"SS", b"SS"),
    ("Tile 01_6", b"SS", b"SS", b"SS", b"SS"),
    ("Tile 01_7", b"SG", b"GG", b"SG", b"SS"),
    ("Tile 01_8", b"GS", b"SS", b"GS", b"GG"),
    ("Tile 01_9", b"SS", b"SS", b"SS", b"SS"),
    ("Tile 01_10", b"SS", b"SS", b"SS", b"SS"),
    ("Tile 01_11", b"SG", b"GG", b"SG", b"SS"),
    ("Tile 01_12", b"GS", b"SG", b"GG", b"GG"),
    ("Tile 01_13", b"SS", b"SG", b"GG", b"SG"),
    ("Tile 01_14", b"SS", b"SG", b"GG", b"SG"),
    ("Tile 01_15", b"SG", b"GG", b"GG", b"SG"),
    // Sand
    ("Tile 02_0", b"SS", b"SG", b"SG", b"SS"),
    ("Tile 02_1", b"SS", b"SG", b"GG", b"SG"),
    ("Tile 02_2", b"SS", b"SG", b"GG", b"SG"),
    ("Tile 02_3", b"SS", b"SS", b"GS", b"SG"),
    ("Tile 02_4", b"SG", b"GG", b"SG", b"SS"),
    ("Tile 02_5", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 02_6", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 02_7", b"GS", b"SS", b"GS", b"GG"),
    ("Tile 02_8", b"SG", b"GG", b"SG", b"SS"),
    ("Tile 02_9", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 02_10", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 02_11", b"GS", b"SS", b"GS", b"GG"),
    ("Tile 02_12", b"SG", b"GS", b"SS", b"SS"),
    ("Tile 02_13", b"GG", b"GS", b"SS", b"GS"),
    ("Tile 02_14", b"GG", b"GS", b"SS", b"GS"),
    ("Tile 02_15", b"GS", b"SS", b"SS", b"GS"),
    // Brush
    ("Tile 03_0", b"GG", b"GB", b"GB", b"GG"),
    ("Tile 03_1", b"GG", b"GB", b"BB", b"GB"),
    ("Tile 03_2", b"GG", b"GB", b"BB", b"GB"),
    ("Tile 03_3", b"GG", b"GG", b"BG", b"GB"),
    ("Tile 03_4", b"GB", b"BB", b"GB", b"GG"),
    ("Tile 03_5", b"BB", b"BB", b"BB", b"BB"),
    ("Tile 03_6", b"BB", b"BB", b"BB", b"BB"),
    ("Tile 03_7", b"BG", b"GG", b"BG", b"BB"),
    ("Tile 03_8", b"GB", b"BB", b"GB", b"GG"),
    ("Tile 03_9", b"BB", b"BB", b"BB", b"BB"),
    ("Tile 03_10", b"BB", b"BB", b"BB", b"BB"),
    ("Tile 03_11", b"BG", b"GG", b"BG", b"BB"),
    ("Tile 03_12", b"GB", b"BG", b"GG", b"GG"),
    ("Tile 03_13", b"BB", b"BG", b"GG", b"BG"),
    ("Tile 03_14", b"BB", b"BG", b"GG", b"BG"),
    ("Tile 03_15", b"BG", b"GG", b"GG", b"BG"),
    // Grass
    ("Tile 04_0", b"BB", b"BG", b"BG", b"BB"),
    ("Tile 04_1", b"BB", b"BG", b"GG", b"BG"),
    ("Tile 04_2", b"BB", b"BG", b"GG", b"BG"),
    ("Tile 04_3", b"BB", b"BB", b"GB", b"BG"),
    ("Tile 04_4", b"BG", b"GG", b"BG", b"BB"),
    ("Tile 04_5", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 04_6", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 04_7", b"GB", b"BB", b"GB", b"GG"),
    ("Tile 04_8", b"BG", b"GG", b"BG", b"BB"),
    ("Tile 04_9", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 04_10", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 04_11", b"GB", b"BB", b"GB", b"GG"),
    ("Tile 04_12", b"BG", b"GB", b"BB", b"BB"),
    ("Tile 04_13", b"GG", b"GB", b"BB", b"GB"),
    ("Tile 04_14", b"GG", b"GB", b"BB", b"GB"),
    ("Tile 04_15", b"GB", b"BB", b"BB", b"GB"),
    // Pond
    ("Water01_0", b"GG", b"GW", b"GW", b"GG"),
    ("Water01_1", b"GG", b"GW", b"WW", b"GW"),
    ("Water01_2", b"GG", b"GW", b"WW", b"GW"),
    ("Water01_3", b"GG", b"GG", b"WG", b"GW"),
    ("Water01_4", b"GW", b"WW", b"GW", b"GG"),
    ("Water01_5", b"WW", b"WW", b"WW", b"WW"),
    ("Water01_6", b"WW", b"WW", b"WW", b"WW"),
    ("Water01_7", b"WG", b"GG", b"WG", b"WW"),
    ("Water01_8", b"GW", b"WW", b"GW", b"GG"),
    ("Water01_9", b"WW", b"WW", b"WW", b"WW"),
    ("Water01_10", b"WW", b"WW", b"WW", b"WW"),
    ("Water01_11", b"WG", b"GG", b"WG", b"WW"),
    ("Water01_12", b"GW", b"WG", b"GG", b"GG"),
    ("Water01_13", b"WW", b"WG", b"GG", b"WG"),
    ("Water01_14", b"WW", b"WG", b"GG", b"WG"),
    ("Water01_15", b"WG", b"GG", b"GG", b"WG"),
    // Island
    ("Water02_0", b"WW", b"WG", b"WG", b"WW"),
    ("Water02_1", b"WW", b"WG", b"GG", b"WG"),
    ("Water02_2", b"WW", b"WG", b"GG", b"WG"),
    ("Water02_3", b"WW", b"WW", b"GW", b"WG"),
    ("Water02_4", b"WG", b"GG", b"WG", b"WW"),
    ("Water02_5", b"GG", b"GG", b"GG", b"GG"),
    ("Water02_6", b"GG", b"GG", b"GG", b"GG"),
    ("Water02_7", b"GW", b"WW", b"GW", b"GG"),
    ("Water02_8", b"WG", b"GG", b"WG", b"WW"),
    ("Water02_9", b"GG", b"GG", b"GG", b"GG"),
    ("Water02_10", b"GG", b"GG", b"GG", b"GG"),
    ("Water02_11", b"GW", b"WW", b"GW", b"GG"),
    ("Water02_12", b"WG", b"GW", b"WW", b"WW"),
    ("Water02_13", b"GG", b"GW", b"WW", b"GW"),
    ("Water02_14", b"GG", b"GW", b"WW", b"GW"),
    ("Water02_15", b"GW", b"WW", b"WW", b"GW"),
    // Alt grass
    ("Tile 06_0", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 06_1", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 06_2", b"GG", b"GG", b"GG", b"GG"),
    ("Tile 06_3", b"GG", b"GG", b"GG", b"GG"),
];
