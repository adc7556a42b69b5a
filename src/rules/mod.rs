//! Adjacency rule table.
//!
//! Maps tile names to the four edge codes that decide which tiles may sit next
//! to each other. Tables are immutable once built and shared via `Arc`; a
//! `Tileset` resolves an ordered palette of names against a table into compact
//! `TileId`s for the solver.
//!
//! A name missing from the table is a valid state: such a tile never
//! propagates constraints and never survives propagation into a neighbour.

mod standard;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::constants::EMPTY_TERRAIN_GLYPH;
use crate::grid::Direction;

/// Error type for rule table construction and loading
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid edge code {0:?}: expected two printable ASCII characters other than '.'")]
    InvalidEdgeCode(String),
    #[error("Duplicate tile name: {0}")]
    DuplicateTile(String),
    #[error("Tileset holds {0} tiles, more than a TileId can address")]
    TooManyTiles(usize),
    #[error("Unknown rule table format for {0} (expected .json or .ron)")]
    UnknownFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

// '.' is reserved for cells without terrain
fn is_terrain_byte(byte: u8) -> bool {
    byte.is_ascii_graphic() && char::from(byte) != EMPTY_TERRAIN_GLYPH
}

/// Two terrain letters along one tile edge, read left-to-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeCode([u8; 2]);

impl EdgeCode {
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn parse(code: &str) -> Result<Self, RuleError> {
        match code.as_bytes() {
            [a, b] if is_terrain_byte(*a) && is_terrain_byte(*b) => Ok(Self([*a, *b])),
            _ => Err(RuleError::InvalidEdgeCode(code.to_string())),
        }
    }

    /// First half of the code
    pub fn left(&self) -> char {
        char::from(self.0[0])
    }

    /// Second half of the code
    pub fn right(&self) -> char {
        char::from(self.0[1])
    }
}

impl fmt::Display for EdgeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.left(), self.right())
    }
}

impl TryFrom<String> for EdgeCode {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EdgeCode> for String {
    fn from(code: EdgeCode) -> Self {
        code.to_string()
    }
}

/// Edge codes of one tile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRule {
    pub north: EdgeCode,
    pub east: EdgeCode,
    pub south: EdgeCode,
    pub west: EdgeCode,
}

impl TileRule {
    pub fn new(north: EdgeCode, east: EdgeCode, south: EdgeCode, west: EdgeCode) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    /// Parse four textual codes in N/E/S/W order
    pub fn parse(north: &str, east: &str, south: &str, west: &str) -> Result<Self, RuleError> {
        Ok(Self::new(
            EdgeCode::parse(north)?,
            EdgeCode::parse(east)?,
            EdgeCode::parse(south)?,
            EdgeCode::parse(west)?,
        ))
    }

    pub fn edge(&self, direction: Direction) -> EdgeCode {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Whether a tile with rule `other` may sit on the `direction` side of this one
    pub fn accepts(&self, direction: Direction, other: &TileRule) -> bool {
        other.edge(direction.opposite()) == self.edge(direction)
    }
}

/// Serialized form of one rule table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEntry {
    pub name: String,
    pub north: EdgeCode,
    pub east: EdgeCode,
    pub south: EdgeCode,
    pub west: EdgeCode,
}

impl TileEntry {
    pub fn new(name: impl Into<String>, rule: TileRule) -> Self {
        Self {
            name: name.into(),
            north: rule.north,
            east: rule.east,
            south: rule.south,
            west: rule.west,
        }
    }

    pub fn rule(&self) -> TileRule {
        TileRule::new(self.north, self.east, self.south, self.west)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleFormat {
    Json,
    Ron,
}

impl RuleFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }
}

/// Immutable name -> rule mapping, kept in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TileEntry>", into = "Vec<TileEntry>")]
pub struct RuleTable {
    entries: Vec<(String, TileRule)>,
    index: HashMap<String, usize>,
}

impl RuleTable {
    /// The built-in 100-tile terrain set
    pub fn standard() -> Self {
        let entries: Vec<(String, TileRule)> = standard::STANDARD_TILES
            .iter()
            .map(|(name, n, e, s, w)| {
                let rule = TileRule::new(
                    EdgeCode::from_bytes(**n),
                    EdgeCode::from_bytes(**e),
                    EdgeCode::from_bytes(**s),
                    EdgeCode::from_bytes(**w),
                );
                (name.to_string(), rule)
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TileEntry>) -> Result<Self, RuleError> {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for entry in entries {
            if table.index.contains_key(&entry.name) {
                return Err(RuleError::DuplicateTile(entry.name));
            }
            let rule = entry.rule();
            table.index.insert(entry.name.clone(), table.entries.len());
            table.entries.push((entry.name, rule));
        }
        Ok(table)
    }

    pub fn lookup(&self, name: &str) -> Option<&TileRule> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tile names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TileRule)> + '_ {
        self.entries.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_ron_str(ron: &str) -> Result<Self, RuleError> {
        Ok(ron::from_str(ron)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    /// Load a table from disk, picking the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let format = RuleFormat::from_path(path)
            .ok_or_else(|| RuleError::UnknownFormat(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)?;
        let table = match format {
            RuleFormat::Json => Self::from_json_str(&content)?,
            RuleFormat::Ron => Self::from_ron_str(&content)?,
        };
        tracing::debug!(path = %path.display(), tiles = table.len(), "rule table loaded");
        Ok(table)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<TileEntry>> for RuleTable {
    type Error = RuleError;

    fn try_from(entries: Vec<TileEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<RuleTable> for Vec<TileEntry> {
    fn from(table: RuleTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(name, rule)| TileEntry::new(name, rule))
            .collect()
    }
}

/// Compact tile identifier, an index into a `Tileset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered tile palette resolved against a rule table.
///
/// The palette is the solver's full domain. It may name tiles the table does
/// not know; those resolve to `None` and are treated as rule-less.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    names: Vec<String>,
    rules: Vec<Option<TileRule>>,
    ids: HashMap<String, TileId>,
}

impl Tileset {
    /// Every tile of `table`, in declaration order
    pub fn from_rules(table: &RuleTable) -> Result<Self, RuleError> {
        Self::with_names(table.names(), table)
    }

    /// An explicit palette; names absent from `table` are kept as rule-less tiles
    pub fn with_names<I, S>(names: I, table: &RuleTable) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tileset = Self {
            names: Vec::new(),
            rules: Vec::new(),
            ids: HashMap::new(),
        };
        for name in names {
            let name = name.into();
            if tileset.ids.contains_key(&name) {
                return Err(RuleError::DuplicateTile(name));
            }
            let id = u16::try_from(tileset.names.len())
                .map_err(|_| RuleError::TooManyTiles(tileset.names.len() + 1))?;
            tileset.rules.push(table.lookup(&name).copied());
            tileset.ids.insert(name.clone(), TileId(id));
            tileset.names.push(name);
        }
        Ok(tileset)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All ids in palette order
    pub fn full_domain(&self) -> Vec<TileId> {
        (0..=u16::MAX).zip(&self.names).map(|(i, _)| TileId(i)).collect()
    }

    /// Rule for `id`, `None` for rule-less or foreign ids
    pub fn rule(&self, id: TileId) -> Option<&TileRule> {
        self.rules.get(id.0 as usize)?.as_ref()
    }

    pub fn name(&self, id: TileId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<TileId> {
        self.ids.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &str, Option<&TileRule>)> + '_ {
        (0..=u16::MAX)
            .zip(self.names.iter().zip(&self.rules))
            .map(|(i, (name, rule))| (TileId(i), name.as_str(), rule.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_size() {
        let table = RuleTable::standard();
        assert_eq!(table.len(), 100);
        assert!(table.contains("Tile 01_0"));
        assert!(table.contains("Water02_15"));
        assert!(table.contains("Tile 06_3"));
    }

    #[test]
    fn test_standard_lookup() {
        let table = RuleTable::standard();
        let rule = table.lookup("Tile 01_0").unwrap();
        assert_eq!(rule.north.to_string(), "GG");
        assert_eq!(rule.east.to_string(), "GS");
        assert_eq!(rule.south.to_string(), "GS");
        assert_eq!(rule.west.to_string(), "GG");
        assert!(table.lookup("Tile 99_0").is_none());
    }

    #[test]
    fn test_edge_code_parse() {
        let code = EdgeCode::parse("GS").unwrap();
        assert_eq!(code.left(), 'G');
        assert_eq!(code.right(), 'S');
        assert!(EdgeCode::parse("").is_err());
        assert!(EdgeCode::parse("G").is_err());
        assert!(EdgeCode::parse("GSB").is_err());
        assert!(EdgeCode::parse("G ").is_err());
    }

    #[test]
    fn test_empty_glyph_not_an_edge_letter() {
        assert!(matches!(
            EdgeCode::parse("G."),
            Err(RuleError::InvalidEdgeCode(code)) if code == "G."
        ));
        assert!(TileRule::parse("GG", "GG", "..", "GG").is_err());
    }

    #[test]
    fn test_rule_edges_by_direction() {
        let rule = TileRule::parse("GS", "SS", "BW", "WW").unwrap();
        assert_eq!(rule.edge(Direction::North).to_string(), "GS");
        assert_eq!(rule.edge(Direction::East).to_string(), "SS");
        assert_eq!(rule.edge(Direction::South).to_string(), "BW");
        assert_eq!(rule.edge(Direction::West).to_string(), "WW");
    }

    #[test]
    fn test_rule_accepts_opposite_edge() {
        let left = TileRule::parse("GG", "GS", "GG", "GG").unwrap();
        let right = TileRule::parse("GG", "GG", "GG", "GS").unwrap();
        assert!(left.accepts(Direction::East, &right));
        assert!(right.accepts(Direction::West, &left));
        assert!(!left.accepts(Direction::West, &right));
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let rule = TileRule::parse("GG", "GG", "GG", "GG").unwrap();
        let result = RuleTable::from_entries(vec![
            TileEntry::new("a", rule),
            TileEntry::new("a", rule),
        ]);
        assert!(matches!(result, Err(RuleError::DuplicateTile(name)) if name == "a"));
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let table = RuleTable::standard();
        let restored = RuleTable::from_json_str(&table.to_json()).unwrap();
        assert_eq!(restored, table);
        assert_eq!(restored.names().next(), Some("Tile 01_0"));
    }

    #[test]
    fn test_ron_parse() {
        let ron = r#"[
            (name: "grass", north: "GG", east: "GG", south: "GG", west: "GG"),
            (name: "shore", north: "GG", east: "GW", south: "WW", west: "GW"),
        ]"#;
        let table = RuleTable::from_ron_str(ron).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("shore").unwrap().east.to_string(), "GW");
    }

    #[test]
    fn test_invalid_edge_code_in_json() {
        let json = r#"[{"name":"bad","north":"G","east":"GG","south":"GG","west":"GG"}]"#;
        assert!(RuleTable::from_json_str(json).is_err());
    }

    #[test]
    fn test_tileset_from_rules() {
        let table = RuleTable::standard();
        let tileset = Tileset::from_rules(&table).unwrap();
        assert_eq!(tileset.len(), 100);
        assert_eq!(tileset.full_domain().len(), 100);
        let id = tileset.id_of("Water01_5").unwrap();
        assert_eq!(tileset.name(id), Some("Water01_5"));
        assert_eq!(tileset.rule(id), table.lookup("Water01_5"));
    }

    #[test]
    fn test_tileset_keeps_unknown_names() {
        let table = RuleTable::standard();
        let tileset = Tileset::with_names(["Tile 01_5", "Mystery"], &table).unwrap();
        assert_eq!(tileset.len(), 2);
        let known = tileset.id_of("Tile 01_5").unwrap();
        let unknown = tileset.id_of("Mystery").unwrap();
        assert!(tileset.rule(known).is_some());
        assert!(tileset.rule(unknown).is_none());
        assert!(tileset.rule(TileId(7)).is_none());
    }

    #[test]
    fn test_tileset_duplicate_names_rejected() {
        let table = RuleTable::standard();
        assert!(Tileset::with_names(["Tile 01_5", "Tile 01_5"], &table).is_err());
    }

    #[test]
    fn test_tileset_rejects_more_tiles_than_ids() {
        let rule = TileRule::parse("GG", "GG", "GG", "GG").unwrap();
        let count = usize::from(u16::MAX) + 2;
        let table =
            RuleTable::from_entries((0..count).map(|i| TileEntry::new(format!("t{i}"), rule)))
                .unwrap();
        assert!(matches!(
            Tileset::from_rules(&table),
            Err(RuleError::TooManyTiles(n)) if n == count
        ));
    }

    #[test]
    fn test_tileset_ids_cover_full_range() {
        let rule = TileRule::parse("GG", "GG", "GG", "GG").unwrap();
        let count = usize::from(u16::MAX) + 1;
        let table =
            RuleTable::from_entries((0..count).map(|i| TileEntry::new(format!("t{i}"), rule)))
                .unwrap();
        let tileset = Tileset::from_rules(&table).unwrap();
        let domain = tileset.full_domain();
        assert_eq!(domain.len(), count);
        assert_eq!(domain.last(), Some(&TileId(u16::MAX)));
        assert_eq!(tileset.id_of("t65535"), Some(TileId(u16::MAX)));
        assert_eq!(tileset.iter().last().map(|(id, _, _)| id), Some(TileId(u16::MAX)));
    }
}
