#![forbid(unsafe_code)]
//! map_autotile: Rule-based auto-tiling for IntGrid levels.
//!
//! The engine takes a semantic 2D grid of cell values (an "IntGrid": wall,
//! floor, water, ...) and runs layered pattern-matching rules over it to
//! produce stacked tile placements suitable for rendering. Output is
//! deterministic: the same definitions, IntGrid, and seed always yield the
//! same tiles.
//!
//! Modules:
//! - level: runtime data (the IntGrid input, the TileGrid outputs)
//! - defs: layer/rule/tileset definitions and the stamp offset cache
//! - runner: the rule matching and tile placement pass
//! - project: loader for editor project files (JSON)
//!
//! For examples and docs, see README and docs.rs.
pub mod defs;
pub mod error;
pub mod grid;
pub mod level;
pub mod project;
pub mod runner;

/// Identifier for layers, rules, and tilesets within a project definition.
pub type Uid = u16;

/// Index of a tile inside a tileset atlas; 0 is the top-left tile, counting
/// left-to-right then top-to-bottom.
pub type TileId = u16;

/// Semantic value stored in an IntGrid cell. The value 0 always means the
/// cell is empty; every other value is user-defined.
pub type CellValue = u16;

/// Convenient re-exports for common types. Import with `use map_autotile::prelude::*;`.
pub mod prelude {
    pub use crate::defs::{
        CheckerMode, Definitions, IntGridValue, LayerDef, Rule, RuleGroup, StampOffset,
        TileMode, TileSetDef, RULE_PATTERN_ANY, RULE_PATTERN_EMPTY,
    };
    pub use crate::error::{Error, Result};
    pub use crate::level::{
        IntGrid, Level, TileGrid, TileInCell, TILE_FINAL, TILE_FLIPPED_X, TILE_FLIPPED_Y,
        TILE_NO_FLAGS, TILE_OFFSET_DOWN, TILE_OFFSET_LEFT, TILE_OFFSET_RIGHT, TILE_OFFSET_UP,
    };
    pub use crate::runner::{
        generate, generate_layer, generate_with_events, EventSink, FnSink, GenerateEvent,
        LayerSummary, MultiSink, RuleRunner, RunOptions, RunSummary, VecSink,
    };
    pub use crate::{CellValue, TileId, Uid};
}
