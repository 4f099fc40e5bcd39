//! Layer definitions.
use crate::defs::RuleGroup;
use crate::{CellValue, Uid};

/// A named IntGrid value: purely informational for the engine, which matches
/// on the numeric id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntGridValue {
    pub id: CellValue,
    pub name: String,
}

/// A layer definition: which tileset its rules draw from, how its cells map
/// to pixels, and the ordered rule groups that run over it.
#[derive(Debug, Clone, Default)]
pub struct LayerDef {
    /// User-defined name.
    pub name: String,
    pub uid: Uid,
    /// Size of one cell in pixels, both width and height.
    pub cell_pixel_size: u16,
    /// The tileset all rules of this layer place tiles from; corresponds to
    /// [`TileSetDef::uid`](crate::defs::TileSetDef).
    pub tileset_def_uid: Uid,
    /// When set, this layer matches against the IntGrid values of the layer
    /// with this uid instead of carrying its own.
    pub auto_source_layer_def_uid: Option<Uid>,
    /// Seed used for this layer when the caller does not randomize.
    pub initial_random_seed: i32,
    pub int_grid_values: Vec<IntGridValue>,
    /// All the rules of this layer, in run order.
    pub rule_groups: Vec<RuleGroup>,
}

impl LayerDef {
    pub fn new(uid: Uid) -> Self {
        Self {
            uid,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_cell_pixel_size(mut self, cell_pixel_size: u16) -> Self {
        self.cell_pixel_size = cell_pixel_size;
        self
    }

    pub fn with_tileset_def_uid(mut self, tileset_def_uid: Uid) -> Self {
        self.tileset_def_uid = tileset_def_uid;
        self
    }

    pub fn with_initial_random_seed(mut self, seed: i32) -> Self {
        self.initial_random_seed = seed;
        self
    }

    pub fn with_rule_group(mut self, group: RuleGroup) -> Self {
        self.rule_groups.push(group);
        self
    }

    /// Looks up the named IntGrid value with the given id.
    pub fn int_grid_value(&self, id: CellValue) -> Option<&IntGridValue> {
        self.int_grid_values.iter().find(|v| v.id == id)
    }
}
