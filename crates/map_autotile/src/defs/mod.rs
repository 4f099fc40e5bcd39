//! Definition model: layers, rule groups, rules, and tilesets.
//!
//! A [`Definitions`] value is populated once (by hand or by
//! [`crate::project`]), pre-processed once with [`Definitions::pre_process`],
//! and then stays immutable while the runner generates levels from it. The
//! tree is flat and owned by this one container; rules refer to layers and
//! layers to tilesets by uid only.
mod layer;
mod rule;
mod stamp;
mod tileset;

pub use layer::{IntGridValue, LayerDef};
pub use rule::{
    CheckerMode, Rule, RuleGroup, StampOffset, TileMode, RULE_PATTERN_ANY, RULE_PATTERN_EMPTY,
};
pub use tileset::TileSetDef;

use crate::error::Result;
use crate::Uid;

/// The definitions of a project: all layers (in draw order, first is
/// topmost) and all tilesets.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    layers: Vec<LayerDef>,
    tilesets: Vec<TileSetDef>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: LayerDef) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_tileset(mut self, tileset: TileSetDef) -> Self {
        self.tilesets.push(tileset);
        self
    }

    /// All layers in draw order; the first layer is visually on top.
    pub fn layers(&self) -> &[LayerDef] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<LayerDef> {
        &mut self.layers
    }

    pub fn tilesets(&self) -> &[TileSetDef] {
        &self.tilesets
    }

    pub fn tilesets_mut(&mut self) -> &mut Vec<TileSetDef> {
        &mut self.tilesets
    }

    /// Finds a layer definition by uid.
    pub fn layer(&self, uid: Uid) -> Option<&LayerDef> {
        self.layers.iter().find(|l| l.uid == uid)
    }

    /// Finds a tileset by uid.
    pub fn tileset(&self, uid: Uid) -> Option<&TileSetDef> {
        self.tilesets.iter().find(|t| t.uid == uid)
    }

    /// Checks every active rule with tiles to place against the constraints
    /// the runner relies on. The runner calls this before placing anything.
    pub fn validate(&self) -> Result<()> {
        for layer in &self.layers {
            for group in &layer.rule_groups {
                if !group.active {
                    continue;
                }
                for rule in &group.rules {
                    if !rule.active || rule.tile_ids.is_empty() {
                        continue;
                    }
                    rule.validate()?;
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_defs() -> Definitions {
        Definitions::new()
            .with_layer(LayerDef::new(10).with_name("Ground").with_tileset_def_uid(50))
            .with_layer(LayerDef::new(11).with_name("Walls").with_tileset_def_uid(50))
            .with_tileset(TileSetDef::new(50).with_name("atlas").with_tile_counts(8, 8))
    }

    #[test]
    fn lookup_by_uid() {
        let defs = sample_defs();
        assert_eq!(defs.layer(11).map(|l| l.name.as_str()), Some("Walls"));
        assert!(defs.layer(12).is_none());
        assert_eq!(defs.tileset(50).map(|t| t.name.as_str()), Some("atlas"));
        assert!(defs.tileset(51).is_none());
    }

    #[test]
    fn layers_keep_draw_order() {
        let defs = sample_defs();
        let uids: Vec<_> = defs.layers().iter().map(|l| l.uid).collect();
        assert_eq!(uids, vec![10, 11]);
    }

    #[test]
    fn validate_skips_inactive_and_empty_rules() {
        let mut inactive_bad = Rule::new(1)
            .with_pattern(1, vec![1])
            .with_tile_ids(vec![9])
            .with_modulo(0, 1);
        inactive_bad.active = false;

        // An inactive invalid rule, and an active invalid rule without
        // tiles: both are outside the validated set.
        let group = RuleGroup::new("g")
            .with_rule(inactive_bad)
            .with_rule(Rule::new(2).with_modulo(0, 1));
        let defs = Definitions::new().with_layer(LayerDef::new(1).with_rule_group(group));

        assert!(defs.is_valid());
    }

    #[test]
    fn validate_reports_active_invalid_rule() {
        let group = RuleGroup::new("g").with_rule(
            Rule::new(3)
                .with_pattern(1, vec![1])
                .with_tile_ids(vec![9])
                .with_modulo(0, 0),
        );
        let defs = Definitions::new().with_layer(LayerDef::new(1).with_rule_group(group));

        assert!(!defs.is_valid());
        let err = defs.validate().unwrap_err();
        assert!(err.to_string().contains("divisor is zero"));
    }
}
