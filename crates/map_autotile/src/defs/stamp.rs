//! One-time stamp offset pre-processing.
//!
//! Stamp rules place several tiles at once, arranged in the shape the tiles
//! have inside their tileset. Resolving that shape per matched cell would
//! repeat the same work for every cell of every run, so it is computed once
//! up front and cached on the rule as [`StampOffset`]s.
use tracing::warn;

use crate::defs::{Definitions, Rule, StampOffset, TileMode, TileSetDef};
use crate::level::{TILE_NO_FLAGS, TILE_OFFSET_LEFT, TILE_OFFSET_UP};

impl Definitions {
    /// Computes the cached stamp tile offsets for every active stamp rule.
    ///
    /// Run once after the definitions are populated and before the first rule
    /// run; [`crate::project`] does this automatically after loading. Layers
    /// that reference a missing tileset are skipped with a warning, leaving
    /// their stamp rules invalid.
    pub fn pre_process(&mut self) {
        let Definitions { layers, tilesets } = self;
        for layer in layers.iter_mut() {
            let Some(tileset) = tilesets.iter().find(|t| t.uid == layer.tileset_def_uid) else {
                warn!(
                    "Layer '{}' ({}) references missing tileset {}; its stamp rules stay unprocessed.",
                    layer.name, layer.uid, layer.tileset_def_uid
                );
                continue;
            };

            for group in layer.rule_groups.iter_mut() {
                if !group.active {
                    continue;
                }
                for rule in group.rules.iter_mut() {
                    if !rule.active
                        || rule.tile_mode != TileMode::Stamp
                        || rule.tile_ids.is_empty()
                    {
                        continue;
                    }
                    rule.stamp_tile_offsets = stamp_offsets(rule, tileset);
                }
            }
        }
    }
}

/// Computes one offset per tile id of a stamp rule.
fn stamp_offsets(rule: &Rule, tileset: &TileSetDef) -> Vec<StampOffset> {
    // Bounding box of the stamp within the tilesheet.
    let mut top = i32::MAX;
    let mut left = i32::MAX;
    let mut bottom = i32::MIN;
    let mut right = i32::MIN;
    for &tile_id in &rule.tile_ids {
        let (x, y) = tileset.coords(tile_id);
        top = top.min(y);
        left = left.min(x);
        bottom = bottom.max(y);
        right = right.max(x);
    }

    // The spans are zero-based: a 3-wide stamp has stamp_width 2, which is
    // what the pivot math wants.
    let stamp_width = right - left;
    let stamp_height = bottom - top;

    // The cached x/y offsets are whole cells. A 0.5 pivot on an even tile
    // span lands between cells; that half-cell remainder cannot go into the
    // integer offset, so it is carried as an offset flag for the renderer to
    // resolve into a half-cell pixel shift.
    let horizontal_align = rule.stamp_pivot_x * stamp_width as f32;
    let vertical_align = rule.stamp_pivot_y * stamp_height as f32;

    let mut flags = TILE_NO_FLAGS;
    if horizontal_align.fract() > 0.0 {
        flags |= TILE_OFFSET_LEFT;
    }
    if vertical_align.fract() > 0.0 {
        flags |= TILE_OFFSET_UP;
    }

    let mut offsets = Vec::with_capacity(rule.tile_ids.len());
    for &tile_id in &rule.tile_ids {
        let (x, y) = tileset.coords(tile_id);
        offsets.push(StampOffset {
            x: ((x - left) - horizontal_align.trunc() as i32) as i16,
            y: ((y - top) - vertical_align.trunc() as i32) as i16,
            flags,
        });
    }
    offsets
}
