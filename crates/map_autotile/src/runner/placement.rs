//! Tile placement for matched cells: single tiles, stamps, and the stamp
//! z-order fixups.
use crate::defs::{Rule, TileMode};
use crate::grid;
use crate::level::{
    IntGrid, TileGrid, TILE_FINAL, TILE_FLIPPED_X, TILE_FLIPPED_Y, TILE_NO_FLAGS,
    TILE_OFFSET_DOWN, TILE_OFFSET_LEFT, TILE_OFFSET_RIGHT, TILE_OFFSET_UP,
};
use crate::runner::events::{EventSink, GenerateEvent};
use crate::runner::matching::passes_rule;
use crate::runner::{LayerSummary, RunOptions};

/// Runs one rule over every cell of the layer, placing tiles for each match.
#[allow(clippy::too_many_arguments)]
pub(super) fn apply_rule(
    rule: &Rule,
    cells: &IntGrid,
    tile_grid: &mut TileGrid,
    seed: i32,
    priority: u8,
    options: &RunOptions,
    layer_index: usize,
    sink: &mut dyn EventSink,
    summary: &mut LayerSummary,
) {
    debug_assert!(!rule.tile_ids.is_empty(), "rules without tiles are filtered out");

    let break_flag = if rule.break_on_match {
        TILE_FINAL
    } else {
        TILE_NO_FLAGS
    };

    for cell_y in 0..i32::from(cells.height()) {
        for cell_x in 0..i32::from(cells.width()) {
            if !tile_grid.can_still_place_tiles(cell_x, cell_y) {
                continue;
            }

            let Some(match_flags) = passes_rule(rule, cells, cell_x, cell_y, seed) else {
                continue;
            };

            summary.cells_matched += 1;
            sink.send(GenerateEvent::RuleMatched {
                layer_index,
                rule_uid: rule.uid,
                cell_x,
                cell_y,
                flags: match_flags,
            });

            let (pos_x_offset, pos_y_offset) = pixel_offsets(rule, seed, cell_x, cell_y);

            match rule.tile_mode {
                TileMode::Single => place_single(
                    rule,
                    tile_grid,
                    seed,
                    cell_x,
                    cell_y,
                    match_flags | break_flag,
                    pos_x_offset,
                    pos_y_offset,
                    priority,
                    layer_index,
                    sink,
                    summary,
                ),
                TileMode::Stamp => place_stamp(
                    rule,
                    cells,
                    tile_grid,
                    cell_x,
                    cell_y,
                    match_flags,
                    break_flag,
                    pos_x_offset,
                    pos_y_offset,
                    priority,
                    options,
                    layer_index,
                    sink,
                    summary,
                ),
            }
        }
    }
}

/// Resolves the rule's fixed and random pixel offsets for one matched cell.
/// Stamps share the roll so the whole stamp moves as a unit.
fn pixel_offsets(rule: &Rule, seed: i32, cell_x: i32, cell_y: i32) -> (i16, i16) {
    let rule_seed = seed.wrapping_add(i32::from(rule.uid));

    let mut x = rule.pos_x_offset;
    if rule.random_pos_x_offset_min != 0 || rule.random_pos_x_offset_max != 0 {
        x += grid::rand_range(
            rule_seed,
            cell_x,
            cell_y,
            i32::from(rule.random_pos_x_offset_min),
            i32::from(rule.random_pos_x_offset_max),
        ) as i16;
    }

    let mut y = rule.pos_y_offset;
    if rule.random_pos_y_offset_min != 0 || rule.random_pos_y_offset_max != 0 {
        // Salted so the two axes roll independently.
        y += grid::rand_range(
            rule_seed.wrapping_add(1),
            cell_x,
            cell_y,
            i32::from(rule.random_pos_y_offset_min),
            i32::from(rule.random_pos_y_offset_max),
        ) as i16;
    }

    (x, y)
}

#[allow(clippy::too_many_arguments)]
fn place_single(
    rule: &Rule,
    tile_grid: &mut TileGrid,
    seed: i32,
    cell_x: i32,
    cell_y: i32,
    flags: u8,
    pos_x_offset: i16,
    pos_y_offset: i16,
    priority: u8,
    layer_index: usize,
    sink: &mut dyn EventSink,
    summary: &mut LayerSummary,
) {
    let tile_id = if rule.tile_ids.len() > 1 {
        rule.tile_ids[grid::rand_index(
            seed.wrapping_add(i32::from(rule.uid)),
            cell_x,
            cell_y,
            rule.tile_ids.len(),
        )]
    } else {
        rule.tile_ids[0]
    };

    tile_grid.put_tile(
        tile_id,
        cell_x,
        cell_y,
        pos_x_offset,
        pos_y_offset,
        rule.opacity,
        flags,
        priority,
    );
    summary.tiles_placed += 1;
    sink.send(GenerateEvent::TilePlaced {
        layer_index,
        tile_id,
        cell_x,
        cell_y,
        flags,
        priority,
    });
}

#[allow(clippy::too_many_arguments)]
fn place_stamp(
    rule: &Rule,
    cells: &IntGrid,
    tile_grid: &mut TileGrid,
    cell_x: i32,
    cell_y: i32,
    match_flags: u8,
    break_flag: u8,
    pos_x_offset: i16,
    pos_y_offset: i16,
    priority: u8,
    options: &RunOptions,
    layer_index: usize,
    sink: &mut dyn EventSink,
    summary: &mut LayerSummary,
) {
    debug_assert_eq!(
        rule.stamp_tile_offsets.len(),
        rule.tile_ids.len(),
        "rule {}: stamp offsets must be pre-processed before running",
        rule.uid
    );

    for (tile_idx, &tile_id) in rule.tile_ids.iter().enumerate() {
        let offset = rule.stamp_tile_offsets[tile_idx];

        // Finalization only applies to the tile sitting exactly on the
        // matched cell. The faster policy extends it to every whole-offset
        // tile, which is unsafe when stamp tiles have transparency.
        let on_anchor = offset.x == 0 && offset.y == 0;
        let whole = !offset.has_half_offset();
        let finalize = if options.faster_stamp_break_on_match {
            whole
        } else {
            on_anchor && whole
        };

        let mut flags = match_flags | offset.flags;
        if finalize {
            flags |= break_flag;
        }

        let mut location_x = cell_x
            + i32::from(offset.x) * if flags & TILE_FLIPPED_X != 0 { -1 } else { 1 };
        let mut location_y = cell_y
            + i32::from(offset.y) * if flags & TILE_FLIPPED_Y != 0 { -1 } else { 1 };

        if !grid::is_within_bounds(location_x, location_y, cells.width(), cells.height()) {
            // Part of the stamp went over the map edge; clip that tile.
            continue;
        }

        // A half-cell offset tile visually overlaps the neighbour cell. If
        // that neighbour already holds a higher-ranked rule's tile, move this
        // record into the neighbour's stack and mirror the offset flag, so
        // the tile keeps its position on screen while the z-order stays
        // correct.
        if flags & TILE_OFFSET_LEFT != 0
            && location_x > 0
            && tile_grid.highest_priority(location_x - 1, location_y) < priority
        {
            location_x -= 1;
            flags &= !TILE_OFFSET_LEFT;
            flags |= TILE_OFFSET_RIGHT;
        }
        if flags & TILE_OFFSET_UP != 0
            && location_y > 0
            && tile_grid.highest_priority(location_x, location_y - 1) < priority
        {
            location_y -= 1;
            flags &= !TILE_OFFSET_UP;
            flags |= TILE_OFFSET_DOWN;
        }

        tile_grid.put_tile(
            tile_id,
            location_x,
            location_y,
            pos_x_offset,
            pos_y_offset,
            rule.opacity,
            flags,
            priority,
        );
        summary.tiles_placed += 1;
        sink.send(GenerateEvent::TilePlaced {
            layer_index,
            tile_id,
            cell_x: location_x,
            cell_y: location_y,
            flags,
            priority,
        });
    }
}
