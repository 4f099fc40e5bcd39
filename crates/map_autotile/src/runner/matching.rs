//! Pattern evaluation: modulo/checker filters, flipped variants, and the
//! per-cell pattern check.
use crate::defs::{CheckerMode, Rule, RULE_PATTERN_ANY, RULE_PATTERN_EMPTY};
use crate::grid;
use crate::level::{IntGrid, TILE_FLIPPED_X, TILE_FLIPPED_Y, TILE_NO_FLAGS};

/// Upper bound of the chance roll; a rule with chance 1.0 never rolls.
const CHANCE_MAX: usize = 100;

/// Tests the rule against a single cell, trying the flipped pattern variants
/// in order. Returns the flip flags of the first variant that matched, or
/// `None`.
pub(super) fn passes_rule(
    rule: &Rule,
    cells: &IntGrid,
    cell_x: i32,
    cell_y: i32,
    seed: i32,
) -> Option<u8> {
    debug_assert!(
        rule.x_modulo >= 1 && rule.y_modulo >= 1,
        "rule {} has a zero modulo divisor; validate the definitions before running",
        rule.uid
    );

    // The modulo acts as a cell filter. Checker modes stagger the stride by
    // one for every other row/column and take precedence over the plain
    // offset in their axis.
    if rule.checker != CheckerMode::Vertical
        && (cell_y - rule.y_modulo_offset) % rule.y_modulo != 0
    {
        return None;
    }
    if rule.checker == CheckerMode::Vertical
        && (cell_y + (cell_x / rule.x_modulo) % 2) % rule.y_modulo != 0
    {
        return None;
    }
    if rule.checker != CheckerMode::Horizontal
        && (cell_x - rule.x_modulo_offset) % rule.x_modulo != 0
    {
        return None;
    }
    if rule.checker == CheckerMode::Horizontal
        && (cell_x + (cell_y / rule.y_modulo) % 2) % rule.x_modulo != 0
    {
        return None;
    }

    if matches_cell(rule, cells, cell_x, cell_y, 1, 1, seed) {
        return Some(TILE_NO_FLAGS);
    }
    if rule.flip_x && rule.flip_y && matches_cell(rule, cells, cell_x, cell_y, -1, -1, seed) {
        return Some(TILE_FLIPPED_X | TILE_FLIPPED_Y);
    }
    if rule.flip_x && matches_cell(rule, cells, cell_x, cell_y, -1, 1, seed) {
        return Some(TILE_FLIPPED_X);
    }
    if rule.flip_y && matches_cell(rule, cells, cell_x, cell_y, 1, -1, seed) {
        return Some(TILE_FLIPPED_Y);
    }
    None
}

/// Checks one pattern variant against the IntGrid. `dir_x`/`dir_y` are ±1:
/// instead of flipping the pattern, the grid is read mirrored.
fn matches_cell(
    rule: &Rule,
    cells: &IntGrid,
    cell_x: i32,
    cell_y: i32,
    dir_x: i32,
    dir_y: i32,
    seed: i32,
) -> bool {
    // Rules with chance <= 0 were already filtered out by the runner.
    if rule.chance < 1.0 {
        let chance100 = (rule.chance * CHANCE_MAX as f32).round() as usize;
        if grid::rand_index(
            seed.wrapping_add(i32::from(rule.uid)),
            cell_x,
            cell_y,
            CHANCE_MAX,
        ) >= chance100
        {
            return false;
        }
    }

    let size = i32::from(rule.pattern_size);
    // The radius recenters the pattern: at px = 0 a 3x3 pattern reads the
    // cell left of the candidate.
    let radius = size / 2;

    for py in 0..size {
        for px in 0..size {
            let pattern_value = rule.pattern[(px + py * size) as usize];
            if pattern_value == 0 {
                continue;
            }

            let check_x = cell_x + (px - radius) * dir_x;
            let check_y = cell_y + (py - radius) * dir_y;

            let within_horizontal = cells.is_within_horizontal_bounds(check_x);
            let within_vertical = cells.is_within_vertical_bounds(check_y);
            let cell_value = if within_horizontal && within_vertical {
                i32::from(cells.get(check_x, check_y))
            } else if !within_horizontal && within_vertical {
                // Out of bounds to the left or right only.
                if rule.horizontal_out_of_bounds_value == -1 {
                    return false;
                }
                rule.horizontal_out_of_bounds_value
            } else {
                // Out of bounds above/below, or diagonally; both use the
                // vertical substitute.
                if rule.vertical_out_of_bounds_value == -1 {
                    return false;
                }
                rule.vertical_out_of_bounds_value
            };

            let ok = if pattern_value == RULE_PATTERN_ANY {
                cell_value != 0
            } else if pattern_value == RULE_PATTERN_EMPTY {
                cell_value == 0
            } else if pattern_value > 0 {
                cell_value == pattern_value
            } else {
                cell_value != -pattern_value
            };
            if !ok {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::TileMode;
    use crate::level::TILE_NO_FLAGS;

    fn grid_3x3(values: [u16; 9]) -> IntGrid {
        IntGrid::from_values(3, 3, values.to_vec()).expect("valid grid")
    }

    fn plain_rule(pattern_size: u8, pattern: Vec<i32>) -> Rule {
        Rule::new(1)
            .with_pattern(pattern_size, pattern)
            .with_tile_ids(vec![1])
    }

    #[test]
    fn all_zero_pattern_matches_everywhere() {
        let cells = grid_3x3([0; 9]);
        let rule = plain_rule(3, vec![0; 9]);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(passes_rule(&rule, &cells, x, y, 0), Some(TILE_NO_FLAGS));
            }
        }
    }

    #[test]
    fn positive_value_requires_exact_match() {
        let cells = grid_3x3([0, 0, 0, 0, 2, 0, 0, 0, 0]);
        let rule = plain_rule(1, vec![2]);
        assert!(passes_rule(&rule, &cells, 1, 1, 0).is_some());
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_none());
    }

    #[test]
    fn negative_value_forbids_match() {
        let cells = grid_3x3([1, 2, 0, 0, 0, 0, 0, 0, 0]);
        let rule = plain_rule(1, vec![-2]);
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_some());
        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_none());
        assert!(passes_rule(&rule, &cells, 2, 0, 0).is_some());
    }

    #[test]
    fn any_and_empty_sentinels() {
        let cells = grid_3x3([5, 0, 0, 0, 0, 0, 0, 0, 0]);

        let any = plain_rule(1, vec![RULE_PATTERN_ANY]);
        assert!(passes_rule(&any, &cells, 0, 0, 0).is_some());
        assert!(passes_rule(&any, &cells, 1, 0, 0).is_none());

        let empty = plain_rule(1, vec![RULE_PATTERN_EMPTY]);
        assert!(passes_rule(&empty, &cells, 0, 0, 0).is_none());
        assert!(passes_rule(&empty, &cells, 1, 0, 0).is_some());
    }

    #[test]
    fn out_of_bounds_aborts_by_default() {
        // North neighbour must be 1; at row 0 the read goes above the grid.
        let cells = grid_3x3([1; 9]);
        let rule = plain_rule(3, vec![0, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_none());
        assert!(passes_rule(&rule, &cells, 1, 1, 0).is_some());
    }

    #[test]
    fn vertical_substitute_feeds_rows_above() {
        let cells = grid_3x3([1; 9]);
        let rule = plain_rule(3, vec![0, 2, 0, 0, 0, 0, 0, 0, 0]).with_out_of_bounds_value(2);
        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_some());
    }

    #[test]
    fn horizontal_and_vertical_substitutes_are_separate() {
        let cells = grid_3x3([1; 9]);
        // West neighbour must be 2: only the horizontal substitute may supply it.
        let mut rule = plain_rule(3, vec![0, 0, 0, 2, 0, 0, 0, 0, 0]);
        rule.horizontal_out_of_bounds_value = 2;
        rule.vertical_out_of_bounds_value = -1;
        assert!(passes_rule(&rule, &cells, 0, 1, 0).is_some());

        rule.horizontal_out_of_bounds_value = -1;
        rule.vertical_out_of_bounds_value = 2;
        assert!(passes_rule(&rule, &cells, 0, 1, 0).is_none());
    }

    #[test]
    fn diagonal_out_of_bounds_uses_vertical_substitute() {
        let cells = grid_3x3([1; 9]);
        // North-west corner of the pattern: at (0, 0) that read is diagonal.
        let mut rule = plain_rule(3, vec![2, 0, 0, 0, 0, 0, 0, 0, 0]);
        rule.horizontal_out_of_bounds_value = -1;
        rule.vertical_out_of_bounds_value = 2;
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_some());

        rule.vertical_out_of_bounds_value = -1;
        rule.horizontal_out_of_bounds_value = 2;
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_none());
    }

    #[test]
    fn flip_x_reads_the_grid_mirrored() {
        // West neighbour must be 7. In the grid the 7 is east of (1, 0), so
        // only the flipped variant matches, and reports the flip.
        let cells = grid_3x3([0, 1, 7, 0, 0, 0, 0, 0, 0]);
        let mut rule =
            plain_rule(3, vec![0, 0, 0, 7, 0, 0, 0, 0, 0]).with_out_of_bounds_value(0);

        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_none());

        rule.flip_x = true;
        assert_eq!(passes_rule(&rule, &cells, 1, 0, 0), Some(TILE_FLIPPED_X));
    }

    #[test]
    fn flip_both_variant_reports_both_flags() {
        // Pattern wants 7 north-west; the grid has it south-east.
        let cells = grid_3x3([0, 0, 0, 0, 1, 0, 0, 0, 7]);
        let rule = plain_rule(3, vec![7, 0, 0, 0, 1, 0, 0, 0, 0])
            .with_flips(true, true)
            .with_out_of_bounds_value(0);
        assert_eq!(
            passes_rule(&rule, &cells, 1, 1, 0),
            Some(TILE_FLIPPED_X | TILE_FLIPPED_Y)
        );
    }

    #[test]
    fn modulo_filters_columns_and_rows() {
        let cells = grid_3x3([1; 9]);
        let rule = plain_rule(1, vec![1]).with_modulo(2, 1);
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_some());
        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_none());
        assert!(passes_rule(&rule, &cells, 2, 0, 0).is_some());
    }

    #[test]
    fn modulo_offset_shifts_the_stride() {
        let cells = grid_3x3([1; 9]);
        let rule = plain_rule(1, vec![1]).with_modulo(2, 1).with_modulo_offset(1, 0);
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_none());
        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_some());
    }

    #[test]
    fn vertical_checker_staggers_alternate_columns() {
        let cells = grid_3x3([1; 9]);
        let rule = plain_rule(1, vec![1])
            .with_modulo(1, 2)
            .with_checker(CheckerMode::Vertical);
        // Cells with even x+y parity pass.
        assert!(passes_rule(&rule, &cells, 0, 0, 0).is_some());
        assert!(passes_rule(&rule, &cells, 1, 0, 0).is_none());
        assert!(passes_rule(&rule, &cells, 1, 1, 0).is_some());
        assert!(passes_rule(&rule, &cells, 2, 2, 0).is_some());
    }

    #[test]
    fn chance_gate_is_deterministic_per_seed() {
        let cells = grid_3x3([1; 9]);
        let rule = plain_rule(1, vec![1]).with_chance(0.5);

        let first: Vec<bool> = (0..9)
            .map(|n| passes_rule(&rule, &cells, n % 3, n / 3, 77).is_some())
            .collect();
        let second: Vec<bool> = (0..9)
            .map(|n| passes_rule(&rule, &cells, n % 3, n / 3, 77).is_some())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn chance_rounds_to_a_percentage() {
        let cells = grid_3x3([1; 9]);

        // 0.001 rounds to a 0-in-100 roll: no cell can pass.
        let never = plain_rule(1, vec![1]).with_chance(0.001);
        assert!((0..9).all(|n| passes_rule(&never, &cells, n % 3, n / 3, 77).is_none()));

        // 0.999 rounds to 100-in-100: every cell passes.
        let always = plain_rule(1, vec![1]).with_chance(0.999);
        assert!((0..9).all(|n| passes_rule(&always, &cells, n % 3, n / 3, 77).is_some()));
    }

    #[test]
    fn stamp_mode_does_not_change_matching() {
        let cells = grid_3x3([1; 9]);
        let mut rule = plain_rule(1, vec![1]).with_tile_mode(TileMode::Stamp);
        rule.stamp_tile_offsets = vec![crate::defs::StampOffset { x: 0, y: 0, flags: 0 }];
        assert!(passes_rule(&rule, &cells, 1, 1, 0).is_some());
    }
}
