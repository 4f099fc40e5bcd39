//! Rules: a pattern, the tiles it places, and its placement policy.
use crate::error::{Error, Result};
use crate::level::{TILE_OFFSET_LEFT, TILE_OFFSET_UP};
use crate::{TileId, Uid};

/// Pattern value meaning "there must be *some* value in this cell, any kind
/// will do".
pub const RULE_PATTERN_ANY: i32 = 1_000_001;

/// Pattern value meaning "this cell must be empty".
pub const RULE_PATTERN_EMPTY: i32 = -1_000_001;

/// Staggers which cells a rule is tested on, offsetting every other row or
/// column. When the checker is not `None`, the respective modulo offset is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckerMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// How a rule's tiles are placed on a matched cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileMode {
    /// Place one tile; with several `tile_ids` one is chosen pseudo-randomly.
    #[default]
    Single,
    /// Place every tile in `tile_ids`, arranged in the shape they have inside
    /// the tileset and anchored by the stamp pivot.
    Stamp,
}

/// Cached per-tile placement offset for a stamp rule, relative to the matched
/// cell, in cell units. Computed once by
/// [`Definitions::pre_process`](crate::defs::Definitions::pre_process).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampOffset {
    pub x: i16,
    pub y: i16,
    /// `TILE_OFFSET_LEFT` / `TILE_OFFSET_UP` when the pivot lands between
    /// cells; the renderer resolves those to a half-cell pixel shift.
    pub flags: u8,
}

impl StampOffset {
    /// Whether this tile sits half a cell off the grid in either axis. Happens
    /// when the stamp has an even tile span and a 0.5 pivot.
    pub fn has_half_offset(&self) -> bool {
        self.flags & (TILE_OFFSET_LEFT | TILE_OFFSET_UP) != 0
    }
}

/// Specifies what tile(s) to place for cells that match a specific pattern of
/// IntGrid values.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier. Also contributes to the seed in pseudo-random
    /// checks, so two otherwise identical rules randomize differently.
    pub uid: Uid,
    /// Deactivated rules are skipped entirely.
    pub active: bool,
    /// Probability of the rule applying per candidate cell. At or below 0 the
    /// rule is skipped outright; at or above 1 it always applies.
    pub chance: f32,
    /// When true, a match closes the cell: tiles placed on the matched cell
    /// carry the `Final` flag and later rules (in any group of the same
    /// layer) cannot write there.
    pub break_on_match: bool,
    /// Also try the horizontally mirrored pattern.
    pub flip_x: bool,
    /// Also try the vertically mirrored pattern.
    pub flip_y: bool,
    /// Opacity of placed tiles, 0 to 100.
    pub opacity: u8,
    /// Horizontal pixel offset applied to every placed tile, after stamp
    /// offsets.
    pub pos_x_offset: i16,
    /// Vertical pixel offset applied to every placed tile. Negative moves up.
    pub pos_y_offset: i16,
    /// Lower bound of the random horizontal pixel offset.
    pub random_pos_x_offset_min: i16,
    /// Upper bound of the random horizontal pixel offset.
    pub random_pos_x_offset_max: i16,
    /// Lower bound of the random vertical pixel offset.
    pub random_pos_y_offset_min: i16,
    /// Upper bound of the random vertical pixel offset.
    pub random_pos_y_offset_max: i16,
    /// Test only every nth column. 1 tests every column.
    pub x_modulo: i32,
    /// Column at which the x modulo starts counting.
    pub x_modulo_offset: i32,
    /// Test only every nth row. 1 tests every row.
    pub y_modulo: i32,
    /// Row at which the y modulo starts counting.
    pub y_modulo_offset: i32,
    pub checker: CheckerMode,
    /// Value substituted for cells the pattern reads above/below the grid (or
    /// diagonally outside it). −1 aborts the match instead.
    pub vertical_out_of_bounds_value: i32,
    /// Value substituted for cells the pattern reads left/right of the grid.
    /// −1 aborts the match instead.
    pub horizontal_out_of_bounds_value: i32,
    /// Square grid of pattern values, row-major, side length `pattern_size`.
    ///
    /// Value semantics: `0` ignores the cell; a positive value requires that
    /// exact cell value; a negative value forbids it; [`RULE_PATTERN_ANY`]
    /// requires any non-empty cell; [`RULE_PATTERN_EMPTY`] requires an empty
    /// one. A 3x3 pattern of `0, 1, 0 / 1, -1, 1 / 0, 1, 0` reads as: the four
    /// neighbours must be 1 and the center cell must not be.
    pub pattern: Vec<i32>,
    /// Side length of the pattern grid: 1, 3, 5, or 7.
    pub pattern_size: u8,
    /// The tiles to place on a match, as indices into the owning layer's
    /// tileset.
    pub tile_ids: Vec<TileId>,
    pub tile_mode: TileMode,
    /// Stamp anchor in [0, 1]: 0.0 puts the stamp's left edge on the matched
    /// cell, 0.5 centers it, 1.0 puts the right edge on it.
    pub stamp_pivot_x: f32,
    /// Stamp anchor in [0, 1]: 0.0 top edge, 0.5 centered, 1.0 bottom edge.
    pub stamp_pivot_y: f32,
    /// Cached stamp placement offsets, one per entry of `tile_ids`. Filled by
    /// [`Definitions::pre_process`](crate::defs::Definitions::pre_process);
    /// recompute if a rule is ever edited at runtime.
    pub stamp_tile_offsets: Vec<StampOffset>,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            uid: 0,
            active: true,
            chance: 1.0,
            break_on_match: true,
            flip_x: false,
            flip_y: false,
            opacity: 100,
            pos_x_offset: 0,
            pos_y_offset: 0,
            random_pos_x_offset_min: 0,
            random_pos_x_offset_max: 0,
            random_pos_y_offset_min: 0,
            random_pos_y_offset_max: 0,
            x_modulo: 1,
            x_modulo_offset: 0,
            y_modulo: 1,
            y_modulo_offset: 0,
            checker: CheckerMode::None,
            vertical_out_of_bounds_value: -1,
            horizontal_out_of_bounds_value: -1,
            pattern: Vec::new(),
            pattern_size: 0,
            tile_ids: Vec::new(),
            tile_mode: TileMode::Single,
            stamp_pivot_x: 0.0,
            stamp_pivot_y: 0.0,
            stamp_tile_offsets: Vec::new(),
        }
    }
}

impl Rule {
    pub fn new(uid: Uid) -> Self {
        Self {
            uid,
            ..Default::default()
        }
    }

    /// Sets the pattern and its side length.
    pub fn with_pattern(mut self, pattern_size: u8, pattern: Vec<i32>) -> Self {
        self.pattern_size = pattern_size;
        self.pattern = pattern;
        self
    }

    pub fn with_tile_ids(mut self, tile_ids: Vec<TileId>) -> Self {
        self.tile_ids = tile_ids;
        self
    }

    pub fn with_tile_mode(mut self, tile_mode: TileMode) -> Self {
        self.tile_mode = tile_mode;
        self
    }

    pub fn with_stamp_pivot(mut self, pivot_x: f32, pivot_y: f32) -> Self {
        self.stamp_pivot_x = pivot_x;
        self.stamp_pivot_y = pivot_y;
        self
    }

    pub fn with_chance(mut self, chance: f32) -> Self {
        self.chance = chance;
        self
    }

    pub fn with_break_on_match(mut self, break_on_match: bool) -> Self {
        self.break_on_match = break_on_match;
        self
    }

    pub fn with_flips(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    pub fn with_modulo(mut self, x_modulo: i32, y_modulo: i32) -> Self {
        self.x_modulo = x_modulo;
        self.y_modulo = y_modulo;
        self
    }

    pub fn with_modulo_offset(mut self, x_offset: i32, y_offset: i32) -> Self {
        self.x_modulo_offset = x_offset;
        self.y_modulo_offset = y_offset;
        self
    }

    pub fn with_checker(mut self, checker: CheckerMode) -> Self {
        self.checker = checker;
        self
    }

    /// Sets the substitute value for both out-of-bounds axes; −1 aborts
    /// matching at the edge instead.
    pub fn with_out_of_bounds_value(mut self, value: i32) -> Self {
        self.vertical_out_of_bounds_value = value;
        self.horizontal_out_of_bounds_value = value;
        self
    }

    /// Checks the rule against the constraints the runner relies on.
    pub fn validate(&self) -> Result<()> {
        if self.x_modulo < 1 || self.y_modulo < 1 {
            // The modulo is used as a divisor in the cell filter.
            return Err(Error::InvalidConfig(format!(
                "rule {}: modulo divisor is zero or negative (x: {}, y: {})",
                self.uid, self.x_modulo, self.y_modulo
            )));
        }

        if !matches!(self.pattern_size, 1 | 3 | 5 | 7) {
            return Err(Error::InvalidConfig(format!(
                "rule {}: pattern size {} is not one of 1, 3, 5, 7",
                self.uid, self.pattern_size
            )));
        }

        let expected = usize::from(self.pattern_size) * usize::from(self.pattern_size);
        if self.pattern.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "rule {}: pattern has {} values, needs {} for size {}",
                self.uid,
                self.pattern.len(),
                expected,
                self.pattern_size
            )));
        }

        if !self.chance.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "rule {}: chance is not finite",
                self.uid
            )));
        }

        if self.random_pos_x_offset_min > self.random_pos_x_offset_max {
            return Err(Error::InvalidConfig(format!(
                "rule {}: random x offset min {} exceeds max {}",
                self.uid, self.random_pos_x_offset_min, self.random_pos_x_offset_max
            )));
        }
        if self.random_pos_y_offset_min > self.random_pos_y_offset_max {
            return Err(Error::InvalidConfig(format!(
                "rule {}: random y offset min {} exceeds max {}",
                self.uid, self.random_pos_y_offset_min, self.random_pos_y_offset_max
            )));
        }

        if self.active
            && self.chance > 0.0
            && self.tile_mode == TileMode::Stamp
            && self.stamp_tile_offsets.len() != self.tile_ids.len()
        {
            return Err(Error::InvalidConfig(format!(
                "rule {}: stamp offsets not pre-processed ({} offsets for {} tiles)",
                self.uid,
                self.stamp_tile_offsets.len(),
                self.tile_ids.len()
            )));
        }

        Ok(())
    }
}

/// A named folder of rules. Groups run in order, and their rules run in order
/// within them.
#[derive(Debug, Clone, Default)]
pub struct RuleGroup {
    pub name: String,
    /// Deactivated groups are skipped with all their rules.
    pub active: bool,
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules.extend(rules);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_rule() -> Rule {
        Rule::new(1)
            .with_pattern(1, vec![1])
            .with_tile_ids(vec![9])
    }

    #[test]
    fn default_rule_has_editor_defaults() {
        let rule = Rule::default();
        assert!(rule.active);
        assert_eq!(rule.chance, 1.0);
        assert!(rule.break_on_match);
        assert_eq!(rule.x_modulo, 1);
        assert_eq!(rule.y_modulo, 1);
        assert_eq!(rule.vertical_out_of_bounds_value, -1);
        assert_eq!(rule.opacity, 100);
    }

    #[test]
    fn validate_accepts_minimal_rule() {
        assert!(minimal_rule().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_modulo_as_divisor() {
        let rule = minimal_rule().with_modulo(0, 1);
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("divisor is zero"));
    }

    #[test]
    fn validate_rejects_even_pattern_size() {
        let rule = Rule::new(2).with_pattern(2, vec![0; 4]).with_tile_ids(vec![1]);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn validate_rejects_pattern_length_mismatch() {
        let rule = Rule::new(3).with_pattern(3, vec![0; 8]).with_tile_ids(vec![1]);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_chance() {
        let rule = minimal_rule().with_chance(f32::NAN);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_random_offsets() {
        let mut rule = minimal_rule();
        rule.random_pos_x_offset_min = 4;
        rule.random_pos_x_offset_max = 2;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn validate_rejects_unprocessed_stamp() {
        let rule = minimal_rule().with_tile_mode(TileMode::Stamp);
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("stamp offsets"));
    }

    #[test]
    fn stamp_offset_reports_half_offsets() {
        let whole = StampOffset { x: 1, y: 0, flags: 0 };
        assert!(!whole.has_half_offset());
        let half = StampOffset {
            x: 0,
            y: 0,
            flags: TILE_OFFSET_LEFT,
        };
        assert!(half.has_half_offset());
    }
}
