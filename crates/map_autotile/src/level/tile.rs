//! Placed-tile records and their draw flags.
use crate::TileId;

/// The tile is drawn normally.
pub const TILE_NO_FLAGS: u8 = 0;

/// Draw the tile shifted left by half the cell size.
pub const TILE_OFFSET_LEFT: u8 = 1 << 0;

/// Draw the tile shifted up by half the cell size.
pub const TILE_OFFSET_UP: u8 = 1 << 1;

/// Draw the tile shifted right by half the cell size.
pub const TILE_OFFSET_RIGHT: u8 = 1 << 2;

/// Draw the tile shifted down by half the cell size.
pub const TILE_OFFSET_DOWN: u8 = 1 << 3;

/// Draw the tile mirrored horizontally.
pub const TILE_FLIPPED_X: u8 = 1 << 4;

/// Draw the tile mirrored vertically.
pub const TILE_FLIPPED_Y: u8 = 1 << 5;

/// The tile blocks later rules from placing anything in its cell.
pub const TILE_FINAL: u8 = 1 << 6;

/// One tile placed on a cell by a rule. Many of these can stack in a single
/// cell; see [`crate::level::TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileInCell {
    /// Which tile of the layer's tileset is displayed.
    pub tile_id: TileId,
    /// Extra horizontal draw offset in pixels, applied after any half-cell
    /// offset flags.
    pub pos_x_offset: i16,
    /// Extra vertical draw offset in pixels. Negative moves up.
    pub pos_y_offset: i16,
    /// Opacity from 0 to 100.
    pub opacity: u8,
    /// Bitwise combination of the `TILE_*` flags.
    pub flags: u8,
    /// Ordinal of the rule that placed this tile; lower values rank higher in
    /// z-order. Used to fix stamp z-order during the matching process.
    pub priority: u8,
}

impl TileInCell {
    pub fn new(
        tile_id: TileId,
        pos_x_offset: i16,
        pos_y_offset: i16,
        opacity: u8,
        flags: u8,
        priority: u8,
    ) -> Self {
        Self {
            tile_id,
            pos_x_offset,
            pos_y_offset,
            opacity,
            flags,
            priority,
        }
    }

    pub fn has_offset_left(&self) -> bool {
        self.flags & TILE_OFFSET_LEFT != 0
    }

    pub fn has_offset_up(&self) -> bool {
        self.flags & TILE_OFFSET_UP != 0
    }

    pub fn has_offset_right(&self) -> bool {
        self.flags & TILE_OFFSET_RIGHT != 0
    }

    pub fn has_offset_down(&self) -> bool {
        self.flags & TILE_OFFSET_DOWN != 0
    }

    pub fn is_flipped_x(&self) -> bool {
        self.flags & TILE_FLIPPED_X != 0
    }

    pub fn is_flipped_y(&self) -> bool {
        self.flags & TILE_FLIPPED_Y != 0
    }

    pub fn is_final(&self) -> bool {
        self.flags & TILE_FINAL != 0
    }

    /// Horizontal draw offset in pixels for the half-cell offset flags, where
    /// `half_width` is half the cell size. Mirrored when the tile is flipped
    /// horizontally.
    pub fn draw_offset_x(&self, half_width: f32) -> f32 {
        let offset = if self.has_offset_right() {
            half_width
        } else if self.has_offset_left() {
            -half_width
        } else {
            0.0
        };
        if self.is_flipped_x() {
            -offset
        } else {
            offset
        }
    }

    /// Vertical draw offset in pixels for the half-cell offset flags, where
    /// `half_height` is half the cell size. Mirrored when the tile is flipped
    /// vertically.
    pub fn draw_offset_y(&self, half_height: f32) -> f32 {
        let offset = if self.has_offset_down() {
            half_height
        } else if self.has_offset_up() {
            -half_height
        } else {
            0.0
        };
        if self.is_flipped_y() {
            -offset
        } else {
            offset
        }
    }
}
