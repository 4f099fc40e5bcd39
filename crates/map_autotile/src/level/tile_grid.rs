//! The visual output grid.
use std::fmt;

use crate::level::{TileInCell, TILE_FINAL};
use crate::{grid, TileId, Uid};

/// A grid of placed tiles, one stack per cell.
///
/// Unlike [`crate::level::IntGrid`], which says what *type* of thing is in a
/// cell, a `TileGrid` only says what is visually displayed there. Cells stack:
/// records are kept in placement order, with the first record visually on
/// top. Renderers that need strict z-order can sort a stack by
/// [`TileInCell::priority`].
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    layer_uid: Uid,
    random_seed: i32,
    width: u16,
    height: u16,
    cells: Vec<Vec<TileInCell>>,
}

impl TileGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            layer_uid: 0,
            random_seed: 0,
            width,
            height,
            cells: vec![Vec::new(); usize::from(width) * usize::from(height)],
        }
    }

    /// Which layer definition this grid holds the output of.
    pub fn layer_uid(&self) -> Uid {
        self.layer_uid
    }

    pub fn set_layer_uid(&mut self, layer_uid: Uid) {
        self.layer_uid = layer_uid;
    }

    /// The seed used for the last rule run, kept so a generated level can be
    /// recreated later.
    pub fn random_seed(&self) -> i32 {
        self.random_seed
    }

    pub fn set_random_seed(&mut self, random_seed: i32) {
        self.random_seed = random_seed;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Changes the grid's size, dropping all placed tiles.
    pub fn set_size(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Vec::new());
    }

    /// Removes all placed tiles. The size stays the same.
    pub fn clear_tiles(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Places a tile into the cell at (x, y). Records accumulate in placement
    /// order.
    #[allow(clippy::too_many_arguments)]
    pub fn put_tile(
        &mut self,
        tile_id: TileId,
        cell_x: i32,
        cell_y: i32,
        pos_x_offset: i16,
        pos_y_offset: i16,
        opacity: u8,
        flags: u8,
        priority: u8,
    ) {
        debug_assert!(
            grid::is_within_bounds(cell_x, cell_y, self.width, self.height),
            "TileGrid::put_tile out of bounds: ({cell_x}, {cell_y}) in {}x{}",
            self.width,
            self.height
        );
        let idx = grid::index(cell_x, cell_y, self.width);
        self.cells[idx].push(TileInCell::new(
            tile_id,
            pos_x_offset,
            pos_y_offset,
            opacity,
            flags,
            priority,
        ));
    }

    /// Whether the cell at (x, y) still accepts tiles. A cell is closed once
    /// any record in it carries [`TILE_FINAL`]; see
    /// [`crate::defs::Rule::break_on_match`].
    pub fn can_still_place_tiles(&self, cell_x: i32, cell_y: i32) -> bool {
        debug_assert!(
            grid::is_within_bounds(cell_x, cell_y, self.width, self.height),
            "TileGrid::can_still_place_tiles out of bounds: ({cell_x}, {cell_y}) in {}x{}",
            self.width,
            self.height
        );
        self.cells[grid::index(cell_x, cell_y, self.width)]
            .iter()
            .all(|tile| tile.flags & TILE_FINAL == 0)
    }

    /// The numerically lowest (= highest-ranked) priority placed on the cell,
    /// or `u8::MAX` when the cell is empty. Used to fix the z-order of
    /// half-cell-offset stamp tiles during the matching process.
    pub fn highest_priority(&self, cell_x: i32, cell_y: i32) -> u8 {
        debug_assert!(
            grid::is_within_bounds(cell_x, cell_y, self.width, self.height),
            "TileGrid::highest_priority out of bounds: ({cell_x}, {cell_y}) in {}x{}",
            self.width,
            self.height
        );
        self.cells[grid::index(cell_x, cell_y, self.width)]
            .iter()
            .map(|tile| tile.priority)
            .min()
            .unwrap_or(u8::MAX)
    }

    /// The tiles stacked on the cell at (x, y), in placement order.
    pub fn tiles_at(&self, cell_x: i32, cell_y: i32) -> &[TileInCell] {
        debug_assert!(
            grid::is_within_bounds(cell_x, cell_y, self.width, self.height),
            "TileGrid::tiles_at out of bounds: ({cell_x}, {cell_y}) in {}x{}",
            self.width,
            self.height
        );
        &self.cells[grid::index(cell_x, cell_y, self.width)]
    }

    /// The tiles stacked on the cell at the given row-major index.
    pub fn cell(&self, idx: usize) -> &[TileInCell] {
        &self.cells[idx]
    }
}

/// Prints the grid as rows of bracketed tile id stacks, e.g.
/// `[], [1337], [2, 1]`.
impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..i32::from(self.height) {
            for x in 0..i32::from(self.width) {
                if x > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "[")?;
                for (n, tile) in self.tiles_at(x, y).iter().enumerate() {
                    if n > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", tile.tile_id)?;
                }
                write!(f, "]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
