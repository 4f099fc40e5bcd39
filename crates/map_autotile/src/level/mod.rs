//! Runtime level data: the IntGrid input and the TileGrid outputs.
mod int_grid;
mod tile;
mod tile_grid;

pub use int_grid::IntGrid;
pub use tile::{
    TileInCell, TILE_FINAL, TILE_FLIPPED_X, TILE_FLIPPED_Y, TILE_NO_FLAGS, TILE_OFFSET_DOWN,
    TILE_OFFSET_LEFT, TILE_OFFSET_RIGHT, TILE_OFFSET_UP,
};
pub use tile_grid::TileGrid;

use crate::CellValue;

/// A level at runtime: the IntGrid the game filled in, and one [`TileGrid`]
/// per layer that rule runs write into.
///
/// A `Level` is exclusively owned by the thread running a generate pass for
/// its duration; the TileGrids are cleared and reused between runs.
#[derive(Debug, Clone, Default)]
pub struct Level {
    int_grid: IntGrid,
    tile_grids: Vec<TileGrid>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int_grid(int_grid: IntGrid) -> Self {
        Self {
            int_grid,
            tile_grids: Vec::new(),
        }
    }

    /// Replaces the level's IntGrid. Every TileGrid is resized to match.
    pub fn set_int_grid(&mut self, int_grid: IntGrid) {
        let (width, height) = (int_grid.width(), int_grid.height());
        self.int_grid = int_grid;
        for tile_grid in &mut self.tile_grids {
            tile_grid.set_size(width, height);
        }
    }

    pub fn int_grid(&self) -> &IntGrid {
        &self.int_grid
    }

    /// Assigns one cell of the IntGrid.
    pub fn set_cell(&mut self, x: i32, y: i32, value: CellValue) {
        self.int_grid.set(x, y, value);
    }

    /// Number of cells in the x-axis.
    pub fn width(&self) -> u16 {
        self.int_grid.width()
    }

    /// Number of cells in the y-axis.
    pub fn height(&self) -> u16 {
        self.int_grid.height()
    }

    pub fn tile_grid_count(&self) -> usize {
        self.tile_grids.len()
    }

    /// Grows or shrinks the list of TileGrids. New grids take the IntGrid's
    /// size.
    pub fn set_tile_grid_count(&mut self, count: usize) {
        while self.tile_grids.len() < count {
            self.tile_grids
                .push(TileGrid::new(self.int_grid.width(), self.int_grid.height()));
        }
        self.tile_grids.truncate(count);
    }

    /// Removes all placed tiles from every TileGrid. Sizes stay the same.
    pub fn clear_tile_grids(&mut self) {
        for tile_grid in &mut self.tile_grids {
            tile_grid.clear_tiles();
        }
    }

    pub fn tile_grid(&self, idx: usize) -> &TileGrid {
        &self.tile_grids[idx]
    }

    pub fn tile_grid_mut(&mut self, idx: usize) -> &mut TileGrid {
        &mut self.tile_grids[idx]
    }

    pub fn tile_grids(&self) -> &[TileGrid] {
        &self.tile_grids
    }

    /// Split borrow for the rule runner: the IntGrid read-only next to one
    /// TileGrid writable.
    pub(crate) fn int_grid_and_tile_grid_mut(&mut self, idx: usize) -> (&IntGrid, &mut TileGrid) {
        (&self.int_grid, &mut self.tile_grids[idx])
    }
}
