//! Tileset metadata.
use crate::{grid, TileId, Uid};

/// Metadata for a tile atlas: image dimensions, tile size, and the tile grid
/// layout. Actual image data is handled by the game using this library.
#[derive(Debug, Clone, Default)]
pub struct TileSetDef {
    /// User-defined name.
    pub name: String,
    pub uid: Uid,
    /// Path of the atlas image, relative to the project file.
    pub image_path: String,
    pub image_width: u16,
    pub image_height: u16,
    /// Width and height of one tile in pixels (tiles are squares).
    pub tile_size: u16,
    /// How many tiles the image holds horizontally.
    pub tile_count_width: u16,
    /// How many tiles the image holds vertically.
    pub tile_count_height: u16,
    /// Distance from the image edges to the first tile, in pixels.
    pub margin: u16,
    /// Space between tiles, in pixels.
    pub spacing: u16,
}

impl TileSetDef {
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

    pub fn with_tile_counts(mut self, tile_count_width: u16, tile_count_height: u16) -> Self {
        self.tile_count_width = tile_count_width;
        self.tile_count_height = tile_count_height;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u16) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Grid coordinates of a tile id inside the atlas: tile 0 is (0, 0), tile
    /// 1 is (1, 0), continuing left-to-right then top-to-bottom.
    pub fn coords(&self, tile_id: TileId) -> (i32, i32) {
        grid::coords(usize::from(tile_id), self.tile_count_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_walk_rows_left_to_right() {
        let tileset = TileSetDef::new(1).with_tile_counts(3, 3);
        assert_eq!(tileset.coords(0), (0, 0));
        assert_eq!(tileset.coords(2), (2, 0));
        assert_eq!(tileset.coords(4), (1, 1));
        assert_eq!(tileset.coords(7), (1, 2));
    }
}
