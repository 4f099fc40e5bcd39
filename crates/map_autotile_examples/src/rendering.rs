//! Shared helpers for the demo binaries: tracing setup and ASCII renderers.
use map_autotile::prelude::{IntGrid, TileGrid};
use tracing_subscriber::EnvFilter;

/// Initializes a tracing subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Renders an IntGrid as one character per cell: `.` for empty, the value
/// digit otherwise (values above 9 print as `#`).
pub fn render_int_grid(grid: &IntGrid) -> String {
    let mut out = String::new();
    for y in 0..i32::from(grid.height()) {
        for x in 0..i32::from(grid.width()) {
            let value = grid.get(x, y);
            let c = match value {
                0 => '.',
                1..=9 => char::from(b'0' + value as u8),
                _ => '#',
            };
            out.push(c);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Renders the topmost tile of each cell as a fixed-width id, `..` for empty
/// cells. Stack depth is not shown; use `TileGrid`'s `Display` for the full
/// stacks.
pub fn render_tile_grid(grid: &TileGrid) -> String {
    let mut out = String::new();
    for y in 0..i32::from(grid.height()) {
        for x in 0..i32::from(grid.width()) {
            match grid.tiles_at(x, y).first() {
                Some(tile) => out.push_str(&format!("{:>2} ", tile.tile_id)),
                None => out.push_str(" . "),
            }
        }
        out.push('\n');
    }
    out
}
