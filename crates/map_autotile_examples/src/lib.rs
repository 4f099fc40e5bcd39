#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, render_int_grid, render_tile_grid};
