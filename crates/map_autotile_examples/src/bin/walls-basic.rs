use map_autotile::prelude::*;
use map_autotile_examples::{init_tracing, render_int_grid, render_tile_grid};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FLOOR: i32 = 1;
const WALL: i32 = 2;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A small room: walls around a floor area, one inner pillar.
    let mut level = Level::with_int_grid(IntGrid::new(10, 8));
    for y in 0..8 {
        for x in 0..10 {
            let border = x == 0 || y == 0 || x == 9 || y == 7;
            let pillar = (x, y) == (4, 3) || (x, y) == (5, 3);
            let value = if border || pillar { WALL } else { FLOOR };
            level.set_cell(x, y, value as u16);
        }
    }

    // Wall tops get tile 1, everything else wall-ish gets tile 2, floors a
    // random pick of 3..=5.
    let wall_top = Rule::new(1)
        .with_pattern(3, vec![0, -WALL, 0, 0, WALL, 0, 0, 0, 0])
        .with_tile_ids(vec![1])
        .with_out_of_bounds_value(WALL);
    let wall_fill = Rule::new(2)
        .with_pattern(1, vec![WALL])
        .with_tile_ids(vec![2]);
    let floor_fill = Rule::new(3)
        .with_pattern(1, vec![FLOOR])
        .with_tile_ids(vec![3, 4, 5]);

    let defs = Definitions::new().with_layer(
        LayerDef::new(1)
            .with_name("Walls")
            .with_initial_random_seed(20_240_901)
            .with_rule_group(
                RuleGroup::new("room").with_rules(vec![wall_top, wall_fill, floor_fill]),
            ),
    );

    let mut rng = StdRng::seed_from_u64(7);
    let summary = generate(&defs, &mut level, &RunOptions::new(), &mut rng)?;

    println!("IntGrid:\n{}", render_int_grid(level.int_grid()));
    println!("Tiles:\n{}", render_tile_grid(level.tile_grid(0)));
    println!(
        "{} cells matched, {} tiles placed",
        summary.cells_matched, summary.tiles_placed
    );

    Ok(())
}
