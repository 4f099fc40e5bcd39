use map_autotile::prelude::*;
use map_autotile_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One stamp rule, run with three different pivots, to show how the anchor
/// shifts the placed shape relative to the matched cell.
fn main() -> anyhow::Result<()> {
    init_tracing();

    for (pivot_x, pivot_y) in [(0.0, 1.0), (0.5, 1.0), (1.0, 1.0)] {
        // Cross-shaped stamp from a 3x3 atlas: 0 1 2 / _ 4 _ / _ 7 _
        let rule = Rule::new(1)
            .with_pattern(3, vec![-1, -1, -1, 1, 1, 1, 0, 1, 0])
            .with_tile_ids(vec![0, 1, 2, 4, 7])
            .with_tile_mode(TileMode::Stamp)
            .with_stamp_pivot(pivot_x, pivot_y);

        let mut defs = Definitions::new()
            .with_layer(
                LayerDef::new(1)
                    .with_name("Stamps")
                    .with_tileset_def_uid(42)
                    .with_rule_group(RuleGroup::new("crosses").with_rule(rule)),
            )
            .with_tileset(TileSetDef::new(42).with_tile_counts(3, 3));
        defs.pre_process();

        let mut level = Level::with_int_grid(IntGrid::from_values(
            5,
            5,
            vec![
                0, 0, 0, 0, 0, //
                2, 2, 2, 2, 2, //
                1, 1, 1, 1, 1, //
                1, 1, 1, 1, 1, //
                0, 1, 1, 0, 0, //
            ],
        )?);

        let mut rng = StdRng::seed_from_u64(0);
        generate(&defs, &mut level, &RunOptions::new(), &mut rng)?;

        println!("pivot ({pivot_x}, {pivot_y}):");
        println!("{}", level.tile_grid(0));
    }

    Ok(())
}
