use map_autotile::prelude::*;
use map_autotile_examples::{init_tracing, render_tile_grid};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Chance-based decoration: re-running with `randomize_seed` produces new
/// variations, while the layer's own seed reproduces the same one.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let flowers = Rule::new(1)
        .with_pattern(1, vec![1])
        .with_tile_ids(vec![1, 2, 3])
        .with_chance(0.3)
        .with_break_on_match(false);

    let defs = Definitions::new().with_layer(
        LayerDef::new(1)
            .with_name("Decor")
            .with_initial_random_seed(1138)
            .with_rule_group(RuleGroup::new("flowers").with_rule(flowers)),
    );

    let mut level = Level::with_int_grid(IntGrid::from_values(8, 5, vec![1; 40])?);
    let mut rng = StdRng::seed_from_u64(99);

    println!("three randomized variations:");
    let options = RunOptions::new().with_randomize_seed(true);
    for n in 1..=3 {
        generate(&defs, &mut level, &options, &mut rng)?;
        println!("variation {n} (seed {}):", level.tile_grid(0).random_seed());
        println!("{}", render_tile_grid(level.tile_grid(0)));
    }

    println!("fixed layer seed, twice (identical):");
    for _ in 0..2 {
        generate(&defs, &mut level, &RunOptions::new(), &mut rng)?;
        println!("{}", render_tile_grid(level.tile_grid(0)));
    }

    Ok(())
}
