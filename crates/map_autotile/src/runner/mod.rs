//! The rule runner: applies a [`Definitions`] tree to a [`Level`]'s IntGrid,
//! filling one TileGrid per layer.
//!
//! A run is synchronous and deterministic: visitation order (group order →
//! rule order → row → column) is part of the contract, and the only
//! randomness is the coordinate hash seeded per layer. The same definitions,
//! IntGrid, and seed always produce bit-identical TileGrids.
mod events;
mod matching;
mod placement;

pub use events::{EventSink, FnSink, GenerateEvent, MultiSink, VecSink};

use rand::RngCore;
use tracing::{info, warn};

use crate::defs::Definitions;
use crate::error::{Error, Result};
use crate::level::Level;

/// Configuration for a generate run.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Draw a fresh random seed for each layer instead of using the layer's
    /// `initial_random_seed`, producing a new variation of any chance-based
    /// rules.
    pub randomize_seed: bool,
    /// Treat every whole-offset stamp tile as final when its rule breaks on
    /// match, not just the tile on the matched cell. Faster, but wrong when
    /// stamp tiles have transparent areas.
    pub faster_stamp_break_on_match: bool,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether each layer gets a fresh random seed.
    pub fn with_randomize_seed(mut self, randomize_seed: bool) -> Self {
        self.randomize_seed = randomize_seed;
        self
    }

    /// Sets the faster stamp finalization policy.
    pub fn with_faster_stamp_break_on_match(mut self, faster: bool) -> Self {
        self.faster_stamp_break_on_match = faster;
        self
    }
}

/// Counts for a single processed layer.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerSummary {
    /// Cells at least one rule matched.
    pub cells_matched: usize,
    /// Tile records placed.
    pub tiles_placed: usize,
}

/// Aggregated counts for a whole run.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cells at least one rule matched, over all layers.
    pub cells_matched: usize,
    /// Tile records placed, over all layers.
    pub tiles_placed: usize,
}

/// Convenience wrapper binding [`Definitions`] to [`RunOptions`].
pub struct RuleRunner<'a> {
    /// Options applied to every run.
    pub options: RunOptions,
    /// The pre-processed definitions runs execute against.
    pub defs: &'a Definitions,
}

impl<'a> RuleRunner<'a> {
    /// Creates a runner, validating the definitions up front.
    pub fn try_new(options: RunOptions, defs: &'a Definitions) -> Result<Self> {
        defs.validate()?;
        Ok(Self { options, defs })
    }

    pub fn new(options: RunOptions, defs: &'a Definitions) -> Self {
        debug_assert!(defs.is_valid(), "definitions must validate before running");
        Self { options, defs }
    }

    /// Generates all layers into `level`.
    pub fn run(&self, level: &mut Level, rng: &mut impl RngCore) -> Result<RunSummary> {
        generate(self.defs, level, &self.options, rng)
    }

    pub fn run_with_events(
        &self,
        level: &mut Level,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<RunSummary> {
        generate_with_events(self.defs, level, &self.options, rng, sink)
    }
}

/// Populates the level's TileGrids by running every layer's rules over its
/// IntGrid.
///
/// The level's TileGrid list is resized to the layer count and cleared first.
/// On an invalid definition the run fails with [`Error::InvalidConfig`]
/// before placing a single tile, leaving the cleared grids behind. `rng` is
/// only consulted when [`RunOptions::randomize_seed`] is set.
pub fn generate(
    defs: &Definitions,
    level: &mut Level,
    options: &RunOptions,
    rng: &mut impl RngCore,
) -> Result<RunSummary> {
    generate_with_events(defs, level, options, rng, &mut ())
}

/// Like [`generate`], forwarding match and placement events to `sink`.
pub fn generate_with_events(
    defs: &Definitions,
    level: &mut Level,
    options: &RunOptions,
    rng: &mut impl RngCore,
    sink: &mut dyn EventSink,
) -> Result<RunSummary> {
    prepare_level(defs, level)?;
    defs.validate()?;

    sink.send(GenerateEvent::RunStarted {
        layer_count: defs.layers().len(),
    });

    let mut summary = RunSummary::default();
    for layer_index in 0..defs.layers().len() {
        let seed = pick_seed(defs, layer_index, options, rng);
        let layer_summary = run_layer(defs, level, layer_index, seed, options, sink);
        summary.cells_matched += layer_summary.cells_matched;
        summary.tiles_placed += layer_summary.tiles_placed;
    }

    sink.send(GenerateEvent::RunFinished { summary });
    Ok(summary)
}

/// Runs the rules of a single layer. The TileGrid list is still resized and
/// cleared as a whole, so the other layers come out empty.
pub fn generate_layer(
    defs: &Definitions,
    level: &mut Level,
    layer_index: usize,
    options: &RunOptions,
    rng: &mut impl RngCore,
) -> Result<RunSummary> {
    if layer_index >= defs.layers().len() {
        return Err(Error::InvalidConfig(format!(
            "layer index {} out of range ({} layers)",
            layer_index,
            defs.layers().len()
        )));
    }

    prepare_level(defs, level)?;
    defs.validate()?;

    let seed = pick_seed(defs, layer_index, options, rng);
    let layer_summary = run_layer(defs, level, layer_index, seed, options, &mut ());
    Ok(RunSummary {
        cells_matched: layer_summary.cells_matched,
        tiles_placed: layer_summary.tiles_placed,
    })
}

/// Checks the IntGrid and brings the TileGrid list in shape for a run.
fn prepare_level(defs: &Definitions, level: &mut Level) -> Result<()> {
    if level.width() == 0 || level.height() == 0 {
        return Err(Error::InvalidConfig(
            "level IntGrid must be at least 1x1".into(),
        ));
    }
    level.set_tile_grid_count(defs.layers().len());
    level.clear_tile_grids();
    Ok(())
}

fn pick_seed(
    defs: &Definitions,
    layer_index: usize,
    options: &RunOptions,
    rng: &mut impl RngCore,
) -> i32 {
    if options.randomize_seed {
        rng.next_u32() as i32
    } else {
        defs.layers()[layer_index].initial_random_seed
    }
}

fn run_layer(
    defs: &Definitions,
    level: &mut Level,
    layer_index: usize,
    seed: i32,
    options: &RunOptions,
    sink: &mut dyn EventSink,
) -> LayerSummary {
    let layer = &defs.layers()[layer_index];
    info!(
        "Layer {}: '{}' | rule groups: {}.",
        layer_index,
        layer.name,
        layer.rule_groups.len(),
    );

    {
        let tile_grid = level.tile_grid_mut(layer_index);
        tile_grid.set_layer_uid(layer.uid);
        tile_grid.set_random_seed(seed);
    }
    sink.send(GenerateEvent::LayerStarted {
        index: layer_index,
        uid: layer.uid,
        seed,
    });

    if !layer
        .rule_groups
        .iter()
        .any(|g| g.active && !g.rules.is_empty())
    {
        warn!("Layer '{}' has no active rules.", layer.name);
        sink.send(GenerateEvent::Warning {
            context: format!("layer:{}", layer.uid),
            message: "Layer has no active rules".into(),
        });
    }

    // The priority ordinal counts every rule that gets a chance to place
    // tiles, across all groups of the layer.
    let mut priority: u8 = 0;
    let mut summary = LayerSummary::default();

    for group in &layer.rule_groups {
        if !group.active {
            continue;
        }
        for rule in &group.rules {
            if !rule.active || rule.tile_ids.is_empty() || rule.chance <= 0.0 {
                continue;
            }

            let (int_grid, tile_grid) = level.int_grid_and_tile_grid_mut(layer_index);
            placement::apply_rule(
                rule,
                int_grid,
                tile_grid,
                seed,
                priority,
                options,
                layer_index,
                sink,
                &mut summary,
            );

            priority = priority.wrapping_add(1);
        }
    }

    sink.send(GenerateEvent::LayerFinished {
        index: layer_index,
        uid: layer.uid,
        summary,
    });
    summary
}
