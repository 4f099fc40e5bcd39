//! Loader for editor project files.
//!
//! Project files are JSON. Only the definitions part matters here: layer
//! definitions with their rule groups, tilesets, and the per-layer seeds
//! stored on the first level's layer instances. Layer types other than
//! `IntGrid` and `AutoLayer` are dropped, unknown enum strings fall back to
//! their defaults, and modulo values below 1 are coerced to 1 so they can
//! serve as divisors.
use std::path::Path;

use serde::Deserialize;

use crate::defs::{
    CheckerMode, Definitions, IntGridValue, LayerDef, Rule, RuleGroup, TileMode, TileSetDef,
};
use crate::error::{Error, Result};

const LAYER_TYPE_INT_GRID: &str = "IntGrid";
const LAYER_TYPE_AUTO_LAYER: &str = "AutoLayer";

const CHECKER_MODE_HORIZONTAL: &str = "Horizontal";
const CHECKER_MODE_VERTICAL: &str = "Vertical";

const TILE_MODE_STAMP: &str = "Stamp";

#[derive(Debug, Deserialize)]
struct ProjectJson {
    defs: DefsJson,
    #[serde(default)]
    levels: Vec<LevelJson>,
}

#[derive(Debug, Deserialize)]
struct DefsJson {
    #[serde(default)]
    layers: Vec<LayerJson>,
    #[serde(default)]
    tilesets: Vec<TilesetJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerJson {
    #[serde(rename = "__type")]
    layer_type: String,
    identifier: String,
    uid: u16,
    #[serde(rename = "gridSize", default)]
    grid_size: u16,
    #[serde(default)]
    tileset_def_uid: Option<u16>,
    #[serde(default)]
    auto_source_layer_def_uid: Option<u16>,
    #[serde(default)]
    int_grid_values: Vec<IntGridValueJson>,
    #[serde(default)]
    auto_rule_groups: Vec<RuleGroupJson>,
}

#[derive(Debug, Deserialize)]
struct IntGridValueJson {
    value: u16,
    identifier: String,
}

#[derive(Debug, Deserialize)]
struct RuleGroupJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    rules: Vec<RuleJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleJson {
    uid: u16,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    size: u8,
    #[serde(default)]
    tile_ids: Vec<u16>,
    #[serde(default = "default_chance")]
    chance: f32,
    #[serde(default)]
    break_on_match: bool,
    #[serde(default)]
    pattern: Vec<i32>,
    #[serde(default)]
    flip_x: bool,
    #[serde(default)]
    flip_y: bool,
    #[serde(default = "default_alpha")]
    alpha: f32,
    #[serde(rename = "tileXOffset", default)]
    tile_x_offset: i16,
    #[serde(rename = "tileYOffset", default)]
    tile_y_offset: i16,
    #[serde(rename = "tileRandomXMin", default)]
    tile_random_x_min: i16,
    #[serde(rename = "tileRandomXMax", default)]
    tile_random_x_max: i16,
    #[serde(rename = "tileRandomYMin", default)]
    tile_random_y_min: i16,
    #[serde(rename = "tileRandomYMax", default)]
    tile_random_y_max: i16,
    #[serde(rename = "xModulo", default = "default_modulo")]
    x_modulo: i32,
    #[serde(rename = "yModulo", default = "default_modulo")]
    y_modulo: i32,
    #[serde(rename = "xOffset", default)]
    x_offset: i32,
    #[serde(rename = "yOffset", default)]
    y_offset: i32,
    #[serde(default)]
    checker: String,
    #[serde(default)]
    tile_mode: String,
    #[serde(rename = "pivotX", default)]
    pivot_x: f32,
    #[serde(rename = "pivotY", default)]
    pivot_y: f32,
    #[serde(default)]
    out_of_bounds_value: Option<i32>,
}

fn default_chance() -> f32 {
    1.0
}

fn default_alpha() -> f32 {
    1.0
}

fn default_modulo() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TilesetJson {
    uid: u16,
    identifier: String,
    #[serde(rename = "__cWid", default)]
    c_wid: u16,
    #[serde(rename = "__cHei", default)]
    c_hei: u16,
    #[serde(default)]
    rel_path: Option<String>,
    #[serde(rename = "pxWid", default)]
    px_wid: u16,
    #[serde(rename = "pxHei", default)]
    px_hei: u16,
    #[serde(rename = "tileGridSize", default)]
    tile_grid_size: u16,
    #[serde(default)]
    spacing: u16,
    #[serde(default)]
    padding: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelJson {
    #[serde(default)]
    layer_instances: Option<Vec<LayerInstanceJson>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerInstanceJson {
    layer_def_uid: u16,
    #[serde(default)]
    seed: i32,
}

impl Definitions {
    /// Parses project JSON into pre-processed definitions.
    ///
    /// `load_deactivated` keeps deactivated rule groups and rules around;
    /// level designers often park experiments deactivated, so by default
    /// those are not loaded at all.
    pub fn from_project_str(json: &str, load_deactivated: bool) -> Result<Self> {
        let project: ProjectJson =
            serde_json::from_str(json).map_err(|e| Error::MalformedInput(e.to_string()))?;

        let mut defs = Definitions::new();

        for layer in project.defs.layers {
            if layer.layer_type != LAYER_TYPE_INT_GRID && layer.layer_type != LAYER_TYPE_AUTO_LAYER
            {
                // Not a layer type the rule engine understands.
                continue;
            }
            defs.layers_mut().push(convert_layer(layer, load_deactivated));
        }

        for tileset in project.defs.tilesets {
            defs.tilesets_mut().push(convert_tileset(tileset));
        }

        // The per-layer seeds live on the first level's layer instances.
        for level in project.levels {
            let Some(instances) = level.layer_instances else {
                // Level was probably saved in a separate file.
                continue;
            };
            for instance in instances {
                if let Some(layer) = defs
                    .layers_mut()
                    .iter_mut()
                    .find(|l| l.uid == instance.layer_def_uid)
                {
                    layer.initial_random_seed = instance.seed;
                }
            }
        }

        defs.pre_process();
        Ok(defs)
    }

    /// Reads and parses a project file from disk.
    pub fn from_project_file(path: impl AsRef<Path>, load_deactivated: bool) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_project_str(&json, load_deactivated)
    }
}

fn convert_layer(layer: LayerJson, load_deactivated: bool) -> LayerDef {
    let mut out = LayerDef::new(layer.uid).with_name(layer.identifier);
    out.cell_pixel_size = layer.grid_size;
    out.tileset_def_uid = layer.tileset_def_uid.unwrap_or(0);
    out.auto_source_layer_def_uid = layer.auto_source_layer_def_uid;
    out.int_grid_values = layer
        .int_grid_values
        .into_iter()
        .map(|v| IntGridValue {
            id: v.value,
            name: v.identifier,
        })
        .collect();

    for group in layer.auto_rule_groups {
        if !group.active && !load_deactivated {
            continue;
        }
        let mut out_group = RuleGroup::new(group.name);
        out_group.active = group.active;
        for rule in group.rules {
            if !rule.active && !load_deactivated {
                continue;
            }
            out_group.rules.push(convert_rule(rule));
        }
        out.rule_groups.push(out_group);
    }

    out
}

fn convert_rule(rule: RuleJson) -> Rule {
    // null means: abort matching when the pattern reads past the edge.
    let out_of_bounds_value = rule.out_of_bounds_value.unwrap_or(-1);

    let mut out = Rule::new(rule.uid);
    out.active = rule.active;
    out.chance = rule.chance;
    out.break_on_match = rule.break_on_match;
    out.flip_x = rule.flip_x;
    out.flip_y = rule.flip_y;
    // The editor stores opacity as a 0.01..=1.0 float.
    out.opacity = (rule.alpha * 100.0).clamp(0.0, 100.0) as u8;
    out.pos_x_offset = rule.tile_x_offset;
    out.pos_y_offset = rule.tile_y_offset;
    out.random_pos_x_offset_min = rule.tile_random_x_min;
    out.random_pos_x_offset_max = rule.tile_random_x_max;
    out.random_pos_y_offset_min = rule.tile_random_y_min;
    out.random_pos_y_offset_max = rule.tile_random_y_max;
    // Modulo values serve as divisors; anything below 1 is meaningless.
    out.x_modulo = rule.x_modulo.max(1);
    out.y_modulo = rule.y_modulo.max(1);
    out.x_modulo_offset = rule.x_offset;
    out.y_modulo_offset = rule.y_offset;
    out.checker = parse_checker(&rule.checker);
    out.vertical_out_of_bounds_value = out_of_bounds_value;
    out.horizontal_out_of_bounds_value = out_of_bounds_value;
    out.pattern = rule.pattern;
    out.pattern_size = rule.size;
    out.tile_ids = rule.tile_ids;
    out.tile_mode = parse_tile_mode(&rule.tile_mode);
    out.stamp_pivot_x = rule.pivot_x;
    out.stamp_pivot_y = rule.pivot_y;
    out
}

fn convert_tileset(tileset: TilesetJson) -> TileSetDef {
    let mut out = TileSetDef::new(tileset.uid).with_name(tileset.identifier);
    out.image_path = tileset.rel_path.unwrap_or_default();
    out.image_width = tileset.px_wid;
    out.image_height = tileset.px_hei;
    out.tile_size = tileset.tile_grid_size;
    out.tile_count_width = tileset.c_wid;
    out.tile_count_height = tileset.c_hei;
    out.spacing = tileset.spacing;
    out.margin = tileset.padding;
    out
}

/// Unknown checker strings fall back to `None`.
fn parse_checker(value: &str) -> CheckerMode {
    match value {
        CHECKER_MODE_HORIZONTAL => CheckerMode::Horizontal,
        CHECKER_MODE_VERTICAL => CheckerMode::Vertical,
        _ => CheckerMode::None,
    }
}

/// Unknown tile mode strings fall back to `Single`.
fn parse_tile_mode(value: &str) -> TileMode {
    match value {
        TILE_MODE_STAMP => TileMode::Stamp,
        _ => TileMode::Single,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"{
        "iid": "4b5f1f20-6ac0-11ee-8c99-0242ac120002",
        "jsonVersion": "1.5.3",
        "defs": {
            "layers": [
                {
                    "__type": "IntGrid",
                    "identifier": "Ground",
                    "uid": 10,
                    "gridSize": 16,
                    "tilesetDefUid": 50,
                    "autoSourceLayerDefUid": null,
                    "intGridValues": [
                        { "value": 1, "identifier": "floor" },
                        { "value": 2, "identifier": "wall" }
                    ],
                    "autoRuleGroups": [
                        {
                            "name": "walls",
                            "active": true,
                            "rules": [
                                {
                                    "uid": 100,
                                    "active": true,
                                    "size": 3,
                                    "tileIds": [7],
                                    "chance": 0.75,
                                    "breakOnMatch": true,
                                    "pattern": [0, 2, 0, 0, 1, 0, 0, 0, 0],
                                    "alpha": 0.5,
                                    "flipX": true,
                                    "flipY": false,
                                    "xModulo": 0,
                                    "yModulo": 2,
                                    "xOffset": 1,
                                    "yOffset": 0,
                                    "checker": "Vertical",
                                    "tileMode": "DoesNotExist",
                                    "pivotX": 0,
                                    "pivotY": 0,
                                    "outOfBoundsValue": null,
                                    "tileXOffset": 2,
                                    "tileYOffset": -3,
                                    "tileRandomXMin": -1,
                                    "tileRandomXMax": 1,
                                    "tileRandomYMin": 0,
                                    "tileRandomYMax": 0
                                },
                                {
                                    "uid": 101,
                                    "active": false,
                                    "size": 1,
                                    "tileIds": [9],
                                    "chance": 1,
                                    "breakOnMatch": true,
                                    "pattern": [1],
                                    "checker": "None",
                                    "tileMode": "Single",
                                    "outOfBoundsValue": 3
                                },
                                {
                                    "uid": 102,
                                    "active": true,
                                    "size": 1,
                                    "tileIds": [0, 1, 3, 4],
                                    "chance": 1,
                                    "breakOnMatch": true,
                                    "pattern": [1],
                                    "checker": "None",
                                    "tileMode": "Stamp",
                                    "pivotX": 0.5,
                                    "pivotY": 0.5,
                                    "outOfBoundsValue": 3
                                }
                            ]
                        },
                        {
                            "name": "experiments",
                            "active": false,
                            "rules": []
                        }
                    ]
                },
                {
                    "__type": "Entities",
                    "identifier": "Actors",
                    "uid": 11,
                    "gridSize": 16,
                    "intGridValues": [],
                    "autoRuleGroups": []
                }
            ],
            "tilesets": [
                {
                    "uid": 50,
                    "identifier": "atlas",
                    "__cWid": 3,
                    "__cHei": 3,
                    "relPath": "atlas.png",
                    "pxWid": 48,
                    "pxHei": 48,
                    "tileGridSize": 16,
                    "spacing": 0,
                    "padding": 0
                }
            ]
        },
        "levels": [
            {
                "layerInstances": [
                    { "layerDefUid": 10, "seed": 68410 }
                ]
            },
            {
                "layerInstances": null
            }
        ]
    }"#;

    #[test]
    fn loads_supported_layers_only() {
        let defs = Definitions::from_project_str(PROJECT, false).expect("parses");
        assert_eq!(defs.layers().len(), 1);
        let layer = &defs.layers()[0];
        assert_eq!(layer.name, "Ground");
        assert_eq!(layer.uid, 10);
        assert_eq!(layer.cell_pixel_size, 16);
        assert_eq!(layer.tileset_def_uid, 50);
        assert_eq!(layer.auto_source_layer_def_uid, None);
        assert_eq!(layer.int_grid_value(2).map(|v| v.name.as_str()), Some("wall"));
    }

    #[test]
    fn deactivated_content_is_dropped_by_default() {
        let defs = Definitions::from_project_str(PROJECT, false).expect("parses");
        let layer = &defs.layers()[0];
        assert_eq!(layer.rule_groups.len(), 1);
        let uids: Vec<_> = layer.rule_groups[0].rules.iter().map(|r| r.uid).collect();
        assert_eq!(uids, vec![100, 102]);
    }

    #[test]
    fn deactivated_content_can_be_kept() {
        let defs = Definitions::from_project_str(PROJECT, true).expect("parses");
        let layer = &defs.layers()[0];
        assert_eq!(layer.rule_groups.len(), 2);
        assert!(!layer.rule_groups[1].active);
        assert_eq!(layer.rule_groups[0].rules.len(), 3);
        assert!(!layer.rule_groups[0].rules[1].active);
    }

    #[test]
    fn rule_fields_map_with_coercions() {
        let defs = Definitions::from_project_str(PROJECT, false).expect("parses");
        let rule = &defs.layers()[0].rule_groups[0].rules[0];

        assert_eq!(rule.uid, 100);
        assert_eq!(rule.chance, 0.75);
        assert!(rule.flip_x);
        assert!(!rule.flip_y);
        assert_eq!(rule.opacity, 50);
        assert_eq!(rule.pos_x_offset, 2);
        assert_eq!(rule.pos_y_offset, -3);
        assert_eq!(rule.random_pos_x_offset_min, -1);
        assert_eq!(rule.random_pos_x_offset_max, 1);
        // Modulo 0 coerces to 1.
        assert_eq!(rule.x_modulo, 1);
        assert_eq!(rule.y_modulo, 2);
        assert_eq!(rule.x_modulo_offset, 1);
        assert_eq!(rule.checker, CheckerMode::Vertical);
        // Unknown tile mode falls back to Single.
        assert_eq!(rule.tile_mode, TileMode::Single);
        // null out-of-bounds means abort-at-edge.
        assert_eq!(rule.vertical_out_of_bounds_value, -1);
        assert_eq!(rule.horizontal_out_of_bounds_value, -1);
        assert_eq!(rule.pattern_size, 3);
        assert_eq!(rule.pattern.len(), 9);
    }

    #[test]
    fn explicit_out_of_bounds_value_is_kept() {
        let defs = Definitions::from_project_str(PROJECT, false).expect("parses");
        let stamp = &defs.layers()[0].rule_groups[0].rules[1];
        assert_eq!(stamp.uid, 102);
        assert_eq!(stamp.vertical_out_of_bounds_value, 3);
        assert_eq!(stamp.horizontal_out_of_bounds_value, 3);
    }

    #[test]
    fn tilesets_and_seeds_are_loaded() {
        let defs = Definitions::from_project_str(PROJECT, false).expect("parses");

        let tileset = defs.tileset(50).expect("tileset present");
        assert_eq!(tileset.name, "atlas");
        assert_eq!(tileset.image_path, "atlas.png");
        assert_eq!(tileset.tile_count_width, 3);
        assert_eq!(tileset.tile_count_height, 3);
        assert_eq!(tileset.tile_size, 16);

        assert_eq!(defs.layers()[0].initial_random_seed, 68410);
    }

    #[test]
    fn stamp_rules_are_pre_processed_on_load() {
        let defs = Definitions::from_project_str(PROJECT, false).expect("parses");
        let stamp = &defs.layers()[0].rule_groups[0].rules[1];
        assert_eq!(stamp.tile_mode, TileMode::Stamp);
        assert_eq!(stamp.stamp_tile_offsets.len(), stamp.tile_ids.len());
        // 2x2 block centered: every tile carries the half-cell flags.
        assert!(stamp.stamp_tile_offsets.iter().all(|o| o.has_half_offset()));
        assert!(defs.is_valid());
    }

    #[test]
    fn malformed_json_reports_malformed_input() {
        let err = Definitions::from_project_str("{ not json", false).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn missing_file_reports_io() {
        let err =
            Definitions::from_project_file("/definitely/not/here.ldtk", false).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn unknown_checker_string_defaults_to_none() {
        assert_eq!(parse_checker("Diagonal"), CheckerMode::None);
        assert_eq!(parse_checker("Horizontal"), CheckerMode::Horizontal);
        assert_eq!(parse_checker("Vertical"), CheckerMode::Vertical);
        assert_eq!(parse_tile_mode("Stamp"), TileMode::Stamp);
        assert_eq!(parse_tile_mode(""), TileMode::Single);
    }
}
