use crate::game_logic::collision::{CollisionRegistry, Occupant};
use crate::game_logic::errors::{GridhopError, GridhopResult};
use crate::game_logic::grid::{Footprint, GridCoord, MAX_CELL_INDEX};
use crate::game_logic::hazards::LaneSpec;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

/// Core level definition: layout, spawn points and hazards
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Resource)]
#[validate(schema(function = "validate_layout"))]
pub struct LevelDefinition {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(range(min = 0.25, max = 16.0))]
    pub cell_size: f32,
    pub spawn: [i32; 2],
    /// Where continuous hazards send the player; defaults to `spawn`
    #[serde(default)]
    pub respawn: Option<[i32; 2]>,
    /// Walkable rectangle; when set, the ring of cells around it becomes invisible walls
    #[serde(default)]
    pub bounds: Option<LevelBounds>,
    #[serde(default)]
    #[validate(nested)]
    pub objects: Vec<LevelObject>,
    #[serde(default)]
    pub traffic: Vec<LaneSpec>,
}

/// Inclusive cell rectangle the player may walk in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub min: [i32; 2],
    pub max: [i32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Static,
    Interactable,
}

/// A wall, piece of furniture or interactable prop
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_level_object"))]
pub struct LevelObject {
    #[validate(length(min = 1))]
    pub name: String,
    pub kind: ObjectKind,
    /// Required for interactables
    #[serde(default)]
    pub payload: Option<String>,
    /// World-space center (x, z)
    pub position: [f32; 2],
    /// World-space extent (width along x, depth along z)
    pub size: [f32; 2],
    /// Visual height only
    #[serde(default = "default_object_height")]
    pub height: f32,
}

fn default_object_height() -> f32 {
    1.5
}

fn validate_level_object(object: &LevelObject) -> Result<(), ValidationError> {
    if object.kind == ObjectKind::Interactable
        && object.payload.as_deref().is_none_or(str::is_empty)
    {
        return Err(ValidationError::new("interactable_without_payload"));
    }
    if !object.position.iter().chain(&object.size).all(|v| v.is_finite()) {
        return Err(ValidationError::new("non_finite_geometry"));
    }
    if object.size.iter().any(|&v| v < 0.0) {
        return Err(ValidationError::new("negative_size"));
    }
    Ok(())
}

/// Widest object or bounds rectangle a level may declare, in cells per axis
pub const MAX_LEVEL_SPAN: i32 = 1024;

fn validate_layout(level: &LevelDefinition) -> Result<(), ValidationError> {
    let max_extent = MAX_LEVEL_SPAN as f32 * level.cell_size;
    let max_position = MAX_CELL_INDEX as f32 * level.cell_size;
    for object in &level.objects {
        if object.size.iter().any(|&v| v > max_extent) {
            return Err(ValidationError::new("object_too_large"));
        }
        if object.position.iter().any(|v| v.abs() > max_position) {
            return Err(ValidationError::new("object_out_of_range"));
        }
    }
    if let Some(bounds) = level.bounds {
        let too_wide = (0..2).any(|axis| {
            (bounds.max[axis] as i64 - bounds.min[axis] as i64) >= MAX_LEVEL_SPAN as i64
        });
        if too_wide {
            return Err(ValidationError::new("bounds_too_large"));
        }
    }
    for lane in &level.traffic {
        if lane.max_x <= lane.min_x {
            return Err(ValidationError::new("empty_lane"));
        }
        if lane.car_count > 64 || lane.car_length <= 0.0 || lane.car_width <= 0.0 {
            return Err(ValidationError::new("bad_lane_cars"));
        }
        if !lane.speed.is_finite() {
            return Err(ValidationError::new("non_finite_lane_speed"));
        }
    }
    Ok(())
}

/// What populating the registry produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationStats {
    pub static_cells: usize,
    pub interactable_cells: usize,
    pub boundary_cells: usize,
    pub conflicts: usize,
}

impl LevelObject {
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.position[0], self.position[1], self.size[0], self.size[1])
    }

    pub fn occupant(&self) -> Occupant {
        match self.kind {
            ObjectKind::Static => Occupant::Static,
            ObjectKind::Interactable => Occupant::Interactable {
                payload: self.payload.clone().unwrap_or_default(),
            },
        }
    }
}

impl LevelBounds {
    pub fn contains(&self, cell: GridCoord) -> bool {
        (self.min[0]..=self.max[0]).contains(&cell.x) && (self.min[1]..=self.max[1]).contains(&cell.z)
    }

    /// The one-cell ring just outside the bounds
    pub fn border_cells(&self) -> Vec<GridCoord> {
        let [min_x, min_z] = self.min;
        let [max_x, max_z] = self.max;
        let mut cells = Vec::new();
        for x in (min_x - 1)..=(max_x + 1) {
            cells.push(GridCoord::new(x, min_z - 1));
            cells.push(GridCoord::new(x, max_z + 1));
        }
        for z in min_z..=max_z {
            cells.push(GridCoord::new(min_x - 1, z));
            cells.push(GridCoord::new(max_x + 1, z));
        }
        cells
    }
}

impl LevelDefinition {
    /// Parse and validate a level from TOML text
    pub fn from_toml_str(contents: &str) -> GridhopResult<Self> {
        let level: LevelDefinition =
            toml::from_str(contents).map_err(|e| GridhopError::InvalidLevelData {
                reason: format!("Failed to parse level: {e}"),
            })?;

        level
            .validate()
            .map_err(|errors| GridhopError::LevelValidationFailed {
                reason: errors.to_string(),
            })?;

        if let Some(bounds) = level.bounds {
            if bounds.min[0] > bounds.max[0] || bounds.min[1] > bounds.max[1] {
                return Err(GridhopError::LevelValidationFailed {
                    reason: "bounds.min must not exceed bounds.max".to_string(),
                });
            }
            if !bounds.contains(level.spawn_cell()) {
                return Err(GridhopError::LevelValidationFailed {
                    reason: format!("spawn {} lies outside the level bounds", level.spawn_cell()),
                });
            }
        }

        let respawn = level.respawn_cell();
        if level
            .traffic
            .iter()
            .any(|lane| lane.covers_cell(respawn, level.cell_size))
        {
            return Err(GridhopError::LevelValidationFailed {
                reason: format!("respawn {respawn} lies on a traffic lane"),
            });
        }

        Ok(level)
    }

    /// Get the levels directory path
    pub fn get_levels_dir() -> GridhopResult<PathBuf> {
        Ok(std::env::current_dir()?.join("levels"))
    }

    /// Load a level from the levels directory
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> GridhopResult<Self> {
        let file_path = Self::get_levels_dir()?.join(filename);
        Self::load_from_path(&file_path)
    }

    /// Load a level from an explicit path
    pub fn load_from_path(path: &Path) -> GridhopResult<Self> {
        if !path.exists() {
            return Err(GridhopError::LevelFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn spawn_cell(&self) -> GridCoord {
        GridCoord::new(self.spawn[0], self.spawn[1])
    }

    pub fn respawn_cell(&self) -> GridCoord {
        self.respawn
            .map(|[x, z]| GridCoord::new(x, z))
            .unwrap_or_else(|| self.spawn_cell())
    }

    /// Expand every object footprint (and the optional boundary ring) into `registry`.
    ///
    /// Statics are registered first, so interactables overlapping them are the
    /// ones reported as conflicts.
    pub fn populate_registry(&self, registry: &mut CollisionRegistry) -> RegistrationStats {
        let mut stats = RegistrationStats::default();

        for object in self.objects.iter().filter(|o| o.kind == ObjectKind::Static) {
            stats.static_cells += registry.register_static_footprint(object.footprint());
        }
        for object in self.objects.iter().filter(|o| o.kind == ObjectKind::Interactable) {
            let payload = object.payload.as_deref().unwrap_or_default();
            stats.interactable_cells +=
                registry.register_interactable_footprint(object.footprint(), payload);
        }
        if let Some(bounds) = self.bounds {
            let border = bounds.border_cells();
            stats.boundary_cells = border.len();
            registry.register_static(&border);
        }

        stats.conflicts = registry.conflicts().len();

        if !registry.is_passable(self.spawn_cell()) {
            warn!("Level '{}' spawns the player inside a static cell {}", self.name, self.spawn_cell());
        }

        stats
    }

    /// Small built-in room used when the configured level cannot be loaded
    pub fn fallback() -> Self {
        let wall = |name: &str, x: f32, z: f32, w: f32, d: f32| LevelObject {
            name: name.to_string(),
            kind: ObjectKind::Static,
            payload: None,
            position: [x, z],
            size: [w, d],
            height: default_object_height(),
        };

        Self {
            name: "fallback room".to_string(),
            cell_size: 2.0,
            spawn: [0, 0],
            respawn: None,
            bounds: Some(LevelBounds {
                min: [-2, -2],
                max: [2, 2],
            }),
            objects: vec![
                wall("desk", 4.0, -4.0, 2.0, 2.0),
                LevelObject {
                    name: "bed".to_string(),
                    kind: ObjectKind::Interactable,
                    payload: Some("bed".to_string()),
                    position: [-4.0, -4.0],
                    size: [2.0, 2.0],
                    height: 0.5,
                },
            ],
            traffic: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"
        name = "test room"
        cell_size = 2.0
        spawn = [0, 0]
        respawn = [0, 1]

        [bounds]
        min = [-3, -3]
        max = [3, 3]

        [[objects]]
        name = "wardrobe"
        kind = "static"
        position = [0.0, -2.0]
        size = [2.0, 2.0]

        [[objects]]
        name = "door"
        kind = "interactable"
        payload = "door"
        position = [4.0, 0.0]
        size = [2.0, 2.0]

        [[traffic]]
        row = 5
        speed = 3.0
        car_length = 3.0
        car_width = 1.5
        car_count = 2
        min_x = -10.0
        max_x = 10.0
    "#;

    #[test]
    fn test_parse_level() {
        let level = LevelDefinition::from_toml_str(LEVEL).unwrap();
        assert_eq!(level.name, "test room");
        assert_eq!(level.objects.len(), 2);
        assert_eq!(level.traffic.len(), 1);
        assert_eq!(level.spawn_cell(), GridCoord::ORIGIN);
        assert_eq!(level.respawn_cell(), GridCoord::new(0, 1));
    }

    #[test]
    fn test_populate_registry() {
        let level = LevelDefinition::from_toml_str(LEVEL).unwrap();
        let mut registry = CollisionRegistry::new(level.cell_size);
        let stats = level.populate_registry(&mut registry);

        assert_eq!(stats.static_cells, 1);
        assert_eq!(stats.interactable_cells, 1);
        assert_eq!(stats.boundary_cells, 9 * 2 + 7 * 2);
        assert_eq!(stats.conflicts, 0);

        assert!(!registry.is_passable(GridCoord::new(0, -1)));
        assert_eq!(
            registry.occupant_at(GridCoord::new(2, 0)).and_then(Occupant::payload),
            Some("door")
        );
        // Boundary ring blocks walking off the room
        assert!(!registry.is_passable(GridCoord::new(4, 0)));
        assert!(!registry.is_passable(GridCoord::new(0, -4)));
        assert!(registry.is_passable(GridCoord::new(3, 3)));
    }

    #[test]
    fn test_unbounded_level_is_open_void() {
        let level = LevelDefinition::from_toml_str(
            r#"
            name = "void"
            cell_size = 2.0
            spawn = [0, 0]
            "#,
        )
        .unwrap();
        let mut registry = CollisionRegistry::new(level.cell_size);
        level.populate_registry(&mut registry);
        assert!(registry.is_empty());
        assert!(registry.can_transition(GridCoord::ORIGIN, GridCoord::new(-500, 0)));
    }

    #[test]
    fn test_interactable_needs_payload() {
        let result = LevelDefinition::from_toml_str(
            r#"
            name = "broken"
            cell_size = 2.0
            spawn = [0, 0]

            [[objects]]
            name = "mystery"
            kind = "interactable"
            position = [0.0, 0.0]
            size = [1.0, 1.0]
            "#,
        );
        assert!(matches!(result, Err(GridhopError::LevelValidationFailed { .. })));
    }

    #[test]
    fn test_spawn_outside_bounds_is_rejected() {
        let result = LevelDefinition::from_toml_str(
            r#"
            name = "cramped"
            cell_size = 2.0
            spawn = [9, 9]

            [bounds]
            min = [0, 0]
            max = [2, 2]
            "#,
        );
        assert!(matches!(result, Err(GridhopError::LevelValidationFailed { .. })));
    }

    #[test]
    fn test_bad_toml_is_invalid_data() {
        let result = LevelDefinition::from_toml_str("name = ");
        assert!(matches!(result, Err(GridhopError::InvalidLevelData { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = LevelDefinition::load_from_path(Path::new("no/such/level.toml"));
        assert!(matches!(result, Err(GridhopError::LevelFileNotFound { .. })));
    }

    #[test]
    fn test_conflicting_objects_are_counted() {
        let mut level = LevelDefinition::fallback();
        level.objects.push(LevelObject {
            name: "rug over desk".to_string(),
            kind: ObjectKind::Interactable,
            payload: Some("rug".to_string()),
            position: [4.0, -4.0],
            size: [1.0, 1.0],
            height: 0.1,
        });
        let mut registry = CollisionRegistry::new(level.cell_size);
        let stats = level.populate_registry(&mut registry);

        assert_eq!(stats.conflicts, 1);
        assert_eq!(registry.occupant_at(GridCoord::new(2, -2)), Some(&Occupant::Static));
    }

    #[test]
    fn test_fallback_level_is_valid() {
        let level = LevelDefinition::fallback();
        assert!(level.validate().is_ok());
        let mut registry = CollisionRegistry::new(level.cell_size);
        let stats = level.populate_registry(&mut registry);
        assert_eq!(stats.conflicts, 0);
        assert!(registry.is_passable(level.spawn_cell()));
    }

    #[test]
    fn test_shipped_bedroom_level() {
        let level = LevelDefinition::from_toml_str(include_str!("../../levels/bedroom.toml")).unwrap();
        let mut registry = CollisionRegistry::new(level.cell_size);
        let stats = level.populate_registry(&mut registry);

        assert_eq!(stats.conflicts, 0);
        assert!(registry.is_passable(level.spawn_cell()));
        assert_eq!(
            registry.occupant_at(GridCoord::new(0, -2)).and_then(Occupant::payload),
            Some("bed")
        );
        assert!(!registry.is_passable(GridCoord::new(2, 0)));
        assert!(!registry.is_passable(GridCoord::new(3, 0)));
    }

    #[test]
    fn test_oversized_object_is_rejected() {
        let result = LevelDefinition::from_toml_str(
            r#"
            name = "warehouse"
            cell_size = 2.0
            spawn = [0, 0]

            [[objects]]
            name = "slab"
            kind = "static"
            position = [0.0, 0.0]
            size = [1.0e9, 1.0e9]
            "#,
        );
        assert!(matches!(result, Err(GridhopError::LevelValidationFailed { .. })));
    }

    #[test]
    fn test_oversized_bounds_are_rejected() {
        let result = LevelDefinition::from_toml_str(
            r#"
            name = "plains"
            cell_size = 2.0
            spawn = [0, 0]

            [bounds]
            min = [-2000000000, 0]
            max = [2000000000, 0]
            "#,
        );
        assert!(matches!(result, Err(GridhopError::LevelValidationFailed { .. })));
    }

    #[test]
    fn test_respawn_on_traffic_lane_is_rejected() {
        let result = LevelDefinition::from_toml_str(
            r#"
            name = "crossing"
            cell_size = 2.0
            spawn = [0, 0]
            respawn = [1, 3]

            [[traffic]]
            row = 3
            speed = 2.0
            car_length = 2.0
            car_width = 1.0
            car_count = 1
            min_x = -6.0
            max_x = 6.0
            "#,
        );
        assert!(matches!(result, Err(GridhopError::LevelValidationFailed { .. })));
    }
}
