//! Per-level lookup of which grid cells are passable and what they carry

use crate::game_logic::errors::{GridhopError, GridhopResult};
use crate::game_logic::grid::{Footprint, GridCoord};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What occupies a registered grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    /// Impassable for the lifetime of the level
    Static,
    /// Passable, but carries a payload consumers can look up
    Interactable { payload: String },
}

impl Occupant {
    pub fn is_passable(&self) -> bool {
        !matches!(self, Occupant::Static)
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Occupant::Static => None,
            Occupant::Interactable { payload } => Some(payload),
        }
    }
}

impl std::fmt::Display for Occupant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupant::Static => f.write_str("static"),
            Occupant::Interactable { payload } => write!(f, "interactable({payload})"),
        }
    }
}

/// Two registrations that disagreed about the same cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationConflict {
    pub cell: GridCoord,
    pub existing: Occupant,
    pub incoming: Occupant,
}

impl From<&RegistrationConflict> for GridhopError {
    fn from(conflict: &RegistrationConflict) -> Self {
        GridhopError::ConflictingRegistration {
            cell: conflict.cell,
            existing: conflict.existing.to_string(),
            incoming: conflict.incoming.to_string(),
        }
    }
}

/// Grid cell occupancy for the currently loaded level.
///
/// Static always wins over interactable regardless of registration order; every
/// disagreement is logged and kept in [`CollisionRegistry::conflicts`].
/// Cells that were never registered are passable, including cells outside the
/// level's visible area.
#[derive(Debug, Clone, Default, Resource)]
pub struct CollisionRegistry {
    cells: HashMap<GridCoord, Occupant>,
    conflicts: Vec<RegistrationConflict>,
    cell_size: f32,
}

impl CollisionRegistry {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cells: HashMap::new(),
            conflicts: Vec::new(),
            cell_size,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Mark cells as impassable. Registering the same cell twice is a no-op.
    pub fn register_static(&mut self, cells: &[GridCoord]) {
        for &cell in cells {
            self.insert(cell, Occupant::Static);
        }
    }

    /// Mark cells as passable with a payload
    pub fn register_interactable(&mut self, cells: &[GridCoord], payload: &str) {
        for &cell in cells {
            self.insert(
                cell,
                Occupant::Interactable {
                    payload: payload.to_string(),
                },
            );
        }
    }

    /// Register a solid object from its world-space bounding box
    pub fn register_static_footprint(&mut self, footprint: Footprint) -> usize {
        let cells = footprint.covered_cells(self.cell_size);
        self.register_static(&cells);
        cells.len()
    }

    /// Register an interactable object from its world-space bounding box
    pub fn register_interactable_footprint(&mut self, footprint: Footprint, payload: &str) -> usize {
        let cells = footprint.covered_cells(self.cell_size);
        self.register_interactable(&cells, payload);
        cells.len()
    }

    fn insert(&mut self, cell: GridCoord, incoming: Occupant) {
        let Some(existing) = self.cells.get(&cell) else {
            self.cells.insert(cell, incoming);
            return;
        };

        if *existing == incoming {
            return;
        }

        warn!("Conflicting registration at {cell}: {existing} vs {incoming}");
        self.conflicts.push(RegistrationConflict {
            cell,
            existing: existing.clone(),
            incoming: incoming.clone(),
        });

        // Static wins; between two interactables the later payload replaces the earlier
        if *existing != Occupant::Static {
            self.cells.insert(cell, incoming);
        }
    }

    pub fn is_passable(&self, cell: GridCoord) -> bool {
        self.cells.get(&cell).is_none_or(Occupant::is_passable)
    }

    /// Whether a step into `to` is allowed. The source cell is not inspected.
    pub fn can_transition(&self, _from: GridCoord, to: GridCoord) -> bool {
        self.is_passable(to)
    }

    pub fn occupant_at(&self, cell: GridCoord) -> Option<&Occupant> {
        self.cells.get(&cell)
    }

    /// Interactable payloads on `cell` itself and its four neighbours
    pub fn interactables_near(&self, cell: GridCoord) -> Vec<(GridCoord, &str)> {
        std::iter::once(cell)
            .chain(cell.neighbors())
            .filter_map(|c| {
                self.cells
                    .get(&c)
                    .and_then(Occupant::payload)
                    .map(|payload| (c, payload))
            })
            .collect()
    }

    pub fn conflicts(&self) -> &[RegistrationConflict] {
        &self.conflicts
    }

    /// Fail on the first recorded conflict
    pub fn ensure_no_conflicts(&self) -> GridhopResult<()> {
        match self.conflicts.first() {
            Some(conflict) => Err(conflict.into()),
            None => Ok(()),
        }
    }

    /// Counts of (static, interactable) cells
    pub fn cell_counts(&self) -> (usize, usize) {
        let statics = self
            .cells
            .values()
            .filter(|o| matches!(o, Occupant::Static))
            .count();
        (statics, self.cells.len() - statics)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop every registration; used on level unload
    pub fn clear(&mut self) {
        self.cells.clear();
        self.conflicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::grid::DEFAULT_CELL_SIZE;

    fn registry() -> CollisionRegistry {
        CollisionRegistry::new(DEFAULT_CELL_SIZE)
    }

    #[test]
    fn test_unregistered_cells_are_passable() {
        let reg = registry();
        assert!(reg.is_passable(GridCoord::new(1000, -1000)));
        assert!(reg.occupant_at(GridCoord::ORIGIN).is_none());
        assert_eq!(reg.cell_size(), DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_static_cells_block_from_every_side() {
        let mut reg = registry();
        let wall = GridCoord::new(3, 3);
        reg.register_static(&[wall]);

        for neighbour in wall.neighbors() {
            assert!(!reg.can_transition(neighbour, wall));
        }
        assert!(!reg.is_passable(wall));
    }

    #[test]
    fn test_static_registration_is_idempotent() {
        let mut reg = registry();
        reg.register_static(&[GridCoord::ORIGIN, GridCoord::ORIGIN]);
        reg.register_static(&[GridCoord::ORIGIN]);
        assert_eq!(reg.cell_counts(), (1, 0));
        assert!(reg.conflicts().is_empty());
    }

    #[test]
    fn test_interactable_door() {
        let mut reg = registry();
        let door = GridCoord::new(2, 0);
        reg.register_interactable(&[door], "door");

        let occupant = reg.occupant_at(door).expect("door should be registered");
        assert_eq!(occupant.payload(), Some("door"));
        assert!(reg.is_passable(door));
        assert!(reg.can_transition(GridCoord::new(1, 0), door));
    }

    #[test]
    fn test_static_wins_regardless_of_order() {
        let mut reg = registry();
        let a = GridCoord::new(0, 0);
        let b = GridCoord::new(1, 0);

        reg.register_static(&[a]);
        reg.register_interactable(&[a], "lamp");

        reg.register_interactable(&[b], "lamp");
        reg.register_static(&[b]);

        assert_eq!(reg.occupant_at(a), Some(&Occupant::Static));
        assert_eq!(reg.occupant_at(b), Some(&Occupant::Static));
        assert_eq!(reg.conflicts().len(), 2);
        assert!(matches!(
            reg.ensure_no_conflicts(),
            Err(GridhopError::ConflictingRegistration { .. })
        ));
    }

    #[test]
    fn test_later_interactable_payload_replaces_earlier() {
        let mut reg = registry();
        let cell = GridCoord::new(4, 4);
        reg.register_interactable(&[cell], "note");
        reg.register_interactable(&[cell], "note");
        assert!(reg.conflicts().is_empty());

        reg.register_interactable(&[cell], "phone");
        assert_eq!(reg.occupant_at(cell).and_then(Occupant::payload), Some("phone"));
        assert_eq!(reg.conflicts().len(), 1);
    }

    #[test]
    fn test_footprint_registration() {
        let mut reg = registry();
        // 4x4 bookshelf centered at (1, 1) covers a 2x2 block of cells
        let count = reg.register_static_footprint(Footprint::new(1.0, 1.0, 4.0, 4.0));
        assert_eq!(count, 4);
        for cell in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(!reg.is_passable(GridCoord::new(cell.0, cell.1)));
        }
        assert!(reg.is_passable(GridCoord::new(2, 1)));
    }

    #[test]
    fn test_interactables_near() {
        let mut reg = registry();
        reg.register_interactable(&[GridCoord::new(2, 0)], "door");
        reg.register_interactable(&[GridCoord::new(5, 5)], "far away");
        reg.register_static(&[GridCoord::new(1, 1)]);

        let near = reg.interactables_near(GridCoord::new(1, 0));
        assert_eq!(near, vec![(GridCoord::new(2, 0), "door")]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut reg = registry();
        reg.register_static(&[GridCoord::ORIGIN]);
        reg.register_interactable(&[GridCoord::ORIGIN], "bed");
        reg.clear();

        assert!(reg.is_empty());
        assert!(reg.conflicts().is_empty());
        assert!(reg.is_passable(GridCoord::ORIGIN));
    }
}
